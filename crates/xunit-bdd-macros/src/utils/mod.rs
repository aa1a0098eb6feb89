//! Shared helpers for the attribute macros.

pub(crate) mod errors;
