//! Parsing of `#[test_case]` arguments and method signatures.

pub(crate) mod args;
pub(crate) mod method;
pub(crate) mod returns;
