//! Source locations captured when classes and methods are declared.
//!
//! Locations are recorded at registration time, either through
//! `#[track_caller]` on the declaration functions or through `file!()` and
//! `line!()` in macro-generated code. Lookups walk the method-resolution order
//! of a class and never inspect the runtime stack.

use std::fmt;

use crate::class::{MethodSource, TestClass};

/// A file and line pair identifying where something was declared.
///
/// # Examples
///
/// ```
/// use xunit_bdd::Location;
///
/// let location = Location::new("tests/calculator.rs", 12);
/// assert_eq!(location.to_string(), "tests/calculator.rs:12");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "diagnostics", derive(serde::Serialize))]
pub struct Location {
    file: &'static str,
    line: u32,
}

impl Location {
    /// Create a location from its parts.
    #[must_use]
    pub const fn new(file: &'static str, line: u32) -> Self {
        Self { file, line }
    }

    /// Capture the location of the caller.
    ///
    /// Functions marked `#[track_caller]` forward their own caller, so the
    /// captured location is the user's declaration site.
    #[must_use]
    #[track_caller]
    pub fn caller() -> Self {
        let caller = std::panic::Location::caller();
        Self::new(caller.file(), caller.line())
    }

    /// The source file path.
    #[must_use]
    pub const fn file(&self) -> &'static str {
        self.file
    }

    /// The one-based line number.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Find where `name` was first declared along the resolution order of
/// `class`.
///
/// Returns `None` when neither the class, its mixed-in modules, nor any
/// ancestor declares the method.
#[must_use]
pub fn find_definition(class: &TestClass, name: &str) -> Option<Location> {
    class
        .method_resolution_order()
        .iter()
        .find_map(|source| source.method(name).map(|def| def.location()))
}

/// Every recorded declaration site for `name`, nearest definition first.
///
/// A subclass that overrides an inherited method yields both locations. The
/// result is empty when the name is not declared anywhere in the hierarchy.
#[must_use]
pub fn find_caller_lines(class: &TestClass, name: &str) -> Vec<Location> {
    class
        .method_resolution_order()
        .iter()
        .filter_map(|source: &MethodSource| source.method(name).map(|def| def.location()))
        .collect()
}
