//! Minimal assertion primitives for test methods.
//!
//! Each primitive returns a [`TestResult`] so method bodies can propagate a
//! failed expectation with `?`. A failure is an ordinary value: the execution
//! bracket records it as a failed outcome and still runs teardown.

use std::fmt::Debug;

use crate::error::{Failure, TestResult};
use crate::location::Location;

const FLUNK_MESSAGE: &str = "Flunked.";

fn located(message: impl AsRef<str>, location: Location) -> Failure {
    Failure::assertion(format!("{} ({location})", message.as_ref()))
}

/// Fail unconditionally.
///
/// # Errors
///
/// Always returns [`Failure::Assertion`]; an empty message becomes
/// `"Flunked."`.
///
/// # Examples
///
/// ```
/// let result = xunit_bdd::flunk("");
/// assert!(result.is_err_and(|failure| failure.message().starts_with("Flunked.")));
/// ```
#[track_caller]
pub fn flunk(message: impl AsRef<str>) -> TestResult {
    let message = message.as_ref();
    let message = if message.is_empty() { FLUNK_MESSAGE } else { message };
    Err(located(message, Location::caller()))
}

/// Fail unless `condition` holds.
///
/// # Errors
///
/// Returns [`Failure::Assertion`] with `message` when `condition` is false.
#[track_caller]
pub fn assert_that(condition: bool, message: impl AsRef<str>) -> TestResult {
    if condition {
        Ok(())
    } else {
        Err(located(message, Location::caller()))
    }
}

/// Fail unless `expected == actual`.
///
/// # Errors
///
/// Returns [`Failure::Assertion`] showing both values when they differ.
///
/// # Examples
///
/// ```
/// assert!(xunit_bdd::assert_equal(1, 1).is_ok());
/// assert!(xunit_bdd::assert_equal("a", "b").is_err());
/// ```
#[track_caller]
pub fn assert_equal<T: PartialEq + Debug>(expected: T, actual: T) -> TestResult {
    if expected == actual {
        Ok(())
    } else {
        Err(located(
            format!("expected: {expected:?}\n  actual: {actual:?}"),
            Location::caller(),
        ))
    }
}

/// Fail when `unexpected == actual`.
///
/// # Errors
///
/// Returns [`Failure::Assertion`] when the values are equal.
#[track_caller]
pub fn assert_not_equal<T: PartialEq + Debug>(unexpected: T, actual: T) -> TestResult {
    if unexpected == actual {
        Err(located(
            format!("expected {actual:?} to differ from {unexpected:?}"),
            Location::caller(),
        ))
    } else {
        Ok(())
    }
}

/// Unwrap `value`, failing with `message` when it is `None`.
///
/// # Errors
///
/// Returns [`Failure::Assertion`] when `value` is `None`.
#[track_caller]
pub fn assert_some<T>(value: Option<T>, message: impl AsRef<str>) -> Result<T, Failure> {
    let location = Location::caller();
    value.ok_or_else(|| located(message, location))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flunk_defaults_its_message() {
        let Err(failure) = flunk("") else {
            panic!("flunk must fail");
        };
        assert!(failure.is_assertion());
        assert!(failure.message().starts_with(FLUNK_MESSAGE));
    }

    #[test]
    fn failures_point_at_the_caller() {
        let line = line!() + 1;
        let Err(failure) = assert_that(false, "nope") else {
            panic!("assert_that(false) must fail");
        };
        assert_eq!(
            failure.message(),
            format!("nope ({})", Location::new(file!(), line))
        );
    }

    #[test]
    fn equality_assertions() {
        assert!(assert_equal(42, 42).is_ok());
        assert!(assert_not_equal(1, 2).is_ok());
        let Err(failure) = assert_equal(1, 2) else {
            panic!("unequal values must fail");
        };
        assert!(failure.message().contains("expected: 1"));
        assert!(failure.message().contains("actual: 2"));
    }

    #[test]
    fn assert_some_unwraps() {
        assert_eq!(assert_some(Some(3), "missing"), Ok(3));
        assert!(assert_some::<u8>(None, "missing").is_err());
    }
}
