//! Error types for example outcomes and class declarations.

/// A failure signalled by an example body or one of its hooks.
///
/// Assertion primitives produce [`Failure::Assertion`]; anything else that
/// stops an example early, including caught panics, is a [`Failure::Error`].
///
/// # Examples
///
/// ```
/// use xunit_bdd::Failure;
///
/// let failure = Failure::assertion("expected 1, got 2");
/// assert!(failure.is_assertion());
/// assert_eq!(failure.to_string(), "expected 1, got 2");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Failure {
    /// An assertion primitive reported a failed expectation.
    #[error("{message}")]
    Assertion {
        /// Human-readable description of the failed expectation.
        message: String,
    },
    /// The example stopped because of an unexpected error or panic.
    #[error("{message}")]
    Error {
        /// Human-readable description of the error.
        message: String,
    },
}

impl Failure {
    /// Construct an assertion failure.
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::Assertion {
            message: message.into(),
        }
    }

    /// Construct an unexpected-error failure.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Return the failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Assertion { message } | Self::Error { message } => message,
        }
    }

    /// Whether the failure came from an assertion primitive.
    #[must_use]
    pub const fn is_assertion(&self) -> bool {
        matches!(self, Self::Assertion { .. })
    }
}

/// Result type returned by example bodies and hooks.
pub type TestResult = Result<(), Failure>;

/// Conversion from the return value of a test method into a [`TestResult`].
///
/// Implemented for `()` and [`TestResult`] so that `#[test_case]` methods can
/// either return nothing or propagate assertion failures with `?`.
pub trait IntoTestResult {
    /// Convert the value into a [`TestResult`].
    ///
    /// # Errors
    ///
    /// Returns the failure carried by the value, if any.
    fn into_test_result(self) -> TestResult;
}

impl IntoTestResult for () {
    fn into_test_result(self) -> TestResult {
        Ok(())
    }
}

impl IntoTestResult for TestResult {
    fn into_test_result(self) -> TestResult {
        self
    }
}

/// Errors raised while declaring or loading test classes.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DeclarationError {
    /// A fluent declaration used a name that was never registered as an
    /// example alias.
    #[error("unknown example alias `{alias}` on {class}")]
    UnknownAlias {
        /// The alias that was requested.
        alias: String,
        /// Description of the class the declaration targeted.
        class: String,
    },
    /// A named class was reopened with a different superclass.
    #[error("superclass mismatch for class {name}")]
    SuperclassMismatch {
        /// Name of the reopened class.
        name: String,
    },
    /// A registered test case extends a type that was never registered.
    #[error("test case `{key}` extends `{parent}`, which is not registered")]
    MissingParent {
        /// Registration key of the child test case.
        key: String,
        /// Registration key of the missing parent.
        parent: String,
    },
    /// No test case registration exists for the requested key.
    #[error("no test case is registered under `{key}`")]
    UnknownTestCase {
        /// The requested registration key.
        key: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_converts_to_success() {
        assert_eq!(().into_test_result(), Ok(()));
    }

    #[test]
    fn failure_message_is_shared_by_both_variants() {
        assert_eq!(Failure::assertion("a").message(), "a");
        assert_eq!(Failure::error("b").message(), "b");
        assert!(!Failure::error("b").is_assertion());
    }

    #[test]
    fn declaration_error_names_the_alias() {
        let err = DeclarationError::UnknownAlias {
            alias: "make_test".into(),
            class: "Foo".into(),
        };
        assert_eq!(err.to_string(), "unknown example alias `make_test` on Foo");
    }
}
