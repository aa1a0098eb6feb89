//! Runtime configuration for test-method discovery.
//!
//! The module exposes the list of name prefixes that mark a method as a test
//! method. Resolution order is an in-process override, then the
//! `XUNIT_BDD_TEST_PREFIXES` environment variable (comma separated), then the
//! default `test_` prefix.

use std::sync::{PoisonError, RwLock};

/// Prefix used when neither an override nor the environment supplies one.
pub const DEFAULT_TEST_PREFIX: &str = "test_";

/// Environment variable consulted for custom prefixes.
pub const TEST_PREFIXES_ENV: &str = "XUNIT_BDD_TEST_PREFIXES";

static PREFIX_OVERRIDE: RwLock<Option<Vec<String>>> = RwLock::new(None);

fn parse_prefixes(value: &str) -> Option<Vec<String>> {
    let prefixes: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|prefix| !prefix.is_empty())
        .map(str::to_owned)
        .collect();
    (!prefixes.is_empty()).then_some(prefixes)
}

fn env_prefixes() -> Option<Vec<String>> {
    std::env::var(TEST_PREFIXES_ENV)
        .ok()
        .as_deref()
        .and_then(parse_prefixes)
}

fn override_state() -> Option<Vec<String>> {
    PREFIX_OVERRIDE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// The prefixes that mark a method name as a test method.
#[must_use]
pub fn test_prefixes() -> Vec<String> {
    override_state()
        .or_else(env_prefixes)
        .unwrap_or_else(|| vec![DEFAULT_TEST_PREFIX.to_owned()])
}

/// Whether `name` starts with one of the configured test prefixes.
///
/// # Examples
///
/// ```
/// assert!(xunit_bdd::config::is_test_method_name("test_addition"));
/// assert!(!xunit_bdd::config::is_test_method_name("helper"));
/// ```
#[must_use]
pub fn is_test_method_name(name: &str) -> bool {
    test_prefixes()
        .iter()
        .any(|prefix| name.starts_with(prefix.as_str()))
}

/// Override the test prefixes for the current process.
///
/// Empty prefixes are ignored; an override with no usable prefix clears the
/// override instead.
pub fn set_test_prefixes<I, S>(prefixes: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined = prefixes
        .into_iter()
        .map(|prefix| prefix.as_ref().to_owned())
        .collect::<Vec<_>>()
        .join(",");
    *PREFIX_OVERRIDE
        .write()
        .unwrap_or_else(PoisonError::into_inner) = parse_prefixes(&joined);
}

/// Remove any in-process override so the environment applies again.
pub fn clear_test_prefixes_override() {
    *PREFIX_OVERRIDE
        .write()
        .unwrap_or_else(PoisonError::into_inner) = None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serial_test::serial;

    #[test]
    #[serial]
    fn default_prefix_is_test_underscore() {
        clear_test_prefixes_override();
        assert!(is_test_method_name("test_bar"));
        assert!(!is_test_method_name("bar"));
        assert!(!is_test_method_name("testbar"));
    }

    #[test]
    #[serial]
    fn override_replaces_default() {
        // Other unit tests discover `test_` methods concurrently.
        set_test_prefixes(["test_", "should_"]);
        assert_eq!(test_prefixes(), ["test_", "should_"]);
        assert!(is_test_method_name("should_add"));
        assert!(!is_test_method_name("check_total"));
        clear_test_prefixes_override();
        assert!(!is_test_method_name("should_add"));
    }

    #[test]
    #[serial]
    fn blank_override_falls_back() {
        set_test_prefixes(["", "  "]);
        assert_eq!(test_prefixes(), vec![DEFAULT_TEST_PREFIX.to_owned()]);
        clear_test_prefixes_override();
    }

    #[rstest]
    #[case("test_", Some(vec!["test_"]))]
    #[case(" check_ , test_ ", Some(vec!["check_", "test_"]))]
    #[case(",,", None)]
    #[case("", None)]
    fn parses_comma_separated_prefixes(#[case] raw: &str, #[case] expected: Option<Vec<&str>>) {
        let expected = expected.map(|list| list.into_iter().map(str::to_owned).collect::<Vec<_>>());
        assert_eq!(parse_prefixes(raw), expected);
    }
}
