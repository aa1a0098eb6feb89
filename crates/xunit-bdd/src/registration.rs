//! Compile-time registration of `#[test_case]` types.
//!
//! The `#[test_case]` attribute implements [`TestCase`] for a type and
//! submits a [`TestCaseRegistration`] to an `inventory` collection. Worlds
//! build classes from these records on demand, parents first, so declaration
//! order across files does not matter.

use std::fmt::Write as _;

use crate::class::TestClass;
use crate::reporting::{self, BaseFormatter};
use crate::world::World;

/// A type whose methods form an xUnit-style test class.
///
/// Implemented by `#[test_case]`; the subject of every example is built with
/// `Default`.
pub trait TestCase: Default + 'static {
    /// Class name reported in descriptions.
    const NAME: &'static str;
    /// Registration key, unique per type.
    const KEY: &'static str;
    /// Registration key of the extended test case, if any.
    const PARENT: Option<&'static str>;

    /// Populate `class` with this type's methods, hooks and metadata.
    fn declare(class: &TestClass);
}

/// Registration record submitted by `#[test_case]`.
#[derive(Debug)]
pub struct TestCaseRegistration {
    /// Unique key, usually the type's module path and name.
    pub key: &'static str,
    /// Class name reported in descriptions.
    pub name: &'static str,
    /// Key of the extended test case, if any.
    pub parent: Option<&'static str>,
    /// Source file of the declaration.
    pub file: &'static str,
    /// Source line of the declaration.
    pub line: u32,
    /// Populates the class built for this registration.
    pub declare: fn(&TestClass),
}

impl TestCaseRegistration {
    /// Build a registration record for `T`.
    #[must_use]
    pub const fn new(
        key: &'static str,
        name: &'static str,
        parent: Option<&'static str>,
        file: &'static str,
        line: u32,
        declare: fn(&TestClass),
    ) -> Self {
        Self {
            key,
            name,
            parent,
            file,
            line,
            declare,
        }
    }

    /// The registration submitted under `key`.
    #[must_use]
    pub fn find(key: &str) -> Option<&'static Self> {
        inventory::iter::<Self>
            .into_iter()
            .find(|registration| registration.key == key)
    }

    /// Every registration, ordered by file, line and key.
    #[must_use]
    pub fn in_source_order() -> Vec<&'static Self> {
        let mut registrations: Vec<_> = inventory::iter::<Self>.into_iter().collect();
        registrations.sort_by_key(|registration| {
            (registration.file, registration.line, registration.key)
        });
        registrations
    }
}

inventory::collect!(TestCaseRegistration);

/// Run the examples of `T` in a fresh world and panic when any fail.
///
/// Outcomes are also forwarded to the global report collector.
///
/// # Panics
///
/// Panics when `T` cannot be loaded or when any example fails, listing every
/// failed example with its message.
pub fn run_registered<T: TestCase>() {
    let world = World::new();
    let class = match world.load::<T>() {
        Ok(class) => class,
        Err(error) => panic!("cannot load test case {}: {error}", T::NAME),
    };
    let mut formatter = BaseFormatter::new();
    let summary = class.run_all(Some(&mut formatter));
    for record in summary.records() {
        reporting::record(record.clone());
    }
    let failed = formatter.failed_examples();
    if failed.is_empty() {
        return;
    }
    let mut report = format!("{} of {} example(s) failed:", failed.len(), summary.len());
    for (example, outcome) in failed {
        let _ = write!(
            report,
            "\n  {} ({}) {}: {}",
            example.full_description(),
            example.location(),
            outcome.label(),
            outcome.message().unwrap_or_default()
        );
    }
    panic!("{report}");
}
