//! Example outcome reporting.
//!
//! Runners notify a [`Reporter`] as each example starts and finishes.
//! [`BaseFormatter`] keeps the passed and failed examples of one run, while
//! [`CollectingReporter`] forwards owned [`ExampleRecord`]s into a global,
//! thread-safe collector that the JUnit and JSON writers render.

use std::sync::{Mutex, MutexGuard, OnceLock};

use crate::discovery::Example;
use crate::execution::Outcome;

/// JSON report writer for example outcomes.
#[cfg(feature = "diagnostics")]
pub mod json;
/// JUnit XML writer for example outcomes.
pub mod junit;
mod record;

pub use record::ExampleRecord;

/// Observer of example execution.
pub trait Reporter {
    /// An example is about to run.
    fn example_started(&mut self, _example: &Example) {}

    /// An example finished without failure.
    fn example_passed(&mut self, example: &Example);

    /// An example failed or errored.
    fn example_failed(&mut self, example: &Example, outcome: &Outcome);
}

/// Reporter that keeps the examples of one run grouped by outcome.
///
/// # Examples
/// ```
/// use xunit_bdd::{BaseFormatter, World};
///
/// let world = World::new();
/// let foo = world.test_case().anonymous_subclass();
/// foo.define("test_bar", |_| Ok(()));
///
/// let mut formatter = BaseFormatter::new();
/// foo.run_all(Some(&mut formatter));
/// assert_eq!(formatter.passed_examples().len(), 1);
/// assert!(formatter.failed_examples().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct BaseFormatter {
    passed: Vec<Example>,
    failed: Vec<(Example, Outcome)>,
}

impl BaseFormatter {
    /// Create an empty formatter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Examples that passed, in execution order.
    #[must_use]
    pub fn passed_examples(&self) -> &[Example] {
        &self.passed
    }

    /// Examples that failed or errored, with their outcomes.
    #[must_use]
    pub fn failed_examples(&self) -> &[(Example, Outcome)] {
        &self.failed
    }
}

impl Reporter for BaseFormatter {
    fn example_passed(&mut self, example: &Example) {
        self.passed.push(example.clone());
    }

    fn example_failed(&mut self, example: &Example, outcome: &Outcome) {
        self.failed.push((example.clone(), outcome.clone()));
    }
}

/// Reporter that records every outcome in the global collector.
#[derive(Clone, Copy, Debug, Default)]
pub struct CollectingReporter;

impl Reporter for CollectingReporter {
    fn example_passed(&mut self, example: &Example) {
        record(ExampleRecord::from_example(example, Outcome::Passed));
    }

    fn example_failed(&mut self, example: &Example, outcome: &Outcome) {
        record(ExampleRecord::from_example(example, outcome.clone()));
    }
}

static REPORTS: OnceLock<Mutex<Vec<ExampleRecord>>> = OnceLock::new();

fn lock_reports() -> MutexGuard<'static, Vec<ExampleRecord>> {
    let reports = REPORTS.get_or_init(|| Mutex::new(Vec::new()));
    match reports.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Record an example outcome in the shared collector.
pub fn record(record: ExampleRecord) {
    lock_reports().push(record);
}

/// Retrieve a snapshot of the recorded examples without clearing them.
#[must_use]
pub fn snapshot() -> Vec<ExampleRecord> {
    lock_reports().clone()
}

/// Remove and return all recorded example outcomes.
#[must_use]
pub fn drain() -> Vec<ExampleRecord> {
    lock_reports().drain(..).collect()
}
