//! Execution bracket: running examples with setup, hooks and teardown.
//!
//! For each example a fresh [`TestInstance`] runs
//! `setup → before hooks → body → after hooks → teardown`. Teardown always
//! runs, even when setup failed (the body and hooks are then skipped). Panics
//! are caught at each step and recorded as [`Outcome::Errored`]; the first
//! failure of an example decides its outcome and never stops the remaining
//! examples.

mod harness;
mod instance;

use std::panic::{AssertUnwindSafe, catch_unwind};

pub use harness::{ExampleRunRequest, ExampleRunner, Harness, StdHarness};
pub use instance::TestInstance;

use crate::class::{SETUP, TEARDOWN, TestClass};
use crate::discovery::Example;
use crate::error::{Failure, TestResult};
use crate::method::MethodBody;
use crate::panic::panic_message;
use crate::reporting::{ExampleRecord, Reporter};

/// Result of running one example.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Setup, hooks, body and teardown all succeeded.
    Passed,
    /// An assertion failed.
    Failed {
        /// Failure message from the assertion primitive.
        message: String,
    },
    /// An unexpected error or panic stopped the example.
    Errored {
        /// Error or panic message.
        message: String,
    },
}

impl Outcome {
    /// Lowercase label for reports.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed { .. } => "failed",
            Self::Errored { .. } => "errored",
        }
    }

    /// Whether the example passed.
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// The failure message, if the example did not pass.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Passed => None,
            Self::Failed { message } | Self::Errored { message } => Some(message),
        }
    }
}

impl From<Option<Failure>> for Outcome {
    fn from(failure: Option<Failure>) -> Self {
        match failure {
            None => Self::Passed,
            Some(Failure::Assertion { message }) => Self::Failed { message },
            Some(Failure::Error { message }) => Self::Errored { message },
        }
    }
}

/// Outcomes of one run, in execution order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    records: Vec<ExampleRecord>,
}

impl RunSummary {
    /// Every example record.
    #[must_use]
    pub fn records(&self) -> &[ExampleRecord] {
        &self.records
    }

    /// Records of examples that passed.
    pub fn passed(&self) -> impl Iterator<Item = &ExampleRecord> {
        self.records.iter().filter(|record| record.outcome().is_passed())
    }

    /// Records of examples that failed or errored.
    pub fn failed(&self) -> impl Iterator<Item = &ExampleRecord> {
        self.records.iter().filter(|record| !record.outcome().is_passed())
    }

    /// Whether every example passed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed().next().is_none()
    }

    /// Number of examples run.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no example ran.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append the records of another run.
    pub fn extend(&mut self, other: Self) {
        self.records.extend(other.records);
    }
}

type InstanceFactory<'a> = Box<dyn FnMut(&TestClass) -> TestInstance + 'a>;

/// Runs the examples of one class.
///
/// # Examples
///
/// ```
/// use xunit_bdd::{BaseFormatter, Runner, World, flunk};
///
/// let world = World::new();
/// let foo = world.test_case().anonymous_subclass();
/// foo.define("test_ok", |_| Ok(()));
/// foo.define("test_broken", |_| flunk("nope"));
///
/// let mut formatter = BaseFormatter::new();
/// let summary = Runner::new(&foo).reporter(&mut formatter).run();
/// assert_eq!(summary.len(), 2);
/// assert_eq!(formatter.failed_examples().len(), 1);
/// ```
pub struct Runner<'a, H: Harness = StdHarness> {
    class: &'a TestClass,
    reporter: Option<&'a mut dyn Reporter>,
    factory: Option<InstanceFactory<'a>>,
    harness: &'a H,
}

static STD_HARNESS: StdHarness = StdHarness::new();

impl<'a> Runner<'a, StdHarness> {
    /// Prepare a run of `class` with the standard harness.
    #[must_use]
    pub fn new(class: &'a TestClass) -> Self {
        Self {
            class,
            reporter: None,
            factory: None,
            harness: &STD_HARNESS,
        }
    }
}

impl<'a, H: Harness> Runner<'a, H> {
    /// Report each outcome to `reporter`.
    #[must_use]
    pub fn reporter(mut self, reporter: &'a mut dyn Reporter) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Build the instance of each example with `factory` instead of
    /// [`TestInstance::new`].
    #[must_use]
    pub fn instance_factory(
        mut self,
        factory: impl FnMut(&TestClass) -> TestInstance + 'a,
    ) -> Self {
        self.factory = Some(Box::new(factory));
        self
    }

    /// Execute brackets through another harness.
    #[must_use]
    pub fn harness<G: Harness>(self, harness: &'a G) -> Runner<'a, G> {
        Runner {
            class: self.class,
            reporter: self.reporter,
            factory: self.factory,
            harness,
        }
    }

    /// Run every example of the class in discovery order.
    pub fn run(mut self) -> RunSummary {
        let examples = self.class.examples();
        log::debug!(
            "running {} example(s) of {}",
            examples.len(),
            self.class.description()
        );
        let mut summary = RunSummary::default();
        for example in &examples {
            if let Some(reporter) = self.reporter.as_deref_mut() {
                reporter.example_started(example);
            }
            let mut instance = match self.factory.as_mut() {
                Some(factory) => factory(self.class),
                None => TestInstance::new(self.class),
            };
            let request = ExampleRunRequest::new(
                example,
                ExampleRunner::new(|| run_bracket(example, &mut instance)),
            );
            let outcome = self.harness.run(request);
            log::debug!("{}: {}", example.full_description(), outcome.label());
            if let Some(reporter) = self.reporter.as_deref_mut() {
                match &outcome {
                    Outcome::Passed => reporter.example_passed(example),
                    failed => reporter.example_failed(example, failed),
                }
            }
            summary.records.push(ExampleRecord::from_example(example, outcome));
        }
        summary
    }
}

/// Run one example against `instance` and return its outcome.
pub fn run_bracket(example: &Example, instance: &mut TestInstance) -> Outcome {
    instance.begin(example.description());
    let setup = guarded(instance, |instance| invoke_hook(instance, SETUP));
    instance.record(setup);
    if instance.passed() {
        run_hooked_body(example, instance);
    }
    let teardown = guarded(instance, |instance| invoke_hook(instance, TEARDOWN));
    instance.record(teardown);
    Outcome::from(instance.failure().cloned())
}

fn run_hooked_body(example: &Example, instance: &mut TestInstance) {
    let class = instance.class().clone();
    for hook in class.before_hooks() {
        let result = guarded(instance, |instance| hook(instance));
        instance.record(result);
        if !instance.passed() {
            break;
        }
    }
    if instance.passed() {
        let body = example.body();
        let result = guarded(instance, |instance| body(instance));
        instance.record(result);
    }
    for hook in class.after_hooks() {
        run_hook(instance, &hook);
    }
}

fn run_hook(instance: &mut TestInstance, hook: &MethodBody) {
    let result = guarded(instance, |instance| hook(instance));
    instance.record(result);
}

/// Call the most-derived `setup`/`teardown`, if one is defined.
fn invoke_hook(instance: &mut TestInstance, name: &str) -> TestResult {
    match instance.class().resolve_method(name) {
        Some(def) if def.arity().callable_without_arguments() => (def.body())(instance),
        Some(def) => Err(Failure::error(format!(
            "{name} requires {} argument(s)",
            def.arity().required()
        ))),
        None => Ok(()),
    }
}

fn guarded(
    instance: &mut TestInstance,
    step: impl FnOnce(&mut TestInstance) -> TestResult,
) -> TestResult {
    catch_unwind(AssertUnwindSafe(|| step(instance)))
        .unwrap_or_else(|payload| Err(Failure::error(panic_message(payload.as_ref()))))
}
