//! Harness seam through which each example bracket executes.

use crate::discovery::Example;

/// A callable example bracket owned by a harness.
pub struct ExampleRunner<'a, T> {
    inner: Box<dyn FnOnce() -> T + 'a>,
}

impl<'a, T> ExampleRunner<'a, T> {
    /// Wrap a closure as an example runner.
    #[must_use]
    pub fn new(inner: impl FnOnce() -> T + 'a) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }

    /// Execute the wrapped closure.
    #[must_use]
    pub fn run(self) -> T {
        (self.inner)()
    }
}

/// A harness execution request for one example.
pub struct ExampleRunRequest<'a, T> {
    example: &'a Example,
    runner: ExampleRunner<'a, T>,
}

impl<'a, T> ExampleRunRequest<'a, T> {
    /// Create a request from an example and its bracket.
    #[must_use]
    pub fn new(example: &'a Example, runner: ExampleRunner<'a, T>) -> Self {
        Self { example, runner }
    }

    /// The example about to run.
    #[must_use]
    pub const fn example(&self) -> &'a Example {
        self.example
    }

    /// Run the bracket.
    #[must_use]
    pub fn run(self) -> T {
        self.runner.run()
    }
}

/// Runs example brackets inside a host-specific environment.
///
/// # Examples
///
/// ```
/// use xunit_bdd::execution::{ExampleRunRequest, Harness};
/// use xunit_bdd::World;
///
/// struct Tracing;
///
/// impl Harness for Tracing {
///     fn run<T>(&self, request: ExampleRunRequest<'_, T>) -> T {
///         log::info!("running {}", request.example().full_description());
///         request.run()
///     }
/// }
///
/// let world = World::new();
/// let foo = world.test_case().anonymous_subclass();
/// foo.define("test_ok", |_| Ok(()));
/// let summary = xunit_bdd::Runner::new(&foo).harness(&Tracing).run();
/// assert!(summary.is_success());
/// ```
pub trait Harness {
    /// Execute one example request and return the bracket result.
    fn run<T>(&self, request: ExampleRunRequest<'_, T>) -> T;
}

/// Harness that runs each bracket directly on the current thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdHarness;

impl StdHarness {
    /// Create the standard harness.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Harness for StdHarness {
    fn run<T>(&self, request: ExampleRunRequest<'_, T>) -> T {
        request.run()
    }
}
