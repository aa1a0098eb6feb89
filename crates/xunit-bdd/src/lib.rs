//! Core library for `xunit-bdd`.
//!
//! The crate runs xUnit-style test classes as behaviour-driven example
//! groups. A [`TestClass`] declares methods; every public method whose name
//! starts with a test prefix (`test_` by default) and takes no required
//! arguments becomes an [`Example`], alongside examples declared fluently with
//! [`TestClass::example`]. Each example runs on a fresh [`TestInstance`]
//! bracketed by `setup` and `teardown`, and carries a metadata record
//! describing its class, location and any staged [`TestClass::test_info`].
//!
//! Classes can be built at runtime through a [`World`] or declared at compile
//! time with the `#[test_case]` attribute from `xunit-bdd-macros`, which
//! registers them through `inventory`.
//!
//! ```
//! use xunit_bdd::{World, assert_equal, metadata};
//!
//! let world = World::new();
//! let calculator = world.test_case().subclass("Calculator").unwrap();
//! calculator.define("setup", |instance| {
//!     instance.set("total", 0_i64);
//!     Ok(())
//! });
//! calculator.test_info(metadata! { "speed" => "fast" });
//! calculator.define("test_add", |instance| {
//!     let total = instance.get_mut::<i64>("total").unwrap();
//!     *total += 2;
//!     assert_equal(2, *total)
//! });
//!
//! let examples = calculator.examples();
//! assert_eq!(examples[0].full_description(), "Calculator#test_add");
//! assert_eq!(examples[0].metadata().get("speed").and_then(|v| v.as_str()), Some("fast"));
//! assert!(calculator.run_all(None).is_success());
//! ```

pub use inventory::{iter, submit};

mod assertions;
mod class;
pub mod config;
mod discovery;
mod error;
pub mod execution;
mod location;
mod metadata;
mod method;
mod panic;
mod registration;
pub mod reporting;
mod world;

pub use assertions::{assert_equal, assert_not_equal, assert_some, assert_that, flunk};
pub use class::{
    ANONYMOUS_DESCRIPTION, BUILTIN_EXAMPLE_ALIASES, ROOT_DESCRIPTION, SETUP, SubjectFactory,
    TEARDOWN, TestClass, TestModule, Upcast, UpcastRef,
};
pub use discovery::{Example, ExampleKind};
pub use error::{DeclarationError, Failure, IntoTestResult, TestResult};
pub use execution::{Outcome, RunSummary, Runner, TestInstance, run_bracket};
pub use location::{Location, find_caller_lines, find_definition};
pub use metadata::{MetaValue, Metadata, keys};
pub use method::{Arity, MethodBody, MethodDef, Visibility};
pub use panic::panic_message;
pub use registration::{TestCase, TestCaseRegistration, run_registered};
pub use reporting::{BaseFormatter, Reporter};
pub use world::World;
