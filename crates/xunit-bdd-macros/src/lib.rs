//! Attribute macros registering xUnit-style test cases with `xunit-bdd`.
//!
//! `#[test_case]` turns the methods of an inherent `impl` block into the
//! method table of a test class, registers the class through `inventory`,
//! and emits a `#[test]` function that runs its examples.

mod codegen;
mod macros;
mod parsing;
mod utils;

use proc_macro::TokenStream;

/// Register the methods of an inherent `impl` block as a test class.
///
/// ```ignore
/// #[derive(Default)]
/// struct Calculator {
///     total: i64,
/// }
///
/// #[test_case(info(area = "arithmetic"))]
/// impl Calculator {
///     pub fn setup(&mut self) {
///         self.total = 1;
///     }
///
///     #[test_info(slow = false)]
///     pub fn test_add(&mut self) -> xunit_bdd::TestResult {
///         self.total += 1;
///         xunit_bdd::assert_equal(2, self.total)
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn test_case(attr: TokenStream, item: TokenStream) -> TokenStream {
    macros::test_case(attr, item)
}

/// Stage metadata for one method of a `#[test_case]` impl block.
///
/// The attribute is consumed by `#[test_case]`; anywhere else it is an error.
#[proc_macro_attribute]
pub fn test_info(attr: TokenStream, item: TokenStream) -> TokenStream {
    macros::test_info(attr, item)
}
