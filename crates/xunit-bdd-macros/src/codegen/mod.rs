//! Code generation for test case registration.

use proc_macro_crate::{FoundCrate, crate_name};
use proc_macro2::{Ident, Span, TokenStream as TokenStream2};
use quote::quote;

pub(crate) mod test_case;

/// Return a token stream pointing to the `xunit_bdd` crate or its renamed form.
pub(crate) fn xunit_bdd_path() -> TokenStream2 {
    resolve_crate_path("xunit-bdd", "xunit_bdd")
}

fn resolve_crate_path(crate_name_str: &str, default_ident: &str) -> TokenStream2 {
    match crate_name(crate_name_str) {
        Ok(found) => {
            let ident = match found {
                FoundCrate::Itself => Ident::new(default_ident, Span::call_site()),
                FoundCrate::Name(name) => Ident::new(&name, Span::call_site()),
            };
            quote! { ::#ident }
        }
        Err(err) => handle_missing_crate(crate_name_str, &err),
    }
}

#[cfg(test)]
fn handle_missing_crate(crate_name_str: &str, _: &proc_macro_crate::Error) -> TokenStream2 {
    // Unit tests compile this crate without the runtime as a dependency.
    let ident = Ident::new(&crate_name_str.replace('-', "_"), Span::call_site());
    quote! { ::#ident }
}

#[cfg(not(test))]
fn handle_missing_crate(crate_name_str: &str, err: &proc_macro_crate::Error) -> TokenStream2 {
    let message = format!("{crate_name_str} crate not found: {err}");
    quote! { ::core::compile_error!(#message); }
}

#[cfg(test)]
mod tests {
    use super::handle_missing_crate;
    use proc_macro_crate::Error;

    #[test]
    fn missing_crate_falls_back_to_the_package_name() {
        let err = Error::CrateNotFound {
            crate_name: "xunit-bdd".into(),
            path: std::path::PathBuf::from("Cargo.toml"),
        };
        let tokens = handle_missing_crate("xunit-bdd", &err);
        assert_eq!(tokens.to_string(), ":: xunit_bdd");
    }
}
