//! Attribute macro implementations.

use proc_macro::TokenStream;
use quote::quote;

use crate::codegen::test_case::{TestCaseInput, generate};
use crate::parsing::args::TestCaseArgs;
use crate::parsing::method::MethodSpec;
use crate::utils::errors::error_to_tokens;

pub(crate) fn test_case(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = syn::parse_macro_input!(attr as TestCaseArgs);
    let mut block = syn::parse_macro_input!(item as syn::ItemImpl);
    match expand(args, &mut block) {
        Ok(tokens) => tokens.into(),
        Err(err) => error_to_tokens(&err),
    }
}

pub(crate) fn test_info(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let item = proc_macro2::TokenStream::from(item);
    let err = syn::Error::new(
        proc_macro2::Span::call_site(),
        "#[test_info] is only valid on methods inside a #[test_case] impl block",
    );
    let error = err.to_compile_error();
    TokenStream::from(quote! {
        #error
        #item
    })
}

fn expand(args: TestCaseArgs, block: &mut syn::ItemImpl) -> syn::Result<proc_macro2::TokenStream> {
    if let Some((_, path, _)) = &block.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "#[test_case] expects an inherent impl block",
        ));
    }
    if !block.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &block.generics,
            "#[test_case] does not support generic impl blocks",
        ));
    }
    let type_ident = type_ident(&block.self_ty)?;
    let mut methods = Vec::new();
    for item in &mut block.items {
        if let syn::ImplItem::Fn(method) = item {
            let span = method.sig.ident.span();
            if let Some(spec) = MethodSpec::extract(method)? {
                methods.push((spec, span));
            }
        }
    }
    let input = TestCaseInput {
        self_ty: &block.self_ty,
        type_ident,
        args,
        methods,
    };
    let registration = generate(&input);
    Ok(quote! {
        #block
        #registration
    })
}

fn type_ident(ty: &syn::Type) -> syn::Result<syn::Ident> {
    match ty {
        syn::Type::Path(path) if path.qself.is_none() => path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.clone())
            .ok_or_else(|| syn::Error::new_spanned(ty, "expected a named type")),
        _ => Err(syn::Error::new_spanned(
            ty,
            "#[test_case] expects an impl block for a named type",
        )),
    }
}
