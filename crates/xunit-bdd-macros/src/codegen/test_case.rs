//! Expansion of `#[test_case]`: the `TestCase` impl, its `inventory`
//! registration and the generated `#[test]` entry point.

use convert_case::{Case, Casing};
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::{format_ident, quote, quote_spanned};

use crate::parsing::args::{InfoEntries, TestCaseArgs};
use crate::parsing::method::{MethodSpec, MethodVisibility, Parameters, Receiver};
use crate::parsing::returns::ReturnKind;

pub(crate) struct TestCaseInput<'a> {
    pub(crate) self_ty: &'a syn::Type,
    pub(crate) type_ident: syn::Ident,
    pub(crate) args: TestCaseArgs,
    pub(crate) methods: Vec<(MethodSpec, Span)>,
}

pub(crate) fn generate(input: &TestCaseInput<'_>) -> TokenStream2 {
    let path = super::xunit_bdd_path();
    let self_ty = input.self_ty;
    let type_name = input.type_ident.to_string();
    let name = input
        .args
        .name
        .as_ref()
        .map_or_else(|| type_name.clone(), syn::LitStr::value);
    let line = quote_spanned! { input.type_ident.span()=> ::core::line!() };

    let parent = input.args.extends.as_ref().map_or_else(
        || quote! { ::core::option::Option::None },
        |parent| quote! { ::core::option::Option::Some(<#parent as #path::TestCase>::KEY) },
    );
    let upcast = input.args.extends.as_ref().map(|parent| upcast_stmt(self_ty, parent));
    let class_info = info_stmt(&path, quote! { test_case_info }, &input.args.info);
    let methods = input
        .methods
        .iter()
        .map(|(spec, span)| method_stmts(&path, self_ty, spec, *span));
    let configure = input
        .args
        .configure
        .as_ref()
        .map(|configure| quote! { #configure(class); });
    let test_ident = format_ident!("__xunit_bdd_{}", type_name.to_case(Case::Snake));

    quote! {
        impl #path::TestCase for #self_ty {
            const NAME: &'static str = #name;
            const KEY: &'static str = ::core::concat!(::core::module_path!(), "::", #type_name);
            const PARENT: ::core::option::Option<&'static str> = #parent;

            fn declare(class: &#path::TestClass) {
                class.set_subject::<Self>();
                #upcast
                #class_info
                #(#methods)*
                #configure
            }
        }

        #path::submit! {
            #path::TestCaseRegistration::new(
                <#self_ty as #path::TestCase>::KEY,
                <#self_ty as #path::TestCase>::NAME,
                <#self_ty as #path::TestCase>::PARENT,
                ::core::file!(),
                #line,
                <#self_ty as #path::TestCase>::declare,
            )
        }

        #[test]
        fn #test_ident() {
            #path::run_registered::<#self_ty>();
        }
    }
}

fn upcast_stmt(self_ty: &syn::Type, parent: &syn::Path) -> TokenStream2 {
    quote! {
        fn __xunit_bdd_upcast<'a>(
            subject: &'a mut (dyn ::core::any::Any + 'static),
        ) -> ::core::option::Option<&'a mut (dyn ::core::any::Any + 'static)> {
            subject.downcast_mut::<#self_ty>().map(|subject| {
                let parent: &mut #parent = ::core::ops::DerefMut::deref_mut(subject);
                parent as &mut dyn ::core::any::Any
            })
        }
        fn __xunit_bdd_upcast_ref<'a>(
            subject: &'a (dyn ::core::any::Any + 'static),
        ) -> ::core::option::Option<&'a (dyn ::core::any::Any + 'static)> {
            subject.downcast_ref::<#self_ty>().map(|subject| {
                let parent: &#parent = ::core::ops::Deref::deref(subject);
                parent as &dyn ::core::any::Any
            })
        }
        class.set_upcast(__xunit_bdd_upcast);
        class.set_upcast_ref(__xunit_bdd_upcast_ref);
    }
}

fn info_stmt(
    path: &TokenStream2,
    method: TokenStream2,
    info: &InfoEntries,
) -> Option<TokenStream2> {
    if info.0.is_empty() {
        return None;
    }
    let keys = info.0.iter().map(|entry| &entry.key);
    let values = info.0.iter().map(|entry| &entry.value);
    Some(quote! {
        class.#method(#path::metadata! { #(#keys => #values),* });
    })
}

fn method_stmts(
    path: &TokenStream2,
    self_ty: &syn::Type,
    spec: &MethodSpec,
    span: Span,
) -> TokenStream2 {
    let ident = &spec.ident;
    let name = ident.to_string();
    let Parameters {
        required,
        optional,
        variadic,
    } = spec.parameters;
    let visibility = match spec.visibility {
        MethodVisibility::Public => quote! { Public },
        MethodVisibility::Protected => quote! { Protected },
        MethodVisibility::Private => quote! { Private },
    };
    let pending = spec
        .info
        .as_ref()
        .and_then(|info| info_stmt(path, quote! { test_info }, info));
    let body = method_body(path, self_ty, spec);
    let line = quote_spanned! { span=> ::core::line!() };
    quote! {
        #pending
        class.define_method(
            #path::MethodDef::new(#name, #body)
                .with_visibility(#path::Visibility::#visibility)
                .with_arity(#path::Arity::new(#required, #optional, #variadic))
                .at(#path::Location::new(::core::file!(), #line)),
        );
    }
}

fn method_body(path: &TokenStream2, self_ty: &syn::Type, spec: &MethodSpec) -> TokenStream2 {
    let ident = &spec.ident;
    let Parameters {
        required,
        optional,
        variadic,
    } = spec.parameters;
    if required > 0 {
        let message = format!("`{ident}` requires {required} argument(s)");
        return quote! {
            |_instance: &mut #path::TestInstance| -> #path::TestResult {
                ::core::result::Result::Err(#path::Failure::error(#message))
            }
        };
    }
    let mut args: Vec<TokenStream2> = (0..optional)
        .map(|_| quote! { ::core::option::Option::None })
        .collect();
    if variadic {
        args.push(quote! { &[] });
    }
    let (receiver, call_args) = match spec.receiver {
        Receiver::Subject => (quote! { instance }, quote! { subject #(, #args)* }),
        Receiver::Instance => (quote! { instance }, quote! { instance #(, #args)* }),
        Receiver::Static => (quote! { _instance }, quote! { #(#args),* }),
    };
    let subject = (spec.receiver == Receiver::Subject).then(|| {
        let missing = format!("no `{}` subject for `{ident}`", quote!(#self_ty));
        quote! {
            let subject = instance
                .subject_mut::<#self_ty>()
                .ok_or_else(|| #path::Failure::error(#missing))?;
        }
    });
    let call = quote! { <#self_ty>::#ident(#call_args) };
    let result = return_stmt(path, spec.returns, &call);
    quote! {
        |#receiver: &mut #path::TestInstance| -> #path::TestResult {
            #subject
            #result
        }
    }
}

fn return_stmt(path: &TokenStream2, returns: ReturnKind, call: &TokenStream2) -> TokenStream2 {
    match returns {
        ReturnKind::Unit => quote! {
            #call;
            ::core::result::Result::Ok(())
        },
        ReturnKind::Failure => quote! {
            #call.map(|_| ())
        },
        ReturnKind::Result => quote! {
            #call.map(|_| ()).map_err(|err| {
                #path::Failure::error(::std::string::ToString::to_string(&err))
            })
        },
        ReturnKind::Value => quote! {
            let _ = #call;
            ::core::result::Result::Ok(())
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::method::MethodSpec;
    use rstest::rstest;

    fn expand(args: TestCaseArgs, method: syn::ImplItemFn) -> String {
        let mut method = method;
        let Ok(Some(spec)) = MethodSpec::extract(&mut method) else {
            panic!("method should classify");
        };
        let self_ty: syn::Type = syn::parse_quote!(Calculator);
        let input = TestCaseInput {
            self_ty: &self_ty,
            type_ident: syn::parse_quote!(Calculator),
            args,
            methods: vec![(spec, Span::call_site())],
        };
        generate(&input).to_string()
    }

    #[test]
    fn generates_registration_and_test_entry_point() {
        let output = expand(
            TestCaseArgs::default(),
            syn::parse_quote!(pub fn test_add(&mut self) {}),
        );
        assert!(output.contains("impl :: xunit_bdd :: TestCase for Calculator"));
        assert!(output.contains(":: xunit_bdd :: submit !"));
        assert!(output.contains("fn __xunit_bdd_calculator"));
        assert!(output.contains("\"test_add\""));
        assert!(output.contains("Visibility :: Public"));
        assert!(!output.contains("set_upcast"));
    }

    #[test]
    fn extends_generates_an_upcast() {
        let args: TestCaseArgs = syn::parse_quote!(extends = Base, name = "Scientific");
        let output = expand(args, syn::parse_quote!(fn helper(&self) {}));
        assert!(output.contains("set_upcast"));
        assert!(output.contains("subject : & 'a mut"));
        assert!(output.contains("set_upcast_ref"));
        assert!(output.contains("< Base as :: xunit_bdd :: TestCase > :: KEY"));
        assert!(output.contains("\"Scientific\""));
        assert!(output.contains("Visibility :: Private"));
    }

    #[test]
    fn required_parameters_produce_an_erroring_body() {
        let output = expand(
            TestCaseArgs::default(),
            syn::parse_quote!(pub fn test_needs(&self, value: u8) {}),
        );
        assert!(output.contains("Arity :: new (1usize , 0usize , false)"));
        assert!(output.contains("requires 1 argument(s)"));
    }

    #[test]
    fn method_info_is_staged_before_the_definition() {
        let output = expand(
            TestCaseArgs::default(),
            syn::parse_quote! {
                #[test_info(slow)]
                pub fn test_slow(&self) {}
            },
        );
        let staged = output.find("test_info (");
        let defined = output.find("define_method");
        assert!(staged.is_some_and(|staged| defined.is_some_and(|defined| staged < defined)));
    }

    #[rstest]
    #[case(
        syn::parse_quote!(fn total(&self) -> i64 { 0 }),
        "let _ = < Calculator > :: total (subject)"
    )]
    #[case(syn::parse_quote!(fn new() -> Self { Self }), "let _ = < Calculator > :: new ()")]
    #[case(syn::parse_quote!(pub fn test_a(&self) {}), "< Calculator > :: test_a (subject) ;")]
    #[case(
        syn::parse_quote!(pub fn test_a(&self) -> TestResult { Ok(()) }),
        "< Calculator > :: test_a (subject) . map (| _ | ())"
    )]
    #[case(
        syn::parse_quote!(pub fn test_a(&self) -> Result<(), String> { Ok(()) }),
        "Failure :: error (:: std :: string :: ToString :: to_string (& err))"
    )]
    fn bodies_follow_the_return_type(
        #[case] method: syn::ImplItemFn,
        #[case] expected: &str,
    ) {
        let output = expand(TestCaseArgs::default(), method);
        assert!(output.contains(expected), "{output}");
    }
}
