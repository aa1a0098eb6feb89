//! Return type classification for registered methods.
//!
//! Test methods return `()` or a `Result`, while helpers in the same impl
//! block may return anything. The generated body needs to know which shape
//! it is calling, and stable Rust cannot tell `T`, `()` and `Result<..>`
//! apart through trait impls, so the shape is read from the signature.
//!
//! Type aliases other than `TestResult` are not resolved: a method returning
//! `type MyResult = Result<(), MyError>` is treated as returning a value.

use syn::{GenericArgument, Path, PathArguments, ReturnType, Type};

/// How the generated body turns a method's return value into a test result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ReturnKind {
    /// No return type, or `()`.
    Unit,
    /// `TestResult` or `Result<_, Failure>`: the failure is propagated as is.
    Failure,
    /// Any other `Result<_, E>`: the error is reported through its `Display`.
    Result,
    /// Anything else: the value is discarded.
    Value,
}

pub(crate) fn classify_return_type(output: &ReturnType) -> ReturnKind {
    let ty = match output {
        ReturnType::Default => return ReturnKind::Unit,
        ReturnType::Type(_, ty) => ty.as_ref(),
    };
    if is_unit_type(ty) {
        return ReturnKind::Unit;
    }
    let Type::Path(type_path) = ty else {
        return ReturnKind::Value;
    };
    let path = &type_path.path;
    if is_test_result_path(path) {
        return ReturnKind::Failure;
    }
    if !is_result_path(path) {
        return ReturnKind::Value;
    }
    match type_arguments(path).nth(1) {
        Some(error) if is_failure_type(error) => ReturnKind::Failure,
        _ => ReturnKind::Result,
    }
}

fn is_unit_type(ty: &Type) -> bool {
    matches!(ty, Type::Tuple(tuple) if tuple.elems.is_empty())
}

fn segment_names(path: &Path) -> Vec<String> {
    path.segments
        .iter()
        .map(|segment| segment.ident.to_string())
        .collect()
}

fn is_result_path(path: &Path) -> bool {
    match segment_names(path).as_slice() {
        [single] => single == "Result",
        [root, module, leaf] => {
            (root == "std" || root == "core") && module == "result" && leaf == "Result"
        }
        _ => false,
    }
}

fn is_test_result_path(path: &Path) -> bool {
    match segment_names(path).as_slice() {
        [single] => single == "TestResult",
        [root, leaf] => {
            matches!(root.as_str(), "xunit_bdd" | "crate" | "self" | "super")
                && leaf == "TestResult"
        }
        _ => false,
    }
}

fn is_failure_type(ty: &Type) -> bool {
    matches!(
        ty,
        Type::Path(type_path)
            if type_path
                .path
                .segments
                .last()
                .is_some_and(|segment| segment.ident == "Failure")
    )
}

fn type_arguments(path: &Path) -> impl Iterator<Item = &Type> {
    path.segments
        .last()
        .and_then(|segment| match &segment.arguments {
            PathArguments::AngleBracketed(args) => Some(&args.args),
            _ => None,
        })
        .into_iter()
        .flatten()
        .filter_map(|arg| match arg {
            GenericArgument::Type(ty) => Some(ty),
            _ => None,
        })
}
