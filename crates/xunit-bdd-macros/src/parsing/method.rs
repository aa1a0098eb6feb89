//! Classification of `impl` block methods into method-table entries.

use syn::{FnArg, GenericArgument, ImplItemFn, PathArguments, Type, Visibility};

use super::args::InfoEntries;
use super::returns::{ReturnKind, classify_return_type};

/// Visibility recorded for a method.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MethodVisibility {
    Public,
    Protected,
    Private,
}

/// How the generated body reaches the method.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Receiver {
    /// `&self` or `&mut self`: called with the typed subject.
    Subject,
    /// A leading `&mut TestInstance` parameter: called with the instance.
    Instance,
    /// Neither: called as an associated function.
    Static,
}

/// Parameters after the receiver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Parameters {
    pub(crate) required: usize,
    pub(crate) optional: usize,
    pub(crate) variadic: bool,
}

/// A method of a `#[test_case]` impl block.
pub(crate) struct MethodSpec {
    pub(crate) ident: syn::Ident,
    pub(crate) visibility: MethodVisibility,
    pub(crate) receiver: Receiver,
    pub(crate) parameters: Parameters,
    pub(crate) returns: ReturnKind,
    pub(crate) info: Option<InfoEntries>,
}

impl MethodSpec {
    /// Classify `method`, removing any `#[test_info]` attribute from it.
    ///
    /// Returns `Ok(None)` for generic methods, which cannot be registered.
    pub(crate) fn extract(method: &mut ImplItemFn) -> syn::Result<Option<Self>> {
        let info = take_test_info(method)?;
        if let Some(asyncness) = &method.sig.asyncness {
            return Err(syn::Error::new_spanned(
                asyncness,
                "async methods are not supported in #[test_case]",
            ));
        }
        if !method.sig.generics.params.is_empty() {
            if info.is_some() {
                return Err(syn::Error::new_spanned(
                    &method.sig.generics,
                    "#[test_info] cannot be applied to a generic method",
                ));
            }
            return Ok(None);
        }
        let mut inputs = method.sig.inputs.iter().peekable();
        let receiver = match inputs.peek() {
            Some(FnArg::Receiver(receiver)) => {
                if receiver.reference.is_none() {
                    return Err(syn::Error::new_spanned(
                        receiver,
                        "test case methods take `&self` or `&mut self`",
                    ));
                }
                inputs.next();
                Receiver::Subject
            }
            Some(FnArg::Typed(arg)) if is_instance_type(&arg.ty) => {
                inputs.next();
                Receiver::Instance
            }
            _ => Receiver::Static,
        };
        let types: Vec<&Type> = inputs
            .filter_map(|arg| match arg {
                FnArg::Typed(arg) => Some(arg.ty.as_ref()),
                FnArg::Receiver(_) => None,
            })
            .collect();
        Ok(Some(Self {
            ident: method.sig.ident.clone(),
            visibility: classify_visibility(&method.vis),
            receiver,
            parameters: classify_parameters(&types),
            returns: classify_return_type(&method.sig.output),
            info,
        }))
    }
}

fn take_test_info(method: &mut ImplItemFn) -> syn::Result<Option<InfoEntries>> {
    let mut info: Option<InfoEntries> = None;
    let mut kept = Vec::with_capacity(method.attrs.len());
    for attr in method.attrs.drain(..) {
        let is_test_info = attr
            .path()
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "test_info");
        if !is_test_info {
            kept.push(attr);
            continue;
        }
        let entries: InfoEntries = if matches!(attr.meta, syn::Meta::Path(_)) {
            InfoEntries::default()
        } else {
            attr.parse_args()?
        };
        info.get_or_insert_with(InfoEntries::default).0.extend(entries.0);
    }
    method.attrs = kept;
    Ok(info)
}

pub(crate) fn classify_visibility(vis: &Visibility) -> MethodVisibility {
    match vis {
        Visibility::Public(_) => MethodVisibility::Public,
        Visibility::Restricted(_) => MethodVisibility::Protected,
        Visibility::Inherited => MethodVisibility::Private,
    }
}

pub(crate) fn classify_parameters(types: &[&Type]) -> Parameters {
    let mut parameters = Parameters::default();
    let last = types.len().checked_sub(1);
    for (index, ty) in types.iter().enumerate() {
        if Some(index) == last && is_slice_reference(ty) {
            parameters.variadic = true;
        } else if is_option(ty) {
            parameters.optional += 1;
        } else {
            parameters.required += 1;
        }
    }
    parameters
}

fn last_segment(ty: &Type) -> Option<&syn::PathSegment> {
    match ty {
        Type::Path(path) => path.path.segments.last(),
        Type::Group(group) => last_segment(&group.elem),
        Type::Paren(paren) => last_segment(&paren.elem),
        _ => None,
    }
}

fn is_option(ty: &Type) -> bool {
    last_segment(ty).is_some_and(|segment| {
        segment.ident == "Option"
            && matches!(
                &segment.arguments,
                PathArguments::AngleBracketed(args)
                    if matches!(args.args.first(), Some(GenericArgument::Type(_)))
            )
    })
}

fn is_slice_reference(ty: &Type) -> bool {
    matches!(ty, Type::Reference(reference) if matches!(reference.elem.as_ref(), Type::Slice(_)))
}

fn is_instance_type(ty: &Type) -> bool {
    matches!(
        ty,
        Type::Reference(reference)
            if reference.mutability.is_some()
                && last_segment(&reference.elem)
                    .is_some_and(|segment| segment.ident == "TestInstance")
    )
}
