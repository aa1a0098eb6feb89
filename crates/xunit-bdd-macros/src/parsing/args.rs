//! Attribute arguments: `name = "..."`, `extends = Path`, `info(...)` and
//! `configure = path`, plus the `key = value` lists of `info(...)` and
//! `#[test_info(...)]`.

use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{Expr, Ident, LitStr, Path, Token, parenthesized};

/// One `key = value` (or bare `key`, meaning `true`) metadata entry.
pub(crate) struct InfoEntry {
    pub(crate) key: LitStr,
    pub(crate) value: Expr,
}

impl Parse for InfoEntry {
    fn parse(input: ParseStream<'_>) -> syn::Result<Self> {
        let key = if input.peek(LitStr) {
            input.parse::<LitStr>()?
        } else {
            let ident: Ident = input.parse()?;
            LitStr::new(&ident.to_string(), ident.span())
        };
        let value = if input.peek(Token![=]) {
            input.parse::<Token![=]>()?;
            input.parse()?
        } else {
            syn::parse_quote!(true)
        };
        Ok(Self { key, value })
    }
}

/// A comma-separated list of metadata entries.
#[derive(Default)]
pub(crate) struct InfoEntries(pub(crate) Vec<InfoEntry>);

impl Parse for InfoEntries {
    fn parse(input: ParseStream<'_>) -> syn::Result<Self> {
        let entries = Punctuated::<InfoEntry, Token![,]>::parse_terminated(input)?;
        Ok(Self(entries.into_iter().collect()))
    }
}

/// Arguments of `#[test_case(...)]`.
#[derive(Default)]
pub(crate) struct TestCaseArgs {
    pub(crate) name: Option<LitStr>,
    pub(crate) extends: Option<Path>,
    pub(crate) info: InfoEntries,
    pub(crate) configure: Option<Path>,
}

impl Parse for TestCaseArgs {
    fn parse(input: ParseStream<'_>) -> syn::Result<Self> {
        let mut args = Self::default();
        while !input.is_empty() {
            let key: Ident = input.parse()?;
            match key.to_string().as_str() {
                "name" => {
                    input.parse::<Token![=]>()?;
                    set_once(&mut args.name, input.parse()?, &key)?;
                }
                "extends" => {
                    input.parse::<Token![=]>()?;
                    set_once(&mut args.extends, input.parse()?, &key)?;
                }
                "configure" => {
                    input.parse::<Token![=]>()?;
                    set_once(&mut args.configure, input.parse()?, &key)?;
                }
                "info" => {
                    let content;
                    parenthesized!(content in input);
                    let entries: InfoEntries = content.parse()?;
                    args.info.0.extend(entries.0);
                }
                _ => {
                    return Err(syn::Error::new_spanned(
                        key,
                        "expected `name`, `extends`, `info` or `configure`",
                    ));
                }
            }
            if !input.is_empty() {
                input.parse::<Token![,]>()?;
            }
        }
        Ok(args)
    }
}

fn set_once<T>(slot: &mut Option<T>, value: T, key: &Ident) -> syn::Result<()> {
    if slot.is_some() {
        return Err(syn::Error::new_spanned(key, format!("duplicate `{key}` argument")));
    }
    *slot = Some(value);
    Ok(())
}
