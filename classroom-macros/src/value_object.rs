use crate::derive_utils::{apply_derives, parse_bool_flag};
use proc_macro::TokenStream;
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::spanned::Spanned;
use syn::{Ident, Item, Token, parse_macro_input};

/// #[value_object] 宏实现
/// - 支持结构体（具名或 tuple）与枚举
/// - 合并派生：Debug（可关闭）、Clone、PartialEq、Eq、Serialize、Deserialize；
///   `default = true`（默认）时追加 Default
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as ValueObjectConfig);
    let mut input = parse_macro_input!(item as Item);

    let mut required: Vec<syn::Path> = vec![
        syn::parse_quote!(Clone),
        syn::parse_quote!(PartialEq),
        syn::parse_quote!(Eq),
        syn::parse_quote!(serde::Serialize),
        syn::parse_quote!(serde::Deserialize),
    ];
    if cfg.derive_default {
        required.insert(0, syn::parse_quote!(Default));
    }
    if cfg.derive_debug {
        required.insert(0, syn::parse_quote!(Debug));
    }

    match &mut input {
        Item::Struct(st) => {
            apply_derives(&mut st.attrs, required);
            TokenStream::from(quote! { #st })
        }
        Item::Enum(en) => {
            apply_derives(&mut en.attrs, required);
            TokenStream::from(quote! { #en })
        }
        other => syn::Error::new(other.span(), "#[value_object] only supports struct or enum")
            .to_compile_error()
            .into(),
    }
}

struct ValueObjectConfig {
    derive_debug: bool,
    derive_default: bool,
}

impl Parse for ValueObjectConfig {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut derive_debug = None;
        let mut derive_default = None;

        while !input.is_empty() {
            let key: Ident = input.parse()?;
            let slot = if key == "debug" {
                &mut derive_debug
            } else if key == "default" {
                &mut derive_default
            } else {
                return Err(syn::Error::new(
                    key.span(),
                    "unknown key in attribute; expected 'debug' or 'default'",
                ));
            };
            if slot.replace(parse_bool_flag(input, &key)?).is_some() {
                return Err(syn::Error::new(key.span(), format!("duplicate key '{key}'")));
            }
            if !input.is_empty() {
                let _comma: Token![,] = input.parse()?;
            }
        }

        Ok(Self {
            derive_debug: derive_debug.unwrap_or(true),
            derive_default: derive_default.unwrap_or(true),
        })
    }
}
