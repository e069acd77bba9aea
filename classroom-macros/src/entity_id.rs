use crate::derive_utils::{apply_derives, parse_bool_flag};
use proc_macro::TokenStream;
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::spanned::Spanned;
use syn::{Fields, Ident, Item, Token, parse_macro_input};

/// #[entity_id] 宏实现
/// 仅支持单字段 tuple struct，并为标识类型：
/// - 合并派生：Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize
///   （`copy = true` 时追加 Copy），序列化为内部值（`serde(transparent)`）
/// - 生成 `new`、`into_inner`、`Display`、`FromStr`、`AsRef` 与双向 `From`
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as EntityIdConfig);
    let input = parse_macro_input!(item as Item);

    let mut st = match input {
        Item::Struct(s) => s,
        other => {
            return syn::Error::new(other.span(), "#[entity_id] only on struct")
                .to_compile_error()
                .into();
        }
    };

    let inner_ty = match &st.fields {
        Fields::Unnamed(f) if f.unnamed.len() == 1 => {
            f.unnamed.first().map(|field| field.ty.clone())
        }
        _ => None,
    };
    let Some(inner_ty) = inner_ty else {
        return syn::Error::new(
            st.fields.span(),
            "#[entity_id] requires a tuple struct with exactly one field, e.g. struct X(u64);",
        )
        .to_compile_error()
        .into();
    };

    let mut required: Vec<syn::Path> = vec![
        syn::parse_quote!(Debug),
        syn::parse_quote!(Clone),
        syn::parse_quote!(Default),
        syn::parse_quote!(PartialEq),
        syn::parse_quote!(Eq),
        syn::parse_quote!(Hash),
        syn::parse_quote!(PartialOrd),
        syn::parse_quote!(Ord),
        syn::parse_quote!(serde::Serialize),
        syn::parse_quote!(serde::Deserialize),
    ];
    if cfg.copy {
        required.insert(2, syn::parse_quote!(Copy));
    }
    apply_derives(&mut st.attrs, required);
    st.attrs.push(syn::parse_quote!(#[serde(transparent)]));

    let ident = &st.ident;
    let (impl_generics, ty_generics, where_clause) = st.generics.split_for_impl();

    let out = quote! {
        #st

        impl #impl_generics #ident #ty_generics #where_clause {
            pub const fn new(value: #inner_ty) -> Self {
                Self(value)
            }

            pub fn into_inner(self) -> #inner_ty {
                self.0
            }
        }

        impl #impl_generics ::std::str::FromStr for #ident #ty_generics #where_clause {
            type Err = <#inner_ty as ::std::str::FromStr>::Err;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                s.parse::<#inner_ty>().map(Self)
            }
        }

        impl #impl_generics ::std::fmt::Display for #ident #ty_generics #where_clause {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl #impl_generics ::core::convert::AsRef<#inner_ty> for #ident #ty_generics #where_clause {
            fn as_ref(&self) -> &#inner_ty {
                &self.0
            }
        }

        impl #impl_generics ::core::convert::From<#inner_ty> for #ident #ty_generics #where_clause {
            fn from(value: #inner_ty) -> Self {
                Self(value)
            }
        }

        impl #impl_generics ::core::convert::From<#ident #ty_generics> for #inner_ty #where_clause {
            fn from(value: #ident #ty_generics) -> Self {
                value.0
            }
        }
    };

    TokenStream::from(out)
}

struct EntityIdConfig {
    copy: bool,
}

impl Parse for EntityIdConfig {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut copy = None;

        while !input.is_empty() {
            let key: Ident = input.parse()?;
            if key != "copy" {
                return Err(syn::Error::new(
                    key.span(),
                    "unknown key in attribute; expected 'copy'",
                ));
            }
            if copy.replace(parse_bool_flag(input, &key)?).is_some() {
                return Err(syn::Error::new(key.span(), "duplicate key 'copy'"));
            }
            if !input.is_empty() {
                let _comma: Token![,] = input.parse()?;
            }
        }

        Ok(Self {
            copy: copy.unwrap_or(false),
        })
    }
}
