use crate::derive_utils::{apply_derives, parse_bool_flag};
use proc_macro::TokenStream;
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Field, Fields, Ident, Item, Token, Type, parse_macro_input};

/// #[entity] 宏实现
/// - 将 `id: IdType`、`version: Version` 置于字段最前（已存在则复用原定义）
/// - 合并派生：Debug（可关闭）、Clone、Default、Serialize、Deserialize
/// - 实现 `::classroom_domain::entity::Entity`
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as EntityConfig);
    let input = parse_macro_input!(item as Item);

    let mut st = match input {
        Item::Struct(s) => s,
        other => {
            return syn::Error::new(other.span(), "#[entity] only on struct")
                .to_compile_error()
                .into();
        }
    };

    let Fields::Named(fields_named) = &mut st.fields else {
        return syn::Error::new(st.span(), "#[entity] only supports named-field struct")
            .to_compile_error()
            .into();
    };

    let id_type = cfg
        .id_ty
        .unwrap_or_else(|| syn::parse_quote! { ::std::string::String });
    let version_type: Type = syn::parse_quote! { ::classroom_domain::value_object::Version };

    let old = std::mem::take(&mut fields_named.named);
    let find = |name: &str| {
        old.iter()
            .find(|f| f.ident.as_ref().is_some_and(|i| i == name))
            .cloned()
    };
    let id_field: Field = find("id").unwrap_or_else(|| syn::parse_quote! { id: #id_type });
    let version_field: Field =
        find("version").unwrap_or_else(|| syn::parse_quote! { version: #version_type });

    let mut fields: Punctuated<Field, Token![,]> = Punctuated::new();
    fields.push(id_field);
    fields.push(version_field);
    fields.extend(
        old.into_iter()
            .filter(|f| !f.ident.as_ref().is_some_and(|i| i == "id" || i == "version")),
    );
    fields_named.named = fields;

    let mut required: Vec<syn::Path> = vec![
        syn::parse_quote!(Clone),
        syn::parse_quote!(Default),
        syn::parse_quote!(serde::Serialize),
        syn::parse_quote!(serde::Deserialize),
    ];
    if cfg.derive_debug.unwrap_or(true) {
        required.insert(0, syn::parse_quote!(Debug));
    }
    apply_derives(&mut st.attrs, required);

    let ident = &st.ident;
    let (impl_generics, ty_generics, where_clause) = st.generics.split_for_impl();

    let expanded = quote! {
        #st

        impl #impl_generics ::classroom_domain::entity::Entity for #ident #ty_generics #where_clause {
            type Id = #id_type;

            fn new(id: Self::Id, version: #version_type) -> Self {
                Self { id, version, ..::core::default::Default::default() }
            }

            fn id(&self) -> &Self::Id {
                &self.id
            }

            fn version(&self) -> #version_type {
                self.version
            }
        }
    };

    TokenStream::from(expanded)
}

struct EntityConfig {
    id_ty: Option<Type>,
    derive_debug: Option<bool>,
}

impl Parse for EntityConfig {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut cfg = Self {
            id_ty: None,
            derive_debug: None,
        };

        while !input.is_empty() {
            let key: Ident = input.parse()?;
            if key == "id" {
                let _eq: Token![=] = input.parse()?;
                if cfg.id_ty.replace(input.parse()?).is_some() {
                    return Err(syn::Error::new(key.span(), "duplicate key 'id'"));
                }
            } else if key == "debug" {
                if cfg.derive_debug.replace(parse_bool_flag(input, &key)?).is_some() {
                    return Err(syn::Error::new(key.span(), "duplicate key 'debug'"));
                }
            } else {
                return Err(syn::Error::new(
                    key.span(),
                    "unknown key in attribute; expected 'id' or 'debug'",
                ));
            }

            if !input.is_empty() {
                let _comma: Token![,] = input.parse()?;
            }
        }

        Ok(cfg)
    }
}
