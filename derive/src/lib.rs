// Copyright 2025 The oscloud contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Derive macros for the `oscloud` crate.

use convert_case::{Case, Casing};
use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn;

/// Derive `PaginatedResource` for a listable resource.
///
/// Mark the field used as a pagination marker with `#[resource_id]`. The name of the collection
/// key in the listing root is guessed from the structure name; use
/// `#[collection_name = "..."]` to override it or `#[flat_collection]` for APIs that return a
/// bare JSON array. Non-flat collections also receive a `{collection}_links` field and a
/// `PaginatedCollection` implementation for link-based pagination.
#[proc_macro_derive(
    PaginatedResource,
    attributes(resource_id, collection_name, flat_collection)
)]
pub fn paginated_resource_macro_derive(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);

    let class_name = &input.ident;
    let vis = &input.vis;
    let maybe_collection_name = match get_collection_name(&input) {
        Ok(name) => name,
        Err(err) => return err.into_compile_error().into(),
    };
    let (id_name, id_type) = match get_id_field(&input) {
        Ok(tpl) => tpl,
        Err(err) => return err.into_compile_error().into(),
    };

    if let Some(collection_name) = maybe_collection_name {
        let collection_ident = syn::Ident::new(&collection_name, Span::call_site());
        let links_ident = syn::Ident::new(&format!("{}_links", collection_name), Span::call_site());
        let collection_class_name = syn::Ident::new(
            &format!("{}DerivedCollection", class_name),
            Span::call_site(),
        );

        quote! {
            #[derive(Debug, ::serde::Deserialize)]
            #[allow(missing_docs, unused)]
            #vis struct #collection_class_name {
                #collection_ident: Vec<#class_name>,
                #[serde(default)]
                #links_ident: Vec<::oscloud::common::Link>,
            }

            #[allow(missing_docs, unused)]
            impl ::oscloud::client::PaginatedResource for #class_name {
                type Id = #id_type;
                type Root = #collection_class_name;
                fn resource_id(&self) -> Self::Id {
                    self.#id_name.clone()
                }
            }

            #[allow(missing_docs, unused)]
            impl ::oscloud::client::PaginatedCollection for #collection_class_name {
                fn next_link(&self) -> ::std::option::Option<&::oscloud::client::Url> {
                    ::oscloud::common::next_link(&self.#links_ident)
                }
            }

            #[allow(missing_docs, unused)]
            impl From<#collection_class_name> for Vec<#class_name> {
                fn from(value: #collection_class_name) -> Vec<#class_name> {
                    value.#collection_ident
                }
            }
        }
    } else {
        quote! {
            #[allow(missing_docs, unused)]
            impl ::oscloud::client::PaginatedResource for #class_name {
                type Id = #id_type;
                type Root = Vec<#class_name>;
                fn resource_id(&self) -> Self::Id {
                    self.#id_name.clone()
                }
            }
        }
    }
    .into()
}

/// Derive `QueryItem` for a filter enum.
///
/// Each variant must have exactly one unnamed field. The query key is the snake_case variant
/// name unless overridden with `#[query_item = "..."]`; the value is rendered with `Display`.
#[proc_macro_derive(QueryItem, attributes(query_item))]
pub fn query_item_macro_derive(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);

    let class_name = &input.ident;
    let variants = match collect_variants(&input) {
        Ok(variants) => variants,
        Err(err) => return err.into_compile_error().into(),
    };

    let arms = variants.iter().map(|(ident, key, ty)| {
        let value = match type_ident(ty).as_deref() {
            Some("String") => quote! { ::std::borrow::Cow::Borrowed(value.as_str()) },
            Some("bool") => {
                quote! { ::std::borrow::Cow::Borrowed(if *value { "true" } else { "false" }) }
            }
            _ => quote! { ::std::borrow::Cow::Owned(value.to_string()) },
        };
        quote! {
            #class_name::#ident(value) => (#key, #value)
        }
    });

    quote! {
        #[allow(missing_docs, unused)]
        impl ::oscloud::QueryItem for #class_name {
            fn query_item(
                &self,
            ) -> ::std::result::Result<(&str, ::std::borrow::Cow<str>), ::oscloud::Error> {
                Ok(match self {
                    #(#arms),*
                })
            }
        }
    }
    .into()
}

fn has_attr(attrs: &Vec<syn::Attribute>, attr: &str) -> bool {
    attrs.iter().find(|x| x.path.is_ident(attr)).is_some()
}

fn get_id_field(input: &syn::DeriveInput) -> syn::Result<(&syn::Ident, &syn::Type)> {
    if let syn::Data::Struct(ref st) = input.data {
        if let syn::Fields::Named(ref fs) = st.fields {
            for field in &fs.named {
                if has_attr(&field.attrs, "resource_id") {
                    return Ok((
                        field.ident.as_ref().expect("no ident for resource_id"),
                        &field.ty,
                    ));
                }
            }
        } else {
            return Err(syn::Error::new_spanned(
                input,
                "only named fields are supported for derive(PaginatedResource)",
            ));
        }
    } else {
        return Err(syn::Error::new_spanned(
            input,
            "only structs are supported for derive(PaginatedResource)",
        ));
    }

    Err(syn::Error::new_spanned(input, "#[resource_id] missing"))
}

fn get_collection_name(input: &syn::DeriveInput) -> syn::Result<Option<String>> {
    let mut flat = false;
    let mut maybe_name = None;
    for attr in &input.attrs {
        match attr.parse_meta() {
            Ok(syn::Meta::NameValue(nv)) if nv.path.is_ident("collection_name") => {
                if flat {
                    return Err(syn::Error::new_spanned(
                        attr,
                        "collection_name and flat_collection cannot be used together",
                    ));
                }
                match nv.lit {
                    syn::Lit::Str(s) => maybe_name = Some(s.value()),
                    _ => {
                        return Err(syn::Error::new_spanned(
                            attr,
                            "collection_name must be a string",
                        ))
                    }
                }
            }
            Ok(syn::Meta::Path(p)) if p.is_ident("flat_collection") => {
                if maybe_name.is_some() {
                    return Err(syn::Error::new_spanned(
                        attr,
                        "collection_name and flat_collection cannot be used together",
                    ));
                }
                flat = true;
            }
            _ => {}
        }
    }

    Ok(if flat {
        None
    } else {
        maybe_name.or_else(|| {
            let ident = input.ident.to_string().to_case(Case::Snake);
            Some(
                if ident.chars().last().expect("empty collection_name") == 's' {
                    format!("{}es", ident)
                } else {
                    format!("{}s", ident)
                },
            )
        })
    })
}

fn collect_variants(
    input: &syn::DeriveInput,
) -> syn::Result<Vec<(&syn::Ident, String, &syn::Type)>> {
    let data = match input.data {
        syn::Data::Enum(ref data) => data,
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "only enums are supported for derive(QueryItem)",
            ))
        }
    };

    let mut result = Vec::with_capacity(data.variants.len());
    for variant in &data.variants {
        let field = match variant.fields {
            syn::Fields::Unnamed(ref fs) if fs.unnamed.len() == 1 => &fs.unnamed[0],
            _ => {
                return Err(syn::Error::new_spanned(
                    variant,
                    "each QueryItem variant must have exactly one unnamed field",
                ))
            }
        };
        let key = get_query_item_name(variant)?
            .unwrap_or_else(|| variant.ident.to_string().to_case(Case::Snake));
        result.push((&variant.ident, key, &field.ty));
    }
    Ok(result)
}

fn get_query_item_name(variant: &syn::Variant) -> syn::Result<Option<String>> {
    for attr in &variant.attrs {
        if let Ok(syn::Meta::NameValue(nv)) = attr.parse_meta() {
            if nv.path.is_ident("query_item") {
                match nv.lit {
                    syn::Lit::Str(s) => return Ok(Some(s.value())),
                    _ => {
                        return Err(syn::Error::new_spanned(
                            attr,
                            "query_item must be a string",
                        ))
                    }
                }
            }
        }
    }
    Ok(None)
}

fn type_ident(ty: &syn::Type) -> Option<String> {
    match ty {
        syn::Type::Path(path) => path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string()),
        _ => None,
    }
}
