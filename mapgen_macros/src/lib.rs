//! `#[content_entry]` expands a concrete content struct (terrain, furniture,
//! overmap-terrain, ...) into a paired `<Name>Raw` struct used for
//! deserialization plus an `ImportRecord` implementation for it, so the
//! generic loader in `mapgen_core::content::loader` can run `copy-from`
//! resolution over any content type without per-type boilerplate.
//!
//! Given:
//! ```ignore
//! #[content_entry]
//! pub struct Terrain {
//!     pub id: Identifier,
//!     pub name: Option<String>,
//!     pub move_cost: i32,
//! }
//! ```
//! this generates `TerrainRaw` with `id: MaybeVec<Identifier>` (so a single
//! JSON record can declare several ids at once), the predefined
//! `copy-from`/`extend`/`delete`/`flags` fields, an `ImportRecord` impl that
//! merges two `TerrainRaw`s field-by-field (child wins unless absent), and
//! `Into<Terrain>` / `Into<Vec<Terrain>>` conversions that fan a multi-id
//! record out into one concrete record per id.

use proc_macro::TokenStream as PrimTokenStream;
use proc_macro2::{Ident, TokenStream};
use quote::quote;
use std::collections::HashSet;

fn content_entry_impl(tokens: TokenStream) -> TokenStream {
    let struct_ast = syn::parse2::<syn::ItemStruct>(tokens.clone())
        .expect("content_entry only applies to structs");

    let struct_ident = struct_ast.ident.clone();
    let raw_struct_name = Ident::new(
        format!("{}Raw", struct_ast.ident).as_str(),
        struct_ast.ident.span(),
    );

    let mut predefined_fields = HashSet::new();
    predefined_fields.insert("id".to_string());
    predefined_fields.insert("flags".to_string());
    predefined_fields.insert("copy_from".to_string());
    predefined_fields.insert("extend".to_string());
    predefined_fields.insert("delete".to_string());

    let extra_fields: Vec<_> = struct_ast
        .fields
        .clone()
        .into_iter()
        .filter(|f| !predefined_fields.contains(&f.ident.clone().unwrap().to_string()))
        .collect();

    let extra_field_idents: Vec<_> = extra_fields
        .iter()
        .map(|f| f.ident.clone().unwrap())
        .collect();

    let impl_merge = {
        let mut optional_fields = vec![];
        let mut required_fields = vec![];

        for f in extra_fields.iter() {
            let field_ident = f.ident.clone().unwrap();
            if let syn::Type::Path(syn::TypePath { path, .. }) = &f.ty {
                if path.segments.first().unwrap().ident == "Option" {
                    optional_fields.push(field_ident);
                    continue;
                }
            }
            required_fields.push(field_ident);
        }

        let optional_concat = (!optional_fields.is_empty()).then(|| {
            quote! { #(#optional_fields: override_.#optional_fields.clone().or(base.#optional_fields.clone())),* }
        });
        let required_concat = (!required_fields.is_empty()).then(|| {
            quote! { #(#required_fields: override_.#required_fields.clone()),* }
        });

        let body = match (optional_concat, required_concat) {
            (Some(o), Some(r)) => quote! { #o, #r },
            (Some(o), None) => quote! { #o },
            (None, Some(r)) => quote! { #r },
            (None, None) => quote! {},
        };

        quote! {
            fn merge(base: &Self, override_: &Self) -> Self {
                Self {
                    identity: override_.identity.clone(),
                    flags: if override_.flags.is_empty() { base.flags.clone() } else { override_.flags.clone() },
                    copy_from: override_.copy_from.clone(),
                    extend: override_.extend.clone(),
                    delete: override_.delete.clone(),
                    #body
                }
            }
        }
    };

    quote! {
        #tokens

        #[derive(serde::Deserialize, Debug, Clone)]
        pub struct #raw_struct_name {
            #[serde(flatten)]
            pub identity: mapgen_types::IdentityField,

            #[serde(default)]
            pub flags: Vec<String>,

            #[serde(rename = "copy-from")]
            pub copy_from: Option<mapgen_types::Identifier>,

            pub extend: Option<mapgen_types::ExtendOp>,
            pub delete: Option<mapgen_types::DeleteOp>,

            #(#extra_fields),*
        }

        impl mapgen_types::ImportRecord for #raw_struct_name {
            #impl_merge

            fn identity(&self) -> &mapgen_types::IdentityField {
                &self.identity
            }

            fn copy_from(&self) -> Option<&mapgen_types::Identifier> {
                self.copy_from.as_ref()
            }

            fn extend(&self) -> Option<&mapgen_types::ExtendOp> {
                self.extend.as_ref()
            }

            fn delete(&self) -> Option<&mapgen_types::DeleteOp> {
                self.delete.as_ref()
            }

            fn flags(&self) -> &[String] {
                self.flags.as_ref()
            }

            fn set_flags(&mut self, flags: Vec<String>) {
                self.flags = flags;
            }
        }

        impl #raw_struct_name {
            /// Fan a (possibly multi-id) raw record out into one concrete
            /// record per id it declares. Empty for an abstract record.
            pub fn into_concrete(self) -> Vec<#struct_ident> {
                self.identity
                    .concrete_ids()
                    .into_iter()
                    .map(|ident| #struct_ident {
                        id: ident,
                        flags: self.flags.clone(),
                        #(#extra_field_idents: self.#extra_field_idents.clone()),*
                    })
                    .collect()
            }
        }
    }
}

#[proc_macro_attribute]
pub fn content_entry(_attr: PrimTokenStream, item: PrimTokenStream) -> PrimTokenStream {
    content_entry_impl(item.into()).into()
}
