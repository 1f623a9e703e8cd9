//! `#[derive(Bindable)]` expansion.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{parse_quote, DeriveInput};

use crate::parse::{BindField, BindStruct};

/// Expands `#[derive(Bindable)]`.
pub fn expand_derive(input: TokenStream) -> syn::Result<TokenStream> {
    let input: DeriveInput = syn::parse2(input)?;
    let parsed = BindStruct::parse(input)?;
    Ok(generate_impl(&parsed))
}

fn generate_impl(parsed: &BindStruct) -> TokenStream {
    let ident = &parsed.ident;

    let mut generics = parsed.generics.clone();
    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!(::parambind::Bindable));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let bound: Vec<&BindField> = parsed.fields.iter().filter(|f| !f.skip).collect();

    let descs = bound.iter().map(|f| {
        let name = &f.name;
        let exported = f.exported;
        let ty = &f.ty;
        quote! {
            ::parambind::FieldDesc::new(#name, #exported, <#ty as ::parambind::Bindable>::describe)
        }
    });

    let from_inits = parsed.fields.iter().map(|f| {
        let field = &f.ident;
        let ty = &f.ty;
        let name = &f.name;
        if f.skip {
            quote! { #field: ::core::default::Default::default() }
        } else if f.exported {
            quote! {
                #field: ::parambind::value::take_field(&mut fields, #name).map_or_else(
                    <#ty as ::parambind::Bindable>::zero,
                    <#ty as ::parambind::Bindable>::from_value,
                )
            }
        } else {
            quote! { #field: <#ty as ::parambind::Bindable>::zero() }
        }
    });

    let zero_inits = parsed.fields.iter().map(|f| {
        let field = &f.ident;
        let ty = &f.ty;
        if f.skip {
            quote! { #field: ::core::default::Default::default() }
        } else {
            quote! { #field: <#ty as ::parambind::Bindable>::zero() }
        }
    });

    let entries = bound.iter().map(|f| {
        let field = &f.ident;
        let name = &f.name;
        quote! {
            (
                ::std::string::String::from(#name),
                ::parambind::Bindable::to_value(&self.#field),
            )
        }
    });

    quote! {
        impl #impl_generics ::parambind::Bindable for #ident #ty_generics #where_clause {
            fn describe() -> ::parambind::TypeDesc {
                ::parambind::TypeDesc::structure::<Self>(::std::vec![#(#descs),*])
            }

            #[allow(unused_mut, unused_variables)]
            fn from_value(value: ::parambind::Value) -> Self {
                match value {
                    ::parambind::Value::Struct(mut fields) => Self { #(#from_inits),* },
                    _ => <Self as ::parambind::Bindable>::zero(),
                }
            }

            fn to_value(&self) -> ::parambind::Value {
                ::parambind::Value::Struct(::std::vec![#(#entries),*])
            }

            fn zero() -> Self {
                Self { #(#zero_inits),* }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(input: TokenStream) -> String {
        expand_derive(input).unwrap().to_string()
    }

    #[test]
    fn test_expands_field_descriptors() {
        let out = expand(quote! {
            #[bind(rename_all = "PascalCase")]
            struct User {
                pub name: String,
                password: String,
            }
        });
        assert!(out.contains("impl :: parambind :: Bindable for User"));
        assert!(out.contains("\"Name\" , true"));
        assert!(out.contains("\"Password\" , false"));
    }

    #[test]
    fn test_private_fields_never_taken() {
        let out = expand(quote! {
            struct User { password: String }
        });
        assert!(!out.contains("take_field"));
    }

    #[test]
    fn test_skipped_fields_use_default() {
        let out = expand(quote! {
            struct User {
                pub name: String,
                #[bind(skip)]
                pub cache: std::collections::HashSet<u64>,
            }
        });
        assert!(out.contains("cache : :: core :: default :: Default :: default ()"));
        assert!(!out.contains("\"cache\""));
    }

    #[test]
    fn test_generic_params_get_bound() {
        let out = expand(quote! {
            struct Page<T> { pub items: Vec<T> }
        });
        assert!(out.contains("T : :: parambind :: Bindable"));
    }

    #[test]
    fn test_unit_struct() {
        let out = expand(quote! { struct Marker; });
        assert!(out.contains("for Marker"));
        assert!(!out.contains("take_field"));
    }

    #[test]
    fn test_error_for_enum() {
        let err = expand_derive(quote! { enum E { A } }).unwrap_err();
        assert!(err.to_string().contains("only be derived for structs"));
    }
}
