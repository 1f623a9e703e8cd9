//! Parsing utilities for the derive.
//!
//! This module turns a `DeriveInput` and its `#[bind(...)]` attributes into
//! the field list the expansion works from.

use syn::{
    ext::IdentExt, spanned::Spanned, Attribute, Data, DeriveInput, Fields, Generics, Ident,
    LitStr, Type, Visibility,
};

/// Case convention applied to field names by `rename_all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenameRule {
    /// Keep the field name as written.
    #[default]
    None,
    /// `user_name` => `UserName`
    Pascal,
    /// `user_name` => `userName`
    Camel,
    /// `user_name` => `user_name`
    Lower,
    /// `user_name` => `USER_NAME`
    Upper,
    /// `user_name` => `user_name`
    Snake,
    /// `user_name` => `USER_NAME`
    ScreamingSnake,
    /// `user_name` => `user-name`
    Kebab,
}

impl RenameRule {
    /// Parses a `rename_all` value.
    pub fn from_lit(lit: &LitStr) -> syn::Result<Self> {
        match lit.value().as_str() {
            "PascalCase" => Ok(Self::Pascal),
            "camelCase" => Ok(Self::Camel),
            "lowercase" => Ok(Self::Lower),
            "UPPERCASE" => Ok(Self::Upper),
            "snake_case" => Ok(Self::Snake),
            "SCREAMING_SNAKE_CASE" => Ok(Self::ScreamingSnake),
            "kebab-case" => Ok(Self::Kebab),
            other => Err(syn::Error::new(
                lit.span(),
                format!("unknown rename_all rule: {other}"),
            )),
        }
    }

    /// Applies the rule to a snake_case field name.
    pub fn apply(self, field: &str) -> String {
        match self {
            Self::None | Self::Snake => field.to_string(),
            Self::Lower => field.to_lowercase(),
            Self::Upper | Self::ScreamingSnake => field.to_uppercase(),
            Self::Kebab => field.replace('_', "-"),
            Self::Pascal => field.split('_').map(capitalize).collect(),
            Self::Camel => {
                let pascal: String = field.split('_').map(capitalize).collect();
                let mut chars = pascal.chars();
                chars.next().map_or_else(String::new, |first| {
                    first.to_lowercase().chain(chars).collect()
                })
            }
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Struct-level `#[bind(...)]` options.
#[derive(Debug, Default)]
pub struct ContainerAttrs {
    /// Naming rule for fields without an explicit rename.
    pub rename_all: RenameRule,
}

impl ContainerAttrs {
    /// Parses the struct's attributes.
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = Self::default();
        for attr in attrs.iter().filter(|a| a.path().is_ident("bind")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename_all") {
                    let lit: LitStr = meta.value()?.parse()?;
                    parsed.rename_all = RenameRule::from_lit(&lit)?;
                    Ok(())
                } else {
                    Err(meta.error("unknown bind attribute on struct"))
                }
            })?;
        }
        Ok(parsed)
    }
}

/// A struct field as the derive sees it.
#[derive(Debug)]
pub struct BindField {
    /// Rust field name.
    pub ident: Ident,
    /// Field type.
    pub ty: Type,
    /// Name matched against key segments.
    pub name: String,
    /// Declared `pub`.
    pub exported: bool,
    /// Left out of binding entirely.
    pub skip: bool,
}

impl BindField {
    /// Parses a named field.
    pub fn from_field(field: &syn::Field, rule: RenameRule) -> syn::Result<Self> {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| syn::Error::new(field.span(), "expected a named field"))?;

        let mut rename = None;
        let mut skip = false;
        for attr in field.attrs.iter().filter(|a| a.path().is_ident("bind")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let lit: LitStr = meta.value()?.parse()?;
                    if lit.value().is_empty() {
                        return Err(syn::Error::new(lit.span(), "binding name cannot be empty"));
                    }
                    rename = Some(lit.value());
                    Ok(())
                } else if meta.path.is_ident("skip") {
                    skip = true;
                    Ok(())
                } else {
                    Err(meta.error("unknown bind attribute on field"))
                }
            })?;
        }

        let name = rename.unwrap_or_else(|| rule.apply(&ident.unraw().to_string()));
        Ok(Self {
            ident,
            ty: field.ty.clone(),
            name,
            exported: matches!(field.vis, Visibility::Public(_)),
            skip,
        })
    }
}

/// A parsed `#[derive(Bindable)]` input.
#[derive(Debug)]
pub struct BindStruct {
    /// Struct name.
    pub ident: Ident,
    /// Struct generics.
    pub generics: Generics,
    /// Fields in declaration order.
    pub fields: Vec<BindField>,
}

impl BindStruct {
    /// Parses the derive input, rejecting enums, unions, tuple structs and
    /// lifetime parameters.
    pub fn parse(input: DeriveInput) -> syn::Result<Self> {
        let container = ContainerAttrs::from_attrs(&input.attrs)?;

        if let Some(lifetime) = input.generics.lifetimes().next() {
            return Err(syn::Error::new(
                lifetime.span(),
                "Bindable types cannot borrow; remove the lifetime parameter",
            ));
        }

        let data = match input.data {
            Data::Struct(data) => data,
            Data::Enum(data) => {
                return Err(syn::Error::new(
                    data.enum_token.span(),
                    "Bindable can only be derived for structs",
                ))
            }
            Data::Union(data) => {
                return Err(syn::Error::new(
                    data.union_token.span(),
                    "Bindable can only be derived for structs",
                ))
            }
        };

        let fields = match &data.fields {
            Fields::Named(named) => named
                .named
                .iter()
                .map(|f| BindField::from_field(f, container.rename_all))
                .collect::<syn::Result<Vec<_>>>()?,
            Fields::Unit => Vec::new(),
            Fields::Unnamed(unnamed) => {
                return Err(syn::Error::new(
                    unnamed.span(),
                    "Bindable requires named fields",
                ))
            }
        };

        let mut seen = std::collections::HashSet::new();
        for field in fields.iter().filter(|f| !f.skip) {
            if !seen.insert(field.name.as_str()) {
                return Err(syn::Error::new(
                    field.ident.span(),
                    format!("duplicate binding name: {}", field.name),
                ));
            }
        }

        Ok(Self {
            ident: input.ident,
            generics: input.generics,
            fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_rename_rules() {
        assert_eq!(RenameRule::Pascal.apply("user_name"), "UserName");
        assert_eq!(RenameRule::Camel.apply("user_name"), "userName");
        assert_eq!(RenameRule::ScreamingSnake.apply("user_name"), "USER_NAME");
        assert_eq!(RenameRule::Kebab.apply("user_name"), "user-name");
        assert_eq!(RenameRule::None.apply("user_name"), "user_name");
        assert_eq!(RenameRule::Pascal.apply("id"), "Id");
    }

    #[test]
    fn test_parse_struct() {
        let input: DeriveInput = parse_quote! {
            #[bind(rename_all = "PascalCase")]
            struct User {
                pub name: String,
                #[bind(rename = "EMail")]
                pub email: String,
                password: String,
                #[bind(skip)]
                pub cache: Vec<u8>,
            }
        };
        let parsed = BindStruct::parse(input).unwrap();
        let names: Vec<_> = parsed.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["Name", "EMail", "Password", "Cache"]);
        assert!(parsed.fields[0].exported);
        assert!(!parsed.fields[2].exported);
        assert!(parsed.fields[3].skip);
    }

    #[test]
    fn test_raw_identifier() {
        let input: DeriveInput = parse_quote! {
            struct Item { pub r#type: String }
        };
        let parsed = BindStruct::parse(input).unwrap();
        assert_eq!(parsed.fields[0].name, "type");
    }

    #[test]
    fn test_rejects_enum() {
        let input: DeriveInput = parse_quote! {
            enum Choice { A, B }
        };
        assert!(BindStruct::parse(input).is_err());
    }

    #[test]
    fn test_rejects_tuple_struct() {
        let input: DeriveInput = parse_quote! {
            struct Pair(pub i32, pub i32);
        };
        assert!(BindStruct::parse(input).is_err());
    }

    #[test]
    fn test_rejects_lifetimes() {
        let input: DeriveInput = parse_quote! {
            struct Borrowed<'a> { pub name: &'a str }
        };
        assert!(BindStruct::parse(input).is_err());
    }

    #[test]
    fn test_rejects_unknown_attribute() {
        let input: DeriveInput = parse_quote! {
            #[bind(flatten)]
            struct User { pub name: String }
        };
        assert!(BindStruct::parse(input).is_err());
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let input: DeriveInput = parse_quote! {
            struct User {
                pub name: String,
                #[bind(rename = "name")]
                pub other: String,
            }
        };
        assert!(BindStruct::parse(input).is_err());
    }
}
