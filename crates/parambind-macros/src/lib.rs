//! Procedural macros for parambind.
//!
//! This crate provides `#[derive(Bindable)]`, which describes a struct's
//! fields to the binder so that keys like `user.Name` or `users[0].Email`
//! can be decoded into it and encoded back out of it.
//!
//! Use it through the `parambind` re-export rather than depending on this
//! crate directly.
//!
//! # Example
//!
//! ```rust,ignore
//! use parambind::Bindable;
//!
//! #[derive(Bindable)]
//! #[bind(rename_all = "PascalCase")]
//! struct User {
//!     pub name: String,
//!     #[bind(rename = "EMail")]
//!     pub email: String,
//!     password_hash: String,
//! }
//! ```
//!
//! # Macro Expansion
//!
//! The derive implements `parambind::Bindable`:
//!
//! 1. `describe()` lists every non-skipped field with its binding name,
//!    whether it is exported (declared `pub`) and its type descriptor
//! 2. `from_value()` moves exported fields out of a decoded struct value and
//!    zeroes everything else
//! 3. `to_value()` and `zero()` mirror the field list

mod derive;
mod parse;

use proc_macro::TokenStream;

/// Derives `parambind::Bindable` for a struct with named fields.
///
/// # Attributes
///
/// - `#[bind(rename_all = "...")]` on the struct: `PascalCase`, `camelCase`,
///   `lowercase`, `UPPERCASE`, `snake_case`, `SCREAMING_SNAKE_CASE` or
///   `kebab-case`
/// - `#[bind(rename = "...")]` on a field: exact binding name
/// - `#[bind(skip)]` on a field: not described, filled with `Default`
///
/// Only `pub` fields are exported. Private fields are still described, so a
/// key naming one is reported as unsettable, but they are never set.
///
/// # Generated Code
///
/// ```rust,ignore
/// impl ::parambind::Bindable for User {
///     fn describe() -> ::parambind::TypeDesc {
///         ::parambind::TypeDesc::structure::<Self>(vec![
///             ::parambind::FieldDesc::new("Name", true, <String as ::parambind::Bindable>::describe),
///             // ...
///         ])
///     }
///     // from_value, to_value, zero
/// }
/// ```
#[proc_macro_derive(Bindable, attributes(bind))]
pub fn derive_bindable(input: TokenStream) -> TokenStream {
    derive::expand_derive(input.into())
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
