//! # Parambind
//!
//! Parameter binding engine: converts flat, bracket/dot-delimited form keys
//! into nested typed values and back into flat key/value pairs.
//!
//! ## Key grammar
//!
//! | key               | binds                                  |
//! |-------------------|----------------------------------------|
//! | `name`            | a scalar or composite root             |
//! | `name[3]`         | indexed slice element                  |
//! | `name[]`          | unindexed slice element (appended)     |
//! | `name[key]`       | map entry, `key` decoded as map key    |
//! | `name.Field`      | exported struct field                  |
//!
//! Segments compose left to right: `users[3].Email`, `meta[region]`.
//!
//! ## Overview
//!
//! - [`ParameterSet`] - flat values, uploads and staged temporary files
//! - [`Bindable`] - implemented by every bindable type; derive it for structs
//! - [`Registry`] - codecs by exact type, then by [`Kind`]
//! - [`Binder`] - total decode/encode entry points
//!
//! ```rust
//! use parambind::{Bindable, Binder, ParameterSet};
//!
//! #[derive(Bindable, Debug, Default)]
//! #[bind(rename_all = "PascalCase")]
//! struct User {
//!     pub name: String,
//!     pub tags: Vec<String>,
//! }
//!
//! let params: ParameterSet = [("user.Name", "rob"), ("user.Tags[]", "admin")]
//!     .into_iter()
//!     .collect();
//!
//! let user: User = Binder::default().bind(&params, "user");
//! assert_eq!(user.name, "rob");
//! assert_eq!(user.tags, ["admin"]);
//! ```

#![doc(html_root_url = "https://docs.rs/parambind/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

extern crate self as parambind;

mod bindable;
mod binder;
pub mod codec;
mod desc;
mod error;
mod handles;
mod kind;
mod params;
mod registry;
pub mod value;

pub use bindable::Bindable;
pub use binder::{
    Binder, BinderOptions, DecodeContext, EncodeContext, DEFAULT_DATETIME_FORMAT,
    DEFAULT_DATE_FORMAT, DEFAULT_MAX_DEPTH, DEFAULT_MAX_SLICE_INDEX, DEFAULT_TEMP_PREFIX,
    LOG_TARGET,
};
pub use desc::{DescribeFn, FieldDesc, Shape, TypeDesc, ZeroFn};
pub use error::{BindError, BindResult};
pub use handles::{BoundFile, BoundReader, FileStream, ReadSeek};
pub use kind::Kind;
pub use params::{FilePart, FileSource, ParameterSet, PurgeReport};
pub use registry::Registry;
pub use value::Value;

/// Derives [`Bindable`] for a struct with named fields.
///
/// `pub` fields are exported and bind from `name.Field` keys; other fields
/// are described but never set. Attributes:
///
/// - `#[bind(rename_all = "PascalCase")]` on the struct
/// - `#[bind(rename = "Email")]` on a field
/// - `#[bind(skip)]` on a field, which then needs `Default`
pub use parambind_macros::Bindable;
