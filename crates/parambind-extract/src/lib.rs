//! # Parambind Extract
//!
//! Turns an HTTP request into a [`parambind::ParameterSet`] ready for
//! binding.
//!
//! ## Sources
//!
//! | Source | Merge rule |
//! |--------|------------|
//! | Query string | first |
//! | Form or multipart body | appended to query values |
//! | Route parameters | replace earlier values |
//! | Fixed route parameters | replace everything |
//!
//! JSON bodies are not split into values. They are kept whole for
//! [`ParameterSet::bind_json`](parambind::ParameterSet::bind_json).
//!
//! ## Example
//!
//! ```rust,ignore
//! use parambind::Binder;
//! use parambind_extract::{ExtractConfig, RequestParts, RequestScope};
//!
//! let parts = RequestParts::new(method, uri, headers, body).with_route_param("id", "7");
//! let scope = RequestScope::extract(&parts, &ExtractConfig::default()).await?;
//!
//! let id: u64 = binder.bind(&scope, "id");
//! let user: User = binder.bind(&scope, "user");
//!
//! scope.finish();
//! ```
//!
//! ## Error Handling
//!
//! Only limit violations fail extraction; everything else is logged under
//! the `parambind::extract` target and skipped.
//!
//! ```rust
//! use parambind_extract::ExtractionError;
//!
//! let err = ExtractionError::payload_too_large(1024, 4096);
//! assert_eq!(err.status_code(), http::StatusCode::PAYLOAD_TOO_LARGE);
//! ```

#![doc(html_root_url = "https://docs.rs/parambind-extract/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod error;
mod extract;
mod form;
mod multipart;
mod query;
mod scope;

pub use context::RequestParts;
pub use error::{ExtractionError, ExtractionSource};
pub use extract::{extract_params, ExtractConfig};
pub use scope::RequestScope;

/// Log target for extraction diagnostics.
pub const LOG_TARGET: &str = "parambind::extract";
