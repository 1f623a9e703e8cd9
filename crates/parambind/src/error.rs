//! Error types for the binding engine.
//!
//! [`BindError`] is the internal failure taxonomy carried between codecs and
//! the [`Binder`](crate::Binder). The binder never hands these to callers of
//! the total API: every decode failure becomes the zero value of the target
//! type and every encode failure a no-op, with the error logged.
//!
//! The one exception is [`ParameterSet::bind_json`](crate::ParameterSet::bind_json),
//! which mirrors a fallible JSON decode and returns [`BindResult`].

use std::io;

use thiserror::Error;

use crate::Kind;

/// Result type alias using [`BindError`].
pub type BindResult<T> = Result<T, BindError>;

/// A binding failure.
#[derive(Error, Debug)]
pub enum BindError {
    /// Malformed scalar text.
    #[error("cannot parse {input:?} as {kind}: {message}")]
    Parse {
        /// Raw input.
        input: String,
        /// Target kind.
        kind: Kind,
        /// Parser message.
        message: String,
    },

    /// No codec is registered for the type or its kind.
    #[error("no codec registered for {type_name} ({kind})")]
    Unresolved {
        /// Target type name.
        type_name: &'static str,
        /// Target kind.
        kind: Kind,
    },

    /// A struct path names a field the type does not have.
    #[error("field {field:?} not found on {type_name}")]
    MissingField {
        /// Field name taken from the key.
        field: String,
        /// Struct type name.
        type_name: &'static str,
    },

    /// A struct path names a field that is not externally settable.
    #[error("field {field:?} on {type_name} is not settable")]
    UnsettableField {
        /// Field name taken from the key.
        field: String,
        /// Struct type name.
        type_name: &'static str,
    },

    /// A value handed to an encoder does not match the descriptor.
    #[error("expected {expected} value for {type_name}, got {found}")]
    Mismatch {
        /// Target type name.
        type_name: &'static str,
        /// Expected value variant.
        expected: &'static str,
        /// Actual value variant.
        found: &'static str,
    },

    /// A descriptor lacks the structure its kind's codec needs.
    #[error("descriptor of {type_name} has no {expected} shape")]
    Shape {
        /// Type name.
        type_name: &'static str,
        /// Shape the codec required.
        expected: &'static str,
    },

    /// No uploaded part under the key could be opened or read.
    #[error("cannot open uploaded file {name:?}")]
    FileOpen {
        /// Parameter name.
        name: String,
        /// Last open or read failure, if any part existed.
        #[source]
        source: Option<io::Error>,
    },

    /// Staging an upload to a temporary file failed.
    #[error("cannot stage uploaded file {name:?}: {source}")]
    FileCopy {
        /// Parameter name.
        name: String,
        /// Create, copy or seek failure.
        #[source]
        source: io::Error,
    },

    /// The codec has no encoder.
    #[error("encoding {type_name} is not supported")]
    EncodeUnsupported {
        /// Type name.
        type_name: &'static str,
    },

    /// The key nests deeper than the binder allows.
    #[error("nesting deeper than {limit} levels")]
    DepthExceeded {
        /// The configured limit.
        limit: usize,
    },

    /// A time layout could not be rendered.
    #[error("invalid time layout {layout:?}")]
    Format {
        /// The offending layout.
        layout: String,
    },

    /// The JSON body is absent.
    #[error("request has no JSON body")]
    MissingJson,

    /// The JSON body does not decode into the target.
    #[error("cannot decode JSON body: {0}")]
    Json(#[from] serde_json::Error),
}

impl BindError {
    /// Creates a parse failure.
    pub fn parse(input: impl Into<String>, kind: Kind, message: impl ToString) -> Self {
        Self::Parse {
            input: input.into(),
            kind,
            message: message.to_string(),
        }
    }

    /// Creates a shape mismatch between a value and its descriptor.
    pub fn mismatch(type_name: &'static str, expected: &'static str, found: &crate::Value) -> Self {
        Self::Mismatch {
            type_name,
            expected,
            found: found.variant_name(),
        }
    }

    /// Creates a shape failure for a descriptor.
    pub fn shape(ty: &crate::TypeDesc, expected: &'static str) -> Self {
        Self::Shape {
            type_name: ty.name(),
            expected,
        }
    }

    /// Returns true for failures caused by malformed client input.
    ///
    /// These are logged at `debug`; everything else at `warn`.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_parse_display() {
        let err = BindError::parse("abc", Kind::Int32, "invalid digit found in string");
        assert_eq!(
            err.to_string(),
            "cannot parse \"abc\" as int32: invalid digit found in string"
        );
        assert!(err.is_input_error());
    }

    #[test]
    fn test_file_copy_source() {
        let err = BindError::FileCopy {
            name: "upload".to_string(),
            source: io::Error::new(io::ErrorKind::Other, "disk full"),
        };
        assert!(err.source().is_some());
        assert!(!err.is_input_error());
    }

    #[test]
    fn test_mismatch() {
        let err = BindError::mismatch("alloc::string::String", "string", &crate::Value::Int(1));
        assert!(err.to_string().contains("got int"));
    }
}
