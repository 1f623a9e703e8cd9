//! Extraction error types.
//!
//! Malformed input is logged and skipped during extraction. Only requests
//! that exceed a configured limit fail.

use http::StatusCode;
use std::fmt;

/// Where the offending data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionSource {
    /// Query string parameters
    Query,
    /// Request body (form, multipart, JSON)
    Body,
}

impl fmt::Display for ExtractionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query => write!(f, "query"),
            Self::Body => write!(f, "body"),
        }
    }
}

/// A request rejected during parameter extraction.
///
/// # Example
///
/// ```rust
/// use parambind_extract::{ExtractionError, ExtractionSource};
/// use http::StatusCode;
///
/// let err = ExtractionError::too_many_fields(ExtractionSource::Query, 100, 101);
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// assert_eq!(err.extraction_source(), ExtractionSource::Query);
/// ```
#[derive(Debug)]
pub struct ExtractionError {
    extraction_source: ExtractionSource,
    kind: ExtractionErrorKind,
    message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExtractionErrorKind {
    /// Body is too large
    PayloadTooLarge,
    /// More fields than allowed
    TooManyFields,
}

impl ExtractionError {
    /// Creates an error for a payload that's too large.
    #[must_use]
    pub fn payload_too_large(max_size: usize, actual_size: usize) -> Self {
        Self {
            extraction_source: ExtractionSource::Body,
            kind: ExtractionErrorKind::PayloadTooLarge,
            message: format!("payload too large: max {max_size} bytes, got {actual_size} bytes"),
        }
    }

    /// Creates an error for a request carrying too many fields.
    #[must_use]
    pub fn too_many_fields(source: ExtractionSource, max_fields: usize, actual: usize) -> Self {
        Self {
            extraction_source: source,
            kind: ExtractionErrorKind::TooManyFields,
            message: format!("too many {source} fields: max {max_fields}, got {actual}"),
        }
    }

    /// Returns the extraction source.
    #[must_use]
    pub fn extraction_source(&self) -> ExtractionSource {
        self.extraction_source
    }

    /// Returns the appropriate HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self.kind {
            ExtractionErrorKind::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ExtractionErrorKind::TooManyFields => StatusCode::BAD_REQUEST,
        }
    }

    /// Returns the error code suitable for error envelopes.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self.kind {
            ExtractionErrorKind::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            ExtractionErrorKind::TooManyFields => "TOO_MANY_FIELDS",
        }
    }
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExtractionError {}
