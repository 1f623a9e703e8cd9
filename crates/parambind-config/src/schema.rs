//! Configuration section types.

use std::path::PathBuf;

use parambind::{
    DEFAULT_DATETIME_FORMAT, DEFAULT_DATE_FORMAT, DEFAULT_MAX_DEPTH, DEFAULT_MAX_SLICE_INDEX,
    DEFAULT_TEMP_PREFIX,
};
use serde::{Deserialize, Serialize};

/// Time layouts (chrono strftime syntax).
///
/// # Example
///
/// ```
/// use parambind_config::FormatConfig;
///
/// let config = FormatConfig {
///     extra_time_formats: vec!["%m/%d/%Y".to_string()],
///     ..Default::default()
/// };
/// assert_eq!(config.date, "%Y-%m-%d");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FormatConfig {
    /// Layout for times at exactly midnight; also parsed.
    #[serde(default = "default_date")]
    pub date: String,

    /// Layout for all other times; also parsed.
    #[serde(default = "default_datetime")]
    pub datetime: String,

    /// Additional parse layouts, tried before `datetime` and `date`.
    #[serde(default)]
    pub extra_time_formats: Vec<String>,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            date: default_date(),
            datetime: default_datetime(),
            extra_time_formats: Vec::new(),
        }
    }
}

/// Input size limits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LimitConfig {
    /// Slice indices above this are ignored by the binder.
    #[serde(default = "default_max_slice_index")]
    pub max_slice_index: usize,

    /// Nested codec calls the binder allows for one parameter.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Largest request body the extractor will read, in bytes.
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,

    /// Most form/query fields the extractor will accept.
    #[serde(default = "default_max_fields")]
    pub max_fields: usize,
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            max_slice_index: default_max_slice_index(),
            max_depth: default_max_depth(),
            max_body_size: default_max_body_size(),
            max_fields: default_max_fields(),
        }
    }
}

/// Staging of in-memory uploads bound to file handles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct UploadConfig {
    /// Directory for staged files. The system temp dir when unset.
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,

    /// File-name prefix for staged files.
    #[serde(default = "default_temp_prefix")]
    pub temp_prefix: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            temp_dir: None,
            temp_prefix: default_temp_prefix(),
        }
    }
}

fn default_date() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

fn default_datetime() -> String {
    DEFAULT_DATETIME_FORMAT.to_string()
}

const fn default_max_slice_index() -> usize {
    DEFAULT_MAX_SLICE_INDEX
}

const fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

const fn default_max_body_size() -> usize {
    32 << 20
}

const fn default_max_fields() -> usize {
    1000
}

fn default_temp_prefix() -> String {
    DEFAULT_TEMP_PREFIX.to_string()
}
