//! Root configuration type.

use parambind::codec::scalar::validate_layout;
use parambind::BinderOptions;
use parambind_telemetry::{create_env_filter, LogConfig};
use serde::{Deserialize, Serialize};

use crate::{ConfigError, FormatConfig, LimitConfig, UploadConfig};

/// Complete parambind configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// # Example
///
/// ```
/// use parambind_config::BindConfig;
///
/// let config = BindConfig::default();
/// let options = config.binder_options();
/// assert_eq!(options.time_formats, ["%Y-%m-%d %H:%M", "%Y-%m-%d"]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct BindConfig {
    /// Time layouts.
    #[serde(default)]
    pub format: FormatConfig,

    /// Input limits.
    #[serde(default)]
    pub limits: LimitConfig,

    /// Upload staging.
    #[serde(default)]
    pub uploads: UploadConfig,

    /// Logging.
    #[serde(default)]
    pub logging: LogConfig,
}

impl BindConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - A time layout is empty or not valid strftime
    /// - `max_depth`, `max_body_size` or `max_fields` is zero
    /// - The temp file prefix is empty
    /// - The log filter does not parse
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_layout("format.date", &self.format.date)?;
        check_layout("format.datetime", &self.format.datetime)?;
        for (i, layout) in self.format.extra_time_formats.iter().enumerate() {
            check_layout(&format!("format.extra_time_formats[{i}]"), layout)?;
        }

        if self.limits.max_depth == 0 {
            return Err(ConfigError::invalid_value(
                "limits.max_depth",
                "must be greater than zero",
            ));
        }
        if self.limits.max_body_size == 0 {
            return Err(ConfigError::invalid_value(
                "limits.max_body_size",
                "must be greater than zero",
            ));
        }
        if self.limits.max_fields == 0 {
            return Err(ConfigError::invalid_value(
                "limits.max_fields",
                "must be greater than zero",
            ));
        }

        if self.uploads.temp_prefix.is_empty() {
            return Err(ConfigError::invalid_value(
                "uploads.temp_prefix",
                "must not be empty",
            ));
        }

        create_env_filter(&self.logging.directives())
            .map_err(|e| ConfigError::invalid_value("logging.level", e.to_string()))?;

        Ok(())
    }

    /// The binder settings this configuration describes.
    ///
    /// Parse layouts are the extra formats first, then `datetime`, then
    /// `date`.
    pub fn binder_options(&self) -> BinderOptions {
        let mut time_formats = self.format.extra_time_formats.clone();
        time_formats.push(self.format.datetime.clone());
        time_formats.push(self.format.date.clone());

        BinderOptions {
            time_formats,
            date_format: self.format.date.clone(),
            datetime_format: self.format.datetime.clone(),
            max_slice_index: self.limits.max_slice_index,
            max_depth: self.limits.max_depth,
            temp_dir: self.uploads.temp_dir.clone(),
            temp_prefix: self.uploads.temp_prefix.clone(),
        }
    }

    /// Development preset: pretty logs with every binder fallback visible.
    #[must_use]
    pub fn development() -> Self {
        Self {
            logging: LogConfig::development(),
            ..Self::default()
        }
    }

    /// Production preset: JSON logs at `info`.
    #[must_use]
    pub fn production() -> Self {
        Self {
            logging: LogConfig::production(),
            ..Self::default()
        }
    }
}

fn check_layout(field: &str, layout: &str) -> Result<(), ConfigError> {
    validate_layout(layout).map_err(|e| ConfigError::invalid_value(field, e.to_string()))
}
