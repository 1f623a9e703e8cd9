//! Structured logging for parambind.
//!
//! The binder never fails loudly: a value that does not parse becomes its
//! zero value and the problem is reported as a `tracing` event. This module
//! installs a subscriber that makes those events visible.
//!
//! # Targets
//!
//! | Target | Emitted by | Levels |
//! |--------|------------|--------|
//! | `parambind::binder` | decode/encode fallbacks | `debug` for malformed input, `warn` otherwise |
//! | `parambind::params` | temp file purge | `debug`, `warn` on removal failure |
//! | `parambind::extract` | request parameter extraction | `debug`, `warn` |
//!
//! # Example
//!
//! ```rust,ignore
//! use parambind_telemetry::logging::{LogConfig, init_logging};
//!
//! let config = LogConfig::development();
//! init_logging(&config)?;
//! ```

use serde::{Deserialize, Serialize};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::error::TelemetryError;
use crate::TelemetryResult;

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// Whether logging is enabled.
    pub enabled: bool,

    /// Base filter (e.g., "info", "warn,my_app=debug").
    pub level: String,

    /// Level for binder fallbacks, appended as a `parambind::binder` directive.
    ///
    /// Malformed input is logged at `debug`, so the default `info` hides it.
    pub binder_level: Option<String>,

    /// Whether to output JSON format.
    pub json_format: bool,

    /// Whether to include span close events.
    pub span_events: bool,

    /// Whether to include file/line info.
    pub file_line_info: bool,

    /// Whether to include thread IDs.
    pub thread_ids: bool,

    /// Whether to include target (module path).
    pub include_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            binder_level: None,
            json_format: true,
            span_events: false,
            file_line_info: false,
            thread_ids: false,
            include_target: true,
        }
    }
}

impl LogConfig {
    /// Human-readable output with every binder fallback visible.
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            binder_level: Some("debug".to_string()),
            json_format: false,
            span_events: true,
            file_line_info: true,
            ..Self::default()
        }
    }

    /// JSON output at `info`.
    #[must_use]
    pub fn production() -> Self {
        Self::default()
    }

    /// The full filter string: `level`, then the binder directive.
    pub fn directives(&self) -> String {
        match &self.binder_level {
            Some(binder) => format!("{},{}={}", self.level, targets::BINDER, binder),
            None => self.level.clone(),
        }
    }
}

/// Initializes the global logging subscriber.
///
/// # Errors
///
/// Returns `TelemetryError::InvalidFilter` for a bad filter and
/// `TelemetryError::LoggingInit` if a global subscriber is already set.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter = create_env_filter(&config.directives())?;

    let span_events = if config.span_events {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    if config.json_format {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_span_events(span_events)
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_thread_ids(config.thread_ids)
            .with_target(config.include_target)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .pretty()
            .with_span_events(span_events)
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_thread_ids(config.thread_ids)
            .with_target(config.include_target)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    }

    Ok(())
}

/// Creates an env filter from a string.
///
/// # Errors
///
/// Returns `TelemetryError::InvalidFilter` if the string does not parse.
pub fn create_env_filter(filter: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(filter).map_err(|e| TelemetryError::InvalidFilter(format!("{filter}: {e}")))
}

/// Log targets used across parambind.
pub mod targets {
    /// Decode and encode fallbacks.
    pub const BINDER: &str = "parambind::binder";

    /// Temp file bookkeeping.
    pub const PARAMS: &str = "parambind::params";

    /// Request parameter extraction.
    pub const EXTRACT: &str = "parambind::extract";
}

/// Field names carried by binder events.
///
/// Use these when filtering or indexing structured logs.
pub mod fields {
    /// `decode` or `encode`.
    pub const OP: &str = "op";

    /// Parameter name being bound.
    pub const PARAM: &str = "param";

    /// Rust type name of the target.
    pub const TYPE_NAME: &str = "type_name";

    /// Kind of the target type.
    pub const KIND: &str = "kind";

    /// Error field name.
    pub const ERROR: &str = "error";
}
