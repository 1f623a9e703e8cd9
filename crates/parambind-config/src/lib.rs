//! Typed configuration for parambind.
//!
//! [`BindConfig`] gathers the binder's time layouts, the extractor's input
//! limits, upload staging and logging into one file, and turns into the
//! engine's [`BinderOptions`](parambind::BinderOptions).
//!
//! # Example
//!
//! ```no_run
//! use parambind_config::ConfigLoader;
//!
//! # fn main() -> Result<(), parambind_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_file("parambind.toml")?
//!     .with_env()
//!     .load()?;
//!
//! let binder = parambind::Binder::with_options(config.binder_options());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [format]
//! date = "%Y-%m-%d"
//! datetime = "%Y-%m-%d %H:%M"
//! extra_time_formats = ["%m/%d/%Y"]
//!
//! [limits]
//! max_slice_index = 10000
//! max_depth = 64
//! max_body_size = 33554432
//! max_fields = 1000
//!
//! [uploads]
//! temp_dir = "/var/tmp/parambind"
//! temp_prefix = "parambind-upload"
//!
//! [logging]
//! level = "info"
//! binder_level = "debug"
//! json_format = true
//! ```
//!
//! # Environment Variable Overrides
//!
//! Values can be overridden with `PARAMBIND__SECTION__KEY`:
//!
//! - `PARAMBIND__FORMAT__EXTRA_TIME_FORMATS=%m/%d/%Y;%d.%m.%Y`
//! - `PARAMBIND__LIMITS__MAX_FIELDS=500`
//! - `PARAMBIND__LIMITS__MAX_DEPTH=32`
//! - `PARAMBIND__LOGGING__FORMAT=pretty`

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::BindConfig;
pub use error::ConfigError;
pub use loader::{ConfigLoader, DEFAULT_ENV_PREFIX};
pub use parambind_telemetry::LogConfig;
pub use schema::{FormatConfig, LimitConfig, UploadConfig};
