//! Logging setup for parambind.
//!
//! The binder reports every fallback (a value that did not parse, a field
//! that cannot be set, a type with no codec) as a `tracing` event and keeps
//! going. This crate wires those events to stdout.
//!
//! # Example
//!
//! ```rust,ignore
//! use parambind_telemetry::{init_logging, LogConfig};
//!
//! fn main() {
//!     let config = LogConfig {
//!         binder_level: Some("debug".to_string()),
//!         ..LogConfig::default()
//!     };
//!     init_logging(&config).expect("logging");
//! }
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, fields, init_logging, targets, LogConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
