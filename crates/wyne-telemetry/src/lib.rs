//! Logging setup for Wyne.
//!
//! Dispatch itself only emits `tracing` events; this crate installs the
//! subscriber that renders them.
//!
//! - [`init_logging`] - Registry with an `EnvFilter` and a JSON or pretty layer
//! - [`create_env_filter`] - Filter-directive parsing, also used for config validation
//! - [`fields`] - Standard structured field names

#![doc(html_root_url = "https://docs.rs/wyne-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, fields, init_logging, LogConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
