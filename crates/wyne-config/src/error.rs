//! Configuration error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure while assembling a [`WyneConfig`](crate::WyneConfig).
///
/// Source errors name the layer that failed: file, string, `.env` or the
/// process environment. [`InvalidValue`](Self::InvalidValue) is raised by
/// validation after all layers are applied.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("configuration file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The configuration file exists but could not be read.
    #[error("failed to read configuration file {}", path.display())]
    Read {
        /// The file being read.
        path: PathBuf,
        /// I/O failure.
        #[source]
        source: io::Error,
    },

    /// The file extension or format name is neither TOML nor JSON.
    #[error("unsupported configuration format '{0}', expected toml or json")]
    UnsupportedFormat(String),

    /// TOML did not parse or contained unknown keys.
    #[error("invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON did not parse or contained unknown keys.
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// A `.env` file exists but is malformed.
    #[error("failed to load .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),

    /// An override variable for a known key holds an unusable value.
    #[error("environment variable {var} is invalid, {expected}")]
    EnvVar {
        /// Full variable name, e.g. `WYNE__LOGGING__FORMAT`.
        var: String,
        /// What the value should have been.
        expected: &'static str,
    },

    /// A loaded value failed validation.
    #[error("invalid configuration value for {field}: {reason}")]
    InvalidValue {
        /// Dotted path of the field, e.g. `dispatch.base_path`.
        field: String,
        /// Why it was rejected.
        reason: String,
    },
}
