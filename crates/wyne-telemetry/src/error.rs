//! Telemetry error types.

use thiserror::Error;

/// Errors that can occur while setting up telemetry.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Failed to initialize logging.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// A filter directive did not parse.
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter {
        /// The rejected filter string.
        filter: String,
        /// Parser message.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TelemetryError::LoggingInit("already set".to_string());
        assert_eq!(err.to_string(), "Failed to initialize logging: already set");
    }

    #[test]
    fn test_invalid_filter_display() {
        let err = TelemetryError::InvalidFilter {
            filter: "x=loud".to_string(),
            reason: "invalid level".to_string(),
        };
        assert!(err.to_string().contains("x=loud"));
    }
}
