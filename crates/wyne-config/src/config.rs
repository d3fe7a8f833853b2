//! Main configuration types.
//!
//! This module provides the top-level [`WyneConfig`] struct and its builder.

use serde::{Deserialize, Serialize};
use wyne_router::BasePath;

use crate::{ConfigError, DispatchConfig, LogFormat, LoggingConfig};

/// Complete Wyne configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load configuration from files
/// and environment variables.
///
/// # Example
///
/// ```
/// use wyne_config::WyneConfig;
///
/// let config = WyneConfig::default();
/// assert_eq!(config.dispatch.base_path, "/");
/// assert_eq!(config.logging.level, "info");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct WyneConfig {
    /// Dispatch configuration.
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl WyneConfig {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```
    /// use wyne_config::{DispatchConfig, WyneConfig};
    ///
    /// let config = WyneConfig::builder()
    ///     .dispatch(DispatchConfig {
    ///         base_path: "/api".to_string(),
    ///     })
    ///     .build();
    ///
    /// assert_eq!(config.dispatch.base_path, "/api");
    /// ```
    #[must_use]
    pub fn builder() -> WyneConfigBuilder {
        WyneConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - The base path does not start with `/`
    /// - The base path is not a valid regular-expression fragment
    /// - The log level is not a valid filter directive
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_path = &self.dispatch.base_path;
        if !base_path.starts_with('/') {
            return Err(ConfigError::InvalidValue {
                field: "dispatch.base_path".to_string(),
                reason: format!("must start with '/': {base_path}"),
            });
        }
        if let Err(err) = BasePath::new(base_path.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "dispatch.base_path".to_string(),
                reason: err.to_string(),
            });
        }

        if let Err(err) = wyne_telemetry::create_env_filter(&self.logging.level) {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                reason: err.to_string(),
            });
        }

        Ok(())
    }

    /// Create a development configuration preset.
    ///
    /// - Pretty log formatting with ANSI colors
    /// - Debug log level with source locations
    ///
    /// # Example
    ///
    /// ```
    /// use wyne_config::WyneConfig;
    ///
    /// let config = WyneConfig::development();
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();

        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config.logging.ansi_enabled = true;
        config.logging.include_location = true;

        config
    }

    /// Create a production configuration preset.
    ///
    /// # Example
    ///
    /// ```
    /// use wyne_config::WyneConfig;
    ///
    /// let config = WyneConfig::production();
    /// assert_eq!(config.logging.format, wyne_config::LogFormat::Json);
    /// ```
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();

        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;
        config.logging.ansi_enabled = false;

        config
    }
}

/// Builder for [`WyneConfig`].
#[derive(Debug, Default)]
pub struct WyneConfigBuilder {
    dispatch: Option<DispatchConfig>,
    logging: Option<LoggingConfig>,
}

impl WyneConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dispatch configuration.
    #[must_use]
    pub fn dispatch(mut self, dispatch: DispatchConfig) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    /// Set the logging configuration.
    #[must_use]
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Build the configuration.
    ///
    /// Any unset sections will use their default values.
    #[must_use]
    pub fn build(self) -> WyneConfig {
        WyneConfig {
            dispatch: self.dispatch.unwrap_or_default(),
            logging: self.logging.unwrap_or_default(),
        }
    }
}
