//! Layered configuration loading.
//!
//! [`ConfigLoader`] applies sources in order, later ones winning:
//! defaults, then a file or string, then prefixed environment variables.

use std::env;
use std::fs;
use std::path::Path;

use crate::{ConfigError, LogFormat, WyneConfig};

/// Configuration loader with layered approach.
///
/// # Example
///
/// ```no_run
/// use wyne_config::ConfigLoader;
///
/// # fn main() -> Result<(), wyne_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_defaults()
///     .with_optional_file("wyne.toml")?
///     .with_env_prefix("WYNE")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config: WyneConfig,
    env_prefix: Option<String>,
}

impl ConfigLoader {
    /// Create a new configuration loader seeded with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to default configuration values.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.config = WyneConfig::default();
        self
    }

    /// Start from the development preset.
    ///
    /// # Example
    ///
    /// ```
    /// use wyne_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new().with_development().load().unwrap();
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = WyneConfig::development();
        self
    }

    /// Start from the production preset.
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = WyneConfig::production();
        self
    }

    /// Load configuration from a file.
    ///
    /// The format is chosen by extension: `.toml` or `.json`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is missing, unreadable, has an
    /// unsupported extension, or does not parse (unknown fields included).
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        self.config = Self::parse_file(&content, path)?;
        Ok(self)
    }

    /// Load configuration from a file if it exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be loaded.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load configuration from a string in the given format (`toml` or `json`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the format is unsupported or parsing fails.
    ///
    /// # Example
    ///
    /// ```
    /// use wyne_config::ConfigLoader;
    ///
    /// let toml = r#"
    ///     [dispatch]
    ///     base_path = "/api"
    /// "#;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string(toml, "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.dispatch.base_path, "/api");
    /// ```
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.config = match format.to_lowercase().as_str() {
            "toml" => toml::from_str(content)?,
            "json" => serde_json::from_str(content)?,
            _ => return Err(ConfigError::UnsupportedFormat(format.to_string())),
        };
        Ok(self)
    }

    /// Set the environment variable prefix for overrides.
    ///
    /// Variables use the form `PREFIX__SECTION__KEY`, e.g.
    /// `WYNE__DISPATCH__BASE_PATH=/api` or `WYNE__LOGGING__LEVEL=debug`.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Load a `.env` file from the current directory, if there is one.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a `.env` file exists but is malformed.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(err) if err.not_found() => Ok(self),
            Err(err) => Err(err.into()),
        }
    }

    /// Apply environment overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an environment value does not parse or the
    /// final configuration is invalid.
    pub fn load(mut self) -> Result<WyneConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            self.apply_env_overrides(&prefix)?;
        }

        self.config.validate()?;

        Ok(self.config)
    }

    /// Return the configuration without environment overrides or validation.
    #[must_use]
    pub fn load_unvalidated(self) -> WyneConfig {
        self.config
    }

    fn parse_file(content: &str, path: &Path) -> Result<WyneConfig, ConfigError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("toml") => Ok(toml::from_str(content)?),
            Some("json") => Ok(serde_json::from_str(content)?),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError> {
        let mut vars: Vec<(String, String)> = env::vars()
            .filter(|(k, _)| k.starts_with(prefix))
            .collect();
        vars.sort();

        for (key, value) in vars {
            self.apply_env_var(&key, &value, prefix)?;
        }

        Ok(())
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        let Some(rest) = key.strip_prefix(prefix).and_then(|k| k.strip_prefix("__")) else {
            // Shares the prefix but belongs to someone else, e.g. WYNEX_HOME.
            return Ok(());
        };

        let parts: Vec<&str> = rest.split("__").collect();

        match parts.as_slice() {
            ["DISPATCH", "BASE_PATH"] => {
                self.config.dispatch.base_path = value.to_string();
            }

            ["LOGGING", "ENABLED"] => {
                self.config.logging.enabled = parse_bool(value)
                    .ok_or_else(|| env_error(key, "expected boolean"))?;
            }
            ["LOGGING", "LEVEL"] => {
                self.config.logging.level = value.to_string();
            }
            ["LOGGING", "FORMAT"] => {
                self.config.logging.format = match value.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    _ => {
                        return Err(env_error(key, "expected 'json' or 'pretty'"))
                    }
                };
            }
            ["LOGGING", "ANSI_ENABLED"] => {
                self.config.logging.ansi_enabled = parse_bool(value)
                    .ok_or_else(|| env_error(key, "expected boolean"))?;
            }
            ["LOGGING", "INCLUDE_LOCATION"] => {
                self.config.logging.include_location = parse_bool(value)
                    .ok_or_else(|| env_error(key, "expected boolean"))?;
            }

            _ => {}
        }

        Ok(())
    }
}

fn env_error(var: &str, expected: &'static str) -> ConfigError {
    ConfigError::EnvVar {
        var: var.to_string(),
        expected,
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_loader_defaults() {
        let config = ConfigLoader::new().load().unwrap();
        assert_eq!(config, WyneConfig::default());
    }

    #[test]
    fn test_loader_with_production() {
        let config = ConfigLoader::new().with_production().load().unwrap();
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_loader_with_string_json() {
        let json = r#"{"dispatch": {"base_path": "/v1"}, "logging": {"level": "warn"}}"#;
        let config = ConfigLoader::new()
            .with_string(json, "json")
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config.dispatch.base_path, "/v1");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_loader_rejects_unknown_section() {
        let result = ConfigLoader::new().with_string("[server]\nport = 80\n", "toml");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_loader_rejects_unknown_format() {
        let result = ConfigLoader::new().with_string("base_path: /", "yaml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_loader_with_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[dispatch]\nbase_path = \"/api\"\n\n[logging]\nformat = \"pretty\"").unwrap();

        let config = ConfigLoader::new().with_file(file.path()).unwrap().load().unwrap();
        assert_eq!(config.dispatch.base_path, "/api");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_loader_with_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        let result = ConfigLoader::new().with_file(file.path());
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_loader_with_file_not_found() {
        let result = ConfigLoader::new().with_file("/nonexistent/wyne.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_loader_with_optional_file_not_found() {
        let config = ConfigLoader::new()
            .with_optional_file("/nonexistent/wyne.toml")
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(config.dispatch.base_path, "/");
    }

    #[test]
    fn test_load_validates() {
        let result = ConfigLoader::new()
            .with_string(r#"{"dispatch": {"base_path": "api"}}"#, "json")
            .unwrap()
            .load();
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_load_unvalidated() {
        let config = ConfigLoader::new()
            .with_string(r#"{"dispatch": {"base_path": "api"}}"#, "json")
            .unwrap()
            .load_unvalidated();
        assert_eq!(config.dispatch.base_path, "api");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("on"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("No"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_bool(""), None);
    }

    // Process env is shared across parallel tests; overrides are applied directly.

    #[test]
    fn test_apply_env_var_dispatch() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TEST__DISPATCH__BASE_PATH", "/v2", "TEST").unwrap();
        assert_eq!(loader.config.dispatch.base_path, "/v2");
    }

    #[test]
    fn test_apply_env_var_logging() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TEST__LOGGING__LEVEL", "debug", "TEST").unwrap();
        loader.apply_env_var("TEST__LOGGING__FORMAT", "Pretty", "TEST").unwrap();
        loader.apply_env_var("TEST__LOGGING__INCLUDE_LOCATION", "yes", "TEST").unwrap();
        loader.apply_env_var("TEST__LOGGING__ENABLED", "off", "TEST").unwrap();

        assert_eq!(loader.config.logging.level, "debug");
        assert_eq!(loader.config.logging.format, LogFormat::Pretty);
        assert!(loader.config.logging.include_location);
        assert!(!loader.config.logging.enabled);
    }

    #[test]
    fn test_apply_env_var_invalid_boolean() {
        let mut loader = ConfigLoader::new();
        let result = loader.apply_env_var("TEST__LOGGING__ANSI_ENABLED", "sometimes", "TEST");
        assert!(matches!(result, Err(ConfigError::EnvVar { .. })));
    }

    #[test]
    fn test_apply_env_var_ignores_unknown_keys() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TEST__SERVER__PORT", "80", "TEST").unwrap();
        loader.apply_env_var("TESTING_HOME", "/tmp", "TEST").unwrap();
        assert_eq!(loader.config, WyneConfig::default());
    }
}
