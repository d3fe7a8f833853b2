//! Typed configuration for Wyne.
//!
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict parsing (fails on unknown fields)
//! - Layered loading (defaults → file → env)
//!
//! # Example
//!
//! ```no_run
//! use wyne_config::ConfigLoader;
//!
//! # fn main() -> Result<(), wyne_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_dotenv()?
//!     .with_optional_file("wyne.toml")?
//!     .with_env_prefix("WYNE")
//!     .load()?;
//!
//! println!("routes live under {}", config.dispatch.base_path);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [dispatch]
//! base_path = "/api"
//!
//! [logging]
//! enabled = true
//! level = "info"
//! format = "json"
//! ansi_enabled = false
//! include_location = false
//! ```
//!
//! # Environment Variable Overrides
//!
//! - `WYNE__DISPATCH__BASE_PATH=/v2`
//! - `WYNE__LOGGING__LEVEL=wyne_server=debug,info`
//! - `WYNE__LOGGING__FORMAT=pretty`

#![doc(html_root_url = "https://docs.rs/wyne-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::{WyneConfig, WyneConfigBuilder};
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{DispatchConfig, LogFormat, LoggingConfig};
