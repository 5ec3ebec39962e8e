//! Typed configuration for Keryx.
//!
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//!
//! # Example
//!
//! ```no_run
//! use keryx_config::ConfigLoader;
//!
//! # fn main() -> Result<(), keryx_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_file("keryx.toml")?
//!     .with_env_prefix("KERYX")
//!     .load()?;
//!
//! let settings = config.extract_settings();
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [binding]
//! normalize_header_names = true
//! log_rejections = true
//!
//! [multipart]
//! max_body_size = 52428800
//! max_field_size = 10485760
//! max_fields = 100
//!
//! [logging]
//! enabled = true
//! level = "info"
//! format = "json"
//! ```
//!
//! # Environment Variable Overrides
//!
//! Values are overridden with variables named `PREFIX__SECTION__KEY`:
//!
//! - `KERYX__BINDING__LOG_REJECTIONS=false`
//! - `KERYX__MULTIPART__MAX_FIELDS=20`
//! - `KERYX__LOGGING__LEVEL=keryx_bind=debug`

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::{KeryxConfig, KeryxConfigBuilder};
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{BindingConfig, LogFormat, LoggingSettings, MultipartSettings};
