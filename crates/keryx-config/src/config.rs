//! Main configuration types.
//!
//! This module provides the top-level [`KeryxConfig`] struct and its builder.

use keryx_extract::ExtractSettings;
use keryx_telemetry::LogConfig;
use serde::{Deserialize, Serialize};

use crate::{BindingConfig, ConfigError, LogFormat, LoggingSettings, MultipartSettings};

/// Complete Keryx configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// # Example
///
/// ```
/// use keryx_config::KeryxConfig;
///
/// let config = KeryxConfig::default();
/// assert!(config.binding.normalize_header_names);
/// assert_eq!(config.multipart.max_fields, 100);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct KeryxConfig {
    /// Parameter binding behaviour.
    #[serde(default)]
    pub binding: BindingConfig,

    /// Multipart reading limits.
    #[serde(default)]
    pub multipart: MultipartSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl KeryxConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> KeryxConfigBuilder {
        KeryxConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - a multipart limit is zero
    /// - the per-field limit exceeds the body limit
    /// - the log level is not a valid filter directive
    pub fn validate(&self) -> Result<(), ConfigError> {
        let multipart = &self.multipart;

        if multipart.max_body_size == 0 {
            return Err(ConfigError::invalid_value(
                "multipart.max_body_size",
                "must be greater than zero",
            ));
        }

        if multipart.max_field_size == 0 {
            return Err(ConfigError::invalid_value(
                "multipart.max_field_size",
                "must be greater than zero",
            ));
        }

        if multipart.max_field_size > multipart.max_body_size {
            return Err(ConfigError::invalid_value(
                "multipart.max_field_size",
                format!(
                    "{} exceeds multipart.max_body_size ({})",
                    multipart.max_field_size, multipart.max_body_size
                ),
            ));
        }

        if multipart.max_fields == 0 {
            return Err(ConfigError::invalid_value(
                "multipart.max_fields",
                "must be greater than zero",
            ));
        }

        if let Err(e) = keryx_telemetry::create_env_filter(&self.logging.level) {
            return Err(ConfigError::invalid_value("logging.level", e.to_string()));
        }

        Ok(())
    }

    /// Create a development configuration preset.
    ///
    /// Pretty debug-level logs with source locations.
    ///
    /// # Example
    ///
    /// ```
    /// use keryx_config::KeryxConfig;
    ///
    /// let config = KeryxConfig::development();
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config.logging.include_location = true;
        config
    }

    /// Create a production configuration preset.
    ///
    /// JSON info-level logs.
    ///
    /// # Example
    ///
    /// ```
    /// use keryx_config::{KeryxConfig, LogFormat};
    ///
    /// let config = KeryxConfig::production();
    /// assert_eq!(config.logging.format, LogFormat::Json);
    /// ```
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();
        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;
        config.logging.include_location = false;
        config
    }

    /// Returns the extraction settings described by this configuration.
    #[must_use]
    pub fn extract_settings(&self) -> ExtractSettings {
        ExtractSettings {
            normalize_header_names: self.binding.normalize_header_names,
            multipart: (&self.multipart).into(),
        }
    }

    /// Returns the logging configuration described by this configuration.
    #[must_use]
    pub fn log_config(&self) -> LogConfig {
        (&self.logging).into()
    }
}

/// Builder for [`KeryxConfig`].
#[derive(Debug, Default)]
pub struct KeryxConfigBuilder {
    binding: Option<BindingConfig>,
    multipart: Option<MultipartSettings>,
    logging: Option<LoggingSettings>,
}

impl KeryxConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the binding configuration.
    #[must_use]
    pub fn binding(mut self, binding: BindingConfig) -> Self {
        self.binding = Some(binding);
        self
    }

    /// Set the multipart limits.
    #[must_use]
    pub fn multipart(mut self, multipart: MultipartSettings) -> Self {
        self.multipart = Some(multipart);
        self
    }

    /// Set the logging configuration.
    #[must_use]
    pub fn logging(mut self, logging: LoggingSettings) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Build the configuration.
    ///
    /// Any unset sections use their default values.
    #[must_use]
    pub fn build(self) -> KeryxConfig {
        KeryxConfig {
            binding: self.binding.unwrap_or_default(),
            multipart: self.multipart.unwrap_or_default(),
            logging: self.logging.unwrap_or_default(),
        }
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails.
    pub fn build_validated(self) -> Result<KeryxConfig, ConfigError> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}
