//! Configuration schema definitions.
//!
//! Each section deserializes strictly: unknown fields are rejected and missing
//! fields take their defaults.

use keryx_extract::multipart::{DEFAULT_MAX_BODY_SIZE, DEFAULT_MAX_FIELDS, DEFAULT_MAX_FIELD_SIZE};
use keryx_extract::MultipartConfig;
use serde::{Deserialize, Serialize};

/// Parameter binding behaviour.
///
/// # Example
///
/// ```
/// use keryx_config::BindingConfig;
///
/// let config = BindingConfig::default();
/// assert!(config.normalize_header_names);
/// assert!(config.log_rejections);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BindingConfig {
    /// Map `snake_case` parameter names onto `Header-Case` header names.
    #[serde(default = "default_true")]
    pub normalize_header_names: bool,

    /// Log a warning for every request rejected during binding.
    #[serde(default = "default_true")]
    pub log_rejections: bool,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            normalize_header_names: true,
            log_rejections: true,
        }
    }
}

/// Limits applied when reading multipart bodies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MultipartSettings {
    /// Maximum total body size in bytes.
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,

    /// Maximum size of a single part in bytes.
    #[serde(default = "default_max_field_size")]
    pub max_field_size: usize,

    /// Maximum number of parts.
    #[serde(default = "default_max_fields")]
    pub max_fields: usize,
}

impl Default for MultipartSettings {
    fn default() -> Self {
        Self {
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            max_field_size: DEFAULT_MAX_FIELD_SIZE,
            max_fields: DEFAULT_MAX_FIELDS,
        }
    }
}

impl From<&MultipartSettings> for MultipartConfig {
    fn from(settings: &MultipartSettings) -> Self {
        Self::new()
            .max_body_size(settings.max_body_size)
            .max_field_size(settings.max_field_size)
            .max_fields(settings.max_fields)
    }
}

const fn default_max_body_size() -> usize {
    DEFAULT_MAX_BODY_SIZE
}

const fn default_max_field_size() -> usize {
    DEFAULT_MAX_FIELD_SIZE
}

const fn default_max_fields() -> usize {
    DEFAULT_MAX_FIELDS
}

/// Log format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON formatted logs (production).
    #[default]
    Json,
    /// Human-readable pretty format (development).
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingSettings {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Filter directive (trace, debug, info, warn, error, or per-target).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include source file and line in logs.
    #[serde(default)]
    pub include_location: bool,

    /// Service name attached to log output.
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            include_location: false,
            service_name: default_service_name(),
        }
    }
}

impl From<&LoggingSettings> for keryx_telemetry::LogConfig {
    fn from(settings: &LoggingSettings) -> Self {
        let base = match settings.format {
            LogFormat::Json => Self::production(),
            LogFormat::Pretty => Self::development(),
        };

        Self {
            enabled: settings.enabled,
            level: settings.level.clone(),
            file_line_info: settings.include_location,
            service_name: settings.service_name.clone(),
            ..base
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_service_name() -> String {
    "keryx".to_string()
}

const fn default_true() -> bool {
    true
}
