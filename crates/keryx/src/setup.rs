//! Wiring a [`Binder`] from loaded configuration.

use std::sync::Arc;

use keryx_bind::{Binder, BindingEngine, PlanRegistry};
use keryx_config::{ConfigError, KeryxConfig};
use keryx_telemetry::TelemetryError;

/// Startup failure.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    /// The configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Logging could not be installed.
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}

/// Creates a binder whose engine follows `config`.
///
/// # Example
///
/// ```rust
/// use keryx::config::KeryxConfig;
///
/// let mut config = KeryxConfig::default();
/// config.binding.normalize_header_names = false;
///
/// let binder = keryx::binder(&config);
/// assert!(!binder.engine().settings().normalize_header_names);
/// assert!(binder.registry().is_empty());
/// ```
#[must_use]
pub fn binder(config: &KeryxConfig) -> Binder {
    let engine =
        BindingEngine::new(config.extract_settings()).log_rejections(config.binding.log_rejections);
    Binder::with_engine(Arc::new(PlanRegistry::new()), engine)
}

/// Validates `config`, installs logging and metric descriptions, and returns
/// a binder for registering handlers.
///
/// # Errors
///
/// Returns [`InitError`] if the configuration is invalid or a global
/// subscriber is already installed.
pub fn init(config: &KeryxConfig) -> Result<Binder, InitError> {
    config.validate()?;
    keryx_telemetry::init_telemetry(&config.log_config())?;

    tracing::info!(
        normalize_header_names = config.binding.normalize_header_names,
        max_body_size = config.multipart.max_body_size,
        "keryx initialized"
    );
    Ok(binder(config))
}
