//! Observability for Keryx.
//!
//! Two concerns live here:
//!
//! - **Logging**: structured output through `tracing-subscriber`, JSON in
//!   production and pretty-printed in development
//! - **Metrics**: binding counters recorded through the `metrics` facade;
//!   whichever recorder the host application installs receives them
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `keryx_bindings_total` | Counter | `outcome` | Bound requests by outcome |
//! | `keryx_binding_failures_total` | Counter | `kind`, `reason` | Rejected requests |
//! | `keryx_plans_built_total` | Counter | - | Resolution plans computed |
//!
//! # Example
//!
//! ```rust,ignore
//! use keryx_telemetry::{init_telemetry, LogConfig};
//!
//! init_telemetry(&LogConfig::development())?;
//! tracing::info!(handler = "add", "handler registered");
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig};
pub use metrics::{describe_metrics, record_binding, record_binding_failure, record_plan_built};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Initializes logging and registers metric descriptions.
///
/// # Errors
///
/// Returns `TelemetryError` if the logging subscriber cannot be installed.
pub fn init_telemetry(config: &LogConfig) -> TelemetryResult<()> {
    init_logging(config)?;
    describe_metrics();
    Ok(())
}
