//! The binding engine.
//!
//! Executes a [`ResolutionPlan`] against one request. Parameters are resolved
//! sequentially in declaration order and the first failure aborts the whole
//! binding.

use std::sync::Arc;

use keryx_extract::{BoundValue, ExtractSettings, ExtractionError, RequestContext};
use keryx_telemetry::metrics::{OUTCOME_BOUND, OUTCOME_REJECTED};

use crate::arguments::Arguments;
use crate::plan::ResolutionPlan;

/// Resolves plans into [`Arguments`].
#[derive(Debug, Clone)]
pub struct BindingEngine {
    settings: ExtractSettings,
    log_rejections: bool,
}

impl Default for BindingEngine {
    fn default() -> Self {
        Self::new(ExtractSettings::default())
    }
}

impl BindingEngine {
    /// Creates an engine using `settings` for every extraction.
    #[must_use]
    pub fn new(settings: ExtractSettings) -> Self {
        Self {
            settings,
            log_rejections: true,
        }
    }

    /// Enables or disables the warning logged for rejected requests.
    #[must_use]
    pub fn log_rejections(mut self, enabled: bool) -> Self {
        self.log_rejections = enabled;
        self
    }

    /// Returns the extraction settings.
    #[must_use]
    pub fn settings(&self) -> &ExtractSettings {
        &self.settings
    }

    /// Resolves every parameter of `plan` against `request`.
    ///
    /// An absent value takes the declared default. Without a default, Query
    /// and JSON body parameters fail and every other kind binds null.
    ///
    /// # Errors
    ///
    /// Returns the first [`ExtractionError`] raised, in declaration order.
    pub async fn resolve(
        &self,
        plan: &ResolutionPlan,
        request: &Arc<RequestContext>,
    ) -> Result<Arguments, ExtractionError> {
        let mut args = Arguments::with_capacity(plan.len());

        for param in plan.params() {
            let name = param.name();
            let descriptor = param.descriptor();

            let extracted = match descriptor.extract(name, request, &self.settings).await {
                Ok(value) => value,
                Err(err) => {
                    self.reject(plan, name, descriptor.kind().name(), &err);
                    return Err(err);
                }
            };

            let value = match extracted {
                Some(value) => value,
                None => match descriptor.default_value() {
                    Some(default) => default.clone(),
                    None => match descriptor.absence_error(name) {
                        Some(err) => {
                            self.reject(plan, name, descriptor.kind().name(), &err);
                            return Err(err);
                        }
                        None => BoundValue::Null,
                    },
                },
            };

            args.insert(name, value);
        }

        keryx_telemetry::record_binding(OUTCOME_BOUND);
        tracing::debug!(
            handler = plan.handler(),
            method = %request.method(),
            path = request.path(),
            params = args.len(),
            "request bound"
        );
        Ok(args)
    }

    fn reject(&self, plan: &ResolutionPlan, param: &str, kind: &str, err: &ExtractionError) {
        keryx_telemetry::record_binding(OUTCOME_REJECTED);
        keryx_telemetry::record_binding_failure(kind, err.kind().as_str());

        if self.log_rejections {
            tracing::warn!(
                handler = plan.handler(),
                param,
                kind,
                status = err.status_code().as_u16(),
                error = %err,
                "request rejected during parameter binding"
            );
        }
    }
}
