//! Binding metrics.
//!
//! Counters are emitted through the `metrics` facade. Without an installed
//! recorder every call is a no-op.
//!
//! | Metric | Type | Labels |
//! |--------|------|--------|
//! | `keryx_bindings_total` | Counter | `outcome` |
//! | `keryx_binding_failures_total` | Counter | `kind`, `reason` |
//! | `keryx_plans_built_total` | Counter | - |

use metrics::{counter, describe_counter};

/// Counter of bound requests, labeled by outcome.
pub const BINDINGS_TOTAL: &str = "keryx_bindings_total";

/// Counter of rejected requests, labeled by extractor kind and reason.
pub const BINDING_FAILURES_TOTAL: &str = "keryx_binding_failures_total";

/// Counter of resolution plans computed.
pub const PLANS_BUILT_TOTAL: &str = "keryx_plans_built_total";

/// Outcome label for a request whose arguments were all resolved.
pub const OUTCOME_BOUND: &str = "bound";

/// Outcome label for a request rejected before the handler ran.
pub const OUTCOME_REJECTED: &str = "rejected";

/// Registers descriptions for all binding metrics.
pub fn describe_metrics() {
    describe_counter!(BINDINGS_TOTAL, "Total number of requests bound, by outcome");
    describe_counter!(
        BINDING_FAILURES_TOTAL,
        "Total binding failures by extractor kind and reason"
    );
    describe_counter!(PLANS_BUILT_TOTAL, "Total resolution plans computed");
}

/// Records the outcome of binding one request.
pub fn record_binding(outcome: &'static str) {
    counter!(BINDINGS_TOTAL, "outcome" => outcome).increment(1);
}

/// Records a binding failure.
///
/// # Arguments
///
/// * `kind` - Extractor kind that failed (e.g., "Query")
/// * `reason` - Failure class (e.g., "missing_required")
pub fn record_binding_failure(kind: &str, reason: &str) {
    counter!(
        BINDING_FAILURES_TOTAL,
        "kind" => kind.to_string(),
        "reason" => reason.to_string()
    )
    .increment(1);
}

/// Records that a resolution plan was computed.
pub fn record_plan_built() {
    counter!(PLANS_BUILT_TOTAL).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder_is_noop() {
        describe_metrics();
        record_binding(OUTCOME_BOUND);
        record_binding(OUTCOME_REJECTED);
        record_binding_failure("Query", "missing_required");
        record_plan_built();
    }

    #[test]
    fn test_metric_names() {
        assert!(BINDINGS_TOTAL.starts_with("keryx_"));
        assert!(BINDING_FAILURES_TOTAL.ends_with("_total"));
        assert_eq!(PLANS_BUILT_TOTAL, "keryx_plans_built_total");
    }
}
