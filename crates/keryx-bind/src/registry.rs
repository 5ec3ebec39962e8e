//! The plan cache.
//!
//! Plans are keyed by handler identity: the Rust type of the handler plus
//! the name it was registered under. The registry is owned by the
//! application, populated during registration and read while serving.

use std::any::{type_name, TypeId};
use std::fmt;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use keryx_extract::ConfigurationError;

use crate::plan::ResolutionPlan;
use crate::signature::Signature;

/// Identity of a registered handler.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HandlerId {
    type_id: TypeId,
    type_name: &'static str,
    name: String,
}

impl HandlerId {
    /// Creates the identity of handler type `H` registered as `name`.
    #[must_use]
    pub fn of<H: ?Sized + 'static>(name: impl Into<String>) -> Self {
        Self {
            type_id: TypeId::of::<H>(),
            type_name: type_name::<H>(),
            name: name.into(),
        }
    }

    /// Returns the registered name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the Rust type name of the handler.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.type_name)
    }
}

/// Shared cache of resolution plans.
///
/// # Example
///
/// ```rust
/// use keryx_bind::{HandlerId, PlanRegistry, Signature};
/// use keryx_extract::ExtractorKind;
/// use std::sync::Arc;
///
/// struct Greet;
///
/// let registry = PlanRegistry::new();
/// let signature = Signature::new("greet").param("name", ExtractorKind::Cookie);
///
/// let first = registry.plan_for(HandlerId::of::<Greet>("greet"), &signature).unwrap();
/// let second = registry.plan_for(HandlerId::of::<Greet>("greet"), &signature).unwrap();
/// assert!(Arc::ptr_eq(&first, &second));
/// ```
#[derive(Debug, Default)]
pub struct PlanRegistry {
    plans: DashMap<HandlerId, Arc<ResolutionPlan>>,
}

impl PlanRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the plan for `id`, building it from `signature` on first use.
    ///
    /// Later calls for the same identity return the cached plan as long as
    /// `signature` plans to the same parameters. A failed build caches
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigurationError`] raised by plan construction, or
    /// [`ConfigurationError::ConflictingRegistration`] if `id` is already
    /// cached with a different plan.
    pub fn plan_for(
        &self,
        id: HandlerId,
        signature: &Signature,
    ) -> Result<Arc<ResolutionPlan>, ConfigurationError> {
        let plan = ResolutionPlan::build(signature)?;

        if let Some(cached) = self.plans.get(&id) {
            return reuse(&id, cached.value(), &plan);
        }

        // Concurrent builders race here; the first insert wins.
        match self.plans.entry(id) {
            Entry::Occupied(entry) => reuse(entry.key(), entry.get(), &plan),
            Entry::Vacant(entry) => {
                keryx_telemetry::record_plan_built();
                tracing::debug!(handler = %entry.key(), plan = %plan, "built resolution plan");
                Ok(Arc::clone(entry.insert(Arc::new(plan)).value()))
            }
        }
    }

    /// Returns the cached plan for `id`, if any.
    #[must_use]
    pub fn get(&self, id: &HandlerId) -> Option<Arc<ResolutionPlan>> {
        self.plans.get(id).map(|plan| Arc::clone(plan.value()))
    }

    /// Returns true if a plan is cached for `id`.
    #[must_use]
    pub fn contains(&self, id: &HandlerId) -> bool {
        self.plans.contains_key(id)
    }

    /// Returns the number of cached plans.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plans.len()
    }

    /// Returns true if no plans are cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

fn reuse(
    id: &HandlerId,
    cached: &Arc<ResolutionPlan>,
    plan: &ResolutionPlan,
) -> Result<Arc<ResolutionPlan>, ConfigurationError> {
    if cached.as_ref() != plan {
        tracing::warn!(handler = %id, cached = %cached, rejected = %plan, "conflicting registration");
        return Err(ConfigurationError::ConflictingRegistration {
            handler: id.name().to_string(),
        });
    }

    tracing::debug!(handler = %id, "reusing cached resolution plan");
    Ok(Arc::clone(cached))
}
