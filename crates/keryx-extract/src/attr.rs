//! Request-scoped attributes.
//!
//! Middleware running ahead of a handler can stash values (an authenticated
//! user, a tenant id, a database handle) on the request under a string key.
//! The `RequestAttr` extractor hands them to the handler unchanged.

use async_trait::async_trait;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::extractor::{Extract, ExtractScope};
use crate::{BoundValue, ExtractionError};

/// String-keyed store of shared, type-erased values.
///
/// # Example
///
/// ```rust
/// use keryx_extract::Attributes;
///
/// let mut attributes = Attributes::new();
/// attributes.insert("user_id", 42_u64);
///
/// assert_eq!(attributes.get_as::<u64>("user_id"), Some(&42));
/// assert_eq!(attributes.get_as::<String>("user_id"), None);
/// ```
#[derive(Clone, Default)]
pub struct Attributes {
    values: HashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl Attributes {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `name`, replacing any previous value.
    pub fn insert<T: Send + Sync + 'static>(&mut self, name: impl Into<String>, value: T) {
        self.values.insert(name.into(), Arc::new(value));
    }

    /// Stores an already shared value under `name`.
    pub fn insert_shared(&mut self, name: impl Into<String>, value: Arc<dyn Any + Send + Sync>) {
        self.values.insert(name.into(), value);
    }

    /// Returns the shared value stored under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Any + Send + Sync>> {
        self.values.get(name)
    }

    /// Returns the value stored under `name` if it has type `T`.
    #[must_use]
    pub fn get_as<T: 'static>(&self, name: &str) -> Option<&T> {
        self.values.get(name).and_then(|v| v.downcast_ref::<T>())
    }

    /// Returns true if `name` is set.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Returns the number of stored values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.values.keys()).finish()
    }
}

/// Resolves `RequestAttr` parameters from the attribute store.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestAttrExtractor;

#[async_trait]
impl Extract for RequestAttrExtractor {
    async fn extract(&self, scope: ExtractScope<'_>) -> Result<Option<BoundValue>, ExtractionError> {
        Ok(scope
            .request
            .attributes()
            .get(scope.key())
            .map(|value| BoundValue::Attr(Arc::clone(value))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExtractSettings, ExtractorKind, RequestContext};

    #[derive(Debug, PartialEq)]
    struct User {
        name: &'static str,
    }

    #[tokio::test]
    async fn test_attr_found() {
        let request = Arc::new(
            RequestContext::builder()
                .attr("user", User { name: "alice" })
                .build(),
        );
        let descriptor = ExtractorKind::RequestAttr.descriptor();

        let value = descriptor
            .extract("user", &request, &ExtractSettings::default())
            .await
            .unwrap()
            .unwrap();

        match value {
            BoundValue::Attr(attr) => {
                assert_eq!(attr.downcast_ref::<User>(), Some(&User { name: "alice" }));
            }
            other => panic!("unexpected value: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_attr_bound_name() {
        let request = Arc::new(RequestContext::builder().attr("tenant_id", 9_u32).build());
        let descriptor = ExtractorKind::RequestAttr.subscript("tenant_id").unwrap();

        let value = descriptor
            .extract("tenant", &request, &ExtractSettings::default())
            .await
            .unwrap();
        assert!(value.is_some());
    }

    #[tokio::test]
    async fn test_attr_missing_is_absent() {
        let request = Arc::new(RequestContext::builder().build());
        let descriptor = ExtractorKind::RequestAttr.descriptor();

        let value = descriptor
            .extract("user", &request, &ExtractSettings::default())
            .await
            .unwrap();
        assert!(value.is_none());
    }
}
