//! Resolved handler arguments.

use std::any::Any;
use std::sync::Arc;

use indexmap::IndexMap;
use keryx_extract::{BoundValue, File, RequestContext};
use thiserror::Error;

/// Errors raised when a handler reads its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    /// The handler asked for a parameter it did not declare.
    #[error("no argument named '{0}'")]
    Unknown(String),

    /// The bound value has a different type than requested.
    #[error("argument '{name}' is {found}, not {expected}")]
    TypeMismatch {
        /// Parameter name.
        name: String,
        /// Requested Rust type.
        expected: &'static str,
        /// Variant actually bound.
        found: &'static str,
    },
}

/// Conversion from a bound value into a concrete Rust type.
pub trait FromBound: Sized {
    /// Human-readable name of the target type, for errors.
    const EXPECTED: &'static str;

    /// Converts `value`, or returns `None` if the variant does not fit.
    fn from_bound(value: &BoundValue) -> Option<Self>;
}

impl FromBound for BoundValue {
    const EXPECTED: &'static str = "value";

    fn from_bound(value: &BoundValue) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromBound for String {
    const EXPECTED: &'static str = "str";

    fn from_bound(value: &BoundValue) -> Option<Self> {
        match value {
            BoundValue::Str(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl FromBound for i64 {
    const EXPECTED: &'static str = "int";

    fn from_bound(value: &BoundValue) -> Option<Self> {
        match value {
            BoundValue::Int(n) => Some(*n),
            _ => None,
        }
    }
}

impl FromBound for f64 {
    const EXPECTED: &'static str = "float";

    #[allow(clippy::cast_precision_loss)]
    fn from_bound(value: &BoundValue) -> Option<Self> {
        match value {
            BoundValue::Float(n) => Some(*n),
            BoundValue::Int(n) => Some(*n as f64),
            _ => None,
        }
    }
}

impl FromBound for bool {
    const EXPECTED: &'static str = "bool";

    fn from_bound(value: &BoundValue) -> Option<Self> {
        match value {
            BoundValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl FromBound for serde_json::Value {
    const EXPECTED: &'static str = "json";

    fn from_bound(value: &BoundValue) -> Option<Self> {
        match value {
            BoundValue::Json(v) => Some(v.clone()),
            BoundValue::Null => Some(Self::Null),
            BoundValue::Str(s) => Some(Self::String(s.clone())),
            BoundValue::Int(n) => Some(Self::from(*n)),
            BoundValue::Float(n) => Some(Self::from(*n)),
            BoundValue::Bool(b) => Some(Self::Bool(*b)),
            _ => None,
        }
    }
}

impl FromBound for File {
    const EXPECTED: &'static str = "file";

    fn from_bound(value: &BoundValue) -> Option<Self> {
        match value {
            BoundValue::File(file) => Some(file.clone()),
            _ => None,
        }
    }
}

impl FromBound for Arc<RequestContext> {
    const EXPECTED: &'static str = "request";

    fn from_bound(value: &BoundValue) -> Option<Self> {
        match value {
            BoundValue::Request(request) => Some(Arc::clone(request)),
            _ => None,
        }
    }
}

impl<T: FromBound> FromBound for Option<T> {
    const EXPECTED: &'static str = T::EXPECTED;

    fn from_bound(value: &BoundValue) -> Option<Self> {
        match value {
            BoundValue::Null => Some(None),
            other => T::from_bound(other).map(Some),
        }
    }
}

/// The arguments resolved for one handler call, keyed by parameter name in
/// declaration order.
///
/// # Example
///
/// ```rust
/// use keryx_bind::Arguments;
/// use keryx_extract::BoundValue;
///
/// let mut args = Arguments::new();
/// args.insert("a", BoundValue::Int(5));
/// args.insert("token", BoundValue::Null);
///
/// assert_eq!(args.get::<i64>("a").unwrap(), 5);
/// assert_eq!(args.get::<Option<String>>("token").unwrap(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: IndexMap<String, BoundValue>,
}

impl Arguments {
    /// Creates an empty argument map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            values: IndexMap::with_capacity(capacity),
        }
    }

    /// Binds `value` to `name`.
    pub fn insert(&mut self, name: impl Into<String>, value: BoundValue) {
        self.values.insert(name.into(), value);
    }

    /// Reads `name` as `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::Unknown`] for an undeclared name and
    /// [`ArgumentError::TypeMismatch`] when the bound value does not convert.
    pub fn get<T: FromBound>(&self, name: &str) -> Result<T, ArgumentError> {
        let value = self
            .values
            .get(name)
            .ok_or_else(|| ArgumentError::Unknown(name.to_string()))?;

        T::from_bound(value).ok_or_else(|| ArgumentError::TypeMismatch {
            name: name.to_string(),
            expected: T::EXPECTED,
            found: value.type_name(),
        })
    }

    /// Returns the raw bound value for `name`.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&BoundValue> {
        self.values.get(name)
    }

    /// Moves the uploaded file out of `name`, leaving null behind.
    ///
    /// Returns `None` if `name` holds no file.
    pub fn take_file(&mut self, name: &str) -> Option<File> {
        let slot = self.values.get_mut(name)?;
        match std::mem::replace(slot, BoundValue::Null) {
            BoundValue::File(file) => Some(file),
            other => {
                *slot = other;
                None
            }
        }
    }

    /// Returns the request bound by a `RawRequest` parameter, if any.
    #[must_use]
    pub fn request(&self) -> Option<Arc<RequestContext>> {
        self.values.values().find_map(|value| match value {
            BoundValue::Request(request) => Some(Arc::clone(request)),
            _ => None,
        })
    }

    /// Returns the attribute bound to `name` if it holds a `T`.
    #[must_use]
    pub fn attr<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        match self.values.get(name)? {
            BoundValue::Attr(value) => Arc::clone(value).downcast::<T>().ok(),
            _ => None,
        }
    }

    /// Iterates over `(name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BoundValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns true if `name` was bound.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Returns the number of bound arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing was bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keryx_extract::File as Upload;
    use serde_json::json;

    #[test]
    fn test_get_scalars() {
        let mut args = Arguments::new();
        args.insert("a", BoundValue::Int(5));
        args.insert("ratio", BoundValue::Float(0.5));
        args.insert("flag", BoundValue::Bool(true));
        args.insert("name", BoundValue::Str("keryx".into()));

        assert_eq!(args.get::<i64>("a").unwrap(), 5);
        assert!((args.get::<f64>("ratio").unwrap() - 0.5).abs() < f64::EPSILON);
        assert!((args.get::<f64>("a").unwrap() - 5.0).abs() < f64::EPSILON);
        assert!(args.get::<bool>("flag").unwrap());
        assert_eq!(args.get::<String>("name").unwrap(), "keryx");
    }

    #[test]
    fn test_get_unknown() {
        let args = Arguments::new();
        assert_eq!(
            args.get::<i64>("missing").unwrap_err(),
            ArgumentError::Unknown("missing".to_string())
        );
    }

    #[test]
    fn test_get_type_mismatch() {
        let mut args = Arguments::new();
        args.insert("a", BoundValue::Str("5".into()));

        let err = args.get::<i64>("a").unwrap_err();
        assert_eq!(err.to_string(), "argument 'a' is str, not int");
    }

    #[test]
    fn test_option_maps_null() {
        let mut args = Arguments::new();
        args.insert("present", BoundValue::Str("v".into()));
        args.insert("absent", BoundValue::Null);

        assert_eq!(
            args.get::<Option<String>>("present").unwrap(),
            Some("v".to_string())
        );
        assert_eq!(args.get::<Option<String>>("absent").unwrap(), None);
        assert!(args.get::<String>("absent").is_err());
    }

    #[test]
    fn test_json_from_scalars() {
        let mut args = Arguments::new();
        args.insert("body", BoundValue::Json(json!({"k": 1})));
        args.insert("fallback", BoundValue::Int(3));

        assert_eq!(args.get::<serde_json::Value>("body").unwrap(), json!({"k": 1}));
        assert_eq!(args.get::<serde_json::Value>("fallback").unwrap(), json!(3));
    }

    #[test]
    fn test_take_file() {
        let mut args = Arguments::new();
        args.insert(
            "upload",
            BoundValue::File(Upload::new(
                "upload",
                Some("a.txt".into()),
                "hello",
                http::HeaderMap::new(),
            )),
        );
        args.insert("other", BoundValue::Int(1));

        let file = args.take_file("upload").unwrap();
        assert_eq!(file.filename(), Some("a.txt"));
        assert_eq!(args.value("upload"), Some(&BoundValue::Null));

        assert!(args.take_file("other").is_none());
        assert_eq!(args.value("other"), Some(&BoundValue::Int(1)));
    }

    #[test]
    fn test_attr_downcast() {
        #[derive(Debug, PartialEq)]
        struct User(u32);

        let mut args = Arguments::new();
        args.insert("user", BoundValue::Attr(Arc::new(User(7))));

        assert_eq!(args.attr::<User>("user").as_deref(), Some(&User(7)));
        assert!(args.attr::<String>("user").is_none());
        assert!(args.attr::<User>("missing").is_none());
    }

    #[test]
    fn test_request() {
        let request = Arc::new(RequestContext::builder().build());
        let mut args = Arguments::new();
        args.insert("a", BoundValue::Int(1));
        args.insert("request", BoundValue::Request(Arc::clone(&request)));

        assert!(Arc::ptr_eq(&args.request().unwrap(), &request));
    }

    #[test]
    fn test_iteration_order() {
        let mut args = Arguments::with_capacity(2);
        args.insert("b", BoundValue::Int(2));
        args.insert("a", BoundValue::Int(1));

        let names: Vec<_> = args.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["b", "a"]);
        assert_eq!(args.len(), 2);
    }
}
