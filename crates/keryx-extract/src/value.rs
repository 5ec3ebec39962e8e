//! Values produced by extraction.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::context::RequestContext;
use crate::multipart::File;

/// A value bound to one handler parameter.
///
/// Extractors only ever produce the variant matching their kind: headers,
/// cookies and unconverted path/query values are [`BoundValue::Str`], a
/// JSON body is [`BoundValue::Json`], and so on. [`BoundValue::Null`] is the
/// binding for an absent optional value.
#[derive(Clone)]
pub enum BoundValue {
    /// No value.
    Null,
    /// A string value.
    Str(String),
    /// An integer value.
    Int(i64),
    /// A float value.
    Float(f64),
    /// A boolean value.
    Bool(bool),
    /// A parsed JSON document.
    Json(serde_json::Value),
    /// An uploaded file.
    File(File),
    /// An entry from the request attribute store.
    Attr(Arc<dyn Any + Send + Sync>),
    /// The request itself.
    Request(Arc<RequestContext>),
}

impl BoundValue {
    /// Returns true for [`BoundValue::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns a short name for the variant, used in diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Str(_) => "str",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
            Self::Json(_) => "json",
            Self::File(_) => "file",
            Self::Attr(_) => "attribute",
            Self::Request(_) => "request",
        }
    }
}

impl fmt::Debug for BoundValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "Null"),
            Self::Str(v) => f.debug_tuple("Str").field(v).finish(),
            Self::Int(v) => f.debug_tuple("Int").field(v).finish(),
            Self::Float(v) => f.debug_tuple("Float").field(v).finish(),
            Self::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Self::Json(v) => f.debug_tuple("Json").field(v).finish(),
            Self::File(v) => f.debug_tuple("File").field(v).finish(),
            Self::Attr(_) => f.debug_tuple("Attr").finish_non_exhaustive(),
            Self::Request(v) => f
                .debug_tuple("Request")
                .field(&format_args!("{} {}", v.method(), v.uri()))
                .finish(),
        }
    }
}

impl PartialEq for BoundValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Json(a), Self::Json(b)) => a == b,
            (Self::File(a), Self::File(b)) => a == b,
            (Self::Attr(a), Self::Attr(b)) => Arc::ptr_eq(a, b),
            (Self::Request(a), Self::Request(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<String> for BoundValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&str> for BoundValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<i64> for BoundValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for BoundValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for BoundValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for BoundValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<serde_json::Value> for BoundValue {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

impl From<File> for BoundValue {
    fn from(value: File) -> Self {
        Self::File(value)
    }
}

impl<T: Into<BoundValue>> From<Option<T>> for BoundValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
