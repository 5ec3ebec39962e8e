//! Extractor kinds and parameter descriptors.
//!
//! A [`Descriptor`] is the immutable record of one declared binding point:
//! which [`ExtractorKind`] resolves it, the lookup key to use instead of the
//! parameter's own name, the [`ElementType`] to convert to, and the default
//! to fall back on when the request carries no value.
//!
//! Descriptors are built with [`ExtractorKind::subscript`], which accepts the
//! same three input forms everywhere:
//!
//! ```rust
//! use keryx_extract::{ElementType, ExtractorKind};
//!
//! // A name alone sets the lookup key.
//! let header = ExtractorKind::Header.subscript("X-Custom").unwrap();
//! assert_eq!(header.bound_name(), Some("X-Custom"));
//!
//! // A type alone sets the element type.
//! let page = ExtractorKind::Query.subscript(ElementType::Int).unwrap();
//! assert_eq!(page.element_type(), Some(ElementType::Int));
//!
//! // A pair sets both, positionally.
//! let id = ExtractorKind::Path.subscript(("id", ElementType::Int)).unwrap();
//! assert_eq!(id.to_string(), "Path(name: id, type: int)");
//! ```

use std::fmt;

use crate::error::{ConfigurationError, ExtractionError, ExtractionSource};
use crate::value::BoundValue;

/// Scalar conversion target for path and query values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// Signed 64-bit integer.
    Int,
    /// 64-bit float.
    Float,
    /// Boolean (`true/false`, `1/0`, `yes/no`, `on/off`).
    Bool,
    /// String, kept verbatim.
    Str,
}

impl ElementType {
    /// Returns the type name used in error messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Str => "str",
        }
    }

    /// Converts a raw string into this type.
    ///
    /// Returns `None` if the value cannot be represented.
    #[must_use]
    pub fn cast(&self, raw: &str) -> Option<BoundValue> {
        match self {
            Self::Int => raw.trim().parse().ok().map(BoundValue::Int),
            Self::Float => raw.trim().parse().ok().map(BoundValue::Float),
            Self::Bool => parse_bool(raw).map(BoundValue::Bool),
            Self::Str => Some(BoundValue::Str(raw.to_string())),
        }
    }

    /// Returns true if `value` already has this type.
    #[must_use]
    pub fn accepts(&self, value: &BoundValue) -> bool {
        matches!(
            (self, value),
            (_, BoundValue::Null)
                | (Self::Int, BoundValue::Int(_))
                | (Self::Float, BoundValue::Float(_) | BoundValue::Int(_))
                | (Self::Bool, BoundValue::Bool(_))
                | (Self::Str, BoundValue::Str(_))
        )
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// The closed set of extraction kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractorKind {
    /// A request header, looked up case-insensitively.
    Header,
    /// A cookie from the `Cookie` header.
    Cookie,
    /// A route match parameter.
    Path,
    /// A query string argument.
    Query,
    /// The whole request body parsed as JSON.
    JsonBody,
    /// A value from the request-scoped attribute store.
    RequestAttr,
    /// A file part of a `multipart/form-data` body.
    File,
    /// The request itself.
    RawRequest,
}

impl ExtractorKind {
    /// All kinds, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Header,
        Self::Cookie,
        Self::Path,
        Self::Query,
        Self::JsonBody,
        Self::RequestAttr,
        Self::File,
        Self::RawRequest,
    ];

    /// Returns the marker name of this kind.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Header => "Header",
            Self::Cookie => "Cookie",
            Self::Path => "Path",
            Self::Query => "Query",
            Self::JsonBody => "JSONBody",
            Self::RequestAttr => "RequestAttr",
            Self::File => "File",
            Self::RawRequest => "RawRequest",
        }
    }

    /// Returns where this kind reads from, if it reads from the request at all.
    #[must_use]
    pub const fn source(&self) -> Option<ExtractionSource> {
        match self {
            Self::Header => Some(ExtractionSource::Header),
            Self::Cookie => Some(ExtractionSource::Cookie),
            Self::Path => Some(ExtractionSource::Path),
            Self::Query => Some(ExtractionSource::Query),
            Self::JsonBody => Some(ExtractionSource::Body),
            Self::RequestAttr => Some(ExtractionSource::Attribute),
            Self::File => Some(ExtractionSource::File),
            Self::RawRequest => None,
        }
    }

    /// Returns true if this kind casts values to an element type.
    #[must_use]
    pub const fn converts(&self) -> bool {
        matches!(self, Self::Path | Self::Query)
    }

    /// Returns true if absence without a default is a client error.
    #[must_use]
    pub const fn requires_value(&self) -> bool {
        matches!(self, Self::Query | Self::JsonBody)
    }

    /// Returns true if the kind looks values up by name.
    #[must_use]
    pub const fn is_keyed(&self) -> bool {
        !matches!(self, Self::JsonBody | Self::RawRequest)
    }

    /// Builds a descriptor with neither a bound name nor an element type.
    #[must_use]
    pub fn descriptor(self) -> Descriptor {
        Descriptor {
            kind: self,
            bound_name: None,
            element_type: None,
            default: None,
        }
    }

    /// Builds a descriptor from a subscript.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidSubscript`] for any form other
    /// than a name, a type, or a `(name, type)` pair, and
    /// [`ConfigurationError::UnsupportedElementType`] when a type is given to
    /// a kind that performs no conversion.
    pub fn subscript(self, subscript: impl Into<Subscript>) -> Result<Descriptor, ConfigurationError> {
        let (bound_name, element_type) = subscript.into().parse(self)?;

        if let Some(element) = element_type {
            if !self.converts() {
                return Err(ConfigurationError::UnsupportedElementType {
                    kind: self.name().to_string(),
                    element,
                });
            }
        }

        Ok(Descriptor {
            kind: self,
            bound_name,
            element_type,
            default: None,
        })
    }
}

impl fmt::Display for ExtractorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One positional item of a [`Subscript::Items`] list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptItem {
    /// A bound name.
    Name(String),
    /// An element type.
    Type(ElementType),
}

impl From<&str> for SubscriptItem {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<ElementType> for SubscriptItem {
    fn from(element: ElementType) -> Self {
        Self::Type(element)
    }
}

/// The input forms accepted by [`ExtractorKind::subscript`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subscript {
    /// Sets the bound name.
    Name(String),
    /// Sets the element type.
    Type(ElementType),
    /// Sets both.
    Pair(String, ElementType),
    /// A positional list, validated when parsed.
    Items(Vec<SubscriptItem>),
}

impl Subscript {
    fn parse(
        self,
        kind: ExtractorKind,
    ) -> Result<(Option<String>, Option<ElementType>), ConfigurationError> {
        let invalid = |reason: &str| ConfigurationError::InvalidSubscript {
            kind: kind.name().to_string(),
            reason: reason.to_string(),
        };

        match self {
            Self::Name(name) if name.is_empty() => Err(invalid("bound name must not be empty")),
            Self::Name(name) => Ok((Some(name), None)),
            Self::Type(element) => Ok((None, Some(element))),
            Self::Pair(name, _) if name.is_empty() => Err(invalid("bound name must not be empty")),
            Self::Pair(name, element) => Ok((Some(name), Some(element))),
            Self::Items(items) => match <[SubscriptItem; 1]>::try_from(items) {
                Ok([SubscriptItem::Name(name)]) => Self::Name(name).parse(kind),
                Ok([SubscriptItem::Type(element)]) => Ok((None, Some(element))),
                Err(items) => match <[SubscriptItem; 2]>::try_from(items) {
                    Ok([SubscriptItem::Name(name), SubscriptItem::Type(element)]) => {
                        Self::Pair(name, element).parse(kind)
                    }
                    Ok(_) => Err(invalid("expected (name, type) in that order")),
                    Err(items) => Err(invalid(&format!(
                        "expected one or two items, got {}",
                        items.len()
                    ))),
                },
            },
        }
    }
}

impl From<&str> for Subscript {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for Subscript {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<ElementType> for Subscript {
    fn from(element: ElementType) -> Self {
        Self::Type(element)
    }
}

impl From<(&str, ElementType)> for Subscript {
    fn from((name, element): (&str, ElementType)) -> Self {
        Self::Pair(name.to_string(), element)
    }
}

impl From<(String, ElementType)> for Subscript {
    fn from((name, element): (String, ElementType)) -> Self {
        Self::Pair(name, element)
    }
}

impl From<Vec<SubscriptItem>> for Subscript {
    fn from(items: Vec<SubscriptItem>) -> Self {
        Self::Items(items)
    }
}

/// Immutable configuration for one declared parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    kind: ExtractorKind,
    bound_name: Option<String>,
    element_type: Option<ElementType>,
    default: Option<BoundValue>,
}

impl Descriptor {
    /// Returns the extractor kind.
    #[must_use]
    pub fn kind(&self) -> ExtractorKind {
        self.kind
    }

    /// Returns the explicit lookup key, if one was declared.
    #[must_use]
    pub fn bound_name(&self) -> Option<&str> {
        self.bound_name.as_deref()
    }

    /// Returns the element type, if one was declared.
    #[must_use]
    pub fn element_type(&self) -> Option<ElementType> {
        self.element_type
    }

    /// Returns the declared default.
    #[must_use]
    pub fn default_value(&self) -> Option<&BoundValue> {
        self.default.as_ref()
    }

    /// Returns true if a default was declared.
    #[must_use]
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Returns the key to look up: the bound name, or else `param`.
    #[must_use]
    pub fn lookup_key<'a>(&'a self, param: &'a str) -> &'a str {
        self.bound_name.as_deref().unwrap_or(param)
    }

    /// Returns a copy of this descriptor carrying `default`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::DefaultTypeMismatch`] if the default
    /// does not have the declared element type.
    pub fn with_default(
        &self,
        param: &str,
        default: BoundValue,
    ) -> Result<Self, ConfigurationError> {
        if let Some(expected) = self.element_type {
            if !expected.accepts(&default) {
                return Err(ConfigurationError::DefaultTypeMismatch {
                    param: param.to_string(),
                    expected,
                });
            }
        }

        Ok(Self {
            default: Some(default),
            ..self.clone()
        })
    }

    /// Returns the error to raise when this parameter is absent and has no
    /// default, or `None` if absence binds null.
    #[must_use]
    pub fn absence_error(&self, param: &str) -> Option<ExtractionError> {
        match self.kind {
            ExtractorKind::Query => Some(ExtractionError::missing(
                ExtractionSource::Query,
                self.lookup_key(param),
            )),
            ExtractorKind::JsonBody => Some(ExtractionError::missing_body()),
            _ => None,
        }
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}(name: {}, type: {})",
            self.kind,
            self.bound_name.as_deref().unwrap_or("None"),
            self.element_type.map_or("None", |t| t.name())
        )
    }
}
