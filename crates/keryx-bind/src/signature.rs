//! Explicit handler signatures.
//!
//! A [`Signature`] lists a handler's parameters in declaration order, each
//! with its extraction descriptor and optional default.

use keryx_extract::{BoundValue, ConfigurationError, Descriptor, ExtractorKind};

/// Anything that can be declared as a parameter's extraction type.
///
/// Implemented for a bare [`ExtractorKind`], a ready [`Descriptor`], and the
/// `Result` returned by [`ExtractorKind::subscript`], so subscript errors
/// surface when the plan is built rather than at the declaration site.
pub trait IntoDescriptor {
    /// Converts into a descriptor.
    ///
    /// # Errors
    ///
    /// Returns the configuration error carried by an invalid declaration.
    fn into_descriptor(self) -> Result<Descriptor, ConfigurationError>;
}

impl IntoDescriptor for Descriptor {
    fn into_descriptor(self) -> Result<Descriptor, ConfigurationError> {
        Ok(self)
    }
}

impl IntoDescriptor for ExtractorKind {
    fn into_descriptor(self) -> Result<Descriptor, ConfigurationError> {
        Ok(self.descriptor())
    }
}

impl IntoDescriptor for Result<Descriptor, ConfigurationError> {
    fn into_descriptor(self) -> Result<Descriptor, ConfigurationError> {
        self
    }
}

/// One declared handler parameter.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    name: String,
    extractor: Option<Result<Descriptor, ConfigurationError>>,
    default: Option<BoundValue>,
}

impl ParamSpec {
    /// Returns the parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared extraction type, if any.
    #[must_use]
    pub fn extractor(&self) -> Option<&Result<Descriptor, ConfigurationError>> {
        self.extractor.as_ref()
    }

    /// Returns the declared default, if any.
    #[must_use]
    pub fn default_value(&self) -> Option<&BoundValue> {
        self.default.as_ref()
    }
}

/// A handler's declared parameter list.
///
/// # Example
///
/// ```rust
/// use keryx_bind::Signature;
/// use keryx_extract::{ElementType, ExtractorKind};
///
/// let signature = Signature::new("add")
///     .param("a", ExtractorKind::Query.subscript(ElementType::Int))
///     .param_with_default("b", ExtractorKind::Query.subscript(ElementType::Int), 10);
///
/// assert_eq!(signature.name(), "add");
/// assert_eq!(signature.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Signature {
    name: String,
    params: Vec<ParamSpec>,
}

impl Signature {
    /// Starts an empty signature for the handler called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// Declares a parameter without a default.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, extractor: impl IntoDescriptor) -> Self {
        self.params.push(ParamSpec {
            name: name.into(),
            extractor: Some(extractor.into_descriptor()),
            default: None,
        });
        self
    }

    /// Declares a parameter with a default used when the value is absent.
    #[must_use]
    pub fn param_with_default(
        mut self,
        name: impl Into<String>,
        extractor: impl IntoDescriptor,
        default: impl Into<BoundValue>,
    ) -> Self {
        self.params.push(ParamSpec {
            name: name.into(),
            extractor: Some(extractor.into_descriptor()),
            default: Some(default.into()),
        });
        self
    }

    /// Declares a parameter with no extraction type.
    ///
    /// Such a signature cannot be bound; plan construction rejects it.
    #[must_use]
    pub fn untyped(mut self, name: impl Into<String>) -> Self {
        self.params.push(ParamSpec {
            name: name.into(),
            extractor: None,
            default: None,
        });
        self
    }

    /// Returns the handler name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared parameters in order.
    #[must_use]
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Returns the number of declared parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns true if no parameters are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}
