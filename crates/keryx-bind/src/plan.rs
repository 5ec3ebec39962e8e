//! Resolution plans.
//!
//! A plan is the validated, ordered list of `(parameter, descriptor)` pairs
//! for one handler. It is computed once at registration and read on every
//! request.

use std::collections::HashSet;
use std::fmt;

use keryx_extract::{ConfigurationError, Descriptor};

use crate::signature::Signature;

/// One planned parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedParam {
    name: String,
    descriptor: Descriptor,
}

impl PlannedParam {
    /// Returns the parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the descriptor, with the declared default recorded in it.
    #[must_use]
    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }
}

/// The validated extraction plan for one handler.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionPlan {
    handler: String,
    params: Vec<PlannedParam>,
}

impl ResolutionPlan {
    /// Validates `signature` and builds its plan.
    ///
    /// # Errors
    ///
    /// - [`ConfigurationError::MissingExtractor`] if a parameter has no
    ///   extraction type
    /// - [`ConfigurationError::DuplicateParameter`] if a name is declared twice
    /// - any error carried by an invalid subscript or a default of the wrong
    ///   element type
    pub fn build(signature: &Signature) -> Result<Self, ConfigurationError> {
        let handler = signature.name();
        let mut seen = HashSet::with_capacity(signature.len());
        let mut params = Vec::with_capacity(signature.len());

        for param in signature.params() {
            if !seen.insert(param.name()) {
                return Err(ConfigurationError::DuplicateParameter {
                    handler: handler.to_string(),
                    param: param.name().to_string(),
                });
            }

            let descriptor = match param.extractor() {
                Some(declared) => declared.clone()?,
                None => {
                    return Err(ConfigurationError::MissingExtractor {
                        handler: handler.to_string(),
                        param: param.name().to_string(),
                    })
                }
            };

            let descriptor = match param.default_value() {
                Some(default) => descriptor.with_default(param.name(), default.clone())?,
                None => descriptor,
            };

            params.push(PlannedParam {
                name: param.name().to_string(),
                descriptor,
            });
        }

        Ok(Self {
            handler: handler.to_string(),
            params,
        })
    }

    /// Returns the handler name.
    #[must_use]
    pub fn handler(&self) -> &str {
        &self.handler
    }

    /// Returns the planned parameters in declaration order.
    #[must_use]
    pub fn params(&self) -> &[PlannedParam] {
        &self.params
    }

    /// Looks up the descriptor for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Descriptor> {
        self.params
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.descriptor)
    }

    /// Returns the number of planned parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns true if the handler takes no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl fmt::Display for ResolutionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.handler)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", param.name, param.descriptor)?;
        }
        f.write_str(")")
    }
}
