//! Named task parameters.
//!
//! A `NamedParam` is the unit of parameterization shared by every pipeline
//! builder: a name, an optional default, and an optional human description.
//! Identity is by name: two instances with the same name are the same
//! logical parameter, and the task assembly in `task.rs` deduplicates them
//! under that rule. Instances are never mutated after construction; builders
//! either create fresh ones per call or clone the shared module-level
//! defaults in `tasks::mod`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedParam {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NamedParam {
    /// A parameter with no default. Callers of the rendered task must
    /// supply a value at execution time.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
            description: None,
        }
    }

    /// A parameter with a default value.
    pub fn with_default(name: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: Some(default.into()),
            description: None,
        }
    }

    /// Attach a human description. Chainable on either constructor.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
