//! Error types for the layout model

use thiserror::Error;

/// Errors that can occur while editing or evaluating the layout model
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    /// Reference to an element that is not in the session
    #[error("undefined element '{id}'")]
    UndefinedElement { id: String },

    /// Constraints that feed back into their own target
    #[error("circular constraint dependency: {}", cycle.join(" -> "))]
    CircularConstraint { cycle: Vec<String> },

    /// A transform needs a positive, finite scale
    #[error("invalid scale {scale}: pixels per unit must be positive and finite")]
    InvalidScale { scale: f64 },

    /// Editor operation issued while no constraint is open
    #[error("no constraint is being edited")]
    NotEditing,
}

impl LayoutError {
    /// Create an undefined element error
    pub fn undefined(id: impl Into<String>) -> Self {
        Self::UndefinedElement { id: id.into() }
    }

    /// Create a circular constraint error
    pub fn circular(cycle: Vec<String>) -> Self {
        Self::CircularConstraint { cycle }
    }
}

/// Errors raised while normalizing wire references
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ReferenceError {
    #[error("unknown attribute '{name}' (valid attributes: {valid})")]
    UnknownAttribute { name: String, valid: String },

    #[error("attribute '{attr}' has no element id")]
    OrphanAttribute { attr: String },

    #[error("expected an element attribute, found {found}")]
    NotAnAttribute { found: String },
}

impl ReferenceError {
    pub fn unknown_attribute(name: impl Into<String>) -> Self {
        let valid = super::types::Attribute::ALL
            .iter()
            .map(|a| a.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        Self::UnknownAttribute {
            name: name.into(),
            valid,
        }
    }
}
