use thiserror::Error;

use crate::domain::FormField;

/// Why a single contact form field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{} is required.", .0.label())]
    Required(FormField),
    #[error("Enter a valid {}.", .0.as_str())]
    InvalidFormat(FormField),
}

impl FieldError {
    pub fn field(&self) -> FormField {
        match self {
            FieldError::Required(field) | FieldError::InvalidFormat(field) => *field,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}
