//! Field values, inline errors and the validation rules of the contact form.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use shared::{
    domain::{FormField, SubmissionStatus},
    error::FieldError,
    protocol::ContactSubmission,
};

/// Deliberately minimal `local@domain.tld` shape check. Accepts some invalid
/// addresses and rejects some valid ones; stricter validation is left to the
/// relay.
///
/// U+FEFF counts as whitespace here, as it does for browser-side checks.
static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@\x{FEFF}]+@[^\s@\x{FEFF}]+\.[^\s@\x{FEFF}]+$").expect("valid regex")
});

pub fn is_email_shaped(raw: &str) -> bool {
    EMAIL_SHAPE.is_match(raw)
}

fn is_blank_char(c: char) -> bool {
    c.is_whitespace() || c == '\u{FEFF}'
}

pub fn is_blank(value: &str) -> bool {
    value.trim_matches(is_blank_char).is_empty()
}

/// Applies the rule for one field to its current value.
pub fn check_field(field: FormField, value: &str) -> Result<(), FieldError> {
    if is_blank(value) {
        return Err(FieldError::Required(field));
    }
    if field == FormField::Email && !is_email_shaped(value) {
        return Err(FieldError::InvalidFormat(field));
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormValues {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl FormValues {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Message => &self.message,
        }
    }

    fn slot(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Name => &mut self.name,
            FormField::Email => &mut self.email,
            FormField::Message => &mut self.message,
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        *self.slot(field) = value.into();
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn to_submission(&self) -> ContactSubmission {
        ContactSubmission {
            name: self.name.clone(),
            email: self.email.clone(),
            message: self.message.clone(),
        }
    }
}

/// One inline message per field; an empty string means the field passed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl FormErrors {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Message => &self.message,
        }
    }

    fn slot(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Name => &mut self.name,
            FormField::Email => &mut self.email,
            FormField::Message => &mut self.message,
        }
    }

    pub fn clear_field(&mut self, field: FormField) {
        self.slot(field).clear();
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_clear(&self) -> bool {
        FormField::ALL.iter().all(|field| self.get(*field).is_empty())
    }

    pub fn failing_fields(&self) -> Vec<FormField> {
        FormField::ALL
            .iter()
            .copied()
            .filter(|field| !self.get(*field).is_empty())
            .collect()
    }

    pub fn from_values(values: &FormValues) -> Self {
        let mut errors = Self::default();
        for field in FormField::ALL.iter().copied() {
            if let Err(err) = check_field(field, values.get(field)) {
                *errors.slot(field) = err.to_string();
            }
        }
        errors
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormState {
    pub values: FormValues,
    pub errors: FormErrors,
    pub status: SubmissionStatus,
}

impl FormState {
    /// Overwrites one field and drops its stale inline error. Errors are only
    /// recomputed by [`FormState::validate`].
    pub fn update_field(&mut self, field: FormField, value: impl Into<String>) {
        self.values.set(field, value);
        self.errors.clear_field(field);
    }

    pub fn validate(&mut self) -> bool {
        self.errors = FormErrors::from_values(&self.values);
        self.errors.is_clear()
    }

    pub fn reset_after_success(&mut self) {
        self.values.clear();
        self.errors.clear();
        self.status = SubmissionStatus::Succeeded;
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
