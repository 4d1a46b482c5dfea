//! Wire shapes exchanged with the hosted form relay.

use serde::{Deserialize, Serialize};

use crate::domain::FormField;

/// The three values posted to the relay as multipart form fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactSubmission {
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Message => &self.message,
        }
    }

    /// Field name/value pairs in posting order.
    pub fn fields(&self) -> impl Iterator<Item = (FormField, &str)> {
        FormField::ALL
            .iter()
            .map(move |field| (*field, self.value(*field)))
    }
}

/// Body the relay answers with on a 2xx.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayReceipt {
    #[serde(default = "accepted")]
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

fn accepted() -> bool {
    true
}

impl RelayReceipt {
    /// Receipt used when a 2xx carries no parseable body.
    pub fn accepted() -> Self {
        Self {
            ok: true,
            next: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayFieldError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub message: String,
}

/// Body the relay answers with when it refuses a submission.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RelayErrorBody {
    #[serde(default)]
    pub errors: Vec<RelayFieldError>,
}

impl RelayErrorBody {
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|err| match &err.field {
                Some(field) => format!("{field}: {}", err.message),
                None => err.message.clone(),
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
