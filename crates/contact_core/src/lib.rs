use std::sync::Arc;

use serde::Serialize;
use shared::{
    domain::{FormField, SubmissionStatus},
    protocol::RelayReceipt,
};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

pub mod error;
pub mod form;
pub mod relay;

pub use error::{SubmissionError, GENERIC_FAILURE_MESSAGE};
pub use form::{check_field, is_blank, is_email_shaped, FormErrors, FormState, FormValues};
pub use relay::{FormRelay, HttpFormRelay, DEFAULT_RELAY_ENDPOINT};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The relay answered 2xx; the form has been reset.
    Sent(RelayReceipt),
    /// At least one field failed validation; nothing was sent.
    Invalid(Vec<FormField>),
    /// A submission is already in flight; the attempt was ignored.
    InFlight,
}

/// Point-in-time copy of the form for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSnapshot {
    pub values: FormValues,
    pub errors: FormErrors,
    pub status: SubmissionStatus,
}

impl FormSnapshot {
    pub fn can_submit(&self) -> bool {
        !self.status.is_in_flight()
    }
}

/// Owns the contact form state and drives submissions through a [`FormRelay`].
///
/// Cloning yields another handle onto the same form. The state lock is never
/// held across the relay request, so edits stay possible while a submission
/// is in flight.
#[derive(Clone)]
pub struct ContactFormController {
    inner: Arc<Mutex<FormState>>,
    relay: Arc<dyn FormRelay>,
    diagnostics: bool,
}

impl ContactFormController {
    pub fn new(relay: Arc<dyn FormRelay>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(FormState::default())),
            relay,
            diagnostics: false,
        }
    }

    pub fn over_http(endpoint: &str) -> Result<Self, SubmissionError> {
        Ok(Self::new(Arc::new(HttpFormRelay::new(endpoint)?)))
    }

    /// In diagnostics mode the underlying cause of a failed submission is
    /// logged; otherwise only the generic outcome is visible.
    pub fn with_diagnostics(mut self, diagnostics: bool) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub async fn update_field(&self, field: FormField, value: impl Into<String>) {
        self.inner.lock().await.update_field(field, value);
    }

    pub async fn validate(&self) -> bool {
        self.inner.lock().await.validate()
    }

    pub async fn status(&self) -> SubmissionStatus {
        self.inner.lock().await.status
    }

    pub async fn can_submit(&self) -> bool {
        !self.status().await.is_in_flight()
    }

    pub async fn field_error(&self, field: FormField) -> String {
        self.inner.lock().await.errors.get(field).to_string()
    }

    pub async fn snapshot(&self) -> FormSnapshot {
        let state = self.inner.lock().await;
        FormSnapshot {
            values: state.values.clone(),
            errors: state.errors.clone(),
            status: state.status,
        }
    }

    /// Dismisses the success or failure notice and returns the form to `Idle`.
    pub async fn acknowledge(&self) {
        let mut state = self.inner.lock().await;
        if state.status.is_terminal() {
            state.status = SubmissionStatus::Idle;
        }
    }

    pub async fn submit(&self) -> Result<SubmitOutcome, SubmissionError> {
        let submission = {
            let mut state = self.inner.lock().await;
            if state.status.is_in_flight() {
                debug!("ignoring submit while a submission is in flight");
                return Ok(SubmitOutcome::InFlight);
            }

            let previous = state.status;
            state.status = SubmissionStatus::Validating;
            if !state.validate() {
                state.status = previous;
                let failing = state.errors.failing_fields();
                info!(failing = ?failing, "contact form failed validation");
                return Ok(SubmitOutcome::Invalid(failing));
            }

            state.status = SubmissionStatus::Submitting;
            state.values.to_submission()
        };

        let delivered = self.relay.deliver(&submission).await;

        let mut state = self.inner.lock().await;
        match delivered {
            Ok(receipt) => {
                state.reset_after_success();
                info!("contact form submission accepted by relay");
                Ok(SubmitOutcome::Sent(receipt))
            }
            Err(err) => {
                state.status = SubmissionStatus::Failed;
                if self.diagnostics {
                    error!(error = %err, status = ?err.status(), "form submission error");
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
