use thiserror::Error;

/// Copy shown to the visitor for every failed submission, whatever the cause.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Try again.";

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("form relay request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("form relay rejected submission with status {status}: {detail}")]
    Rejected { status: u16, detail: String },
    #[error("invalid form relay endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}

impl SubmissionError {
    /// The cause is never distinguished for the visitor.
    pub fn user_message(&self) -> &'static str {
        GENERIC_FAILURE_MESSAGE
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            SubmissionError::Rejected { status, .. } => Some(*status),
            SubmissionError::Transport(err) => err.status().map(|status| status.as_u16()),
            SubmissionError::InvalidEndpoint { .. } => None,
        }
    }
}
