//! Delivery of a validated submission to the hosted form relay.

use async_trait::async_trait;
use reqwest::{header::ACCEPT, multipart::Form, Client};
use shared::protocol::{ContactSubmission, RelayErrorBody, RelayReceipt};
use tracing::debug;
use url::Url;

use crate::error::SubmissionError;

pub const DEFAULT_RELAY_ENDPOINT: &str = "https://formspree.io/f/meozlqpg";

#[async_trait]
pub trait FormRelay: Send + Sync {
    async fn deliver(&self, submission: &ContactSubmission)
        -> Result<RelayReceipt, SubmissionError>;
}

/// Posts submissions as multipart form data. One request per call; no retry
/// and no timeout beyond the client's defaults.
#[derive(Debug, Clone)]
pub struct HttpFormRelay {
    http: Client,
    endpoint: Url,
}

impl HttpFormRelay {
    pub fn new(endpoint: &str) -> Result<Self, SubmissionError> {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(http: Client, endpoint: &str) -> Result<Self, SubmissionError> {
        Ok(Self {
            http,
            endpoint: parse_endpoint(endpoint)?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

pub fn parse_endpoint(raw: &str) -> Result<Url, SubmissionError> {
    let invalid = |reason: String| SubmissionError::InvalidEndpoint {
        endpoint: raw.to_string(),
        reason,
    };
    let endpoint = Url::parse(raw.trim()).map_err(|err| invalid(err.to_string()))?;
    match endpoint.scheme() {
        "http" | "https" => Ok(endpoint),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}

#[async_trait]
impl FormRelay for HttpFormRelay {
    async fn deliver(
        &self,
        submission: &ContactSubmission,
    ) -> Result<RelayReceipt, SubmissionError> {
        let form = submission
            .fields()
            .fold(Form::new(), |form, (field, value)| {
                form.text(field.as_str(), value.to_string())
            });

        let response = self
            .http
            .post(self.endpoint.clone())
            .header(ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<RelayErrorBody>(&body)
                .map(|parsed| parsed.summary())
                .ok()
                .filter(|summary| !summary.is_empty())
                .unwrap_or(body);
            return Err(SubmissionError::Rejected {
                status: status.as_u16(),
                detail,
            });
        }

        // A 2xx is success whatever happens to the body.
        let receipt = match response.bytes().await {
            Ok(body) => serde_json::from_slice::<RelayReceipt>(&body).unwrap_or_else(|err| {
                debug!(error = %err, "relay accepted submission with unparseable body");
                RelayReceipt::accepted()
            }),
            Err(err) => {
                debug!(error = %err, "relay accepted submission but body read failed");
                RelayReceipt::accepted()
            }
        };
        Ok(receipt)
    }
}
