use async_trait::async_trait;
use serde::Deserialize;

use crate::config::IntakeConfig;

use super::domain::{FieldSet, SubmissionOutcome};
use super::schema::FormSchema;

/// Hidden anti-automation field; always sent empty. A non-empty value tells
/// the endpoint the submission came from a bot.
pub const HONEYPOT_FIELD: &str = "botcheck";

const REJECTED_FALLBACK: &str = "The submission was declined by the intake service.";

/// Adapter performing one outbound intake request per call.
///
/// Implementations make a single best-effort attempt and classify the result;
/// retrying is the caller's decision.
#[async_trait]
pub trait IntakeTransport: Send + Sync {
    async fn send(&self, schema: &FormSchema, fields: &FieldSet) -> SubmissionOutcome;
}

/// Flat key/value payload for one submission: the access credential and
/// subject first, then every schema field in declaration order, then the
/// empty honeypot.
pub fn intake_payload(schema: &FormSchema, fields: &FieldSet) -> Vec<(String, String)> {
    let mut payload = Vec::with_capacity(schema.fields.len() + 3);
    payload.push(("access_key".to_string(), schema.access_key.clone()));
    payload.push(("subject".to_string(), schema.subject.clone()));

    for spec in &schema.fields {
        let value = fields
            .get(&spec.name)
            .map(|value| value.wire_text())
            .unwrap_or_default();
        payload.push((spec.name.clone(), value));
    }

    payload.push((HONEYPOT_FIELD.to_string(), String::new()));
    payload
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("failed to build the intake HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Response body the intake endpoint returns for every submission.
#[derive(Debug, Deserialize)]
pub(crate) struct IntakeResponse {
    pub(crate) success: bool,
    #[serde(default)]
    pub(crate) message: Option<String>,
}

pub(crate) fn classify_response(response: IntakeResponse) -> SubmissionOutcome {
    if response.success {
        return SubmissionOutcome::Accepted;
    }

    let reason = response
        .message
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| REJECTED_FALLBACK.to_string());
    SubmissionOutcome::Rejected { reason }
}

/// HTTP client for the Web3Forms-style intake endpoint.
pub struct Web3FormsClient {
    http: reqwest::Client,
    endpoint: String,
}

impl Web3FormsClient {
    /// The client enforces the configured request timeout so a hung endpoint
    /// settles as a transport failure instead of pinning the busy indicator.
    pub fn new(config: &IntakeConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl IntakeTransport for Web3FormsClient {
    async fn send(&self, schema: &FormSchema, fields: &FieldSet) -> SubmissionOutcome {
        let payload = intake_payload(schema, fields);

        let response = match self.http.post(&self.endpoint).form(&payload).send().await {
            Ok(response) => response,
            Err(err) => {
                return SubmissionOutcome::TransportFailure {
                    cause: format!("request failed: {err}"),
                };
            }
        };

        match response.json::<IntakeResponse>().await {
            Ok(body) => classify_response(body),
            Err(err) => SubmissionOutcome::TransportFailure {
                cause: format!("unparseable response: {err}"),
            },
        }
    }
}
