//! Prompt endpoint client

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use url::Url;

use crate::core::config::Config;
use crate::core::form::FormState;
use crate::error::{BugpromptError, Result};

/// Successful endpoint response
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResponse {
    /// The generated prompt text
    pub prompt: String,
    /// Server-side request identifier
    #[serde(default)]
    pub request_id: Option<String>,
    /// Which of the server's file writes succeeded
    #[serde(default)]
    pub write_status: BTreeMap<String, bool>,
}

impl ProcessResponse {
    /// A response carrying only the prompt
    pub fn with_prompt(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            request_id: None,
            write_status: BTreeMap::new(),
        }
    }

    /// Names of server-side writes that failed
    pub fn failed_writes(&self) -> Vec<&str> {
        self.write_status
            .iter()
            .filter(|(_, ok)| !**ok)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// Body of a non-success response
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    missing: Vec<String>,
}

/// HTTP client for the prompt endpoint
#[derive(Debug, Clone)]
pub struct PromptClient {
    client: Client,
    endpoint: Url,
}

impl PromptClient {
    /// Create a client for `endpoint` with a per-request timeout
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let endpoint = Url::parse(endpoint)?;
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, endpoint })
    }

    /// Create a client from the loaded configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.endpoint, config.request_timeout())
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// POST the form and decode the prompt.
    ///
    /// A transport failure surfaces as `BugpromptError::Network`, a non-2xx
    /// status as `BugpromptError::Rejected`.
    pub async fn process(&self, form: &FormState) -> Result<ProcessResponse> {
        tracing::debug!(endpoint = %self.endpoint, "Posting form");

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        let parsed = interpret_response(status, &body)?;
        tracing::info!(
            request_id = parsed.request_id.as_deref().unwrap_or("-"),
            prompt_len = parsed.prompt.len(),
            "Prompt received"
        );
        let failed = parsed.failed_writes();
        if !failed.is_empty() {
            tracing::warn!(?failed, "Server could not write some files");
        }
        Ok(parsed)
    }
}

/// Map a status and raw body to the endpoint outcome
fn interpret_response(status: StatusCode, body: &[u8]) -> Result<ProcessResponse> {
    if !status.is_success() {
        let error_body: ErrorBody = serde_json::from_slice(body).unwrap_or_default();
        if !error_body.missing.is_empty() {
            tracing::warn!(missing = ?error_body.missing, "Server reported missing fields");
        }
        return Err(BugpromptError::Rejected {
            status: status.as_u16(),
            message: error_body.error,
        });
    }

    serde_json::from_slice(body).map_err(|e| BugpromptError::MalformedResponse(e.to_string()))
}
