//! HTTP client for the analysis server's `/analyze` endpoint.
//!
//! Every request ends in an [`AnalysisOutcome`]: transport faults, non-2xx statuses and
//! malformed bodies are folded into `Failure` with a single readable message.

use reqwest::Client;
use serde_json::Value;
use shared::analysis::{AnalysisInput, AnalysisOutcome, AnalysisRequest, PayloadFields};
use shared::settings::Configuration;
use thiserror::Error;
use tracing::{debug, warn};

/// Server used when no other base URL is given. Set `AGREEMENT_LENS_SERVER_URL` at build time
/// to point a build at a different deployment.
pub const DEFAULT_SERVER_URL: &str = match option_env!("AGREEMENT_LENS_SERVER_URL") {
    Some(url) => url,
    None => "http://127.0.0.1:8000",
};

const FALLBACK_ERROR: &str = "Server Error";

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Detail reported by the server, already normalized to a string.
    #[error("{0}")]
    Server(String),
    #[error("Network error: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("Invalid server response: {0}")]
    Decode(String),
    #[error("Server response did not include a result")]
    MissingResult,
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

pub struct AnalysisClient {
    http: Client,
    base_url: String,
    payload_fields: PayloadFields,
}

impl AnalysisClient {
    pub fn new(base_url: &str, payload_fields: PayloadFields) -> Result<Self, AnalysisError> {
        let http = Client::builder()
            .user_agent(concat!("agreement-lens/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(AnalysisError::Client)?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            payload_fields,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn payload_fields(&self) -> PayloadFields {
        self.payload_fields
    }

    /// Send one analysis request. Never fails; errors become `AnalysisOutcome::Failure`.
    pub async fn analyze(&self, config: &Configuration, input: &AnalysisInput) -> AnalysisOutcome {
        match self.try_analyze(config, input).await {
            Ok(result) => AnalysisOutcome::Success(result),
            Err(e) => {
                warn!(error = %e, "analysis failed");
                AnalysisOutcome::Failure(e.to_string())
            }
        }
    }

    async fn try_analyze(
        &self,
        config: &Configuration,
        input: &AnalysisInput,
    ) -> Result<String, AnalysisError> {
        let url = format!("{}/analyze", self.base_url);
        let request = AnalysisRequest::new(config, input, self.payload_fields);
        debug!(
            has_key = if config.has_api_key() { "yes" } else { "no" },
            server = %self.base_url,
            input = input.kind(),
            "sending analysis request"
        );

        let resp = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(AnalysisError::Transport)?;
        let status = resp.status();
        let bytes = resp.bytes().await.map_err(AnalysisError::Transport)?;

        if !status.is_success() {
            let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
            debug!(%status, "analysis server returned an error status");
            return Err(AnalysisError::Server(normalize_detail(&body)));
        }

        let body: Value =
            serde_json::from_slice(&bytes).map_err(|e| AnalysisError::Decode(e.to_string()))?;
        match body.get("result") {
            Some(Value::String(result)) => Ok(result.clone()),
            Some(Value::Null) | None => Err(AnalysisError::MissingResult),
            Some(other) => Ok(other.to_string()),
        }
    }

    /// Call `GET /` and return the server's reported status line.
    pub async fn status(&self) -> Result<String, AnalysisError> {
        let url = format!("{}/", self.base_url);
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(AnalysisError::Transport)?;
        let status = resp.status();
        let bytes = resp.bytes().await.map_err(AnalysisError::Transport)?;
        let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        if !status.is_success() {
            return Err(AnalysisError::Server(normalize_detail(&body)));
        }
        body.get("status")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| AnalysisError::Decode("missing \"status\" field".to_string()))
    }
}

/// Turn the `detail` field of an error body into one message.
///
/// Strings pass through, objects and arrays are serialized as JSON, and a missing or empty
/// detail becomes "Server Error".
pub fn normalize_detail(body: &Value) -> String {
    match body.get("detail") {
        Some(Value::String(detail)) if !detail.is_empty() => detail.clone(),
        Some(detail @ (Value::Object(_) | Value::Array(_))) => detail.to_string(),
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => n.to_string(),
        Some(Value::Bool(true)) => "true".to_string(),
        // `null`, `false`, `0` and `""` count as no detail at all.
        _ => FALLBACK_ERROR.to_string(),
    }
}
