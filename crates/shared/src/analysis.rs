//! Request and outcome types exchanged with the analysis server.

use serde::{Deserialize, Serialize};

use crate::settings::Configuration;

/// What the user asked to analyze. Page analysis sends text, link analysis sends a URL;
/// holding exactly one of them is enforced by the enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisInput {
    Text(String),
    Url(String),
}

impl AnalysisInput {
    pub fn text(&self) -> Option<&str> {
        match self {
            AnalysisInput::Text(text) => Some(text),
            AnalysisInput::Url(_) => None,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            AnalysisInput::Text(_) => None,
            AnalysisInput::Url(url) => Some(url),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisInput::Text(_) => "text",
            AnalysisInput::Url(_) => "url",
        }
    }
}

/// Which configuration fields travel with the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PayloadFields {
    /// Only the key and the input; the server applies its own model defaults.
    Minimal,
    /// Key, input, and the model options from the configuration.
    #[default]
    Full,
}

/// Body of `POST /analyze`. `text` and `url` are always serialized, the unused one as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub api_key: String,
    pub text: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "llm_model", skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    #[serde(rename = "llm_model_provider", skip_serializing_if = "Option::is_none")]
    pub model_provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(rename = "free_tier", skip_serializing_if = "Option::is_none")]
    pub free_tier_enabled: Option<bool>,
    #[serde(rename = "free_tier_rpm_limit", skip_serializing_if = "Option::is_none")]
    pub requests_per_minute_limit: Option<u32>,
}

impl AnalysisRequest {
    pub fn new(config: &Configuration, input: &AnalysisInput, fields: PayloadFields) -> Self {
        let mut request = Self {
            api_key: config.api_key.clone(),
            text: input.text().map(str::to_string),
            url: input.url().map(str::to_string),
            model_name: None,
            model_provider: None,
            temperature: None,
            free_tier_enabled: None,
            requests_per_minute_limit: None,
        };
        if fields == PayloadFields::Full {
            request.model_name = Some(config.model_name.clone());
            request.model_provider = Some(config.model_provider.clone());
            request.temperature = Some(config.temperature);
            request.free_tier_enabled = Some(config.free_tier_enabled);
            request.requests_per_minute_limit = Some(config.requests_per_minute_limit);
        }
        request
    }
}

/// Normalized result of one analysis request, independent of HTTP status codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    /// Markdown report produced by the server.
    Success(String),
    /// Human-readable failure message. Always displayed as plain text.
    Failure(String),
}

impl AnalysisOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, AnalysisOutcome::Failure(_))
    }

    pub fn text(&self) -> &str {
        match self {
            AnalysisOutcome::Success(text) | AnalysisOutcome::Failure(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            AnalysisOutcome::Success(text) | AnalysisOutcome::Failure(text) => text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> Configuration {
        Configuration {
            api_key: "key-123".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_text_input_sends_null_url() {
        let request = AnalysisRequest::new(
            &config(),
            &AnalysisInput::Text("Hello world".into()),
            PayloadFields::Minimal,
        );
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({"api_key": "key-123", "text": "Hello world", "url": null})
        );
    }

    #[test]
    fn test_url_input_with_full_payload() {
        let request = AnalysisRequest::new(
            &config(),
            &AnalysisInput::Url("https://example.com/terms".into()),
            PayloadFields::Full,
        );
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["text"], serde_json::Value::Null);
        assert_eq!(body["url"], "https://example.com/terms");
        assert_eq!(body["llm_model"], "gemini-2.0-flash");
        assert_eq!(body["llm_model_provider"], "Gemini");
        assert_eq!(body["temperature"], 0.4);
        assert_eq!(body["free_tier"], true);
        assert_eq!(body["free_tier_rpm_limit"], 15);
    }

    #[test]
    fn test_outcome_accessors() {
        let ok = AnalysisOutcome::Success("# Report".into());
        let err = AnalysisOutcome::Failure("Server Error".into());
        assert!(!ok.is_error());
        assert!(err.is_error());
        assert_eq!(ok.text(), "# Report");
        assert_eq!(err.into_text(), "Server Error");
    }
}
