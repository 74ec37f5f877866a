//! Google Gemini backend.
//!
//! Calls `models/{model}:generateContent` with JSON output mode and a response
//! schema mirroring the lineage wire shape. The credential travels in the
//! `x-goog-api-key` header so it never appears in URLs or logs.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
#[cfg(feature = "tracing")]
use tracing::debug;

use super::AnalysisBackend;
use crate::config::{ApiKey, LineageConfig};
use crate::error::LineageError;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const ERROR_BODY_CHARS: usize = 300;

/// Gemini `generateContent` client.
#[derive(Debug, Clone)]
pub struct GeminiBackend {
    client: Client,
    base_url: String,
    model: String,
    api_key: ApiKey,
    timeout: Duration,
}

impl GeminiBackend {
    /// Builds a backend from configuration.
    ///
    /// Fails with [`LineageError::Configuration`] when no API key is configured,
    /// so a missing credential is reported at startup rather than on first use.
    pub fn from_config(config: &LineageConfig) -> Result<Self, LineageError> {
        let api_key = config.require_api_key()?.clone();
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(config.timeout))
            .build()
            .map_err(|e| LineageError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            timeout: config.timeout,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// JSON request body for a prompt.
    pub fn request_body(prompt: &str) -> Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }],
            "generationConfig": {
                "temperature": 0,
                "responseMimeType": "application/json",
                "responseSchema": response_schema()
            }
        })
    }

    /// Extracts the model text from a `generateContent` response body.
    pub fn extract_text(body: &str) -> Result<String, LineageError> {
        let envelope: Value = serde_json::from_str(body).map_err(|e| {
            LineageError::malformed(format!("Invalid JSON envelope from Gemini API: {e}"), body)
        })?;

        let candidate = envelope["candidates"]
            .as_array()
            .and_then(|candidates| candidates.first());

        let Some(candidate) = candidate else {
            let message = match envelope["promptFeedback"]["blockReason"].as_str() {
                Some(reason) => format!("request was blocked by the Gemini safety policy ({reason})"),
                None => "Gemini API returned no candidates".to_string(),
            };
            return Err(LineageError::malformed(message, body));
        };

        let text: String = candidate["content"]["parts"]
            .as_array()
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|part| part["text"].as_str())
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            let reason = candidate["finishReason"].as_str().unwrap_or("UNKNOWN");
            return Err(LineageError::malformed(
                format!("Gemini API returned an empty answer (finish reason {reason})"),
                body,
            ));
        }

        Ok(text)
    }

    fn map_transport_error(&self, err: reqwest::Error) -> LineageError {
        if err.is_timeout() {
            LineageError::Timeout(self.timeout)
        } else {
            LineageError::network(format!("Request to Gemini API failed: {err}"))
        }
    }
}

/// Gemini response schema for the lineage wire shape.
fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "mappings": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "source_column": { "type": "STRING" },
                        "target_column": { "type": "STRING" },
                        "transformation": { "type": "STRING" },
                        "confidence": { "type": "INTEGER" }
                    },
                    "required": ["source_column", "target_column", "transformation", "confidence"]
                }
            },
            "transformation_summary": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            },
            "error": { "type": "STRING" }
        },
        "required": ["mappings", "transformation_summary"]
    })
}

#[async_trait]
impl AnalysisBackend for GeminiBackend {
    async fn analyze(&self, prompt: &str) -> Result<String, LineageError> {
        let url = self.endpoint_url();

        #[cfg(feature = "tracing")]
        debug!(
            model = self.model.as_str(),
            prompt_len = prompt.len(),
            "Sending Gemini lineage request"
        );

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .header("x-goog-api-key", self.api_key.expose())
            .json(&Self::request_body(prompt))
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !status.is_success() {
            let excerpt: String = body.chars().take(ERROR_BODY_CHARS).collect();
            return Err(LineageError::Network {
                message: format!("HTTP {status} from Gemini API: {excerpt}"),
                status: Some(status.as_u16()),
            });
        }

        Self::extract_text(&body)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
