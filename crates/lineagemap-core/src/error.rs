//! Error types for lineage requests.
//!
//! Every failure of a request/validate cycle is reported as a [`LineageError`].
//! Nothing is retried or swallowed: callers decide how to present the error,
//! and [`LineageError::code`] gives them a stable identifier to branch on.

use std::time::Duration;

use thiserror::Error;

/// Maximum number of raw response characters kept in a display excerpt.
const RAW_EXCERPT_CHARS: usize = 200;

/// Error produced while building, submitting, or validating a lineage request.
#[derive(Debug, Clone, Error)]
pub enum LineageError {
    /// The submitted source code was empty or whitespace only.
    #[error("Please paste some ETL code or SQL script to analyze")]
    EmptyInput,

    /// Required configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The backend could not be reached or answered with a non-success status.
    #[error("AI backend request failed: {message}")]
    Network {
        message: String,
        /// HTTP status, when the backend answered at all
        status: Option<u16>,
    },

    /// The backend did not answer within the configured bound.
    #[error("AI backend did not respond within {}s", .0.as_secs_f64())]
    Timeout(Duration),

    /// The backend answer was not a JSON document.
    #[error("AI returned malformed JSON: {message}")]
    MalformedResponse {
        message: String,
        /// Unmodified backend text, kept for diagnostics
        raw: String,
    },

    /// The JSON document does not match the lineage schema.
    #[error("AI response failed validation at '{field}': {message}")]
    SchemaValidation { field: String, message: String },

    /// The backend reported that it could not extract lineage.
    #[error("Lineage extraction failed: {0}")]
    ExtractionFailed(String),
}

impl LineageError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            status: None,
        }
    }

    pub fn malformed(message: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
            raw: raw.into(),
        }
    }

    pub fn schema(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SchemaValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyInput => "EMPTY_INPUT",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Network { .. } => "NETWORK_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::MalformedResponse { .. } => "MALFORMED_RESPONSE",
            Self::SchemaValidation { .. } => "SCHEMA_VALIDATION",
            Self::ExtractionFailed(_) => "EXTRACTION_FAILED",
        }
    }

    /// Offending field path for schema validation failures.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::SchemaValidation { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Raw backend text for malformed responses.
    pub fn raw(&self) -> Option<&str> {
        match self {
            Self::MalformedResponse { raw, .. } => Some(raw),
            _ => None,
        }
    }

    /// Leading part of the raw backend text, suitable for one-line messages.
    pub fn raw_excerpt(&self) -> Option<String> {
        self.raw().map(|raw| {
            let mut excerpt: String = raw.chars().take(RAW_EXCERPT_CHARS).collect();
            if raw.chars().count() > RAW_EXCERPT_CHARS {
                excerpt.push_str("...");
            }
            excerpt
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let errors = [
            LineageError::EmptyInput,
            LineageError::Configuration("x".into()),
            LineageError::network("x"),
            LineageError::Timeout(Duration::from_secs(1)),
            LineageError::malformed("x", "y"),
            LineageError::schema("mappings", "x"),
            LineageError::ExtractionFailed("x".into()),
        ];
        let codes: std::collections::HashSet<_> = errors.iter().map(|e| e.code()).collect();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn schema_error_names_field() {
        let err = LineageError::schema("mappings[0].confidence", "7 is outside 1..=5");
        assert_eq!(err.field(), Some("mappings[0].confidence"));
        assert!(err.to_string().contains("mappings[0].confidence"));
    }

    #[test]
    fn raw_excerpt_is_truncated() {
        let raw = "x".repeat(500);
        let err = LineageError::malformed("expected value", raw.clone());
        assert_eq!(err.raw(), Some(raw.as_str()));
        let excerpt = err.raw_excerpt().unwrap();
        assert_eq!(excerpt.len(), RAW_EXCERPT_CHARS + 3);
        assert!(excerpt.ends_with("..."));
    }

    #[test]
    fn timeout_message_mentions_seconds() {
        let err = LineageError::Timeout(Duration::from_secs(30));
        assert_eq!(err.to_string(), "AI backend did not respond within 30s");
    }
}
