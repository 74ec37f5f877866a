//! Request/validate cycle.

use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "tracing")]
use tracing::{debug, info};

use crate::backend::AnalysisBackend;
use crate::config::{LineageConfig, DEFAULT_TIMEOUT};
use crate::error::LineageError;
use crate::parser::parse_response;
use crate::prompt::build_prompt;
use crate::types::{LineageRequest, LineageResult, SourceType};

/// Sends lineage requests to a backend and validates the answers.
///
/// The analyzer holds no per-request state; each call is an independent
/// prompt/call/validate cycle.
#[derive(Clone)]
pub struct LineageAnalyzer {
    backend: Arc<dyn AnalysisBackend>,
    timeout: Duration,
}

impl LineageAnalyzer {
    pub fn new(backend: Arc<dyn AnalysisBackend>) -> Self {
        Self {
            backend,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Analyzer using the timeout from `config`.
    pub fn with_config(backend: Arc<dyn AnalysisBackend>, config: &LineageConfig) -> Self {
        Self::new(backend).with_timeout(config.timeout)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Validates the input, then submits it.
    ///
    /// Blank source code fails with [`LineageError::EmptyInput`] without
    /// contacting the backend.
    pub async fn build_and_submit(
        &self,
        source_code: &str,
        source_type: SourceType,
    ) -> Result<LineageResult, LineageError> {
        let request = LineageRequest::new(source_code, source_type)?;
        self.submit(&request).await
    }

    /// Sends a prepared request and validates the backend answer.
    pub async fn submit(&self, request: &LineageRequest) -> Result<LineageResult, LineageError> {
        let prompt = build_prompt(request);

        #[cfg(feature = "tracing")]
        debug!(
            backend = self.backend.name(),
            source_type = %request.source_type(),
            prompt_len = prompt.len(),
            "submitting lineage request"
        );

        let raw = tokio::time::timeout(self.timeout, self.backend.analyze(&prompt))
            .await
            .map_err(|_| LineageError::Timeout(self.timeout))??;

        let result = parse_response(&raw)?;

        #[cfg(feature = "tracing")]
        info!(
            mappings = result.mappings.len(),
            transformations = result.transformation_summary.len(),
            "lineage response validated"
        );

        Ok(result)
    }
}

impl std::fmt::Debug for LineageAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineageAnalyzer")
            .field("backend", &self.backend.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}
