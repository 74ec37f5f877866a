//! Shared test backends.

#![allow(dead_code)]

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use lineagemap_core::{AnalysisBackend, LineageError};

/// Canned answer for `SELECT a + b AS total FROM t`.
pub const SUM_RESPONSE: &str = r#"{
  "mappings": [
    {"source_column": "a", "target_column": "total", "transformation": "SUM", "confidence": 5},
    {"source_column": "b", "target_column": "total", "transformation": "SUM", "confidence": 5}
  ],
  "transformation_summary": ["SUM"]
}"#;

/// Backend that remembers every prompt it was given.
#[derive(Default)]
pub struct RecordingBackend {
    response: String,
    prompts: Mutex<Vec<String>>,
}

impl RecordingBackend {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnalysisBackend for RecordingBackend {
    async fn analyze(&self, prompt: &str) -> Result<String, LineageError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.response.clone())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Backend that sleeps before answering.
pub struct SlowBackend {
    pub delay: Duration,
}

#[async_trait]
impl AnalysisBackend for SlowBackend {
    async fn analyze(&self, _prompt: &str) -> Result<String, LineageError> {
        tokio::time::sleep(self.delay).await;
        Ok(SUM_RESPONSE.to_string())
    }

    fn name(&self) -> &str {
        "slow"
    }
}
