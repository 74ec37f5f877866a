//! AI backends.
//!
//! The lineage logic lives entirely in the backend; this crate only needs a
//! way to send a prompt and get text back. [`AnalysisBackend`] is that seam,
//! so tests and offline replays can swap the live service for a fixed answer.

#[cfg(feature = "gemini")]
mod gemini;

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::LineageError;

#[cfg(feature = "gemini")]
pub use gemini::GeminiBackend;

/// A service that turns a prompt into raw model text.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Sends `prompt` and returns the model's raw text answer.
    async fn analyze(&self, prompt: &str) -> Result<String, LineageError>;

    /// Short name used in logs and the config endpoint.
    fn name(&self) -> &str;
}

/// Backend that answers every prompt with the same text.
///
/// Used for tests and for replaying a saved model response without network
/// access.
#[derive(Debug)]
pub struct StaticBackend {
    response: Result<String, LineageError>,
    calls: AtomicUsize,
}

impl StaticBackend {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: Ok(response.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Backend that fails every call with `error`.
    pub fn failing(error: LineageError) -> Self {
        Self {
            response: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of prompts received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnalysisBackend for StaticBackend {
    async fn analyze(&self, _prompt: &str) -> Result<String, LineageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone()
    }

    fn name(&self) -> &str {
        "replay"
    }
}
