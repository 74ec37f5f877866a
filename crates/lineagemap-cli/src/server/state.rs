//! Shared application state for the server.
//!
//! Serve mode is a single local session: one analyzer, one in-flight guard and
//! one slot holding the latest result. State is shared across handlers via `Arc`.

use lineagemap_core::{LineageAnalyzer, LineageConfig, LineageResult, SourceType};
use lineagemap_export::ExportNaming;
use tokio::sync::{Mutex, MutexGuard, RwLock};

/// Server configuration derived from CLI arguments.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Resolved lineage configuration (model, timeout, theme)
    pub lineage: LineageConfig,
    /// Project name used for export filenames
    pub project_name: String,
    /// Port to listen on
    pub port: u16,
    /// Whether to open browser on startup
    pub open_browser: bool,
}

/// Result of the most recent successful submission.
#[derive(Debug, Clone)]
pub struct LatestResult {
    pub result: LineageResult,
    pub source_type: SourceType,
    pub naming: ExportNaming,
}

/// Shared application state.
pub struct AppState {
    pub config: ServerConfig,
    pub analyzer: LineageAnalyzer,
    in_flight: Mutex<()>,
    latest: RwLock<Option<LatestResult>>,
}

impl AppState {
    pub fn new(config: ServerConfig, analyzer: LineageAnalyzer) -> Self {
        Self {
            config,
            analyzer,
            in_flight: Mutex::new(()),
            latest: RwLock::new(None),
        }
    }

    /// Claims the session's single request slot.
    ///
    /// Returns `None` while another submission holds it.
    pub fn try_begin(&self) -> Option<MutexGuard<'_, ()>> {
        self.in_flight.try_lock().ok()
    }

    pub async fn latest(&self) -> Option<LatestResult> {
        self.latest.read().await.clone()
    }

    pub async fn replace_latest(&self, latest: Option<LatestResult>) {
        *self.latest.write().await = latest;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use lineagemap_core::StaticBackend;

    use super::*;

    fn state() -> AppState {
        let config = ServerConfig {
            lineage: LineageConfig::default(),
            project_name: "test".to_string(),
            port: 3000,
            open_browser: false,
        };
        AppState::new(
            config,
            LineageAnalyzer::new(Arc::new(StaticBackend::new("{}"))),
        )
    }

    #[test]
    fn only_one_request_slot() {
        let state = state();
        let guard = state.try_begin();
        assert!(guard.is_some());
        assert!(state.try_begin().is_none());
        drop(guard);
        assert!(state.try_begin().is_some());
    }

    #[tokio::test]
    async fn latest_result_is_replaced_wholesale() {
        let state = state();
        assert!(state.latest().await.is_none());

        state
            .replace_latest(Some(LatestResult {
                result: LineageResult::default(),
                source_type: SourceType::Dbt,
                naming: ExportNaming::new("x"),
            }))
            .await;
        assert_eq!(state.latest().await.unwrap().source_type, SourceType::Dbt);

        state.replace_latest(None).await;
        assert!(state.latest().await.is_none());
    }
}
