//! REST API handlers for serve mode.
//!
//! This module provides the API endpoints the embedded page uses to submit
//! code, render the result and download exports.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use lineagemap_core::{GraphModel, LineageError, LineageResult, SourceType, Theme};
use lineagemap_export::{ExportFormat, ExportNaming};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{AppState, LatestResult};

/// Build the API router with all endpoints.
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/config", get(config))
        .route("/schema", get(schema))
        .route("/analyze", post(analyze))
        .route("/export/{format}", get(export))
        .route("/clear", post(clear))
}

// === Request/Response types ===

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct SourceTypeInfo {
    value: SourceType,
    label: &'static str,
    language: &'static str,
}

#[derive(Serialize)]
struct ConfigResponse {
    backend: String,
    model: String,
    theme: Theme,
    timeout_secs: u64,
    source_types: Vec<SourceTypeInfo>,
    export_formats: [&'static str; 5],
}

#[derive(Deserialize)]
struct AnalyzeRequest {
    source_code: String,
    #[serde(default)]
    source_type: SourceType,
}

#[derive(Serialize)]
struct AnalyzeResponse {
    result: LineageResult,
    markdown: String,
    graph: GraphModel,
}

#[derive(Deserialize)]
struct ExportQuery {
    #[serde(default)]
    theme: Option<Theme>,
}

/// JSON error body: `{code, message, field?, raw?}`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw: Option<String>,
}

struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                code,
                message: message.into(),
                field: None,
                raw: None,
            },
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), "INVALID_REQUEST", rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::new(rejection.status(), "INVALID_REQUEST", rejection.body_text())
    }
}

impl From<LineageError> for ApiError {
    fn from(err: LineageError) -> Self {
        let status = match &err {
            LineageError::EmptyInput => StatusCode::BAD_REQUEST,
            LineageError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            LineageError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            LineageError::Network { .. }
            | LineageError::MalformedResponse { .. }
            | LineageError::SchemaValidation { .. }
            | LineageError::ExtractionFailed(_) => StatusCode::BAD_GATEWAY,
        };
        Self {
            status,
            body: ErrorBody {
                code: err.code(),
                message: err.to_string(),
                field: err.field().map(str::to_string),
                raw: err.raw().map(str::to_string),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

// === Handlers ===

/// GET /api/health - Health check with version
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /api/config - Settings the page needs to render its controls
async fn config(State(state): State<Arc<AppState>>) -> Json<ConfigResponse> {
    let lineage = &state.config.lineage;
    Json(ConfigResponse {
        backend: state.analyzer.backend_name().to_string(),
        model: lineage.model.clone(),
        theme: lineage.theme,
        timeout_secs: state.analyzer.timeout().as_secs(),
        source_types: SourceType::ALL
            .iter()
            .map(|source_type| SourceTypeInfo {
                value: *source_type,
                label: source_type.label(),
                language: source_type.highlight_language(),
            })
            .collect(),
        export_formats: ExportFormat::NAMES,
    })
}

/// GET /api/schema - JSON Schema of the export documents
async fn schema() -> Json<serde_json::Value> {
    Json(lineagemap_core::export_schema())
}

/// POST /api/analyze - Submit code for lineage analysis
async fn analyze(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let Json(payload) = payload?;

    let Some(_guard) = state.try_begin() else {
        return Err(ApiError::new(
            StatusCode::CONFLICT,
            "REQUEST_IN_FLIGHT",
            "An analysis is already running; wait for it to finish",
        ));
    };

    info!(
        source_type = %payload.source_type,
        code_len = payload.source_code.len(),
        "analysis requested"
    );

    let outcome = state
        .analyzer
        .build_and_submit(&payload.source_code, payload.source_type)
        .await;

    let result = match outcome {
        Ok(result) => result,
        Err(err) => {
            warn!(code = err.code(), error = %err, "analysis failed");
            state.replace_latest(None).await;
            return Err(err.into());
        }
    };

    let markdown = lineagemap_export::to_markdown(&result);
    let graph = lineagemap_export::to_graph(&result);

    state
        .replace_latest(Some(LatestResult {
            result: result.clone(),
            source_type: payload.source_type,
            naming: ExportNaming::new(state.config.project_name.clone()),
        }))
        .await;

    Ok(Json(AnalyzeResponse {
        result,
        markdown,
        graph,
    }))
}

/// GET /api/export/{format} - Download the latest result
async fn export(
    State(state): State<Arc<AppState>>,
    Path(format): Path<String>,
    query: Result<Query<ExportQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let format: ExportFormat = format
        .parse()
        .map_err(|e: lineagemap_export::ExportError| {
            ApiError::new(StatusCode::BAD_REQUEST, "UNSUPPORTED_FORMAT", e.to_string())
        })?;

    let Some(latest) = state.latest().await else {
        return Err(ApiError::new(
            StatusCode::NOT_FOUND,
            "NO_RESULT",
            "Nothing to export yet; run an analysis first",
        ));
    };

    let theme = query.theme.unwrap_or(state.config.lineage.theme);
    info!(
        format = ?format,
        source_type = %latest.source_type,
        theme = theme.as_str(),
        "export requested"
    );
    let body = lineagemap_export::export(&latest.result, format, &latest.naming, theme).map_err(
        |e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "EXPORT_FAILED", e.to_string()),
    )?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        latest.naming.filename(format)
    );

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

/// POST /api/clear - Drop the latest result
async fn clear(State(state): State<Arc<AppState>>) -> StatusCode {
    state.replace_latest(None).await;
    StatusCode::NO_CONTENT
}
