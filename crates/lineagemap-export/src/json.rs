use lineagemap_core::{GraphModel, LineageResult};
use serde::Serialize;

use crate::ExportError;

/// Serializes the result with the same field names the backend answers in.
pub fn export_json(result: &LineageResult, compact: bool) -> Result<String, ExportError> {
    to_json(result, compact)
}

pub fn export_graph_json(graph: &GraphModel, compact: bool) -> Result<String, ExportError> {
    to_json(graph, compact)
}

fn to_json<T: Serialize>(value: &T, compact: bool) -> Result<String, ExportError> {
    let text = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(text)
}
