//! JSON Schema documents for exported data.

use schemars::generate::SchemaSettings;
use serde_json::json;

use crate::types::{GraphModel, LineageResult};

/// Schema bundle describing the JSON and graph exports.
pub fn export_schema() -> serde_json::Value {
    let result = SchemaSettings::draft07()
        .into_generator()
        .into_root_schema_for::<LineageResult>();
    let graph = SchemaSettings::draft07()
        .into_generator()
        .into_root_schema_for::<GraphModel>();
    json!({
        "LineageResult": result,
        "GraphModel": graph,
    })
}
