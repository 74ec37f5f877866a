//! Response types produced by a validated lineage analysis.

use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Lowest confidence score a mapping may carry.
pub const MIN_CONFIDENCE: u8 = 1;
/// Highest confidence score a mapping may carry.
pub const MAX_CONFIDENCE: u8 = 5;

/// A single source column to target column derivation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct ColumnMapping {
    /// Column the data is read from (qualified as the model reported it)
    pub source_column: String,

    /// Column the data is written to
    pub target_column: String,

    /// Transformation applied on the way (e.g. `SUM`, `CAST`, `direct`)
    pub transformation: String,

    /// Self-reported certainty of the backend, 1 (speculative) to 5 (direct mapping)
    #[schemars(range(min = 1, max = 5))]
    pub confidence: u8,
}

impl ColumnMapping {
    pub fn new(
        source_column: impl Into<String>,
        target_column: impl Into<String>,
        transformation: impl Into<String>,
        confidence: u8,
    ) -> Self {
        Self {
            source_column: source_column.into(),
            target_column: target_column.into(),
            transformation: transformation.into(),
            confidence,
        }
    }
}

/// Validated lineage for one submission.
///
/// Serializes with the same field names the backend is asked to produce, so the
/// JSON export can be fed back through the response parser. The raw model text
/// is kept for diagnostics only and is not part of the serialized form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct LineageResult {
    /// Mappings in the order the backend reported them
    pub mappings: Vec<ColumnMapping>,

    /// Distinct transformation kinds detected, in first-seen order
    pub transformation_summary: Vec<String>,

    #[serde(skip)]
    #[schemars(skip)]
    pub raw_model_text: String,
}

impl LineageResult {
    /// Builds a result, dropping repeated transformation summary entries.
    pub fn new(
        mappings: Vec<ColumnMapping>,
        transformation_summary: Vec<String>,
        raw_model_text: impl Into<String>,
    ) -> Self {
        Self {
            mappings,
            transformation_summary: distinct(transformation_summary),
            raw_model_text: raw_model_text.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Number of distinct columns referenced by the mappings.
    pub fn column_count(&self) -> usize {
        self.mappings
            .iter()
            .flat_map(|m| [m.source_column.as_str(), m.target_column.as_str()])
            .collect::<HashSet<_>>()
            .len()
    }

    /// Mean confidence across mappings, `None` when there are no mappings.
    pub fn average_confidence(&self) -> Option<f64> {
        if self.mappings.is_empty() {
            return None;
        }
        let total: u32 = self.mappings.iter().map(|m| u32::from(m.confidence)).sum();
        Some(f64::from(total) / self.mappings.len() as f64)
    }
}

/// Removes duplicates while keeping first-seen order.
/// Trimmed, non-blank entries in first-seen order.
fn distinct(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty() && seen.insert(value.clone()))
        .collect()
}
