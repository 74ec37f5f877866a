//! LineageMap core: AI-assisted column-level lineage mapping.
//!
//! The crate turns pasted pipeline code into a validated [`LineageResult`]:
//! [`prompt::build_prompt`] assembles the instructions, an [`AnalysisBackend`]
//! produces the raw answer, and [`parse_response`] checks it against the
//! lineage schema. [`LineageAnalyzer`] ties the three together.

pub mod analyzer;
pub mod backend;
pub mod config;
pub mod error;
pub mod parser;
pub mod prompt;
pub mod schema;
pub mod types;

// Re-export main types and functions
pub use analyzer::LineageAnalyzer;
#[cfg(feature = "gemini")]
pub use backend::GeminiBackend;
pub use backend::{AnalysisBackend, StaticBackend};
pub use config::{ApiKey, LineageConfig, Theme};
pub use error::LineageError;
pub use parser::parse_response;
pub use prompt::build_prompt;
pub use schema::export_schema;
pub use types::{
    ColumnMapping, GraphEdge, GraphModel, GraphNode, LineageRequest, LineageResult, SourceType,
    MAX_CONFIDENCE, MIN_CONFIDENCE,
};
