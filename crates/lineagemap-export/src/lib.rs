//! Rendering of LineageMap results.
//!
//! [`to_markdown`] and [`to_graph`] are the two views every front end shows;
//! the remaining exporters produce downloadable files from the same result.

mod error;
mod graph;
mod html;
mod json;
mod markdown;
mod mermaid;
mod naming;

use std::str::FromStr;

pub use error::ExportError;
pub use graph::to_graph;
pub use html::export_html;
pub use json::{export_graph_json, export_json};
pub use markdown::to_markdown;
pub use mermaid::{export_mermaid, export_mermaid_markdown};
pub use naming::{ExportNaming, DEFAULT_PROJECT_NAME};

use lineagemap_core::{LineageResult, Theme};

/// Downloadable export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Markdown,
    Json { compact: bool },
    Graph { compact: bool },
    Mermaid,
    Html,
}

impl ExportFormat {
    /// Names accepted by [`FromStr`], in display order.
    pub const NAMES: [&'static str; 5] = ["markdown", "json", "graph", "mermaid", "html"];

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Markdown | Self::Mermaid => "text/markdown; charset=utf-8",
            Self::Json { .. } | Self::Graph { .. } => "application/json",
            Self::Html => "text/html; charset=utf-8",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json { compact: false }),
            "graph" => Ok(Self::Graph { compact: false }),
            "mermaid" => Ok(Self::Mermaid),
            "html" => Ok(Self::Html),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Renders `result` in `format`.
pub fn export(
    result: &LineageResult,
    format: ExportFormat,
    naming: &ExportNaming,
    theme: Theme,
) -> Result<String, ExportError> {
    match format {
        ExportFormat::Markdown => Ok(to_markdown(result)),
        ExportFormat::Json { compact } => export_json(result, compact),
        ExportFormat::Graph { compact } => export_graph_json(&to_graph(result), compact),
        ExportFormat::Mermaid => Ok(export_mermaid_markdown(&to_graph(result))),
        ExportFormat::Html => export_html(
            result,
            naming.project_name(),
            naming.exported_at(),
            theme,
        ),
    }
}
