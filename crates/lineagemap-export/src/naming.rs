use chrono::{DateTime, Utc};

use crate::ExportFormat;

pub const DEFAULT_PROJECT_NAME: &str = "data-lineage";

/// File names for downloaded exports.
#[derive(Debug, Clone)]
pub struct ExportNaming {
    project_name: String,
    exported_at: DateTime<Utc>,
}

impl ExportNaming {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self::with_exported_at(project_name, Utc::now())
    }

    pub fn with_exported_at(project_name: impl Into<String>, exported_at: DateTime<Utc>) -> Self {
        Self {
            project_name: sanitize_project_name(&project_name.into()),
            exported_at,
        }
    }

    pub fn exported_at(&self) -> DateTime<Utc> {
        self.exported_at
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn filename(&self, format: ExportFormat) -> String {
        let timestamp = self.exported_at.format("%Y%m%d-%H%M%S");
        let (suffix, extension) = format_filename_parts(format);
        format!(
            "{}-{}-{}.{}",
            self.project_name, timestamp, suffix, extension
        )
    }
}

impl Default for ExportNaming {
    fn default() -> Self {
        Self::new(DEFAULT_PROJECT_NAME)
    }
}

fn format_filename_parts(format: ExportFormat) -> (&'static str, &'static str) {
    match format {
        ExportFormat::Markdown => ("report", "md"),
        ExportFormat::Json { .. } => ("lineage", "json"),
        ExportFormat::Graph { .. } => ("graph", "json"),
        ExportFormat::Mermaid => ("mermaid", "md"),
        ExportFormat::Html => ("report", "html"),
    }
}

fn sanitize_project_name(name: &str) -> String {
    let mut cleaned = String::new();
    let mut last_dash = false;

    for ch in name.trim().chars() {
        let normalized = ch.to_ascii_lowercase();
        if normalized.is_ascii_alphanumeric() {
            cleaned.push(normalized);
            last_dash = false;
        } else if matches!(normalized, '-' | '_' | ' ' | '.') && !last_dash {
            cleaned.push('-');
            last_dash = true;
        }
    }

    let cleaned = cleaned.trim_matches('-').to_string();
    if cleaned.is_empty() {
        DEFAULT_PROJECT_NAME.to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(ExportFormat::Markdown, "sales-etl-20260118-123005-report.md")]
    #[case(ExportFormat::Json { compact: false }, "sales-etl-20260118-123005-lineage.json")]
    #[case(ExportFormat::Graph { compact: true }, "sales-etl-20260118-123005-graph.json")]
    #[case(ExportFormat::Mermaid, "sales-etl-20260118-123005-mermaid.md")]
    #[case(ExportFormat::Html, "sales-etl-20260118-123005-report.html")]
    fn filename_per_format(#[case] format: ExportFormat, #[case] expected: &str) {
        let timestamp = Utc.with_ymd_and_hms(2026, 1, 18, 12, 30, 5).unwrap();
        let naming = ExportNaming::with_exported_at("Sales ETL", timestamp);
        assert_eq!(naming.filename(format), expected);
    }

    #[rstest]
    #[case("  !!! ", DEFAULT_PROJECT_NAME)]
    #[case("", DEFAULT_PROJECT_NAME)]
    #[case("My  Pipeline__v2", "my-pipeline-v2")]
    #[case("dbt.models.orders", "dbt-models-orders")]
    fn project_name_sanitization(#[case] input: &str, #[case] expected: &str) {
        let naming = ExportNaming::with_exported_at(input, Utc::now());
        assert_eq!(naming.project_name(), expected);
    }
}
