//! Human-readable table output formatting.

use is_terminal::IsTerminal;
use lineagemap_core::LineageResult;
use owo_colors::OwoColorize;
use std::fmt::Write;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct MappingRow<'a> {
    #[tabled(rename = "Source Column")]
    source: &'a str,
    #[tabled(rename = "Target Column")]
    target: &'a str,
    #[tabled(rename = "Transformation")]
    transformation: &'a str,
    #[tabled(rename = "Confidence")]
    confidence: String,
}

/// Format the lineage result as human-readable text with optional colors.
pub fn format_table(result: &LineageResult, use_colors: bool) -> String {
    let colored = use_colors && std::io::stdout().is_terminal();
    let mut out = String::new();

    write_header(&mut out, colored);
    write_summary(&mut out, result, colored);
    write_mappings(&mut out, result, colored);
    write_transformations(&mut out, result, colored);

    out
}

fn write_header(out: &mut String, colored: bool) {
    let title = "LineageMap Analysis";
    let line = "═".repeat(50);

    if colored {
        writeln!(out, "{}", title.bold()).unwrap();
        writeln!(out, "{}", line.dimmed()).unwrap();
    } else {
        writeln!(out, "{title}").unwrap();
        writeln!(out, "{line}").unwrap();
    }
}

fn write_summary(out: &mut String, result: &LineageResult, colored: bool) {
    let stats = match result.average_confidence() {
        Some(avg) => format!(
            "Summary: {} mappings | {} columns | {} transformations | avg confidence {:.1}",
            result.mappings.len(),
            result.column_count(),
            result.transformation_summary.len(),
            avg
        ),
        None => format!(
            "Summary: 0 mappings | {} transformations",
            result.transformation_summary.len()
        ),
    };

    if colored {
        writeln!(out, "{}", stats.cyan()).unwrap();
    } else {
        writeln!(out, "{stats}").unwrap();
    }

    writeln!(out).unwrap();
}

fn write_mappings(out: &mut String, result: &LineageResult, colored: bool) {
    if result.mappings.is_empty() {
        let message = "No column mappings were identified.";
        if colored {
            writeln!(out, "{}", message.yellow()).unwrap();
        } else {
            writeln!(out, "{message}").unwrap();
        }
        writeln!(out).unwrap();
        return;
    }

    let rows = result.mappings.iter().map(|mapping| MappingRow {
        source: &mapping.source_column,
        target: &mapping.target_column,
        transformation: &mapping.transformation,
        confidence: format!("{}/5", mapping.confidence),
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    writeln!(out, "{table}").unwrap();
    writeln!(out).unwrap();
}

fn write_transformations(out: &mut String, result: &LineageResult, colored: bool) {
    if result.transformation_summary.is_empty() {
        return;
    }

    if colored {
        writeln!(out, "{}", "Transformations:".bold()).unwrap();
    } else {
        writeln!(out, "Transformations:").unwrap();
    }

    for entry in &result.transformation_summary {
        if colored {
            writeln!(out, "  {} {}", "•".green(), entry).unwrap();
        } else {
            writeln!(out, "  • {entry}").unwrap();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineagemap_core::ColumnMapping;

    #[test]
    fn test_plain_table_lists_every_mapping() {
        let result = LineageResult::new(
            vec![
                ColumnMapping::new("a", "total", "SUM", 5),
                ColumnMapping::new("b", "total", "SUM", 4),
            ],
            vec!["SUM".to_string()],
            "",
        );
        let out = format_table(&result, false);

        assert!(out.starts_with("LineageMap Analysis\n"));
        assert!(out.contains("Summary: 2 mappings | 3 columns | 1 transformations | avg confidence 4.5"));
        assert!(out.contains("Source Column"));
        assert!(out.contains("5/5"));
        assert!(out.contains("4/5"));
        assert!(out.contains("  • SUM"));
    }

    #[test]
    fn test_empty_result_message() {
        let out = format_table(&LineageResult::default(), false);
        assert!(out.contains("No column mappings were identified."));
        assert!(!out.contains("Transformations:"));
    }
}
