//! Human-readable Markdown report.

use std::collections::HashSet;
use std::fmt::Write;

use lineagemap_core::LineageResult;

pub const REPORT_TITLE: &str = "Data Lineage Report";
pub const NO_MAPPINGS: &str = "_No column mappings were identified._";
pub const NO_TRANSFORMATIONS: &str = "_No transformations were detected._";

/// Renders `result` as a Markdown report.
///
/// The output is a pure function of the result: a mapping table with one row
/// per mapping in order, then one bullet per distinct summary entry.
pub fn to_markdown(result: &LineageResult) -> String {
    let mut out = String::new();

    writeln!(out, "# {REPORT_TITLE}").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "## Column Mappings").unwrap();
    writeln!(out).unwrap();

    if result.mappings.is_empty() {
        writeln!(out, "{NO_MAPPINGS}").unwrap();
    } else {
        writeln!(
            out,
            "| Source Column | Target Column | Transformation | Confidence |"
        )
        .unwrap();
        writeln!(out, "|---|---|---|---|").unwrap();
        for mapping in &result.mappings {
            writeln!(
                out,
                "| {} | {} | {} | {} |",
                escape_cell(&mapping.source_column),
                escape_cell(&mapping.target_column),
                escape_cell(&mapping.transformation),
                mapping.confidence
            )
            .unwrap();
        }
    }

    writeln!(out).unwrap();
    writeln!(out, "## Transformation Summary").unwrap();
    writeln!(out).unwrap();

    let mut seen = HashSet::new();
    let mut bullets = 0;
    for entry in &result.transformation_summary {
        let bullet = escape_inline(entry);
        if !bullet.is_empty() && seen.insert(bullet.clone()) {
            writeln!(out, "- {bullet}").unwrap();
            bullets += 1;
        }
    }
    if bullets == 0 {
        writeln!(out, "{NO_TRANSFORMATIONS}").unwrap();
    }

    out
}

/// Keeps a value inside its table cell.
fn escape_cell(value: &str) -> String {
    escape_inline(value).replace('|', "\\|")
}

/// Collapses line breaks so a value stays on one Markdown line.
fn escape_inline(value: &str) -> String {
    value
        .trim()
        .replace("\r\n", "<br>")
        .replace(['\r', '\n'], "<br>")
}

#[cfg(test)]
mod tests {
    use lineagemap_core::ColumnMapping;

    use super::*;

    fn sample() -> LineageResult {
        LineageResult::new(
            vec![
                ColumnMapping::new("orders.amount", "fact.total", "SUM", 5),
                ColumnMapping::new("orders.ts", "fact.day", "CAST", 3),
            ],
            vec!["SUM".to_string(), "CAST".to_string()],
            "",
        )
    }

    #[test]
    fn renders_table_and_summary() {
        insta::assert_snapshot!(to_markdown(&sample()), @r"
        # Data Lineage Report

        ## Column Mappings

        | Source Column | Target Column | Transformation | Confidence |
        |---|---|---|---|
        | orders.amount | fact.total | SUM | 5 |
        | orders.ts | fact.day | CAST | 3 |

        ## Transformation Summary

        - SUM
        - CAST
        ");
    }

    #[test]
    fn empty_result_uses_placeholders() {
        let markdown = to_markdown(&LineageResult::default());
        assert!(markdown.contains(NO_MAPPINGS));
        assert!(markdown.contains(NO_TRANSFORMATIONS));
        assert!(!markdown.contains("|---|"));
    }

    #[test]
    fn pipes_and_newlines_stay_in_their_cell() {
        let result = LineageResult::new(
            vec![ColumnMapping::new(
                "a",
                "b",
                "CASE WHEN x | y\nTHEN 1 END",
                2,
            )],
            vec![],
            "",
        );
        let markdown = to_markdown(&result);
        let row = markdown
            .lines()
            .find(|line| line.starts_with("| a "))
            .unwrap();
        assert_eq!(row, "| a | b | CASE WHEN x \\| y<br>THEN 1 END | 2 |");
    }

    #[test]
    fn duplicate_summary_entries_render_once() {
        let result = LineageResult {
            mappings: vec![],
            transformation_summary: vec!["JOIN".into(), "JOIN".into()],
            raw_model_text: String::new(),
        };
        let markdown = to_markdown(&result);
        assert_eq!(markdown.matches("- JOIN").count(), 1);
    }

    #[test]
    fn summary_entries_equal_after_trimming_render_once() {
        let result = LineageResult {
            mappings: vec![],
            transformation_summary: vec!["SUM".into(), " SUM".into()],
            raw_model_text: String::new(),
        };
        let markdown = to_markdown(&result);
        assert_eq!(markdown.lines().filter(|line| *line == "- SUM").count(), 1);
    }
}
