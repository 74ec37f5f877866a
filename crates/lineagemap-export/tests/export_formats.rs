use lineagemap_core::{parse_response, LineageResult, Theme};
use lineagemap_export::{
    export, to_graph, to_markdown, ExportFormat, ExportNaming, DEFAULT_PROJECT_NAME,
};
use proptest::prelude::*;

const SUM_RESPONSE: &str = r#"{
  "mappings": [
    {"source_column": "a", "target_column": "total", "transformation": "SUM", "confidence": 5},
    {"source_column": "b", "target_column": "total", "transformation": "SUM", "confidence": 5}
  ],
  "transformation_summary": ["SUM"]
}"#;

fn sum_result() -> LineageResult {
    parse_response(SUM_RESPONSE).unwrap()
}

#[test]
fn sum_scenario_renders_two_rows() {
    let markdown = to_markdown(&sum_result());
    let rows: Vec<_> = markdown
        .lines()
        .filter(|line| line.starts_with("| ") && !line.starts_with("| Source"))
        .collect();
    assert_eq!(rows, ["| a | total | SUM | 5 |", "| b | total | SUM | 5 |"]);
    assert_eq!(markdown.matches("\n- ").count(), 1);
}

#[test]
fn sum_scenario_graph_has_three_nodes_and_two_edges() {
    let graph = to_graph(&sum_result());

    let ids: Vec<_> = graph.nodes.iter().map(|node| node.id.as_str()).collect();
    assert_eq!(ids, ["a", "total", "b"]);
    assert!(graph.nodes.iter().all(|node| node.id == node.label));

    assert_eq!(graph.edges.len(), 2);
    assert!(graph.edges.iter().all(|edge| edge.label == "SUM"));
    assert!(graph.edges.iter().all(|edge| edge.to == "total"));
    assert!(graph.is_consistent());

    let roots: Vec<_> = graph.roots().map(|node| node.id.as_str()).collect();
    assert_eq!(roots, ["a", "b"]);
}

#[test]
fn every_format_renders_the_scenario() {
    let result = sum_result();
    let naming = ExportNaming::default();
    for name in ExportFormat::NAMES {
        let format: ExportFormat = name.parse().unwrap();
        let output = export(&result, format, &naming, Theme::Dark).unwrap();
        assert!(output.contains("total"), "{name} export lost the target column");
    }
    assert!(naming
        .filename(ExportFormat::Html)
        .starts_with(DEFAULT_PROJECT_NAME));
}

fn mapping_strategy() -> impl Strategy<Value = (String, String, String, u8)> {
    (
        "[a-z]{1,3}(\\.[a-z]{1,3})?",
        "[a-z]{1,3}",
        "(direct|SUM|CAST|JOIN|CASE)",
        1u8..=5,
    )
}

proptest! {
    #[test]
    fn graph_derivation_is_idempotent_and_consistent(
        mappings in proptest::collection::vec(mapping_strategy(), 0..16)
    ) {
        let mappings: Vec<_> = mappings
            .into_iter()
            .map(|(from, to, kind, confidence)| {
                lineagemap_core::ColumnMapping::new(from, to, kind, confidence)
            })
            .collect();
        let result = LineageResult::new(mappings, vec![], "");

        let first = to_graph(&result);
        let second = to_graph(&result);
        prop_assert_eq!(&first, &second);
        prop_assert!(first.is_consistent());
        prop_assert_eq!(first.edges.len(), result.mappings.len());
    }

    #[test]
    fn markdown_has_one_row_per_mapping(
        mappings in proptest::collection::vec(mapping_strategy(), 1..16),
        summary in proptest::collection::vec("[A-Z]{1,3}", 0..8)
    ) {
        let mappings: Vec<_> = mappings
            .into_iter()
            .map(|(from, to, kind, confidence)| {
                lineagemap_core::ColumnMapping::new(from, to, kind, confidence)
            })
            .collect();
        let result = LineageResult::new(mappings, summary, "");
        let markdown = to_markdown(&result);

        let rows = markdown
            .lines()
            .filter(|line| line.starts_with("| ") && !line.starts_with("| Source"))
            .count();
        prop_assert_eq!(rows, result.mappings.len());

        let bullets = markdown.lines().filter(|line| line.starts_with("- ")).count();
        prop_assert_eq!(bullets, result.transformation_summary.len());
    }
}
