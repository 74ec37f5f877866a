//! Node/edge projection of a lineage result.

use std::collections::HashSet;

use lineagemap_core::{GraphEdge, GraphModel, GraphNode, LineageResult};

/// Derives the graph view of `result`.
///
/// Nodes are the distinct source and target columns in first-seen order,
/// with the column name as both id and label. Each mapping becomes one edge
/// labeled with its transformation, so repeated mappings yield parallel edges.
pub fn to_graph(result: &LineageResult) -> GraphModel {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut nodes = Vec::new();
    let mut edges = Vec::with_capacity(result.mappings.len());

    for mapping in &result.mappings {
        for column in [&mapping.source_column, &mapping.target_column] {
            if seen.insert(column.as_str()) {
                nodes.push(GraphNode {
                    id: column.clone(),
                    label: column.clone(),
                });
            }
        }

        edges.push(GraphEdge {
            from: mapping.source_column.clone(),
            to: mapping.target_column.clone(),
            label: mapping.transformation.clone(),
        });
    }

    GraphModel { nodes, edges }
}
