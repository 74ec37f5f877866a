//! Node/edge view derived from a [`LineageResult`](super::LineageResult).

use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Read-only graph over a lineage result.
///
/// Nodes are unique by id; edges keep mapping order. Node and edge identity is
/// by value, so two derivations of the same result compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GraphModel {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    /// Transformation applied along this edge
    pub label: String,
}

impl GraphModel {
    /// Every edge endpoint refers to a node and no node id repeats.
    pub fn is_consistent(&self) -> bool {
        let mut ids = HashSet::with_capacity(self.nodes.len());
        if !self.nodes.iter().all(|node| ids.insert(node.id.as_str())) {
            return false;
        }
        self.edges
            .iter()
            .all(|edge| ids.contains(edge.from.as_str()) && ids.contains(edge.to.as_str()))
    }

    /// Nodes with no incoming edge.
    pub fn roots(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes
            .iter()
            .filter(|node| !self.edges.iter().any(|edge| edge.to == node.id))
    }
}
