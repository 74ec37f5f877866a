use std::collections::{HashMap, HashSet};

use lineagemap_core::GraphModel;

/// Renders the graph as a Mermaid `flowchart LR` diagram.
///
/// Column names are not valid Mermaid ids in general (dots, spaces), so each
/// node gets a sanitized id with a numeric suffix when two columns collide.
pub fn export_mermaid(graph: &GraphModel) -> String {
    let mut lines = vec!["flowchart LR".to_string()];
    let mut ids: HashMap<&str, String> = HashMap::new();
    let mut taken: HashSet<String> = HashSet::new();

    for node in &graph.nodes {
        let base = sanitize_id(&node.id);
        let mut id = base.clone();
        let mut suffix = 1;
        while taken.contains(&id) {
            suffix += 1;
            id = format!("{base}_{suffix}");
        }
        taken.insert(id.clone());
        lines.push(format!("    {}[\"{}\"]", id, escape_label(&node.label)));
        ids.insert(node.id.as_str(), id);
    }

    for edge in &graph.edges {
        let (Some(from), Some(to)) = (ids.get(edge.from.as_str()), ids.get(edge.to.as_str()))
        else {
            continue;
        };
        if edge.label.trim().is_empty() {
            lines.push(format!("    {from} --> {to}"));
        } else {
            lines.push(format!(
                "    {from} -->|\"{}\"| {to}",
                escape_label(&edge.label)
            ));
        }
    }

    lines.join("\n")
}

/// Mermaid export wrapped in a Markdown code fence.
pub fn export_mermaid_markdown(graph: &GraphModel) -> String {
    format!(
        "# Lineage Diagram\n\n```mermaid\n{}\n```\n",
        export_mermaid(graph)
    )
}

fn sanitize_id(id: &str) -> String {
    let cleaned: String = id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("n_{cleaned}")
}

fn escape_label(label: &str) -> String {
    label.replace('"', "#quot;").replace(['\r', '\n'], " ")
}
