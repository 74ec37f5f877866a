use chrono::{DateTime, Utc};
use serde_json::json;

use lineagemap_core::{LineageResult, Theme};

use crate::graph::to_graph;
use crate::ExportError;

/// Self-contained HTML report with an interactive graph.
pub fn export_html(
    result: &LineageResult,
    project_name: &str,
    exported_at: DateTime<Utc>,
    theme: Theme,
) -> Result<String, ExportError> {
    let graph = to_graph(result);
    let export_date = exported_at.format("%Y-%m-%d %H:%M:%S UTC");
    let palette = Palette::for_theme(theme);

    let mapping_rows = if result.mappings.is_empty() {
        "<tr><td colspan=\"4\" class=\"empty\">No column mappings were identified.</td></tr>"
            .to_string()
    } else {
        result
            .mappings
            .iter()
            .map(|mapping| {
                format!(
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td><span class=\"badge badge-{}\">{}</span></td></tr>",
                    escape_html(&mapping.source_column),
                    escape_html(&mapping.target_column),
                    escape_html(&mapping.transformation),
                    mapping.confidence,
                    mapping.confidence
                )
            })
            .collect::<Vec<_>>()
            .join("")
    };

    let summary_items = if result.transformation_summary.is_empty() {
        "<li class=\"empty\">No transformations were detected.</li>".to_string()
    } else {
        result
            .transformation_summary
            .iter()
            .map(|entry| format!("<li>{}</li>", escape_html(entry)))
            .collect::<Vec<_>>()
            .join("")
    };

    let nodes: Vec<_> = graph
        .nodes
        .iter()
        .map(|node| json!({ "id": node.id, "label": node.label, "title": node.id }))
        .collect();
    let edges: Vec<_> = graph
        .edges
        .iter()
        .map(|edge| json!({ "from": edge.from, "to": edge.to, "label": edge.label }))
        .collect();
    let graph_data = script_safe(&serde_json::to_string(&json!({
        "nodes": nodes,
        "edges": edges,
    }))?);

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en" data-theme="{theme}">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title} - Lineage Export</title>
  <script src="https://unpkg.com/vis-network/standalone/umd/vis-network.min.js"></script>
  <style>
    :root {{
      --bg-primary: {bg_primary};
      --bg-secondary: {bg_secondary};
      --text-primary: {text_primary};
      --text-secondary: {text_secondary};
      --border-color: {border_color};
      --accent-color: {accent_color};
    }}

    * {{ box-sizing: border-box; margin: 0; padding: 0; }}

    body {{
      font-family: Inter, -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Arial, sans-serif;
      background-color: var(--bg-secondary);
      color: var(--text-primary);
      line-height: 1.6;
    }}

    .container {{ max-width: 1400px; margin: 0 auto; padding: 2rem; }}

    header {{
      background: var(--bg-primary);
      border-bottom: 1px solid var(--border-color);
      padding: 1.5rem 2rem;
    }}

    h1 {{ font-size: 1.75rem; font-weight: 600; }}
    .export-date {{ color: var(--text-secondary); font-size: 0.875rem; margin-top: 0.5rem; }}

    .summary-cards {{
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(150px, 1fr));
      gap: 1rem;
      margin-bottom: 2rem;
    }}

    .card {{ background: var(--bg-primary); border: 1px solid var(--border-color); border-radius: 8px; padding: 1rem; }}
    .card-label {{ font-size: 0.75rem; text-transform: uppercase; color: var(--text-secondary); }}
    .card-value {{ font-size: 1.5rem; font-weight: 600; }}

    #graph {{
      height: 600px;
      background: var(--bg-primary);
      border: 1px solid var(--border-color);
      border-radius: 8px;
      margin-bottom: 2rem;
    }}

    table {{ width: 100%; border-collapse: collapse; background: var(--bg-primary); border: 1px solid var(--border-color); margin-bottom: 2rem; }}
    th, td {{ padding: 0.75rem 1rem; text-align: left; border-bottom: 1px solid var(--border-color); }}
    th {{ background: var(--bg-secondary); font-weight: 600; font-size: 0.75rem; text-transform: uppercase; color: var(--text-secondary); }}
    .empty {{ color: var(--text-secondary); font-style: italic; }}

    .section-title {{ font-size: 1.25rem; font-weight: 600; margin-bottom: 1rem; }}
    ul.summary {{ margin: 0 0 2rem 1.5rem; }}

    .badge {{ display: inline-block; min-width: 1.75rem; text-align: center; padding: 0.125rem 0.5rem; border-radius: 9999px; font-size: 0.75rem; font-weight: 600; }}
    .badge-5 {{ background: #dcfce7; color: #15803d; }}
    .badge-4 {{ background: #d9f99d; color: #4d7c0f; }}
    .badge-3 {{ background: #fef3c7; color: #b45309; }}
    .badge-2 {{ background: #fed7aa; color: #c2410c; }}
    .badge-1 {{ background: #fee2e2; color: #b91c1c; }}
  </style>
</head>
<body>
  <header>
    <h1>{title}</h1>
    <div class="export-date">Exported on {export_date}</div>
  </header>

  <div class="container">
    <div class="summary-cards">
      <div class="card"><div class="card-label">Mappings</div><div class="card-value">{mapping_count}</div></div>
      <div class="card"><div class="card-label">Columns</div><div class="card-value">{node_count}</div></div>
      <div class="card"><div class="card-label">Transformations</div><div class="card-value">{transformation_count}</div></div>
    </div>

    <div class="section-title">Lineage Graph</div>
    <div id="graph"></div>

    <div class="section-title">Column Mappings</div>
    <table>
      <thead><tr><th>Source Column</th><th>Target Column</th><th>Transformation</th><th>Confidence</th></tr></thead>
      <tbody>{mapping_rows}</tbody>
    </table>

    <div class="section-title">Transformation Summary</div>
    <ul class="summary">{summary_items}</ul>
  </div>

  <script>
    const data = {graph_data};
    new vis.Network(document.getElementById('graph'), {{
      nodes: new vis.DataSet(data.nodes),
      edges: new vis.DataSet(data.edges),
    }}, {{
      physics: {{
        solver: 'barnesHut',
        barnesHut: {{ gravitationalConstant: -10000, centralGravity: 0.3, springLength: 200, springConstant: 0.03, damping: 0.15, avoidOverlap: 0.9 }},
      }},
      nodes: {{
        shape: 'dot',
        color: {{ background: '{node_color}', border: '{border_color}' }},
        font: {{ color: '{text_primary}', face: 'Inter', size: 16 }},
        borderWidth: 2,
      }},
      edges: {{
        arrows: {{ to: {{ enabled: true, scaleFactor: 0.8 }} }},
        color: {{ color: '{edge_color}', highlight: '{accent_color}' }},
        font: {{ color: '{text_primary}', size: 12, strokeWidth: 0, align: 'middle' }},
        width: 1.5,
      }},
      interaction: {{ hover: true, navigationButtons: true, zoomView: true }},
    }});
  </script>
</body>
</html>"#,
        theme = theme.as_str(),
        title = escape_html(project_name),
        export_date = escape_html(&export_date.to_string()),
        bg_primary = palette.bg_primary,
        bg_secondary = palette.bg_secondary,
        text_primary = palette.text_primary,
        text_secondary = palette.text_secondary,
        border_color = palette.border,
        accent_color = palette.accent,
        node_color = palette.node,
        edge_color = palette.edge,
        mapping_count = result.mappings.len(),
        node_count = graph.nodes.len(),
        transformation_count = result.transformation_summary.len(),
        mapping_rows = mapping_rows,
        summary_items = summary_items,
        graph_data = graph_data,
    ))
}

struct Palette {
    bg_primary: &'static str,
    bg_secondary: &'static str,
    text_primary: &'static str,
    text_secondary: &'static str,
    border: &'static str,
    accent: &'static str,
    node: &'static str,
    edge: &'static str,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                bg_primary: "#161b22",
                bg_secondary: "#0d1117",
                text_primary: "#e6edf3",
                text_secondary: "#8b949e",
                border: "#30363d",
                accent: "#58a6ff",
                node: "#3fb950",
                edge: "#a0aec0",
            },
            Theme::Light => Self {
                bg_primary: "#ffffff",
                bg_secondary: "#f8fafc",
                text_primary: "#1e293b",
                text_secondary: "#64748b",
                border: "#e2e8f0",
                accent: "#3b82f6",
                node: "#22c55e",
                edge: "#64748b",
            },
        }
    }
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}

/// JSON embedded in a `<script>` block must not close the tag early.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use lineagemap_core::ColumnMapping;

    use super::*;

    fn render(result: &LineageResult, theme: Theme) -> String {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        export_html(result, "Sales <ETL>", at, theme).unwrap()
    }

    #[test]
    fn includes_rows_summary_and_graph_data() {
        let result = LineageResult::new(
            vec![ColumnMapping::new("orders.amount", "fact.total", "SUM", 4)],
            vec!["SUM".to_string()],
            "",
        );
        let html = render(&result, Theme::Dark);
        assert!(html.contains("<td>orders.amount</td><td>fact.total</td><td>SUM</td>"));
        assert!(html.contains("<li>SUM</li>"));
        assert!(html.contains(r#""from":"orders.amount""#));
        assert!(html.contains("Sales &lt;ETL&gt;"));
        assert!(html.contains("Exported on 2026-03-01 09:00:00 UTC"));
        assert!(html.contains("data-theme=\"dark\""));
    }

    #[test]
    fn theme_switches_palette() {
        let result = LineageResult::default();
        assert!(render(&result, Theme::Dark).contains("--bg-primary: #161b22"));
        assert!(render(&result, Theme::Light).contains("--bg-primary: #ffffff"));
    }

    #[test]
    fn script_tags_in_column_names_cannot_break_out() {
        let result = LineageResult::new(
            vec![ColumnMapping::new("</script><b>", "t", "direct", 5)],
            vec![],
            "",
        );
        let html = render(&result, Theme::Light);
        assert_eq!(html.matches("</script>").count(), 2);
    }
}
