use std::collections::BTreeSet;

use xplor_core::graph::EdgeTarget;
use xplor_core::types::EdgeKind;
use xplor_core::SkillGraph;

/// Generate a GraphViz DOT diagram of the skill graph. Grouping notes are
/// shaded, orphans outlined in orange, and unresolved references drawn as
/// dashed red placeholder nodes.
pub fn generate_graph_diagram(graph: &SkillGraph, grouping_kind: &str) -> String {
    let mut out = String::new();
    out.push_str("digraph skills {\n");
    out.push_str("  rankdir=LR;\n");
    out.push_str("  node [shape=box, style=filled, fillcolor=white];\n\n");

    for (idx, node) in graph.nodes() {
        let id = sanitize_dot_id(&node.id.0);
        let label = escape_label(&node.name);
        if node.is_grouping(grouping_kind) {
            out.push_str(&format!(
                "  {id} [label=\"{label}\", shape=folder, fillcolor=\"#e3f2fd\"];\n"
            ));
        } else if graph.degree(idx).is_isolated() {
            out.push_str(&format!(
                "  {id} [label=\"{label}\", color=\"#ef6c00\", penwidth=2];\n"
            ));
        } else {
            out.push_str(&format!("  {id} [label=\"{label}\"];\n"));
        }
    }

    let missing: BTreeSet<&str> = graph
        .edges()
        .iter()
        .filter_map(|e| match &e.target {
            EdgeTarget::Unresolved(name) => Some(name.as_str()),
            EdgeTarget::Node(_) => None,
        })
        .collect();
    if !missing.is_empty() {
        out.push('\n');
        for name in &missing {
            out.push_str(&format!(
                "  {} [label=\"{}\", style=dashed, color=red, fontcolor=red];\n",
                missing_id(name),
                escape_label(name)
            ));
        }
    }
    out.push('\n');

    for edge in graph.edges() {
        let from = sanitize_dot_id(&graph.node(edge.source).id.0);
        let to = match &edge.target {
            EdgeTarget::Node(idx) => sanitize_dot_id(&graph.node(*idx).id.0),
            EdgeTarget::Unresolved(name) => missing_id(name),
        };

        if edge.is_broken() {
            out.push_str(&format!(
                "  {from} -> {to} [color=red, style=dashed, label=\"broken\"];\n"
            ));
            continue;
        }
        match edge.kind {
            EdgeKind::References => out.push_str(&format!("  {from} -> {to};\n")),
            EdgeKind::Clusters => {
                out.push_str(&format!("  {from} -> {to} [color=\"#1565c0\"];\n"))
            }
            EdgeKind::Extends => out.push_str(&format!(
                "  {from} -> {to} [style=bold, arrowhead=empty, label=\"extends\"];\n"
            )),
        }
    }

    out.push_str("}\n");
    out
}

fn missing_id(name: &str) -> String {
    format!("missing_{}", sanitize_dot_id(name))
}

fn escape_label(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Sanitize a string to be a valid DOT node ID.
fn sanitize_dot_id(s: &str) -> String {
    let cleaned: String = s
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    // DOT IDs must start with a letter or underscore
    if cleaned.starts_with(|c: char| c.is_ascii_digit()) {
        format!("n_{cleaned}")
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xplor_core::types::Document;
    use xplor_core::{Config, ScoringPipeline};

    fn diagram(docs: &[Document]) -> String {
        let analysis = ScoringPipeline::new(Config::default()).evaluate(docs);
        generate_graph_diagram(&analysis.graph, "moc")
    }

    #[test]
    fn test_diagram_nodes_and_edges() {
        let out = diagram(&[
            Document::new("maps/index.md", "---\ntype: moc\n---\n[[Skill A]]"),
            Document::new("Skill A.md", "Builds on [[gone]]."),
        ]);
        assert!(out.starts_with("digraph skills {"));
        assert!(out.contains("maps_index_md [label=\"index\", shape=folder"));
        assert!(out.contains("maps_index_md -> Skill_A_md [color=\"#1565c0\"];"));
        assert!(out.contains("missing_gone [label=\"gone\""));
        assert!(out.contains("Skill_A_md -> missing_gone [color=red, style=dashed"));
        assert!(out.trim_end().ends_with('}'));
    }

    #[test]
    fn test_diagram_extends_and_orphans() {
        let out = diagram(&[
            Document::new("base.md", ""),
            Document::new("child.md", "---\nextends: base\n---\n"),
            Document::new("lonely.md", "nothing here"),
        ]);
        assert!(out.contains("child_md -> base_md [style=bold"));
        assert!(out.contains("lonely_md [label=\"lonely\", color=\"#ef6c00\""));
        assert!(!out.contains("missing_"));
    }

    #[test]
    fn test_sanitize_dot_id() {
        assert_eq!(sanitize_dot_id("notes/a b.md"), "notes_a_b_md");
        assert_eq!(sanitize_dot_id("1st.md"), "n_1st_md");
    }

    #[test]
    fn test_label_escaping() {
        assert_eq!(escape_label("say \"hi\""), "say \\\"hi\\\"");
    }
}
