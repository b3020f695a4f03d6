use serde::Serialize;

use xplor_core::types::{EdgeKind, NodeId};
use xplor_core::SkillGraph;

/// Serializable snapshot of a skill graph: nodes with degrees, edges with
/// their broken flag.
#[derive(Debug, Serialize)]
pub struct GraphExport {
    pub nodes: Vec<ExportNode>,
    pub edges: Vec<ExportEdge>,
}

#[derive(Debug, Serialize)]
pub struct ExportNode {
    pub name: String,
    pub id: NodeId,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub domain: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub contradicts: Vec<String>,
    pub in_degree: usize,
    pub out_degree: usize,
}

#[derive(Debug, Serialize)]
pub struct ExportEdge {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
    pub broken: bool,
}

impl GraphExport {
    pub fn from_graph(graph: &SkillGraph) -> Self {
        let nodes = graph
            .nodes()
            .map(|(idx, node)| {
                let degree = graph.degree(idx);
                ExportNode {
                    name: node.name.clone(),
                    id: node.id.clone(),
                    kind: node.kind.clone(),
                    domain: node.domain.clone(),
                    description: node.description.clone(),
                    tags: node.tags.clone(),
                    contradicts: node.contradicts.clone(),
                    in_degree: degree.incoming,
                    out_degree: degree.outgoing,
                }
            })
            .collect();

        let edges = graph
            .edges()
            .iter()
            .map(|edge| ExportEdge {
                source: graph.node(edge.source).name.clone(),
                target: graph.target_name(&edge.target).to_string(),
                kind: edge.kind,
                broken: edge.is_broken(),
            })
            .collect();

        Self { nodes, edges }
    }
}
