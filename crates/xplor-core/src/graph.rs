use std::collections::{BTreeSet, HashMap};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::Serialize;

use crate::node::Node;
use crate::types::{EdgeKind, NodeId};

/// Normalize a name, alias or reference into a lookup key.
pub fn normalize_key(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

/// Immutable normalized-name → node lookup, built once per run.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    keys: HashMap<String, NodeIndex>,
}

impl NameIndex {
    /// Build from nodes in arena order. Names are claimed first, then
    /// filename stems, then aliases; the first node to claim a key keeps it.
    pub fn build<'a>(nodes: impl Iterator<Item = (NodeIndex, &'a Node)> + Clone) -> Self {
        let mut keys = HashMap::new();
        for (idx, node) in nodes.clone() {
            keys.entry(normalize_key(&node.name)).or_insert(idx);
        }
        for (idx, node) in nodes.clone() {
            keys.entry(normalize_key(node.stem())).or_insert(idx);
        }
        for (idx, node) in nodes {
            for alias in &node.aliases {
                keys.entry(normalize_key(alias)).or_insert(idx);
            }
        }
        Self { keys }
    }

    /// Resolve a raw reference target.
    pub fn resolve(&self, target: &str) -> Option<NodeIndex> {
        self.keys.get(&normalize_key(target)).copied()
    }
}

/// Where an edge points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeTarget {
    Node(NodeIndex),
    /// A reference that matched no key in the index.
    Unresolved(String),
}

/// A directed relation produced by the builder. Broken edges are kept here
/// but never enter the petgraph arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub source: NodeIndex,
    pub target: EdgeTarget,
    pub kind: EdgeKind,
}

impl Edge {
    pub fn is_broken(&self) -> bool {
        matches!(self.target, EdgeTarget::Unresolved(_))
    }
}

/// A reference that could not be resolved, kept for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokenLink {
    pub source: String,
    pub source_file: NodeId,
    pub target: String,
}

/// Valid in/out edge counts for one node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Degree {
    #[serde(rename = "in")]
    pub incoming: usize,
    #[serde(rename = "out")]
    pub outgoing: usize,
}

impl Degree {
    pub fn is_isolated(&self) -> bool {
        self.incoming == 0 && self.outgoing == 0
    }
}

/// The note graph: every parsed node in an arena, valid edges as graph edges,
/// plus the full ordered edge list including broken references.
pub struct SkillGraph {
    graph: DiGraph<Node, EdgeKind>,
    index: NameIndex,
    edges: Vec<Edge>,
    broken_links: Vec<BrokenLink>,
}

impl SkillGraph {
    /// Build the graph. `nodes` should already be in canonical (id) order.
    pub fn build(nodes: Vec<Node>, grouping_kind: &str) -> Self {
        let mut graph = DiGraph::with_capacity(nodes.len(), 0);
        for node in nodes {
            graph.add_node(node);
        }
        let index = NameIndex::build(graph.node_indices().map(|idx| (idx, &graph[idx])));

        let mut edges = Vec::new();
        let mut broken_links = Vec::new();

        for source in graph.node_indices() {
            let node = &graph[source];
            let inline_kind = if node.is_grouping(grouping_kind) {
                EdgeKind::Clusters
            } else {
                EdgeKind::References
            };

            for target_name in &node.references {
                match index.resolve(target_name) {
                    Some(target) => edges.push(Edge {
                        source,
                        target: EdgeTarget::Node(target),
                        kind: inline_kind,
                    }),
                    None => {
                        broken_links.push(BrokenLink {
                            source: node.name.clone(),
                            source_file: node.id.clone(),
                            target: target_name.clone(),
                        });
                        edges.push(Edge {
                            source,
                            target: EdgeTarget::Unresolved(target_name.clone()),
                            kind: EdgeKind::References,
                        });
                    }
                }
            }

            // Unresolved extends targets are dropped without a trace.
            for parent in &node.extends {
                if let Some(target) = index.resolve(parent) {
                    edges.push(Edge {
                        source,
                        target: EdgeTarget::Node(target),
                        kind: EdgeKind::Extends,
                    });
                }
            }
        }

        for edge in &edges {
            if let EdgeTarget::Node(target) = edge.target {
                graph.add_edge(edge.source, target, edge.kind);
            }
        }

        tracing::debug!(
            nodes = graph.node_count(),
            valid_edges = graph.edge_count(),
            broken = broken_links.len(),
            "built skill graph"
        );

        Self {
            graph,
            index,
            edges,
            broken_links,
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn node(&self, idx: NodeIndex) -> &Node {
        &self.graph[idx]
    }

    /// Nodes in arena order, with their indices.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &Node)> + '_ {
        self.graph
            .node_indices()
            .map(move |idx| (idx, &self.graph[idx]))
    }

    pub fn index(&self) -> &NameIndex {
        &self.index
    }

    /// All edges, broken ones included, in build order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn valid_edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn broken_links(&self) -> &[BrokenLink] {
        &self.broken_links
    }

    /// Valid-edge degree of a node. Self references count once each way.
    pub fn degree(&self, idx: NodeIndex) -> Degree {
        Degree {
            incoming: self.graph.edges_directed(idx, Direction::Incoming).count(),
            outgoing: self.graph.edges_directed(idx, Direction::Outgoing).count(),
        }
    }

    /// Nodes with no valid incoming or outgoing edges.
    pub fn orphans(&self) -> Vec<NodeIndex> {
        self.graph
            .node_indices()
            .filter(|&idx| self.degree(idx).is_isolated())
            .collect()
    }

    pub fn grouping_nodes(&self, grouping_kind: &str) -> Vec<NodeIndex> {
        self.graph
            .node_indices()
            .filter(|&idx| self.graph[idx].is_grouping(grouping_kind))
            .collect()
    }

    /// Distinct valid-edge targets reachable in one step from `sources`.
    pub fn covered_by(&self, sources: &[NodeIndex]) -> BTreeSet<NodeIndex> {
        sources
            .iter()
            .flat_map(|&src| self.graph.edges_directed(src, Direction::Outgoing))
            .map(|e| e.target())
            .collect()
    }

    /// Display name of an edge target.
    pub fn target_name<'a>(&'a self, target: &'a EdgeTarget) -> &'a str {
        match target {
            EdgeTarget::Node(idx) => &self.graph[*idx].name,
            EdgeTarget::Unresolved(name) => name,
        }
    }
}
