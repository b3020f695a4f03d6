use serde::{Deserialize, Serialize};

use crate::graph::SkillGraph;
use crate::scoring::{Bonuses, Recommendation, Scorecard};
use crate::types::{Grade, Issue};

pub const NO_DOCUMENTS: &str = "No markdown files found";

/// Graph-wide counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_nodes: usize,
    /// Valid (resolved) edges only.
    pub total_edges: usize,
    pub broken_links: usize,
    pub orphan_nodes: usize,
    pub moc_nodes: usize,
    /// Valid edges per node, rounded to two decimals.
    pub avg_degree: f64,
}

/// Complete, deterministic output of one scoring run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub score: u8,
    pub grade: Grade,
    pub summary: Summary,
    pub bonuses: Bonuses,
    pub issues: Vec<Issue>,
    pub recommendations: Vec<Recommendation>,
    /// Set when the run could not score anything.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScoreReport {
    /// Report for an input set with no documents.
    pub fn empty() -> Self {
        Self {
            score: 0,
            grade: Grade::Critical,
            summary: Summary::default(),
            bonuses: Bonuses::default(),
            issues: Vec::new(),
            recommendations: Vec::new(),
            error: Some(NO_DOCUMENTS.to_string()),
        }
    }

    pub fn passes(&self, threshold: u8) -> bool {
        self.score >= threshold
    }
}

/// Package graph counters and a scorecard into a report.
pub fn assemble(graph: &SkillGraph, card: Scorecard, grouping_kind: &str) -> ScoreReport {
    let summary = Summary {
        total_nodes: graph.node_count(),
        total_edges: graph.valid_edge_count(),
        broken_links: graph.broken_links().len(),
        orphan_nodes: graph.orphans().len(),
        moc_nodes: graph.grouping_nodes(grouping_kind).len(),
        avg_degree: round2(card.avg_degree),
    };

    ScoreReport {
        score: card.score,
        grade: card.grade,
        summary,
        bonuses: card.bonuses,
        issues: card.issues,
        recommendations: card.recommendations,
        error: None,
    }
}

/// Half-way cases round to even.
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
