use serde::{Deserialize, Serialize};

use crate::config::{Config, ScoringConfig};
use crate::graph::SkillGraph;
use crate::types::{Grade, Issue, IssueKind, NodeId};

const BASE_SCORE: i64 = 100;
const MAX_BONUS: u32 = 10;
/// Below this final score the grouping-coverage hint is added.
const GROUPING_HINT_BELOW: u8 = 70;

/// Bonus points earned once per run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bonuses {
    pub moc_coverage: u32,
    pub link_density: u32,
}

/// A prioritized suggestion with the points it would recover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery: Option<u32>,
}

/// Everything the scoring rules derive from a graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Scorecard {
    pub score: u8,
    pub grade: Grade,
    pub issues: Vec<Issue>,
    pub bonuses: Bonuses,
    pub avg_degree: f64,
    pub recommendations: Vec<Recommendation>,
}

impl ScoringConfig {
    pub fn penalty(&self, kind: IssueKind) -> u16 {
        match kind {
            IssueKind::BrokenLink => self.broken_link,
            IssueKind::MissingDescription => self.missing_description,
            IssueKind::OrphanNode => self.orphan_node,
            IssueKind::MissingType => self.missing_type,
            IssueKind::MissingDomain => self.missing_domain,
        }
    }
}

/// Apply every rule to the graph and compute the final score.
pub fn score_graph(graph: &SkillGraph, config: &Config) -> Scorecard {
    let issues = detect_issues(graph, &config.scoring);
    let avg_degree = average_degree(graph);
    let bonuses = Bonuses {
        moc_coverage: coverage_bonus(graph, &config.graph.grouping_kind),
        link_density: density_bonus(avg_degree),
    };
    let score = final_score(&issues, bonuses);
    let recommendations = recommendations(&issues, score);

    Scorecard {
        score,
        grade: Grade::from_score(score),
        issues,
        bonuses,
        avg_degree,
        recommendations,
    }
}

/// Collect issues grouped by rule, in rule-table order.
pub fn detect_issues(graph: &SkillGraph, scoring: &ScoringConfig) -> Vec<Issue> {
    let mut issues = Vec::new();

    for link in graph.broken_links() {
        issues.push(make_issue(
            scoring,
            IssueKind::BrokenLink,
            format!("[[{}]] not found", link.target),
            &link.source,
            &link.source_file,
        ));
    }

    let checks: [(IssueKind, &str); 4] = [
        (
            IssueKind::MissingDescription,
            "Missing description in frontmatter",
        ),
        (
            IssueKind::OrphanNode,
            "Node has no connections (inDegree=0, outDegree=0)",
        ),
        (IssueKind::MissingType, "Missing type in frontmatter"),
        (IssueKind::MissingDomain, "Missing domain in frontmatter"),
    ];

    for (kind, message) in checks {
        for (idx, node) in graph.nodes() {
            let flagged = match kind {
                IssueKind::MissingDescription => node.description.is_none(),
                IssueKind::OrphanNode => graph.degree(idx).is_isolated(),
                IssueKind::MissingType => node.kind.is_none(),
                IssueKind::MissingDomain => node.domain.is_none(),
                IssueKind::BrokenLink => false,
            };
            if flagged {
                issues.push(make_issue(
                    scoring,
                    kind,
                    message.to_string(),
                    &node.name,
                    &node.id,
                ));
            }
        }
    }

    issues
}

fn make_issue(
    scoring: &ScoringConfig,
    kind: IssueKind,
    message: String,
    node: &str,
    file: &NodeId,
) -> Issue {
    Issue {
        severity: kind.severity(),
        kind,
        message,
        node: node.to_string(),
        file: file.clone(),
        penalty: -i32::from(scoring.penalty(kind)),
    }
}

/// Share of non-grouping nodes that some grouping node links to, scaled to 0-10.
pub fn coverage_bonus(graph: &SkillGraph, grouping_kind: &str) -> u32 {
    let groups = graph.grouping_nodes(grouping_kind);
    let non_grouping = graph.node_count() - groups.len();
    if non_grouping == 0 || groups.is_empty() {
        return 0;
    }
    let covered = graph.covered_by(&groups).len();
    let coverage = covered as f64 / non_grouping as f64;
    // Half-way cases round to even: 0.25 coverage earns 2.
    ((coverage * MAX_BONUS as f64).round_ties_even() as u32).min(MAX_BONUS)
}

/// Valid edges per node.
pub fn average_degree(graph: &SkillGraph) -> f64 {
    graph.valid_edge_count() as f64 / graph.node_count().max(1) as f64
}

/// Non-monotonic: moderately linked graphs earn the most.
pub fn density_bonus(avg_degree: f64) -> u32 {
    if avg_degree < 1.0 {
        0
    } else if avg_degree < 2.0 {
        3
    } else if avg_degree <= 4.0 {
        10
    } else if avg_degree <= 6.0 {
        7
    } else {
        4
    }
}

/// Base score plus penalties and bonuses, clamped to 0-100.
pub fn final_score(issues: &[Issue], bonuses: Bonuses) -> u8 {
    let penalties: i64 = issues.iter().map(|i| i.penalty as i64).sum();
    let raw = BASE_SCORE
        + penalties
        + bonuses.moc_coverage as i64
        + bonuses.link_density as i64;
    raw.clamp(0, 100) as u8
}

/// Suggestions in fixed priority order, derived from issue counts.
pub fn recommendations(issues: &[Issue], score: u8) -> Vec<Recommendation> {
    let tally = |kind: IssueKind| -> (usize, u32) {
        issues
            .iter()
            .filter(|i| i.kind == kind)
            .fold((0, 0u32), |(n, pts), i| {
                (n + 1, pts.saturating_add(i.penalty.unsigned_abs()))
            })
    };

    let mut recs = Vec::new();

    let (broken, pts) = tally(IssueKind::BrokenLink);
    if broken > 0 {
        recs.push(Recommendation {
            message: format!("Fix {broken} broken wikilinks, highest ROI (+{pts} pts)"),
            recovery: Some(pts),
        });
    }

    let (no_desc, pts) = tally(IssueKind::MissingDescription);
    if no_desc > 0 {
        recs.push(Recommendation {
            message: format!("Add descriptions to {no_desc} files (+{pts} pts)"),
            recovery: Some(pts),
        });
    }

    let (orphans, pts) = tally(IssueKind::OrphanNode);
    if orphans > 0 {
        recs.push(Recommendation {
            message: format!("Connect {orphans} orphan nodes to a MOC or peer (+{pts} pts)"),
            recovery: Some(pts),
        });
    }

    if score < GROUPING_HINT_BELOW {
        recs.push(Recommendation {
            message: "Consider adding MOC nodes if coverage < 60% of leaf nodes".to_string(),
            recovery: None,
        });
    }

    recs
}
