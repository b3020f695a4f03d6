use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier for a document: its path relative to the scanned root,
/// always with `/` separators.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(path: &str) -> Self {
        Self(path.replace('\\', "/"))
    }

    /// File name without directory or extension.
    pub fn stem(&self) -> &str {
        let file = self.0.rsplit('/').next().unwrap_or(&self.0);
        match file.rfind('.') {
            Some(dot) if dot > 0 => &file[..dot],
            _ => file,
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One raw input document, as handed over by the loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: NodeId,
    pub content: String,
}

impl Document {
    pub fn new(id: &str, content: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(id),
            content: content.into(),
        }
    }
}

/// Kind of relation between two notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeKind {
    /// Inline cross-reference from an ordinary note.
    References,
    /// Inline cross-reference from a grouping (map-of-content) note.
    Clusters,
    /// Declared hierarchy link from the `extends` header key.
    Extends,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeKind::References => write!(f, "REFERENCES"),
            EdgeKind::Clusters => write!(f, "CLUSTERS"),
            EdgeKind::Extends => write!(f, "EXTENDS"),
        }
    }
}

/// Severity of a graph issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Rule that produced an issue. Declaration order is the canonical report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueKind {
    BrokenLink,
    MissingDescription,
    OrphanNode,
    MissingType,
    MissingDomain,
}

impl IssueKind {
    pub const ALL: [IssueKind; 5] = [
        IssueKind::BrokenLink,
        IssueKind::MissingDescription,
        IssueKind::OrphanNode,
        IssueKind::MissingType,
        IssueKind::MissingDomain,
    ];

    pub fn severity(&self) -> Severity {
        match self {
            IssueKind::BrokenLink => Severity::Error,
            IssueKind::MissingDescription | IssueKind::OrphanNode => Severity::Warning,
            IssueKind::MissingType | IssueKind::MissingDomain => Severity::Info,
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::BrokenLink => write!(f, "BROKEN_LINK"),
            IssueKind::MissingDescription => write!(f, "MISSING_DESCRIPTION"),
            IssueKind::OrphanNode => write!(f, "ORPHAN_NODE"),
            IssueKind::MissingType => write!(f, "MISSING_TYPE"),
            IssueKind::MissingDomain => write!(f, "MISSING_DOMAIN"),
        }
    }
}

/// A single scored defect in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub message: String,
    /// Display name of the originating node.
    pub node: String,
    pub file: NodeId,
    /// Point delta applied to the score (always negative or zero).
    pub penalty: i32,
}

/// Quality band for a final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    Excellent,
    Good,
    Fair,
    Poor,
    Critical,
}

impl Grade {
    /// Bands are inclusive at their lower bound.
    pub fn from_score(score: u8) -> Self {
        match score {
            90.. => Grade::Excellent,
            75..=89 => Grade::Good,
            50..=74 => Grade::Fair,
            25..=49 => Grade::Poor,
            _ => Grade::Critical,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grade::Excellent => write!(f, "Excellent"),
            Grade::Good => write!(f, "Good"),
            Grade::Fair => write!(f, "Fair"),
            Grade::Poor => write!(f, "Poor"),
            Grade::Critical => write!(f, "Critical"),
        }
    }
}
