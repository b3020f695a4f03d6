use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::config::{Config, ProjectConfig};
use crate::graph::SkillGraph;
use crate::links::{self, LinkValidation};
use crate::node::{parse_document, Node};
use crate::report::{self, ScoreReport};
use crate::scoring;
use crate::types::Document;

/// Full scoring output including the graph for export.
pub struct FullAnalysis {
    pub report: ScoreReport,
    pub graph: SkillGraph,
    pub links: LinkValidation,
}

fn build_globset(patterns: &[String]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        match Glob::new(pattern) {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(e) => tracing::warn!("ignoring invalid exclude pattern '{pattern}': {e}"),
        }
    }
    builder.build().unwrap_or_else(|e| {
        tracing::warn!("failed to compile exclude patterns: {e}");
        GlobSet::empty()
    })
}

/// Collect every note under `root`, sorted by id. A file root yields just
/// that note. Unreadable files are skipped; invalid UTF-8 is replaced rather
/// than rejected.
pub fn load_documents(root: &Path, project: &ProjectConfig) -> Result<Vec<Document>> {
    if !root.exists() {
        bail!("path '{}' does not exist", root.display());
    }

    // A single-file root is identified by its file name.
    let base = if root.is_file() {
        root.parent().unwrap_or(root)
    } else {
        root
    };
    let excludes = build_globset(&project.exclude_patterns);
    let extensions = &project.extensions;

    let files: Vec<(PathBuf, String)> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .is_some_and(|ext| extensions.iter().any(|x| ext == x.as_str()))
        })
        .filter_map(|e| {
            let rel = e
                .path()
                .strip_prefix(base)
                .unwrap_or(e.path())
                .to_string_lossy()
                .replace('\\', "/");
            if excludes.is_match(&rel) {
                tracing::debug!(file = %rel, "excluded");
                return None;
            }
            Some((e.into_path(), rel))
        })
        .collect();

    let mut documents: Vec<Document> = files
        .par_iter()
        .filter_map(|(path, rel)| match std::fs::read(path) {
            Ok(bytes) => Some(Document::new(rel, String::from_utf8_lossy(&bytes))),
            Err(e) => {
                tracing::warn!("failed to read {}: {e}", path.display());
                None
            }
        })
        .collect();

    documents.sort_by(|a, b| a.id.cmp(&b.id));
    tracing::debug!(count = documents.len(), root = %root.display(), "loaded documents");
    Ok(documents)
}

/// Loader → parser → builder → scoring → report.
pub struct ScoringPipeline {
    config: Config,
}

impl ScoringPipeline {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Load every note under `root` and score it.
    pub fn analyze(&self, root: &Path) -> Result<FullAnalysis> {
        let documents = load_documents(root, &self.config.project)?;
        Ok(self.evaluate(&documents))
    }

    /// Score an in-memory document set. Input order does not matter.
    pub fn evaluate(&self, documents: &[Document]) -> FullAnalysis {
        let mut sorted: Vec<&Document> = documents.iter().collect();
        sorted.sort_by(|a, b| a.id.cmp(&b.id));

        let nodes: Vec<Node> = sorted.par_iter().map(|doc| parse_document(doc)).collect();
        let grouping_kind = &self.config.graph.grouping_kind;
        let graph = SkillGraph::build(nodes, grouping_kind);
        let links = links::validate_links(sorted.iter().copied(), graph.index());

        if graph.node_count() == 0 {
            return FullAnalysis {
                report: ScoreReport::empty(),
                graph,
                links,
            };
        }

        let card = scoring::score_graph(&graph, &self.config);
        let report = report::assemble(&graph, card, grouping_kind);
        tracing::info!(
            score = report.score,
            grade = %report.grade,
            issues = report.issues.len(),
            "scored skill graph"
        );

        FullAnalysis {
            report,
            graph,
            links,
        }
    }
}
