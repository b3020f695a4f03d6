use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::graph::NameIndex;
use crate::node::{split_frontmatter, WIKILINK_RE};
use crate::types::{Document, NodeId};

/// A run of text up to sentence punctuation or a newline that holds a marker.
static SENTENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^.!?\n]*\[\[[^\]]+\]\][^.!?\n]*[.!?\n]?").expect("sentence pattern is valid")
});

const CONTEXT_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LinkStatus {
    Pass,
    Fail,
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkStatus::Pass => write!(f, "PASS"),
            LinkStatus::Fail => write!(f, "FAIL"),
        }
    }
}

/// One unresolved marker occurrence with the sentence around it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokenLinkContext {
    pub source_file: NodeId,
    pub source_name: String,
    pub target: String,
    pub context: String,
}

/// Occurrence-level cross-reference check over every document body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkValidation {
    pub valid_links: usize,
    pub broken_links: usize,
    pub broken: Vec<BrokenLinkContext>,
    pub status: LinkStatus,
}

impl LinkValidation {
    pub fn passed(&self) -> bool {
        self.status == LinkStatus::Pass
    }
}

/// Check every marker occurrence (duplicates included) against the index.
pub fn validate_links<'a>(
    documents: impl IntoIterator<Item = &'a Document>,
    index: &NameIndex,
) -> LinkValidation {
    let mut valid_links = 0usize;
    let mut broken = Vec::new();

    for doc in documents {
        let (_, body) = split_frontmatter(&doc.content);
        for sentence_match in SENTENCE_RE.find_iter(body) {
            let sentence = sentence_match.as_str().trim();
            for caps in WIKILINK_RE.captures_iter(sentence) {
                let Some(target) = caps.get(1).map(|m| m.as_str()) else {
                    continue;
                };
                if index.resolve(target).is_some() {
                    valid_links += 1;
                } else {
                    broken.push(BrokenLinkContext {
                        source_file: doc.id.clone(),
                        source_name: doc.id.stem().to_string(),
                        target: target.to_string(),
                        context: sentence.chars().take(CONTEXT_CHARS).collect(),
                    });
                }
            }
        }
    }

    let status = if broken.is_empty() {
        LinkStatus::Pass
    } else {
        LinkStatus::Fail
    };

    LinkValidation {
        valid_links,
        broken_links: broken.len(),
        broken,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::SkillGraph;
    use crate::node::parse_document;

    fn run(docs: &[Document]) -> LinkValidation {
        let nodes = docs.iter().map(parse_document).collect();
        let graph = SkillGraph::build(nodes, "moc");
        validate_links(docs, graph.index())
    }

    #[test]
    fn test_all_links_valid() {
        let docs = vec![
            Document::new("a.md", "See [[b]]. Then [[B]] again."),
            Document::new("b.md", "Back to [[a]]!"),
        ];
        let result = run(&docs);
        assert_eq!(result.valid_links, 3, "occurrences are not deduplicated");
        assert_eq!(result.broken_links, 0);
        assert!(result.passed());
    }

    #[test]
    fn test_broken_link_has_sentence_context() {
        let docs = vec![Document::new(
            "notes/a.md",
            "---\nname: Alpha\n---\nFirst line. This points at [[Ghost]] and [[a]]? Done.\n",
        )];
        let result = run(&docs);
        assert_eq!(result.status, LinkStatus::Fail);
        assert_eq!(result.valid_links, 1);
        assert_eq!(result.broken.len(), 1);
        let item = &result.broken[0];
        assert_eq!(item.target, "Ghost");
        assert_eq!(item.source_name, "a");
        assert_eq!(item.source_file.0, "notes/a.md");
        assert_eq!(item.context, "This points at [[Ghost]] and [[a]]?");
    }

    #[test]
    fn test_context_truncated() {
        let long = "x".repeat(500);
        let docs = vec![Document::new("a.md", format!("{long} [[missing]] {long}"))];
        let result = run(&docs);
        assert_eq!(result.broken[0].context.chars().count(), CONTEXT_CHARS);
    }

    #[test]
    fn test_header_links_ignored() {
        let docs = vec![Document::new(
            "a.md",
            "---\ndescription: \"[[Nope]]\"\n---\nplain body\n",
        )];
        let result = run(&docs);
        assert_eq!(result.valid_links + result.broken_links, 0);
        assert!(result.passed());
    }

    #[test]
    fn test_status_serializes_uppercase() {
        let result = run(&[]);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "PASS");
    }
}
