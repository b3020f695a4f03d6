use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;

use crate::error::FrontmatterError;
use crate::types::{Document, NodeId};

static FRONTMATTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A---\s*\n(.*?)\n---\s*\n").expect("frontmatter pattern is valid")
});

pub(crate) static WIKILINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\]]+)\]\]").expect("wikilink pattern is valid"));

/// One parsed note. Immutable once produced by [`parse_document`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub id: NodeId,
    /// Explicit `name` from the header, else the filename stem.
    pub name: String,
    pub aliases: Vec<String>,
    pub description: Option<String>,
    /// The header's `type` key.
    pub kind: Option<String>,
    pub domain: Option<String>,
    pub tags: Vec<String>,
    pub extends: Vec<String>,
    pub contradicts: Vec<String>,
    /// Distinct raw cross-reference targets found in the body.
    pub references: BTreeSet<String>,
}

impl Node {
    pub fn stem(&self) -> &str {
        self.id.stem()
    }

    pub fn is_grouping(&self, grouping_kind: &str) -> bool {
        self.kind.as_deref() == Some(grouping_kind)
    }
}

/// Typed view of the recognized header keys. Unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct Frontmatter {
    #[serde(default, deserialize_with = "scalar")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "scalar")]
    pub description: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "scalar")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "scalar")]
    pub domain: Option<String>,
    #[serde(default, deserialize_with = "scalar_list")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "scalar_list")]
    pub aliases: Vec<String>,
    #[serde(default, deserialize_with = "scalar_list")]
    pub extends: Vec<String>,
    #[serde(default, deserialize_with = "scalar_list")]
    pub contradicts: Vec<String>,
}

fn scalar_text(value: Value) -> Result<Option<String>, String> {
    let text = match value {
        Value::Null => return Ok(None),
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => return Err(format!("expected a scalar, found {other:?}")),
    };
    let trimmed = text.trim();
    Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
}

fn scalar<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    scalar_text(Value::deserialize(d)?).map_err(D::Error::custom)
}

/// Accepts a single scalar or a sequence of scalars.
fn scalar_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    match Value::deserialize(d)? {
        Value::Sequence(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                if let Some(text) = scalar_text(item).map_err(D::Error::custom)? {
                    out.push(text);
                }
            }
            Ok(out)
        }
        other => Ok(scalar_text(other)
            .map_err(D::Error::custom)?
            .into_iter()
            .collect()),
    }
}

/// Split a document into its raw header (if any) and its body.
pub fn split_frontmatter(text: &str) -> (Option<&str>, &str) {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    match FRONTMATTER_RE.captures(text) {
        Some(caps) => {
            let header = caps.get(1).map(|m| m.as_str());
            let end = caps.get(0).map_or(0, |m| m.end());
            (header, &text[end..])
        }
        None => (None, text),
    }
}

/// Decode a raw header block into the recognized keys.
pub fn decode_frontmatter(raw: &str) -> Result<Frontmatter, FrontmatterError> {
    if raw.trim().is_empty() {
        return Err(FrontmatterError::Empty);
    }
    Ok(serde_yaml::from_str(raw)?)
}

/// All distinct cross-reference markers in `body`, case preserved.
pub fn extract_references(body: &str) -> BTreeSet<String> {
    WIKILINK_RE
        .captures_iter(body)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Parse one document into a node. Never fails: a malformed header degrades
/// to "no metadata" and the filename stem becomes the name.
pub fn parse_document(doc: &Document) -> Node {
    let (header, body) = split_frontmatter(&doc.content);

    let frontmatter = match header.map(decode_frontmatter) {
        Some(Ok(fm)) => fm,
        Some(Err(e)) => {
            tracing::debug!(file = %doc.id, error = %e, "ignoring metadata header");
            Frontmatter::default()
        }
        None => Frontmatter::default(),
    };

    let name = frontmatter
        .name
        .unwrap_or_else(|| doc.id.stem().to_string());

    Node {
        id: doc.id.clone(),
        name,
        aliases: frontmatter.aliases,
        description: frontmatter.description,
        kind: frontmatter.kind,
        domain: frontmatter.domain,
        tags: frontmatter.tags,
        extends: frontmatter.extends,
        contradicts: frontmatter.contradicts,
        references: extract_references(body),
    }
}
