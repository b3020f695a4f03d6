use thiserror::Error;

/// Recoverable failure while decoding a metadata header.
///
/// The parser never propagates this; a node whose header fails to decode is
/// treated as having no metadata at all.
#[derive(Debug, Error)]
pub enum FrontmatterError {
    #[error("header is not valid YAML for a note: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("header is empty")]
    Empty,
}
