use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_FILE: &str = ".xplor.toml";

/// Top-level configuration from `.xplor.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub rules: RulesConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,
}

fn default_extensions() -> Vec<String> {
    vec!["md".to_string()]
}

fn default_exclude_patterns() -> Vec<String> {
    vec![
        "**/.git/**".to_string(),
        "**/node_modules/**".to_string(),
        "**/.obsidian/**".to_string(),
    ]
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            exclude_patterns: default_exclude_patterns(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphConfig {
    /// `type` value that marks a map-of-content node.
    #[serde(default = "default_grouping_kind")]
    pub grouping_kind: String,
}

fn default_grouping_kind() -> String {
    "moc".to_string()
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            grouping_kind: default_grouping_kind(),
        }
    }
}

/// Points deducted per occurrence of each defect. Values above `u16::MAX`
/// are rejected when the file is parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_broken_link")]
    pub broken_link: u16,
    #[serde(default = "default_missing_description")]
    pub missing_description: u16,
    #[serde(default = "default_orphan_node")]
    pub orphan_node: u16,
    #[serde(default = "default_missing_type")]
    pub missing_type: u16,
    #[serde(default = "default_missing_domain")]
    pub missing_domain: u16,
}

fn default_broken_link() -> u16 {
    10
}
fn default_missing_description() -> u16 {
    5
}
fn default_orphan_node() -> u16 {
    3
}
fn default_missing_type() -> u16 {
    2
}
fn default_missing_domain() -> u16 {
    1
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            broken_link: default_broken_link(),
            missing_description: default_missing_description(),
            orphan_node: default_orphan_node(),
            missing_type: default_missing_type(),
            missing_domain: default_missing_domain(),
        }
    }
}

/// Quality gate configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(default)]
    pub min_score: Option<u8>,
}

impl Config {
    /// Load configuration from a `.xplor.toml` file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        let config: Config = toml::from_str(&content).with_context(|| {
            format!(
                "failed to parse '{}'. Run `xplor init` to create a valid config file",
                path.display()
            )
        })?;
        Ok(config)
    }

    /// Load from `.xplor.toml` in the given directory or any ancestor, or return defaults.
    pub fn load_or_default(dir: &Path) -> Self {
        let start = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
        let mut current = start.as_path();
        loop {
            let config_path = current.join(CONFIG_FILE);
            if config_path.exists() {
                return match Self::load(&config_path) {
                    Ok(config) => {
                        tracing::debug!(path = %config_path.display(), "loaded config");
                        config
                    }
                    Err(e) => {
                        tracing::warn!(
                            "failed to load config from '{}': {e:#}. Using defaults.",
                            config_path.display()
                        );
                        Self::default()
                    }
                };
            }
            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }
        Self::default()
    }

    /// Generate default TOML content for `xplor init`.
    pub fn default_toml() -> String {
        r#"# Xplor - Skill Graph Quality Configuration

[project]
# File extensions scanned as notes
extensions = ["md"]
exclude_patterns = ["**/.git/**", "**/node_modules/**", "**/.obsidian/**"]

[graph]
# Notes whose `type` equals this value act as maps of content
grouping_kind = "moc"

[scoring]
# Points deducted per occurrence
broken_link = 10
missing_description = 5
orphan_node = 3
missing_type = 2
missing_domain = 1

[rules]
# Fail `xplor score` when the score drops below this value
# min_score = 70
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.project.extensions, vec!["md"]);
        assert_eq!(config.graph.grouping_kind, "moc");
        assert_eq!(config.scoring.broken_link, 10);
        assert_eq!(config.scoring.missing_domain, 1);
        assert!(config.rules.min_score.is_none());
    }

    #[test]
    fn test_default_toml_matches_defaults() {
        let config: Config = toml::from_str(&Config::default_toml()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let toml_str = r#"
[graph]
grouping_kind = "index"

[scoring]
broken_link = 20

[rules]
min_score = 60
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.graph.grouping_kind, "index");
        assert_eq!(config.scoring.broken_link, 20);
        assert_eq!(config.scoring.orphan_node, 3);
        assert_eq!(config.rules.min_score, Some(60));
        assert_eq!(config.project.extensions, vec!["md"]);
    }

    #[test]
    fn test_load_or_default_walks_up() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join(CONFIG_FILE),
            "[graph]\ngrouping_kind = \"hub\"\n",
        )
        .unwrap();
        let nested = tmp.path().join("notes/deep");
        std::fs::create_dir_all(&nested).unwrap();

        let config = Config::load_or_default(&nested);
        assert_eq!(config.graph.grouping_kind, "hub");
    }

    #[test]
    fn test_invalid_config_falls_back_to_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(CONFIG_FILE), "[scoring\nbroken").unwrap();
        let config = Config::load_or_default(tmp.path());
        assert_eq!(config, Config::default());
        assert!(Config::load(&tmp.path().join(CONFIG_FILE)).is_err());
    }

    #[test]
    fn test_oversized_penalty_rejected_with_context() {
        let tmp = tempfile::tempdir().unwrap();
        for value in ["2147483648", "4294967295", "65536", "-1"] {
            let path = tmp.path().join("big.toml");
            std::fs::write(&path, format!("[scoring]\nbroken_link = {value}\n")).unwrap();
            let err = Config::load(&path).expect_err("penalty out of range should not load");
            assert!(
                format!("{err:#}").contains("big.toml"),
                "error should name the file: {err:#}"
            );
        }

        let path = tmp.path().join("max.toml");
        std::fs::write(&path, "[scoring]\nbroken_link = 65535\n").unwrap();
        assert_eq!(Config::load(&path).unwrap().scoring.broken_link, u16::MAX);
    }
}
