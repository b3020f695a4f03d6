pub mod config;
pub mod error;
pub mod graph;
pub mod links;
pub mod node;
pub mod pipeline;
pub mod report;
pub mod scoring;
pub mod types;

pub use config::Config;
pub use graph::{NameIndex, SkillGraph};
pub use node::{parse_document, Node};
pub use pipeline::{FullAnalysis, ScoringPipeline};
pub use report::ScoreReport;
pub use types::*;
