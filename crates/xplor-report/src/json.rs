use serde::Serialize;

use xplor_core::links::LinkValidation;
use xplor_core::{ScoreReport, SkillGraph};

use crate::export::GraphExport;

fn to_json<T: Serialize>(value: &T, compact: bool) -> String {
    if compact {
        serde_json::to_string(value).expect("report types should be serializable")
    } else {
        serde_json::to_string_pretty(value).expect("report types should be serializable")
    }
}

/// Format a score report as JSON.
pub fn format_report(report: &ScoreReport, compact: bool) -> String {
    to_json(report, compact)
}

/// Wrapper for check output that adds pass/fail metadata.
#[derive(Debug, Serialize)]
pub struct CheckOutput<'a> {
    #[serde(flatten)]
    pub report: &'a ScoreReport,
    pub check: CheckStatus,
}

#[derive(Debug, Serialize)]
pub struct CheckStatus {
    pub passed: bool,
    pub threshold: u8,
}

/// Format a report with a quality gate as JSON. Returns (json_string, passed).
pub fn format_check(report: &ScoreReport, threshold: u8, compact: bool) -> (String, bool) {
    let passed = report.passes(threshold);
    let output = CheckOutput {
        report,
        check: CheckStatus { passed, threshold },
    };
    (to_json(&output, compact), passed)
}

/// Format a link validation result as JSON.
pub fn format_links(result: &LinkValidation, compact: bool) -> String {
    to_json(result, compact)
}

/// Export the graph's nodes and edges as JSON.
pub fn format_graph(graph: &SkillGraph, compact: bool) -> String {
    to_json(&GraphExport::from_graph(graph), compact)
}
