use colored::Colorize;

use xplor_core::links::LinkValidation;
use xplor_core::types::Severity;
use xplor_core::ScoreReport;

const RULE_WIDTH: usize = 60;

/// Format a full score report for terminal output.
pub fn format_report(report: &ScoreReport) -> String {
    let mut out = String::new();
    let rule = "=".repeat(RULE_WIDTH);

    out.push_str(&format!("\n{rule}\n"));
    out.push_str(&format!("  {}\n", "Xplor Skill Graph Quality Score".bold()));
    out.push_str(&format!("{rule}\n"));

    if let Some(ref error) = report.error {
        out.push_str(&format!("  {}: {error}\n", "Error".red().bold()));
        out.push_str(&format!("  Score: {}/100\n", report.score));
        out.push_str(&format!("{rule}\n\n"));
        return out;
    }

    let score_str = format!("{}/100", report.score);
    let score_colored = if report.score >= 75 {
        score_str.green()
    } else if report.score >= 50 {
        score_str.yellow()
    } else {
        score_str.red()
    };
    out.push_str(&format!(
        "  Score: {}  ({})\n",
        score_colored.bold(),
        report.grade
    ));

    let s = &report.summary;
    out.push_str(&format!(
        "  Nodes: {}  |  Edges: {}  |  Avg Degree: {:.2}\n",
        s.total_nodes, s.total_edges, s.avg_degree
    ));
    out.push_str(&format!(
        "  MOC nodes: {}  |  Orphans: {}  |  Broken links: {}\n",
        s.moc_nodes, s.orphan_nodes, s.broken_links
    ));
    out.push_str(&format!(
        "\n  Bonuses: MOC coverage +{}  |  Link density +{}\n",
        report.bonuses.moc_coverage, report.bonuses.link_density
    ));

    if report.issues.is_empty() {
        out.push_str(&format!("\n  {}\n", "No issues found!".green().bold()));
    } else {
        out.push_str(&format!("\n  Issues ({}):\n", report.issues.len()));
        for issue in &report.issues {
            let label = format!("{:7}", issue.severity.to_string().to_uppercase());
            let severity_str = match issue.severity {
                Severity::Error => label.red().bold(),
                Severity::Warning => label.yellow().bold(),
                Severity::Info => label.blue().bold(),
            };
            let kind = issue.kind.to_string();
            out.push_str(&format!(
                "    [{severity_str}] {kind:22} {:4}  {}\n",
                issue.penalty,
                issue.file.0.rsplit('/').next().unwrap_or(&issue.file.0),
            ));
            out.push_str(&format!("      {}\n", issue.message.dimmed()));
        }
    }

    if !report.recommendations.is_empty() {
        out.push_str(&format!("\n  {}:\n", "Recommendations".bold()));
        for rec in &report.recommendations {
            out.push_str(&format!("    {} {}\n", "→".cyan(), rec.message));
        }
    }

    out.push_str(&format!("{rule}\n\n"));
    out
}

/// Format a report followed by a quality gate line. Returns (text, passed).
pub fn format_check(report: &ScoreReport, threshold: u8) -> (String, bool) {
    let passed = report.passes(threshold);
    let mut out = format_report(report);

    if passed {
        out.push_str(&format!(
            "{} (score {} >= {threshold})\n",
            "CHECK PASSED".green().bold(),
            report.score
        ));
    } else {
        out.push_str(&format!(
            "{}: score {} is below threshold {threshold}\n",
            "CHECK FAILED".red().bold(),
            report.score
        ));
    }

    (out, passed)
}

/// Format a link validation result for terminal output.
pub fn format_links(result: &LinkValidation) -> String {
    let mut out = String::new();
    let status = if result.passed() {
        result.status.to_string().green().bold()
    } else {
        result.status.to_string().red().bold()
    };

    out.push_str(&format!("\nLink Validation: {status}\n"));
    out.push_str(&format!(
        "   Valid: {}  |  Broken: {}\n",
        result.valid_links, result.broken_links
    ));

    if !result.broken.is_empty() {
        out.push_str(&format!("\n{}:\n", "Broken Links".bold()));
        for item in &result.broken {
            let context: String = item.context.chars().take(100).collect();
            out.push_str(&format!(
                "  {} → [[{}]]\n",
                item.source_file, item.target
            ));
            out.push_str(&format!("    Context: {context}...\n\n"));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use xplor_core::types::Document;
    use xplor_core::{Config, ScoringPipeline};

    fn analysis(docs: &[Document]) -> xplor_core::FullAnalysis {
        colored::control::set_override(false);
        ScoringPipeline::new(Config::default()).evaluate(docs)
    }

    #[test]
    fn test_format_report_lists_issues_and_recommendations() {
        let result = analysis(&[Document::new("notes/a.md", "[[ghost]]")]);
        let text = format_report(&result.report);
        assert!(text.contains("Score: 79/100"), "{text}");
        assert!(text.contains("BROKEN_LINK"));
        assert!(text.contains("a.md"));
        assert!(text.contains("[[ghost]] not found"));
        assert!(text.contains("Fix 1 broken wikilinks"));
    }

    #[test]
    fn test_format_report_empty_input() {
        let result = analysis(&[]);
        let text = format_report(&result.report);
        assert!(text.contains("No markdown files found"));
        assert!(text.contains("Score: 0/100"));
    }

    #[test]
    fn test_format_check_gate() {
        let result = analysis(&[Document::new("a.md", "[[ghost]]")]);
        let (text, passed) = format_check(&result.report, 90);
        assert!(!passed);
        assert!(text.contains("CHECK FAILED"));

        let (text, passed) = format_check(&result.report, 10);
        assert!(passed);
        assert!(text.contains("CHECK PASSED"));
    }

    #[test]
    fn test_format_links() {
        let result = analysis(&[Document::new("a.md", "Goes to [[nowhere]].")]);
        let text = format_links(&result.links);
        assert!(text.contains("FAIL"));
        assert!(text.contains("a.md → [[nowhere]]"));
        assert!(text.contains("Goes to [[nowhere]]."));
    }
}
