use xplor_core::links::LinkValidation;
use xplor_core::ScoreReport;

/// Format a score report as Markdown.
pub fn format_report(report: &ScoreReport) -> String {
    let mut out = String::new();

    out.push_str("# Xplor - Skill Graph Quality\n\n");

    if let Some(ref error) = report.error {
        out.push_str(&format!("**Error:** {error}\n\n"));
        out.push_str(&format!("**Score:** {}/100\n", report.score));
        return out;
    }

    out.push_str("## Score\n\n");
    out.push_str("| Metric | Value |\n");
    out.push_str("|--------|-------|\n");
    out.push_str(&format!("| **Score** | **{}/100** |\n", report.score));
    out.push_str(&format!("| Grade | {} |\n", report.grade));
    out.push_str(&format!(
        "| MOC coverage bonus | +{} |\n",
        report.bonuses.moc_coverage
    ));
    out.push_str(&format!(
        "| Link density bonus | +{} |\n",
        report.bonuses.link_density
    ));

    let s = &report.summary;
    out.push_str(&format!(
        "\n## Summary\n\n- **Nodes:** {}\n- **Edges:** {}\n- **Avg degree:** {:.2}\n- **MOC nodes:** {}\n- **Orphans:** {}\n- **Broken links:** {}\n",
        s.total_nodes, s.total_edges, s.avg_degree, s.moc_nodes, s.orphan_nodes, s.broken_links,
    ));

    if report.issues.is_empty() {
        out.push_str("\n## Issues\n\nNo issues found.\n");
    } else {
        out.push_str(&format!("\n## Issues ({})\n\n", report.issues.len()));
        out.push_str("| Severity | Type | Penalty | File | Message |\n");
        out.push_str("|----------|------|---------|------|---------|\n");
        for issue in &report.issues {
            out.push_str(&format!(
                "| {} | {} | {} | `{}` | {} |\n",
                issue.severity.to_string().to_uppercase(),
                issue.kind,
                issue.penalty,
                issue.file,
                escape_cell(&issue.message),
            ));
        }
    }

    if !report.recommendations.is_empty() {
        out.push_str("\n## Recommendations\n\n");
        for rec in &report.recommendations {
            out.push_str(&format!("- {}\n", rec.message));
        }
    }

    out
}

/// Format a link validation result as Markdown.
pub fn format_links(result: &LinkValidation) -> String {
    let mut out = String::new();
    out.push_str(&format!("# Link Validation: {}\n\n", result.status));
    out.push_str(&format!(
        "- **Valid:** {}\n- **Broken:** {}\n",
        result.valid_links, result.broken_links
    ));

    if !result.broken.is_empty() {
        out.push_str("\n| File | Target | Context |\n");
        out.push_str("|------|--------|---------|\n");
        for item in &result.broken {
            out.push_str(&format!(
                "| `{}` | {} | {} |\n",
                item.source_file,
                escape_cell(&item.target),
                escape_cell(&item.context),
            ));
        }
    }

    out
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
