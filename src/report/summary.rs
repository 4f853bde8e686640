//! Markdown summary generation
//!
//! Renders a human-readable run summary: totals, status breakdown, and the
//! per-URL table a migration operator reads before importing a site.

use crate::report::{PageStatus, Report};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown summary for a finished run
pub fn generate_markdown_summary(
    report: &Report,
    seed: &str,
    config_hash: Option<&str>,
    output_path: &Path,
) -> crate::Result<()> {
    let markdown = format_markdown_summary(report, seed, config_hash);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a finished run as markdown
pub fn format_markdown_summary(report: &Report, seed: &str, config_hash: Option<&str>) -> String {
    let mut md = String::new();

    md.push_str("# Site-Scout Crawl Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Seed**: {}\n", seed));
    md.push_str(&format!("- **Started**: {}\n", report.started_at()));
    if let Some(finished) = report.finished_at() {
        md.push_str(&format!("- **Finished**: {}\n", finished));
    }
    if let Some(duration) = report.duration_seconds() {
        md.push_str(&format!("- **Duration**: {} seconds\n", duration));
    }
    if let Some(hash) = config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    // Totals
    let mut success = 0u64;
    let mut redirect = 0u64;
    let mut code_error = 0u64;
    let mut invalid = 0u64;
    let mut probe_failed = 0u64;
    let mut total_links = 0usize;
    let mut total_external = 0usize;
    let mut total_followed = 0usize;

    for row in report.rows() {
        match row.status {
            PageStatus::Success => success += 1,
            PageStatus::Redirect { .. } => redirect += 1,
            PageStatus::CodeError(_) => code_error += 1,
            PageStatus::Invalid(_) => invalid += 1,
            PageStatus::ProbeFailed(_) => probe_failed += 1,
        }
        total_links += row.nb_links;
        total_external += row.nb_links_external_host;
        total_followed += row.nb_links_to_follow;
    }

    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Pages Visited**: {}\n", report.crawled()));
    md.push_str(&format!("- **Links Found**: {}\n", total_links));
    md.push_str(&format!("- **Links Followed**: {}\n", total_followed));
    md.push_str(&format!("- **External Links**: {}\n\n", total_external));

    md.push_str("## Status Breakdown\n\n");
    md.push_str("| Status | Count |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Success | {} |\n", success));
    md.push_str(&format!("| Redirect | {} |\n", redirect));
    md.push_str(&format!("| Code error | {} |\n", code_error));
    md.push_str(&format!("| Invalid | {} |\n", invalid));
    md.push_str(&format!("| Unknown access failure | {} |\n\n", probe_failed));

    // Per-URL rows, in visitation order
    md.push_str("## Visited URLs\n\n");
    md.push_str("| URL | Status | Redirect | Links | Already processed | External | To follow |\n");
    md.push_str("|-----|--------|----------|-------|-------------------|----------|-----------|\n");
    for row in report.rows() {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} |\n",
            row.url,
            row.status,
            row.redirect_target().unwrap_or(""),
            row.nb_links,
            row.nb_links_already_processed,
            row.nb_links_external_host,
            row.nb_links_to_follow,
        ));
    }

    md
}
