// Report generation from a crawl outcome

use crate::crawl::CrawlOutcome;
use chrono::Local;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

/// Render a crawl outcome for the terminal or for a report file.
pub fn generate_crawl_report(outcome: &CrawlOutcome, format: ReportFormat) -> String {
    match format {
        ReportFormat::Json => {
            serde_json::to_string_pretty(outcome).unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e))
        }
        ReportFormat::Text => text_report(outcome),
    }
}

fn text_report(outcome: &CrawlOutcome) -> String {
    let summary = &outcome.summary;
    let total_rows: usize = outcome.artifacts.iter().map(|a| a.rows).sum();

    let mut report = String::new();
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    report.push_str("# Summary:\n");
    report.push_str(&format!("  Generated: {}\n", Local::now().format("%Y-%m-%d %H:%M:%S")));
    report.push_str(&format!("  Regions visited: {}\n", summary.regions));
    report.push_str(&format!(
        "  Projects crawled: {} ({} skipped as already persisted)\n",
        summary.projects_crawled, summary.projects_skipped
    ));
    report.push_str(&format!("  Buildings: {}\n", summary.buildings));
    report.push_str(&format!("  Floors: {}\n", summary.floors));
    report.push_str(&format!("  Units: {}\n", summary.units));
    report.push_str(&format!("  Timeouts skipped over: {}\n", summary.timeouts));
    report.push_str(&format!("  Rows written: {}\n", total_rows));

    report.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    // Group artifacts by region
    let mut by_region: BTreeMap<&str, Vec<&crate::crawl::ArtifactRecord>> = BTreeMap::new();
    for artifact in &outcome.artifacts {
        by_region.entry(&artifact.region).or_default().push(artifact);
    }

    for (region, artifacts) in by_region {
        report.push_str(&format!("## {}\n", region));
        report.push_str(&format!("  {} artifacts written\n\n", artifacts.len()));
        for artifact in artifacts {
            report.push_str(&format!(
                "  {} rows  {}  ({})\n",
                artifact.rows,
                artifact.project,
                artifact.path.display()
            ));
        }
        report.push('\n');
    }

    report
}
