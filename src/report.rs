//! Rendering of batch summaries.

use crate::domain::BatchReport;
use std::fmt::Write;

/// Render a plain-text summary: one line per unit, the totals, then the failed names
pub fn render_text(report: &BatchReport) -> String {
    let width = report
        .units
        .iter()
        .map(|u| u.unit.name.len())
        .max()
        .unwrap_or(0);

    let mut text = String::new();
    for unit in &report.units {
        let detail = unit.outcome.detail();
        let line = format!(
            "{:<7}  {:<width$}  {}",
            unit.outcome.label(),
            unit.unit.name,
            detail,
            width = width
        );
        let _ = writeln!(text, "{}", line.trim_end());
    }

    let _ = write!(
        text,
        "{}: {} attempted, {} succeeded, {} failed",
        report.driver,
        report.attempted(),
        report.succeeded(),
        report.failed()
    );
    if report.aborted {
        text.push_str(" (aborted)");
    }
    text.push('\n');

    let failed: Vec<_> = report.failures().map(|u| u.unit.name.as_str()).collect();
    if !failed.is_empty() {
        let _ = writeln!(text, "failed: {}", failed.join(", "));
    }
    text
}

/// Render the report as pretty-printed JSON
pub fn render_json(report: &BatchReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}
