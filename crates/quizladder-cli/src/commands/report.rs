//! The `quizladder report` command.

use std::path::PathBuf;

use anyhow::Result;

use quizladder_core::report::SessionReport;
use quizladder_report::html::write_html_report;

pub fn execute(session_path: PathBuf, html: PathBuf) -> Result<()> {
    let report = SessionReport::load_json(&session_path)?;
    write_html_report(&report, &html)?;

    println!(
        "Session {} on {}: {}/{} ({} answered)",
        report.id,
        report.bank.name,
        report.summary.score,
        report.summary.total,
        report.summary.answered()
    );
    println!("HTML report: {}", html.display());
    Ok(())
}
