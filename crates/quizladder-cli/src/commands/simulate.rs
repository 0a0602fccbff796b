//! The `quizladder simulate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizladder_core::session::{run_session, NoopObserver};
use quizladder_core::statistics::session_stats;
use quizladder_core::traits::{ScriptedAnswers, SummarySink};
use quizladder_report::html::write_html_report;
use quizladder_report::HistoryStore;
use quizladder_sources::config::load_config_from;

/// Where and how the finished session is written.
pub struct Output {
    /// `text` or `json` on stdout.
    pub format: String,
    pub html: Option<PathBuf>,
    pub save: Option<PathBuf>,
}

pub async fn execute(
    bank_path: PathBuf,
    script: String,
    category: Option<String>,
    record: Option<String>,
    output: Output,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let mut answers = ScriptedAnswers::parse(&script)?;
    let config = load_config_from(config_path.as_deref())?;
    let bank = super::load_bank(Some(bank_path), None, &config, category.as_deref()).await?;

    let report = run_session(bank, record.clone(), &mut answers, &NoopObserver)?;

    match output.format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            println!(
                "Bank: {} ({} questions)",
                report.bank.name, report.bank.question_count
            );
            for (i, a) in report.answers.iter().enumerate() {
                println!(
                    "{:>3}. {:<24} {:<6} asked at {:<6} {}",
                    i + 1,
                    a.question_id,
                    a.tier.to_string(),
                    a.level.to_string(),
                    if a.correct { "correct" } else { "incorrect" }
                );
            }

            let order: Vec<&str> = report
                .answers
                .iter()
                .map(|a| a.question_id.as_str())
                .collect();
            println!("Order: {}", order.join(" "));

            if let Some(level) = session_stats(&report).highest_level {
                println!("Highest tier: {level}");
            }
            super::play::print_summary(&report);
        }
    }

    if record.is_some() {
        let store = HistoryStore::new(&config.history_dir);
        store.record(&report)?;
        eprintln!("Session recorded in {}", store.dir().display());
    }

    if let Some(path) = output.html {
        write_html_report(&report, &path)?;
        eprintln!("HTML report: {}", path.display());
    }

    if let Some(path) = output.save {
        report.save_json(&path)?;
        eprintln!("Session saved to: {}", path.display());
    }

    Ok(())
}
