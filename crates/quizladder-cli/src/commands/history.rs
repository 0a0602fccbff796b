//! The `quizladder history` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};
use serde::Serialize;

use quizladder_core::report::SessionReport;
use quizladder_core::statistics::{session_stats, user_progress, UserProgress};
use quizladder_report::history::ANONYMOUS;
use quizladder_report::HistoryStore;
use quizladder_sources::config::load_config_from;

#[derive(Serialize)]
struct HistoryOutput<'a> {
    user: &'a str,
    progress: UserProgress,
    sessions: &'a [SessionReport],
}

pub fn execute(user: Option<String>, format: String, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let user = user
        .or_else(|| config.user.clone())
        .unwrap_or_else(|| ANONYMOUS.to_string());

    let store = HistoryStore::new(&config.history_dir);
    let sessions = store.load(&user)?;
    let progress = user_progress(&sessions);

    if format == "json" {
        let output = HistoryOutput {
            user: &user,
            progress,
            sessions: &sessions,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if sessions.is_empty() {
        let known = store.users()?;
        println!("No sessions recorded for {user}.");
        if !known.is_empty() {
            println!("Users with history: {}", known.join(", "));
        }
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Date", "Bank", "Score", "Answered", "Accuracy", "Highest", "Status",
    ]);

    for report in &sessions {
        let highest = session_stats(report)
            .highest_level
            .map(|t| t.to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(report.started_at.format("%Y-%m-%d %H:%M")),
            Cell::new(&report.bank.name),
            Cell::new(format!("{}/{}", report.summary.score, report.summary.total)),
            Cell::new(report.summary.answered()),
            Cell::new(format!("{:.1}%", report.summary.accuracy() * 100.0)),
            Cell::new(highest),
            Cell::new(if report.completed {
                "complete"
            } else {
                "abandoned"
            }),
        ]);
    }

    println!("History for {user}");
    println!("{table}");
    println!(
        "{} session(s), {} completed, average accuracy {:.1}%, best score {}",
        progress.sessions,
        progress.completed_sessions,
        progress.average_accuracy * 100.0,
        progress.best_score
    );
    if let Some(delta) = progress.latest_delta {
        println!("Latest vs previous: {:+.1}%", delta * 100.0);
    }

    Ok(())
}
