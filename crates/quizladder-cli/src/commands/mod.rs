pub mod history;
pub mod init;
pub mod play;
pub mod report;
pub mod simulate;
pub mod validate;

use std::path::PathBuf;

use anyhow::Result;

use quizladder_core::model::QuestionBank;
use quizladder_core::traits::QuestionSource;
use quizladder_sources::file::{merge_banks, FileSource};
use quizladder_sources::{create_source, fetch_all, QuizladderConfig};

/// Load the bank for a session: an explicit path wins, then the named
/// source, then the config's default source.
pub(crate) async fn load_bank(
    bank: Option<PathBuf>,
    source: Option<String>,
    config: &QuizladderConfig,
    category: Option<&str>,
) -> Result<QuestionBank> {
    let sources: Vec<Box<dyn QuestionSource>> = match (bank, source) {
        (Some(path), _) => vec![Box::new(FileSource::new(path))],
        (None, Some(name)) => vec![create_source(&name, config.source(&name)?)?],
        (None, None) => match &config.default_source {
            Some(name) => vec![create_source(name, config.source(name)?)?],
            None => anyhow::bail!(
                "no question bank given. Pass --bank, --source, or set default_source in quizladder.toml"
            ),
        },
    };

    let mut bank = merge_banks("session", fetch_all(&sources).await?)?;

    if let Some(filter) = category {
        let available: Vec<String> = bank.categories().into_iter().map(String::from).collect();
        let categories: Vec<&str> = filter
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();
        bank.filter_categories(&categories);
        anyhow::ensure!(
            !bank.questions.is_empty(),
            "no questions in categories: {filter}. Available: {available:?}"
        );
    }

    for warning in quizladder_core::parser::validate_bank(&bank) {
        tracing::warn!(
            bank = %bank.id,
            question = warning.question_id.as_deref().unwrap_or("-"),
            "{}",
            warning.message
        );
    }

    tracing::debug!(bank = %bank.id, questions = bank.questions.len(), "bank ready");
    Ok(bank)
}
