//! TOML bank file source.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::instrument;

use quizladder_core::model::QuestionBank;
use quizladder_core::parser::load_banks;
use quizladder_core::traits::QuestionSource;

/// Reads a bank file, or every bank file under a directory.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Merge several banks into one, keeping file order and question order.
pub fn merge_banks(fallback_id: &str, banks: Vec<QuestionBank>) -> Result<QuestionBank> {
    let mut banks = banks.into_iter();
    let mut merged = banks
        .next()
        .with_context(|| format!("no question banks found in {fallback_id}"))?;

    let mut merged_any = false;
    for bank in banks {
        merged.name = format!("{} + {}", merged.name, bank.name);
        merged.merge(bank);
        merged_any = true;
    }
    if merged_any {
        merged.id = fallback_id.to_string();
        merged.description = String::new();
    }

    Ok(merged)
}

#[async_trait]
impl QuestionSource for FileSource {
    fn name(&self) -> &str {
        "file"
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn fetch(&self) -> Result<QuestionBank> {
        let path = self.path.clone();
        let banks = tokio::task::spawn_blocking(move || load_banks(&path))
            .await
            .context("bank loading task panicked")??;

        let fallback_id = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "bank".to_string());
        let bank = merge_banks(&fallback_id, banks)?;
        tracing::debug!(bank = %bank.id, questions = bank.questions.len(), "loaded bank");
        Ok(bank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank_toml(id: &str, question: &str, tier: &str) -> String {
        format!(
            r#"
[bank]
id = "{id}"
name = "{id} name"

[[questions]]
id = "{question}"
prompt = "Pick yes"
choices = ["yes", "no"]
answer = "yes"
tier = "{tier}"
"#
        )
    }

    #[tokio::test]
    async fn reads_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("one.toml");
        std::fs::write(&path, bank_toml("one", "q1", "easy")).unwrap();

        let bank = FileSource::new(&path).fetch().await.unwrap();
        assert_eq!(bank.id, "one");
        assert_eq!(bank.questions.len(), 1);
    }

    #[tokio::test]
    async fn merges_directory_in_file_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.toml"), bank_toml("b", "qb", "hard")).unwrap();
        std::fs::write(dir.path().join("a.toml"), bank_toml("a", "qa", "easy")).unwrap();

        let bank = FileSource::new(dir.path()).fetch().await.unwrap();
        let ids: Vec<&str> = bank.questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["qa", "qb"]);
        assert_eq!(bank.name, "a name + b name");
    }

    #[tokio::test]
    async fn empty_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileSource::new(dir.path()).fetch().await.unwrap_err();
        assert!(err.to_string().contains("no question banks"));
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let err = FileSource::new("does/not/exist.toml")
            .fetch()
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("does/not/exist.toml"));
    }
}
