//! Session report types with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{QuestionBank, Tier};
use crate::scorer::SessionSummary;

/// Everything known about one session once it ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Unique session identifier.
    pub id: Uuid,
    /// Test-taker, if known.
    #[serde(default)]
    pub user: Option<String>,
    /// The bank the questions came from.
    pub bank: BankSummary,
    /// When the first question was produced.
    pub started_at: DateTime<Utc>,
    /// When the report was taken.
    pub finished_at: DateTime<Utc>,
    /// Final score.
    pub summary: SessionSummary,
    /// Answered questions in the order they were asked.
    pub answers: Vec<AnsweredQuestion>,
    /// False if the session was abandoned before the pool was exhausted.
    pub completed: bool,
}

/// Summary of a bank (without the questions themselves).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankSummary {
    pub id: String,
    pub name: String,
    pub question_count: usize,
}

impl From<&QuestionBank> for BankSummary {
    fn from(bank: &QuestionBank) -> Self {
        Self {
            id: bank.id.clone(),
            name: bank.name.clone(),
            question_count: bank.questions.len(),
        }
    }
}

/// One answered question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnsweredQuestion {
    pub question_id: String,
    /// The question's own tier.
    pub tier: Tier,
    /// The controller's tier when the question was asked.
    pub level: Tier,
    pub category: String,
    pub correct: bool,
}

impl SessionReport {
    /// Wall-clock length of the session in seconds.
    pub fn duration_secs(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: SessionReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_report() -> SessionReport {
        let started_at = Utc::now();
        SessionReport {
            id: Uuid::nil(),
            user: Some("ada".into()),
            bank: BankSummary {
                id: "general".into(),
                name: "General".into(),
                question_count: 2,
            },
            started_at,
            finished_at: started_at + chrono::Duration::seconds(42),
            summary: SessionSummary {
                score: 1,
                correct: 1,
                incorrect: 1,
                total: 2,
            },
            answers: vec![
                AnsweredQuestion {
                    question_id: "q1".into(),
                    tier: Tier::Easy,
                    level: Tier::Easy,
                    category: "science".into(),
                    correct: true,
                },
                AnsweredQuestion {
                    question_id: "q2".into(),
                    tier: Tier::Medium,
                    level: Tier::Easy,
                    category: "science".into(),
                    correct: false,
                },
            ],
            completed: true,
        }
    }

    #[test]
    fn json_file_survives_reload() {
        let report = make_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        report.save_json(&path).unwrap();
        let loaded = SessionReport::load_json(&path).unwrap();

        assert_eq!(loaded.user.as_deref(), Some("ada"));
        assert_eq!(loaded.answers, report.answers);
        assert_eq!(loaded.duration_secs(), 42);
    }

    #[test]
    fn load_missing_file_fails_with_path() {
        let err = SessionReport::load_json(Path::new("no/such/session.json")).unwrap_err();
        assert!(format!("{err:#}").contains("no/such/session.json"));
    }
}
