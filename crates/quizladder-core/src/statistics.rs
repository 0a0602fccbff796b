//! Per-session breakdowns and progress across sessions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::Tier;
use crate::report::SessionReport;

/// Asked/correct counts for one slice of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub asked: u32,
    pub correct: u32,
}

impl Tally {
    fn add(&mut self, correct: bool) {
        self.asked += 1;
        if correct {
            self.correct += 1;
        }
    }

    /// Fraction correct, 0.0 if nothing was asked.
    pub fn accuracy(&self) -> f64 {
        if self.asked == 0 {
            0.0
        } else {
            self.correct as f64 / self.asked as f64
        }
    }
}

/// Breakdown of a single session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    /// Keyed by the question's own tier.
    pub per_tier: BTreeMap<Tier, Tally>,
    /// Keyed by category label.
    pub per_category: BTreeMap<String, Tally>,
    /// Highest controller tier the test-taker worked at.
    pub highest_level: Option<Tier>,
}

/// Compute the breakdown of one report.
pub fn session_stats(report: &SessionReport) -> SessionStats {
    let mut per_tier: BTreeMap<Tier, Tally> = BTreeMap::new();
    let mut per_category: BTreeMap<String, Tally> = BTreeMap::new();

    for answer in &report.answers {
        per_tier.entry(answer.tier).or_default().add(answer.correct);
        per_category
            .entry(answer.category.clone())
            .or_default()
            .add(answer.correct);
    }

    SessionStats {
        per_tier,
        per_category,
        highest_level: report.answers.iter().map(|a| a.level).max(),
    }
}

/// A test-taker's progress over their recorded sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProgress {
    /// Recorded sessions, completed or not.
    pub sessions: usize,
    /// Sessions that ran the pool to exhaustion.
    pub completed_sessions: usize,
    /// Mean accuracy over sessions with at least one answer.
    pub average_accuracy: f64,
    /// Best score of any session.
    pub best_score: u32,
    /// Highest controller tier reached in any session.
    pub highest_level: Option<Tier>,
    /// Accuracy of the latest session minus the one before it.
    pub latest_delta: Option<f64>,
}

/// Summarize `reports`, which must be in chronological order.
pub fn user_progress(reports: &[SessionReport]) -> UserProgress {
    let answered: Vec<f64> = reports
        .iter()
        .filter(|r| r.summary.answered() > 0)
        .map(|r| r.summary.accuracy())
        .collect();

    let average_accuracy = if answered.is_empty() {
        0.0
    } else {
        answered.iter().sum::<f64>() / answered.len() as f64
    };

    let latest_delta = match answered.as_slice() {
        [.., previous, latest] => Some(latest - previous),
        _ => None,
    };

    UserProgress {
        sessions: reports.len(),
        completed_sessions: reports.iter().filter(|r| r.completed).count(),
        average_accuracy,
        best_score: reports.iter().map(|r| r.summary.score).max().unwrap_or(0),
        highest_level: reports
            .iter()
            .flat_map(|r| r.answers.iter().map(|a| a.level))
            .max(),
        latest_delta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{AnsweredQuestion, BankSummary};
    use crate::scorer::SessionSummary;
    use chrono::Utc;
    use uuid::Uuid;

    fn answer(tier: Tier, level: Tier, category: &str, correct: bool) -> AnsweredQuestion {
        AnsweredQuestion {
            question_id: format!("{tier}-{category}"),
            tier,
            level,
            category: category.into(),
            correct,
        }
    }

    fn make_report(answers: Vec<AnsweredQuestion>, total: usize) -> SessionReport {
        let correct = answers.iter().filter(|a| a.correct).count() as u32;
        let incorrect = answers.len() as u32 - correct;
        SessionReport {
            id: Uuid::new_v4(),
            user: Some("ada".into()),
            bank: BankSummary {
                id: "b".into(),
                name: "B".into(),
                question_count: total,
            },
            started_at: Utc::now(),
            finished_at: Utc::now(),
            summary: SessionSummary {
                score: correct,
                correct,
                incorrect,
                total,
            },
            completed: answers.len() == total,
            answers,
        }
    }

    #[test]
    fn session_breakdown_by_tier_and_category() {
        let report = make_report(
            vec![
                answer(Tier::Easy, Tier::Easy, "geo", true),
                answer(Tier::Easy, Tier::Easy, "math", true),
                answer(Tier::Medium, Tier::Medium, "geo", false),
                answer(Tier::Hard, Tier::Easy, "geo", true),
            ],
            4,
        );
        let stats = session_stats(&report);
        assert_eq!(stats.per_tier[&Tier::Easy], Tally { asked: 2, correct: 2 });
        assert_eq!(stats.per_tier[&Tier::Medium].accuracy(), 0.0);
        assert_eq!(stats.per_category["geo"], Tally { asked: 3, correct: 2 });
        assert_eq!(stats.highest_level, Some(Tier::Medium));
    }

    #[test]
    fn progress_over_sessions() {
        let first = make_report(
            vec![
                answer(Tier::Easy, Tier::Easy, "geo", true),
                answer(Tier::Easy, Tier::Easy, "geo", false),
            ],
            2,
        );
        let abandoned = make_report(vec![], 3);
        let second = make_report(
            vec![
                answer(Tier::Easy, Tier::Easy, "geo", true),
                answer(Tier::Medium, Tier::Medium, "geo", true),
            ],
            3,
        );

        let progress = user_progress(&[first, abandoned, second]);
        assert_eq!(progress.sessions, 3);
        assert_eq!(progress.completed_sessions, 1);
        assert!((progress.average_accuracy - 0.75).abs() < 1e-9);
        assert_eq!(progress.best_score, 2);
        assert_eq!(progress.highest_level, Some(Tier::Medium));
        assert!((progress.latest_delta.unwrap() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn progress_without_sessions() {
        let progress = user_progress(&[]);
        assert_eq!(progress.sessions, 0);
        assert_eq!(progress.average_accuracy, 0.0);
        assert!(progress.latest_delta.is_none());
        assert!(progress.highest_level.is_none());
    }
}
