//! Core data model types for quizladder.
//!
//! These are the records the engine sequences: individual questions tagged
//! with a difficulty tier, and the banks they arrive in from upstream sources.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

/// One of the three difficulty levels a question can be tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Easy,
    Medium,
    Hard,
}

impl Tier {
    /// All tiers from lowest to highest.
    pub const ALL: [Tier; 3] = [Tier::Easy, Tier::Medium, Tier::Hard];

    /// Position of this tier in [`Tier::ALL`].
    pub fn index(self) -> usize {
        match self {
            Tier::Easy => 0,
            Tier::Medium => 1,
            Tier::Hard => 2,
        }
    }

    /// The tier one level below, or `None` at the floor.
    pub fn lower(self) -> Option<Tier> {
        match self {
            Tier::Easy => None,
            Tier::Medium => Some(Tier::Easy),
            Tier::Hard => Some(Tier::Medium),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Easy => write!(f, "easy"),
            Tier::Medium => write!(f, "medium"),
            Tier::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Tier::Easy),
            "medium" => Ok(Tier::Medium),
            "hard" => Ok(Tier::Hard),
            other => Err(format!("unknown tier: {other}")),
        }
    }
}

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier within its bank.
    pub id: String,
    /// The question text shown to the test-taker.
    pub prompt: String,
    /// Answer choices in display order.
    pub choices: Vec<String>,
    /// The correct choice, equal to one entry of `choices`.
    pub answer: String,
    /// Difficulty tier.
    pub tier: Tier,
    /// Category label (e.g. "geography").
    pub category: String,
}

impl Question {
    /// Build a question, checking that it has at least two choices and that
    /// the designated answer is one of them.
    pub fn new(
        id: impl Into<String>,
        prompt: impl Into<String>,
        choices: Vec<String>,
        answer: impl Into<String>,
        tier: Tier,
        category: impl Into<String>,
    ) -> Result<Self, EngineError> {
        let question = Self {
            id: id.into(),
            prompt: prompt.into(),
            choices,
            answer: answer.into(),
            tier,
            category: category.into(),
        };
        question.check()?;
        Ok(question)
    }

    /// Check the structural rules of the data model.
    pub fn check(&self) -> Result<(), EngineError> {
        if self.choices.len() < 2 {
            return Err(EngineError::InvalidQuestion {
                id: self.id.clone(),
                reason: format!("needs at least two choices, got {}", self.choices.len()),
            });
        }
        if !self.choices.iter().any(|c| c == &self.answer) {
            return Err(EngineError::InvalidQuestion {
                id: self.id.clone(),
                reason: format!("answer '{}' is not one of the choices", self.answer),
            });
        }
        Ok(())
    }

    /// Whether `choice` is the designated answer. Exact value equality.
    pub fn is_correct(&self, choice: &str) -> bool {
        self.answer == choice
    }

    /// Zero-based position of the correct answer within `choices`.
    pub fn answer_index(&self) -> Option<usize> {
        self.choices.iter().position(|c| c == &self.answer)
    }
}

/// A named collection of questions, as delivered by a question source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionBank {
    /// Unique identifier for this bank.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Description of this bank.
    #[serde(default)]
    pub description: String,
    /// The questions, in arrival order.
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl QuestionBank {
    /// Number of questions per tier, indexed by [`Tier::index`].
    pub fn tier_counts(&self) -> [usize; 3] {
        let mut counts = [0; 3];
        for q in &self.questions {
            counts[q.tier.index()] += 1;
        }
        counts
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for q in &self.questions {
            if !seen.contains(&q.category.as_str()) {
                seen.push(&q.category);
            }
        }
        seen
    }

    /// Keep only questions whose category matches one of `categories`
    /// (case-insensitive). Arrival order is preserved.
    pub fn filter_categories(&mut self, categories: &[&str]) {
        self.questions.retain(|q| {
            categories
                .iter()
                .any(|c| c.eq_ignore_ascii_case(&q.category))
        });
    }

    /// Append the questions of `other` after this bank's own.
    pub fn merge(&mut self, other: QuestionBank) {
        self.questions.extend(other.questions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: &str, tier: Tier, category: &str) -> Question {
        Question::new(
            id,
            format!("prompt {id}"),
            vec!["a".into(), "b".into()],
            "a",
            tier,
            category,
        )
        .unwrap()
    }

    #[test]
    fn tier_display_and_parse() {
        assert_eq!(Tier::Medium.to_string(), "medium");
        assert_eq!("HARD".parse::<Tier>().unwrap(), Tier::Hard);
        assert_eq!(" easy ".parse::<Tier>().unwrap(), Tier::Easy);
        assert!("expert".parse::<Tier>().is_err());
    }

    #[test]
    fn tier_lower_stops_at_easy() {
        assert_eq!(Tier::Hard.lower(), Some(Tier::Medium));
        assert_eq!(Tier::Medium.lower(), Some(Tier::Easy));
        assert_eq!(Tier::Easy.lower(), None);
    }

    #[test]
    fn question_requires_two_choices() {
        let err = Question::new("q", "p", vec!["only".into()], "only", Tier::Easy, "c")
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidQuestion { .. }));
    }

    #[test]
    fn question_answer_must_be_a_choice() {
        let err = Question::new(
            "q",
            "p",
            vec!["a".into(), "b".into()],
            "c",
            Tier::Easy,
            "cat",
        )
        .unwrap_err();
        assert!(err.to_string().contains("not one of the choices"));
    }

    #[test]
    fn correctness_is_exact_equality() {
        let q = question("q", Tier::Easy, "c");
        assert!(q.is_correct("a"));
        assert!(!q.is_correct("A"));
        assert!(!q.is_correct("a "));
        assert_eq!(q.answer_index(), Some(0));
    }

    #[test]
    fn bank_filter_preserves_order() {
        let mut bank = QuestionBank {
            id: "b".into(),
            name: "B".into(),
            description: String::new(),
            questions: vec![
                question("1", Tier::Easy, "science"),
                question("2", Tier::Hard, "history"),
                question("3", Tier::Medium, "Science"),
            ],
        };
        assert_eq!(bank.categories(), vec!["science", "history", "Science"]);
        bank.filter_categories(&["science"]);
        let ids: Vec<&str> = bank.questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(bank.tier_counts(), [1, 1, 0]);
    }
}
