//! Collaborator interfaces.
//!
//! The engine never fetches, renders, or stores anything itself. Question
//! sources live in `quizladder-sources`, history storage in
//! `quizladder-report`, and the interactive front end in the CLI.

use async_trait::async_trait;

use crate::model::{Question, QuestionBank};
use crate::report::SessionReport;

// ---------------------------------------------------------------------------
// Question source
// ---------------------------------------------------------------------------

/// Upstream content provider that delivers a bank of tagged questions.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Human-readable source name (e.g. "opentdb").
    fn name(&self) -> &str;

    /// Fetch the questions to sequence.
    async fn fetch(&self) -> anyhow::Result<QuestionBank>;
}

// ---------------------------------------------------------------------------
// Answer source
// ---------------------------------------------------------------------------

/// Front end that shows a question and collects the selected choice.
pub trait AnswerSource {
    /// Present `question` (1-based `position` of `total`) and return the
    /// selected choice, or `None` if the test-taker abandoned the session.
    fn answer(
        &mut self,
        question: &Question,
        position: usize,
        total: usize,
    ) -> anyhow::Result<Option<String>>;
}

/// Replays a fixed list of correct/incorrect outcomes.
///
/// For `true` it answers with the designated choice, for `false` with the
/// first other choice. Once the script runs out every answer is incorrect.
#[derive(Debug, Clone, Default)]
pub struct ScriptedAnswers {
    script: Vec<bool>,
    cursor: usize,
}

impl ScriptedAnswers {
    pub fn new(script: Vec<bool>) -> Self {
        Self { script, cursor: 0 }
    }

    /// Parse a script such as `"ccxc"` (`c`/`1`/`y` correct, `x`/`0`/`n`
    /// incorrect). Whitespace and commas are ignored.
    pub fn parse(script: &str) -> anyhow::Result<Self> {
        let outcomes = script
            .chars()
            .filter(|c| !c.is_whitespace() && *c != ',')
            .map(|c| match c.to_ascii_lowercase() {
                'c' | '1' | 'y' => Ok(true),
                'x' | '0' | 'n' => Ok(false),
                other => Err(anyhow::anyhow!("invalid answer script character: '{other}'")),
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Self::new(outcomes))
    }
}

impl AnswerSource for ScriptedAnswers {
    fn answer(
        &mut self,
        question: &Question,
        _position: usize,
        _total: usize,
    ) -> anyhow::Result<Option<String>> {
        let correct = self.script.get(self.cursor).copied().unwrap_or(false);
        self.cursor += 1;

        let choice = if correct {
            question.answer.clone()
        } else {
            question
                .choices
                .iter()
                .find(|c| **c != question.answer)
                .cloned()
                .unwrap_or_default()
        };
        Ok(Some(choice))
    }
}

// ---------------------------------------------------------------------------
// Summary sink
// ---------------------------------------------------------------------------

/// Receives finished sessions, e.g. a per-user history store.
pub trait SummarySink {
    fn record(&self, report: &SessionReport) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Tier;

    fn question() -> Question {
        Question::new(
            "q",
            "2 + 2?",
            vec!["3".into(), "4".into(), "5".into()],
            "4",
            Tier::Easy,
            "math",
        )
        .unwrap()
    }

    #[test]
    fn scripted_answers_follow_script_then_miss() {
        let q = question();
        let mut answers = ScriptedAnswers::parse("c, x").unwrap();
        assert_eq!(answers.answer(&q, 1, 3).unwrap().as_deref(), Some("4"));
        assert_eq!(answers.answer(&q, 2, 3).unwrap().as_deref(), Some("3"));
        assert_eq!(answers.answer(&q, 3, 3).unwrap().as_deref(), Some("3"));
    }

    #[test]
    fn script_rejects_unknown_characters() {
        let err = ScriptedAnswers::parse("ccz").unwrap_err();
        assert!(err.to_string().contains("'z'"));
    }
}
