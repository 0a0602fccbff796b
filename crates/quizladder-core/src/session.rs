//! Session orchestration.
//!
//! A [`QuizSession`] couples a [`SequenceDriver`] with a [`SessionScorer`] so
//! that every answer feeds both the difficulty policy and the totals, and
//! keeps a trace of what was asked for the final [`SessionReport`].

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::EngineError;
use crate::model::{Question, QuestionBank, Tier};
use crate::report::{AnsweredQuestion, BankSummary, SessionReport};
use crate::scorer::{SessionScorer, SessionSummary};
use crate::sequencer::{SequenceDriver, Step};
use crate::traits::AnswerSource;

/// Callbacks fired while [`run_session`] drives a session.
pub trait SessionObserver {
    fn on_question(&self, question: &Question, position: usize, total: usize, level: Tier);
    fn on_answer(&self, question: &Question, correct: bool, summary: &SessionSummary);
    fn on_complete(&self, report: &SessionReport);
}

/// No-op session observer.
pub struct NoopObserver;

impl SessionObserver for NoopObserver {
    fn on_question(&self, _: &Question, _: usize, _: usize, _: Tier) {}
    fn on_answer(&self, _: &Question, _: bool, _: &SessionSummary) {}
    fn on_complete(&self, _: &SessionReport) {}
}

/// One test-taker working through one bank.
#[derive(Debug)]
pub struct QuizSession {
    id: Uuid,
    user: Option<String>,
    bank: BankSummary,
    driver: SequenceDriver,
    scorer: SessionScorer,
    pending: Option<(Question, Tier)>,
    answers: Vec<AnsweredQuestion>,
    started_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Build a session over every question in `bank`.
    pub fn new(bank: QuestionBank) -> Result<Self, EngineError> {
        let summary = BankSummary::from(&bank);
        for question in &bank.questions {
            question.check()?;
        }
        let driver = SequenceDriver::new(bank.questions)?;
        let scorer = SessionScorer::new(driver.total());

        Ok(Self {
            id: Uuid::new_v4(),
            user: None,
            bank: summary,
            driver,
            scorer,
            pending: None,
            answers: Vec::new(),
            started_at: None,
        })
    }

    /// Attach the test-taker's identity to the report.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Produce the first question.
    pub fn start(&mut self) -> Result<&Question, EngineError> {
        let question = self.driver.start().inspect_err(|_| self.pending = None)?;
        self.started_at = Some(Utc::now());
        tracing::info!(
            session = %self.id,
            bank = %self.bank.id,
            questions = self.bank.question_count,
            "session started"
        );
        let level = self.driver.current_tier();
        Ok(&self.pending.insert((question, level)).0)
    }

    /// The question waiting for an answer, if any.
    pub fn pending(&self) -> Option<&Question> {
        self.pending.as_ref().map(|(q, _)| q)
    }

    /// Controller tier at which the pending question was selected.
    pub fn pending_level(&self) -> Option<Tier> {
        self.pending.as_ref().map(|(_, level)| *level)
    }

    /// Submit the selected choice for the pending question.
    ///
    /// Returns the next question, or `None` once the pool is exhausted.
    pub fn answer(&mut self, choice: &str) -> Result<Option<&Question>, EngineError> {
        let correct = self.pending().is_some_and(|q| q.is_correct(choice));
        self.submit(correct)
    }

    /// Submit the correctness of the pending question's answer.
    ///
    /// A protocol violation ends the session; every later call fails too.
    pub fn submit(&mut self, correct: bool) -> Result<Option<&Question>, EngineError> {
        let Some((question, level)) = self.pending.take() else {
            return Err(self.driver.fail("answer submitted with no pending question"));
        };

        let step = self.driver.advance(correct)?;

        self.scorer.record(correct);
        self.answers.push(AnsweredQuestion {
            question_id: question.id,
            tier: question.tier,
            level,
            category: question.category,
            correct,
        });

        match step {
            Step::Next(next) => {
                let level = self.driver.current_tier();
                Ok(Some(&self.pending.insert((next, level)).0))
            }
            Step::Exhausted => {
                tracing::info!(
                    session = %self.id,
                    score = self.scorer.score(),
                    total = self.scorer.total(),
                    "session complete"
                );
                Ok(None)
            }
        }
    }

    /// 1-based position of the pending question.
    pub fn position(&self) -> usize {
        self.scorer.position() + 1
    }

    pub fn total(&self) -> usize {
        self.scorer.total()
    }

    pub fn summary(&self) -> SessionSummary {
        self.scorer.summary()
    }

    /// True once every question has been answered.
    pub fn is_complete(&self) -> bool {
        self.driver.is_finished() && self.scorer.is_complete()
    }

    /// Snapshot the session as a report.
    pub fn report(&self) -> SessionReport {
        let finished_at = Utc::now();
        SessionReport {
            id: self.id,
            user: self.user.clone(),
            bank: self.bank.clone(),
            started_at: self.started_at.unwrap_or(finished_at),
            finished_at,
            summary: self.scorer.summary(),
            answers: self.answers.clone(),
            completed: self.is_complete(),
        }
    }
}

/// Drive a whole session against an [`AnswerSource`].
///
/// Stops early, with an incomplete report, if the answer source abandons.
pub fn run_session(
    bank: QuestionBank,
    user: Option<String>,
    answers: &mut dyn AnswerSource,
    observer: &dyn SessionObserver,
) -> anyhow::Result<SessionReport> {
    let mut session = QuizSession::new(bank)?;
    if let Some(user) = user {
        session = session.with_user(user);
    }

    let total = session.total();
    let mut current = Some(session.start()?.clone());

    while let Some(question) = current.take() {
        let position = session.position();
        let level = session.pending_level().unwrap_or(Tier::Easy);
        observer.on_question(&question, position, total, level);

        let Some(choice) = answers.answer(&question, position, total)? else {
            tracing::info!(session = %session.id(), position, "session abandoned");
            break;
        };

        let correct = question.is_correct(&choice);
        current = session.answer(&choice)?.cloned();
        observer.on_answer(&question, correct, &session.summary());
    }

    let report = session.report();
    observer.on_complete(&report);
    Ok(report)
}
