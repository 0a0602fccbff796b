//! Request/response sequence driver.
//!
//! The driver alternates strictly between producing a question and receiving
//! the correctness of the answer to it:
//!
//! ```text
//! start() -> Q1, advance(c1) -> Q2, ..., advance(cN) -> Exhausted
//! ```
//!
//! It cannot be rewound; build a new driver to restart. It is not meant to be
//! shared between threads and takes `&mut self` for every transition.

use crate::controller::{DifficultyController, Opening, SequencerState};
use crate::error::EngineError;
use crate::model::{Question, Tier};
use crate::pool::QuestionPool;

/// Result of an [`SequenceDriver::advance`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// The next question to present.
    Next(Question),
    /// Every question has been emitted; the session is over.
    Exhausted,
}

impl Step {
    pub fn into_question(self) -> Option<Question> {
        match self {
            Step::Next(q) => Some(q),
            Step::Exhausted => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// `start` has not been called.
    Ready,
    /// The pending question is the seeding opener.
    Seeding,
    /// A question is pending and its answer feeds the main loop.
    Awaiting,
    /// The pool is exhausted.
    Finished,
    /// A protocol violation ended the session.
    Failed,
}

/// Walks a [`QuestionPool`] to exhaustion under the difficulty policy.
#[derive(Debug, Clone)]
pub struct SequenceDriver {
    pool: QuestionPool,
    controller: DifficultyController,
    phase: Phase,
    emitted: usize,
}

impl SequenceDriver {
    /// Build a driver over `questions`.
    ///
    /// Fails with [`EngineError::EmptyPool`] if there are none.
    pub fn new<I>(questions: I) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = Question>,
    {
        Ok(Self::from_pool(QuestionPool::partition(questions)?))
    }

    /// Build a driver over an existing pool.
    pub fn from_pool(pool: QuestionPool) -> Self {
        Self {
            pool,
            controller: DifficultyController::new(),
            phase: Phase::Ready,
            emitted: 0,
        }
    }

    /// Produce the first question.
    pub fn start(&mut self) -> Result<Question, EngineError> {
        match self.phase {
            Phase::Ready => {}
            Phase::Failed => return Err(self.fail("start called after a protocol violation")),
            _ => {
                return Err(self.fail("start called while a session is already in progress"));
            }
        }

        let opening = self.controller.open(&mut self.pool).ok_or(EngineError::EmptyPool)?;
        let question = match opening {
            Opening::Seed(q) => {
                self.phase = Phase::Seeding;
                q
            }
            Opening::NoSignal(q) => {
                tracing::debug!("no easy questions, opening via no-signal fallback");
                self.phase = Phase::Awaiting;
                q
            }
        };

        self.emitted += 1;
        Ok(question)
    }

    /// Consume the correctness of the pending question and produce the next.
    pub fn advance(&mut self, last_answer_correct: bool) -> Result<Step, EngineError> {
        let next = match self.phase {
            Phase::Ready => return Err(self.fail("advance called before start")),
            Phase::Finished => {
                return Err(self.fail("advance called after the pool was exhausted"));
            }
            Phase::Failed => return Err(self.fail("advance called after a protocol violation")),
            Phase::Seeding => self.controller.seed(last_answer_correct, &mut self.pool),
            Phase::Awaiting => self
                .controller
                .select_next(Some(last_answer_correct), &mut self.pool),
        };

        match next {
            Some(question) => {
                self.phase = Phase::Awaiting;
                self.emitted += 1;
                Ok(Step::Next(question))
            }
            None => {
                if !self.pool.is_exhausted() {
                    // The fallback orders cover every tier, so this means the
                    // pool was mutated behind the controller's back.
                    let remaining = self.pool.remaining();
                    return Err(
                        self.fail(format!("controller found no question but {remaining} remain"))
                    );
                }
                self.phase = Phase::Finished;
                tracing::debug!(emitted = self.emitted, "question pool exhausted");
                Ok(Step::Exhausted)
            }
        }
    }

    /// Current controller state.
    pub fn state(&self) -> &SequencerState {
        self.controller.state()
    }

    pub fn current_tier(&self) -> Tier {
        self.controller.current_tier()
    }

    /// True while a produced question is waiting for its answer.
    pub fn is_pending(&self) -> bool {
        matches!(self.phase, Phase::Seeding | Phase::Awaiting)
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// True once a protocol violation has ended the session.
    pub fn is_failed(&self) -> bool {
        self.phase == Phase::Failed
    }

    /// Every protocol violation is terminal: later calls fail the same way.
    pub(crate) fn fail(&mut self, message: impl Into<String>) -> EngineError {
        let message = message.into();
        tracing::warn!(emitted = self.emitted, "{message}");
        self.phase = Phase::Failed;
        EngineError::protocol(message)
    }

    /// Questions produced so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Questions not yet produced.
    pub fn remaining(&self) -> usize {
        self.pool.remaining()
    }

    /// Size of the pool at construction.
    pub fn total(&self) -> usize {
        self.pool.total()
    }
}
