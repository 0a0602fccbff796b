//! Difficulty controller.
//!
//! A deterministic Markov policy over the previous answer. Two streak
//! counters decide promotions (easy→medium after two correct answers,
//! medium→hard after three correct answers at medium); a single incorrect
//! answer demotes by exactly one tier. When the preferred tier is empty the
//! question comes from a fixed per-branch fallback order, never from an
//! arbitrary tier.

use serde::{Deserialize, Serialize};

use crate::model::{Question, Tier};
use crate::pool::QuestionPool;

/// Correct answers needed at easy before promoting to medium.
pub const EASY_PROMOTION_STREAK: u32 = 2;
/// Correct answers at medium needed before promoting to hard.
pub const MEDIUM_PROMOTION_STREAK: u32 = 3;

const EASY_FIRST: [Tier; 3] = [Tier::Easy, Tier::Medium, Tier::Hard];
const MEDIUM_FIRST: [Tier; 3] = [Tier::Medium, Tier::Easy, Tier::Hard];

/// Mutable sequencing state owned by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencerState {
    /// Tier the test-taker is currently working at.
    pub current_tier: Tier,
    /// Correct answers since the streak was last broken.
    pub consecutive_correct: u32,
    /// Correct answers given while at the medium tier.
    pub consecutive_medium_correct: u32,
}

impl Default for SequencerState {
    fn default() -> Self {
        Self {
            current_tier: Tier::Easy,
            consecutive_correct: 0,
            consecutive_medium_correct: 0,
        }
    }
}

/// How the first question of a session was chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Opening {
    /// An easy question whose answer seeds the streak counter.
    Seed(Question),
    /// The easy tier was empty; chosen by the no-signal fallback.
    NoSignal(Question),
}

impl Opening {
    pub fn into_question(self) -> Question {
        match self {
            Opening::Seed(q) | Opening::NoSignal(q) => q,
        }
    }
}

/// Decides the tier of every question after the first.
#[derive(Debug, Clone, Default)]
pub struct DifficultyController {
    state: SequencerState,
}

impl DifficultyController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current sequencing state.
    pub fn state(&self) -> &SequencerState {
        &self.state
    }

    pub fn current_tier(&self) -> Tier {
        self.state.current_tier
    }

    /// Pick the first question of a session.
    ///
    /// Returns `None` only if the pool is already exhausted.
    pub fn open(&mut self, pool: &mut QuestionPool) -> Option<Opening> {
        if let Some(question) = pool.take_front(Tier::Easy) {
            return Some(Opening::Seed(question));
        }
        self.select_next(None, pool).map(Opening::NoSignal)
    }

    /// Record the answer to an opening [`Opening::Seed`] question and pick
    /// the next one. The tier stays easy; the seeded answer is not counted
    /// again by the main loop.
    pub fn seed(&mut self, correct: bool, pool: &mut QuestionPool) -> Option<Question> {
        self.state.consecutive_correct = u32::from(correct);
        tracing::debug!(correct, "seeded streak from opening question");
        self.stay(pool)
    }

    /// Run one iteration of the policy.
    ///
    /// `last_answer` is `None` only when no opening question could be seeded;
    /// the state is then left untouched. Returns `None` when the pool is
    /// exhausted.
    pub fn select_next(
        &mut self,
        last_answer: Option<bool>,
        pool: &mut QuestionPool,
    ) -> Option<Question> {
        match last_answer {
            None => pool.take_first_available(&EASY_FIRST),
            Some(true) => self.on_correct(pool),
            Some(false) => self.on_incorrect(pool),
        }
    }

    fn on_correct(&mut self, pool: &mut QuestionPool) -> Option<Question> {
        self.state.consecutive_correct += 1;
        if self.state.current_tier == Tier::Medium {
            self.state.consecutive_medium_correct += 1;
        }
        let SequencerState {
            current_tier,
            consecutive_correct,
            consecutive_medium_correct,
        } = self.state;

        match current_tier {
            Tier::Easy if consecutive_correct >= EASY_PROMOTION_STREAK => {
                if pool.has(Tier::Medium) {
                    self.promote(Tier::Medium);
                    self.state.consecutive_medium_correct = 0;
                    pool.take_front(Tier::Medium)
                } else {
                    // Medium is known empty here.
                    pool.take_first_available(&[Tier::Easy, Tier::Hard])
                }
            }
            Tier::Medium if consecutive_medium_correct >= MEDIUM_PROMOTION_STREAK => {
                if pool.has(Tier::Hard) {
                    self.promote(Tier::Hard);
                    pool.take_front(Tier::Hard)
                } else {
                    pool.take_first_available(&[Tier::Medium, Tier::Easy])
                }
            }
            _ => self.stay(pool),
        }
    }

    fn on_incorrect(&mut self, pool: &mut QuestionPool) -> Option<Question> {
        self.state.consecutive_correct = 0;

        // Easy is the floor: stay there.
        if let Some(to) = self.state.current_tier.lower() {
            self.demote(to);
        }

        match self.state.current_tier {
            Tier::Medium => pool.take_first_available(&MEDIUM_FIRST),
            _ => pool.take_first_available(&EASY_FIRST),
        }
    }

    /// Stay at the current tier, falling back easy → medium → hard.
    fn stay(&self, pool: &mut QuestionPool) -> Option<Question> {
        pool.take_front(self.state.current_tier)
            .or_else(|| pool.take_first_available(&EASY_FIRST))
    }

    fn promote(&mut self, to: Tier) {
        tracing::debug!(from = %self.state.current_tier, %to, "promoting");
        self.state.current_tier = to;
    }

    fn demote(&mut self, to: Tier) {
        tracing::debug!(from = %self.state.current_tier, %to, "demoting");
        self.state.current_tier = to;
        self.state.consecutive_medium_correct = 0;
    }
}
