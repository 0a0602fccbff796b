//! quizladder-core: Adaptive question-sequencing engine, sessions, and scoring.
//!
//! This crate defines the question data model, the tiered question pool, the
//! difficulty controller that promotes and demotes between tiers, and the
//! request/response driver that walks a pool to exhaustion. Everything that
//! talks to the outside world (question sources, history, rendering) plugs in
//! through the traits in [`traits`].

pub mod controller;
pub mod error;
pub mod model;
pub mod parser;
pub mod pool;
pub mod report;
pub mod scorer;
pub mod sequencer;
pub mod session;
pub mod statistics;
pub mod traits;

pub use error::EngineError;
pub use model::{Question, QuestionBank, Tier};
pub use sequencer::{SequenceDriver, Step};
pub use session::QuizSession;
