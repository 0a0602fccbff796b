//! Engine error types.
//!
//! Only contract failures are errors. An empty tier during a fallback search
//! or an incorrect answer at the easy floor is ordinary control flow and never
//! surfaces here.

use thiserror::Error;

/// Errors raised by the question pool, the sequence driver, and sessions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The engine was given no questions to sequence.
    #[error("question pool is empty, nothing to sequence")]
    EmptyPool,

    /// The start/advance alternation was broken by the caller.
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),

    /// A question record does not satisfy the data model.
    #[error("invalid question '{id}': {reason}")]
    InvalidQuestion { id: String, reason: String },
}

impl EngineError {
    pub(crate) fn protocol(message: impl Into<String>) -> Self {
        EngineError::ProtocolViolation(message.into())
    }

    /// Returns `true` if the session that raised this error cannot continue.
    pub fn is_fatal(&self) -> bool {
        matches!(self, EngineError::ProtocolViolation(_))
    }
}
