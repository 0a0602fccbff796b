//! Session scoring.

use serde::{Deserialize, Serialize};

/// Running totals for one session. Every correct answer is worth exactly one
/// point regardless of tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionScorer {
    score: u32,
    correct_count: u32,
    incorrect_count: u32,
    position: usize,
    total: usize,
}

impl SessionScorer {
    /// Scorer for a session over `total` questions.
    pub fn new(total: usize) -> Self {
        Self {
            score: 0,
            correct_count: 0,
            incorrect_count: 0,
            position: 0,
            total,
        }
    }

    /// Record one processed answer.
    pub fn record(&mut self, correct: bool) {
        if correct {
            self.correct_count += 1;
            self.score += 1;
        } else {
            self.incorrect_count += 1;
        }
        self.position += 1;
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Number of answers processed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// True once every question of the pool has been answered.
    pub fn is_complete(&self) -> bool {
        self.position >= self.total
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            score: self.score,
            correct: self.correct_count,
            incorrect: self.incorrect_count,
            total: self.total,
        }
    }
}

/// Final (or partial) score of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Running score.
    pub score: u32,
    /// Correctly answered questions.
    pub correct: u32,
    /// Incorrectly answered questions.
    pub incorrect: u32,
    /// Questions in the original pool.
    pub total: usize,
}

impl SessionSummary {
    /// Questions answered either way.
    pub fn answered(&self) -> usize {
        (self.correct + self.incorrect) as usize
    }

    /// Fraction of answered questions that were correct, 0.0 if none were.
    pub fn accuracy(&self) -> f64 {
        let answered = self.answered();
        if answered == 0 {
            0.0
        } else {
            self.correct as f64 / answered as f64
        }
    }
}
