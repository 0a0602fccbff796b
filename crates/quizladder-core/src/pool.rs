//! Tier-partitioned question pool.
//!
//! The pool owns every question that has not been emitted yet, split into one
//! FIFO queue per tier. Questions only ever leave from the front of a queue,
//! so remaining plus emitted always equals the original input.

use std::collections::VecDeque;

use crate::error::EngineError;
use crate::model::{Question, Tier};

/// Three FIFO queues of questions, one per [`Tier`].
#[derive(Debug, Clone)]
pub struct QuestionPool {
    queues: [VecDeque<Question>; 3],
    total: usize,
}

impl QuestionPool {
    /// Group `questions` by tier, preserving arrival order within each tier.
    ///
    /// Fails with [`EngineError::EmptyPool`] when there is nothing to sequence.
    pub fn partition<I>(questions: I) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = Question>,
    {
        let mut queues: [VecDeque<Question>; 3] = Default::default();
        let mut total = 0;
        for question in questions {
            queues[question.tier.index()].push_back(question);
            total += 1;
        }

        if total == 0 {
            return Err(EngineError::EmptyPool);
        }

        tracing::debug!(
            easy = queues[0].len(),
            medium = queues[1].len(),
            hard = queues[2].len(),
            "partitioned question pool"
        );

        Ok(Self { queues, total })
    }

    /// Remove and return the oldest question of `tier`, if any.
    pub fn take_front(&mut self, tier: Tier) -> Option<Question> {
        self.queues[tier.index()].pop_front()
    }

    /// Take from the first non-empty tier in `order`.
    pub fn take_first_available(&mut self, order: &[Tier]) -> Option<Question> {
        order.iter().find_map(|&tier| self.take_front(tier))
    }

    /// True iff every tier is empty.
    pub fn is_exhausted(&self) -> bool {
        self.queues.iter().all(VecDeque::is_empty)
    }

    pub fn has(&self, tier: Tier) -> bool {
        !self.queues[tier.index()].is_empty()
    }

    /// Questions still waiting in `tier`.
    pub fn len_of(&self, tier: Tier) -> usize {
        self.queues[tier.index()].len()
    }

    /// Questions still waiting across all tiers.
    pub fn remaining(&self) -> usize {
        self.queues.iter().map(VecDeque::len).sum()
    }

    /// Size of the pool at construction.
    pub fn total(&self) -> usize {
        self.total
    }
}
