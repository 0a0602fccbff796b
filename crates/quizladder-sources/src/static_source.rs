//! Fixed in-memory source for tests and demos.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use quizladder_core::model::QuestionBank;
use quizladder_core::traits::QuestionSource;

/// Returns the same bank on every fetch.
pub struct StaticSource {
    bank: QuestionBank,
    fetch_count: AtomicU32,
}

impl StaticSource {
    pub fn new(bank: QuestionBank) -> Self {
        Self {
            bank,
            fetch_count: AtomicU32::new(0),
        }
    }

    /// Number of fetches served so far.
    pub fn fetch_count(&self) -> u32 {
        self.fetch_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl QuestionSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch(&self) -> anyhow::Result<QuestionBank> {
        self.fetch_count.fetch_add(1, Ordering::Relaxed);
        Ok(self.bank.clone())
    }
}
