//! quizladder-sources: Question sources.
//!
//! Implements the `QuestionSource` trait for TOML bank files, the Open Trivia
//! DB HTTP API, and fixed in-memory banks, plus the configuration file that
//! names them.

pub mod config;
pub mod error;
pub mod file;
pub mod opentdb;
pub mod static_source;

pub use config::{create_source, fetch_all, load_config, QuizladderConfig, SourceConfig};
pub use error::SourceError;
