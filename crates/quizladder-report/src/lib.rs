//! quizladder-report: Session history and HTML reports.

pub mod history;
pub mod html;

pub use history::HistoryStore;
