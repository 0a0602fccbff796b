//! The `quizladder play` command.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

use quizladder_core::model::{Question, Tier};
use quizladder_core::report::SessionReport;
use quizladder_core::scorer::SessionSummary;
use quizladder_core::session::{run_session, SessionObserver};
use quizladder_core::traits::{AnswerSource, SummarySink};
use quizladder_report::html::write_html_report;
use quizladder_report::HistoryStore;
use quizladder_sources::config::load_config_from;

/// Reads the test-taker's choices from a line-oriented input.
///
/// Accepts a 1-based choice number or the choice text (case-insensitive).
/// `q`, `quit` or end of input abandons the session.
pub struct ConsoleAnswers<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsoleAnswers<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> AnswerSource for ConsoleAnswers<R, W> {
    fn answer(
        &mut self,
        question: &Question,
        _position: usize,
        _total: usize,
    ) -> Result<Option<String>> {
        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            let line = line.trim();

            if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
                return Ok(None);
            }
            if let Ok(n) = line.parse::<usize>() {
                if (1..=question.choices.len()).contains(&n) {
                    return Ok(Some(question.choices[n - 1].clone()));
                }
            }
            if let Some(choice) = question
                .choices
                .iter()
                .find(|c| c.eq_ignore_ascii_case(line))
            {
                return Ok(Some(choice.clone()));
            }

            writeln!(
                self.output,
                "Please enter 1-{} or q to quit.",
                question.choices.len()
            )?;
        }
    }
}

/// Prints questions and feedback to stdout.
struct ConsoleObserver;

impl SessionObserver for ConsoleObserver {
    fn on_question(&self, question: &Question, position: usize, total: usize, level: Tier) {
        println!("\n[{position}/{total}] ({level}) {}", question.prompt);
        for (i, choice) in question.choices.iter().enumerate() {
            println!("  {}) {choice}", i + 1);
        }
    }

    fn on_answer(&self, question: &Question, correct: bool, summary: &SessionSummary) {
        if correct {
            println!("Correct!");
        } else {
            println!("Incorrect. The answer was: {}", reveal(question));
        }
        println!("Score: {}/{}", summary.score, summary.answered());
    }

    fn on_complete(&self, report: &SessionReport) {
        println!();
        print_summary(report);
    }
}

/// The correct answer with its choice number, e.g. `2) Paris`.
fn reveal(question: &Question) -> String {
    match question.answer_index() {
        Some(i) => format!("{}) {}", i + 1, question.answer),
        None => question.answer.clone(),
    }
}

pub(crate) fn print_summary(report: &SessionReport) {
    let summary = &report.summary;
    let status = if report.completed {
        "complete"
    } else {
        "abandoned"
    };
    println!(
        "Session {status}: {}/{} correct ({:.1}%), {} of {} questions answered",
        summary.correct,
        summary.answered(),
        summary.accuracy() * 100.0,
        summary.answered(),
        summary.total
    );
    println!("Score: {}/{}", summary.score, summary.total);
}

pub async fn execute(
    bank_path: Option<PathBuf>,
    source: Option<String>,
    user: Option<String>,
    category: Option<String>,
    html: Option<PathBuf>,
    no_history: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let bank = super::load_bank(bank_path, source, &config, category.as_deref()).await?;
    let user = user.or_else(|| config.user.clone());

    println!(
        "quizladder: {} ({} questions). Answer with a number, q to quit.",
        bank.name,
        bank.questions.len()
    );

    let stdin = std::io::stdin();
    let mut answers = ConsoleAnswers::new(stdin.lock(), std::io::stdout());
    let report = run_session(bank, user, &mut answers, &ConsoleObserver)?;

    if !no_history {
        let store = HistoryStore::new(&config.history_dir);
        store
            .record(&report)
            .context("failed to record session history")?;
        eprintln!("Session recorded in {}", store.dir().display());
    }

    if let Some(path) = html {
        write_html_report(&report, &path)?;
        eprintln!("HTML report: {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn question() -> Question {
        Question::new(
            "capital-fr",
            "What is the capital of France?",
            vec!["Lyon".into(), "Paris".into(), "Nice".into()],
            "Paris",
            Tier::Easy,
            "geography",
        )
        .unwrap()
    }

    fn answer_with(input: &str) -> (Option<String>, String) {
        let mut output = Vec::new();
        let mut answers = ConsoleAnswers::new(Cursor::new(input.to_string()), &mut output);
        let choice = answers.answer(&question(), 1, 1).unwrap();
        (choice, String::from_utf8(output).unwrap())
    }

    #[test]
    fn accepts_choice_number() {
        assert_eq!(answer_with("2\n").0.as_deref(), Some("Paris"));
    }

    #[test]
    fn accepts_choice_text() {
        assert_eq!(answer_with("  nice \n").0.as_deref(), Some("Nice"));
    }

    #[test]
    fn reprompts_on_invalid_input() {
        let (choice, output) = answer_with("7\nbanana\n1\n");
        assert_eq!(choice.as_deref(), Some("Lyon"));
        assert_eq!(output.matches("Please enter 1-3").count(), 2);
    }

    #[test]
    fn reveal_numbers_the_answer() {
        assert_eq!(reveal(&question()), "2) Paris");
    }

    #[test]
    fn quit_and_eof_abandon() {
        assert_eq!(answer_with("q\n").0, None);
        assert_eq!(answer_with("").0, None);
    }
}
