//! End-to-end session tests: source -> session -> history -> report.
//!
//! These drive the library crates the way the binary does, without a
//! subprocess, so the assertions can look at typed values.

use quizladder_core::model::Tier;
use quizladder_core::report::SessionReport;
use quizladder_core::session::{run_session, NoopObserver, QuizSession};
use quizladder_core::statistics::{session_stats, user_progress};
use quizladder_core::traits::{QuestionSource, ScriptedAnswers, SummarySink};
use quizladder_report::html::write_html_report;
use quizladder_report::HistoryStore;
use quizladder_sources::file::FileSource;
use quizladder_sources::static_source::StaticSource;

const BANK: &str = "../../banks/general-knowledge.toml";

async fn fixture_bank() -> quizladder_core::QuestionBank {
    FileSource::new(BANK).fetch().await.unwrap()
}

fn ids(report: &SessionReport) -> Vec<&str> {
    report
        .answers
        .iter()
        .map(|a| a.question_id.as_str())
        .collect()
}

#[tokio::test]
async fn scripted_session_records_levels() {
    let bank = fixture_bank().await;
    let mut answers = ScriptedAnswers::parse("ccxc").unwrap();
    let report = run_session(bank, Some("ada".into()), &mut answers, &NoopObserver).unwrap();

    assert!(report.completed);
    assert_eq!(report.summary.total, 12);
    assert_eq!(report.summary.score, 3);
    assert_eq!(report.summary.correct + report.summary.incorrect, 12);
    assert_eq!(
        &ids(&report)[..5],
        &["capital-fr", "ocean-largest", "element-au", "spider-legs", "water-boils"]
    );

    // element-au was asked after promotion; the miss demoted straight back.
    assert_eq!(report.answers[2].level, Tier::Medium);
    assert_eq!(report.answers[3].level, Tier::Easy);

    let stats = session_stats(&report);
    assert_eq!(stats.highest_level, Some(Tier::Medium));
    assert_eq!(stats.per_tier[&Tier::Easy].asked, 4);
}

#[tokio::test]
async fn every_question_asked_exactly_once() {
    let bank = fixture_bank().await;
    let mut expected: Vec<String> = bank.questions.iter().map(|q| q.id.clone()).collect();
    expected.sort();

    for script in ["", "cccccccccccc", "cxcxcxcxcxcx", "ccxccxccxccx"] {
        let mut answers = ScriptedAnswers::parse(script).unwrap();
        let report = run_session(bank.clone(), None, &mut answers, &NoopObserver).unwrap();

        let mut asked: Vec<String> = ids(&report).into_iter().map(String::from).collect();
        asked.sort();
        assert_eq!(asked, expected, "script {script:?}");
    }
}

#[tokio::test]
async fn manual_session_matches_scripted_run() {
    let bank = fixture_bank().await;

    let mut answers = ScriptedAnswers::parse("ccc").unwrap();
    let scripted = run_session(bank.clone(), None, &mut answers, &NoopObserver).unwrap();

    let mut session = QuizSession::new(bank).unwrap();
    let mut asked = vec![session.start().unwrap().id.clone()];
    let mut outcomes = [true, true, true].into_iter();
    while let Some(next) = session.submit(outcomes.next().unwrap_or(false)).unwrap() {
        asked.push(next.id.clone());
    }

    assert!(session.is_complete());
    assert_eq!(asked, ids(&scripted));
    assert_eq!(session.summary(), scripted.summary);
}

#[tokio::test]
async fn history_and_html_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = HistoryStore::new(dir.path().join("history"));

    for script in ["cc", "cccccc", "c"] {
        let mut answers = ScriptedAnswers::parse(script).unwrap();
        let report =
            run_session(fixture_bank().await, Some("ada".into()), &mut answers, &NoopObserver)
                .unwrap();
        store.record(&report).unwrap();
    }

    let sessions = store.load("ada").unwrap();
    assert_eq!(sessions.len(), 3);

    let progress = user_progress(&sessions);
    assert_eq!(progress.sessions, 3);
    assert_eq!(progress.best_score, 6);
    assert_eq!(progress.highest_level, Some(Tier::Hard));
    assert!(progress.latest_delta.unwrap() < 0.0);

    let html = dir.path().join("latest.html");
    write_html_report(&sessions[2], &html).unwrap();
    let content = std::fs::read_to_string(&html).unwrap();
    assert!(content.contains("General Knowledge"));
    assert!(content.contains("capital-fr"));
}

#[tokio::test]
async fn static_source_feeds_a_session() {
    let source = StaticSource::new(fixture_bank().await);
    let bank = source.fetch().await.unwrap();
    assert_eq!(source.fetch_count(), 1);

    let mut answers = ScriptedAnswers::parse("cc").unwrap();
    let report = run_session(bank, None, &mut answers, &NoopObserver).unwrap();
    assert_eq!(report.bank.id, "general-knowledge");
    assert_eq!(report.user, None);
}
