use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizladder_core::model::{Question, Tier};
use quizladder_core::pool::QuestionPool;
use quizladder_core::sequencer::{SequenceDriver, Step};

fn make_questions(n: usize) -> Vec<Question> {
    (0..n)
        .map(|i| Question {
            id: format!("q{i}"),
            prompt: format!("Question {i}?"),
            choices: vec!["yes".into(), "no".into()],
            answer: "yes".into(),
            tier: Tier::ALL[i % 3],
            category: "bench".into(),
        })
        .collect()
}

fn run_session(questions: Vec<Question>) -> usize {
    let mut driver = SequenceDriver::new(questions).unwrap();
    driver.start().unwrap();
    let mut i = 0usize;
    // Two right, one wrong keeps the controller moving between tiers.
    while let Step::Next(_) = driver.advance(i % 3 != 2).unwrap() {
        i += 1;
    }
    driver.emitted()
}

fn bench_partition(c: &mut Criterion) {
    let mut group = c.benchmark_group("partition");

    for n in [100, 10_000] {
        let questions = make_questions(n);
        group.bench_function(format!("n={n}"), |b| {
            b.iter(|| QuestionPool::partition(black_box(questions.clone())).unwrap())
        });
    }

    group.finish();
}

fn bench_full_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_session");

    for n in [100, 10_000] {
        let questions = make_questions(n);
        group.bench_function(format!("n={n}"), |b| {
            b.iter(|| run_session(black_box(questions.clone())))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_partition, bench_full_session);
criterion_main!(benches);
