use criterion::{black_box, criterion_group, criterion_main, Criterion};

use mockview_core::bank::QuestionBank;
use mockview_core::model::{Difficulty, Mode};
use mockview_core::scoring::LocalScorer;
use mockview_core::transcription::analyze_speech;

const SHORT: &str = "I think it stores data.";

const LONG: &str = "The main difference is isolation. A process has its own address space, file \
    handles and resources, so one crashing process does not corrupt another. A thread runs inside \
    a process and uses shared memory with the other threads of that process. Because threads share \
    memory, a context switch between them is cheaper, which makes threads a good fit for \
    concurrency within one program.";

fn bench_local_scorer(c: &mut Criterion) {
    let mut group = c.benchmark_group("local_scorer");
    let bank = QuestionBank::builtin().expect("bundled bank parses");
    let question = &bank.questions_for(Mode::Technical, Difficulty::Intermediate)[0];
    let scorer = LocalScorer::default();

    group.bench_function("non_answer", |b| {
        b.iter(|| scorer.evaluate(black_box("I don't know"), question, Mode::Technical))
    });

    group.bench_function("short", |b| {
        b.iter(|| scorer.evaluate(black_box(SHORT), question, Mode::Technical))
    });

    group.bench_function("long", |b| {
        b.iter(|| scorer.evaluate(black_box(LONG), question, Mode::Technical))
    });

    let ten_paragraphs = LONG.repeat(10);
    group.bench_function("ten_paragraphs", |b| {
        b.iter(|| scorer.evaluate(black_box(&ten_paragraphs), question, Mode::Mixed))
    });

    group.finish();
}

fn bench_speech_metrics(c: &mut Criterion) {
    let spoken = "Um, so basically I, you know, built the API. It was, like, fast. Okay?";
    c.bench_function("analyze_speech", |b| {
        b.iter(|| analyze_speech(black_box(spoken), black_box(12.0)))
    });
}

criterion_group!(benches, bench_local_scorer, bench_speech_metrics);
criterion_main!(benches);
