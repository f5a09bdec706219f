use std::path::Path;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use mockview_core::bank::{parse_bank_str, validate_bank, QuestionBank};
use mockview_core::traits::extract_json_from_markdown;

fn bench_bank(c: &mut Criterion) {
    let mut group = c.benchmark_group("question_bank");
    let source = QuestionBank::builtin_source();
    let path = Path::new("default.toml");

    group.bench_function("parse_builtin", |b| {
        b.iter(|| parse_bank_str(black_box(source), path))
    });

    let bank = QuestionBank::builtin().expect("bundled bank parses");
    group.bench_function("validate_builtin", |b| {
        b.iter(|| validate_bank(black_box(&bank)))
    });

    group.finish();
}

fn bench_extract_json(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_json");

    let fenced = r#"Here is my assessment:

```json
{"technical_accuracy": 82, "communication_skills": 75, "sentiment_tone": 60, "completeness": 70}
```
"#;

    let prose = r#"Sure. {"technical_accuracy": 82, "communication_skills": 75, "sentiment_tone": 60, "completeness": 70, "feedback": {"strengths": ["clear"], "weaknesses": [], "suggestions": []}} Hope that helps."#;

    let plain = r#"[{"question": "How would you shard this table?", "keywords": ["sharding"]}]"#;

    group.bench_function("fenced", |b| {
        b.iter(|| extract_json_from_markdown(black_box(fenced)))
    });
    group.bench_function("embedded_in_prose", |b| {
        b.iter(|| extract_json_from_markdown(black_box(prose)))
    });
    group.bench_function("plain_array", |b| {
        b.iter(|| extract_json_from_markdown(black_box(plain)))
    });

    group.finish();
}

criterion_group!(benches, bench_bank, bench_extract_json);
criterion_main!(benches);
