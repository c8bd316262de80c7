use criterion::{black_box, criterion_group, criterion_main, Criterion};

use coniuga_core::evaluator::evaluate;
use coniuga_core::parser::parse_quiz_question;

const QUESTION_JSON: &str = r#"```json
{
    "verb": "essere",
    "mood": "Indicativo",
    "tense": "Futuro anteriore",
    "translation": "être",
    "icon_suggestion": "be",
    "conjugations": [
        {"person": "io", "verb": "sarò stato"},
        {"person": "tu", "verb": "sarai stato"},
        {"person": "lui/lei", "verb": "sarà stato"},
        {"person": "noi", "verb": "saremo stati"},
        {"person": "voi", "verb": "sarete stati"},
        {"person": "loro", "verb": "saranno stati"}
    ]
}
```"#;

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");

    group.bench_function("ascii_match", |b| {
        b.iter(|| evaluate(black_box("  Parliamo "), black_box("parliamo")))
    });

    group.bench_function("accented_match", |b| {
        b.iter(|| evaluate(black_box("SARÀ STATO"), black_box("sarà stato")))
    });

    group.bench_function("blank", |b| {
        b.iter(|| evaluate(black_box("   "), black_box("parlo")))
    });

    group.finish();
}

fn bench_parse_question(c: &mut Criterion) {
    c.bench_function("parse_quiz_question", |b| {
        b.iter(|| parse_quiz_question(black_box(QUESTION_JSON)))
    });
}

criterion_group!(benches, bench_evaluate, bench_parse_question);
criterion_main!(benches);
