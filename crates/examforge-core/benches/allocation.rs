use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;

use examforge_core::allocator::{allocate, AllocationMode};
use examforge_core::model::{Level, MatrixRow, QuestionType};
use examforge_core::validator::validate;

fn make_rows(n: u32) -> Vec<MatrixRow> {
    (0..n)
        .map(|i| {
            MatrixRow::new(
                "Toán",
                "Số học",
                format!("Bài {i}"),
                "Thực hiện phép tính",
                QuestionType::MultipleChoice,
                Level::M1,
                0.5,
                1,
            )
            .with_periods(i % 4 + 1)
            .with_block(if i % 3 == 0 { 1 } else { 2 })
        })
        .collect()
}

fn bench_allocate(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocate");

    for n in [10u32, 100, 1000] {
        group.bench_function(format!("whole_exam/{n}"), |b| {
            let mut rows = make_rows(n);
            b.iter(|| allocate(black_box(&mut rows), AllocationMode::WholeExam))
        });
        group.bench_function(format!("two_block/{n}"), |b| {
            let mut rows = make_rows(n);
            b.iter(|| allocate(black_box(&mut rows), AllocationMode::default()))
        });
    }

    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate");

    let matching = json!({
        "stem": "Nối cột A với cột B",
        "matching": {
            "left": ["1) a", "2) b", "3) c", "4) d"],
            "right": ["A) w", "B) x", "C) y", "D) z"],
            "answer": {"1": "A", "2": "B", "3": "C", "4": "D"}
        }
    });
    group.bench_function("matching", |b| {
        b.iter(|| validate(QuestionType::Matching, black_box(&matching)))
    });

    let missing_stem = json!({"options": {"A": "1"}});
    group.bench_function("missing_stem", |b| {
        b.iter(|| validate(QuestionType::MultipleChoice, black_box(&missing_stem)))
    });

    group.finish();
}

criterion_group!(benches, bench_allocate, bench_validate);
criterion_main!(benches);
