//! Benchmarks for the pinch scale mapper.
//!
//! Run with: cargo bench -p pgrid-core

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use pgrid_core::scale::ScaleReading;
use std::hint::black_box;

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("scale/evaluate");

    for len in [3usize, 7, 64] {
        let scales: Vec<f64> = (1..=256).map(|i| f64::from(i) / 64.0).collect();
        group.bench_with_input(BenchmarkId::new("sweep", len), &scales, |b, scales| {
            b.iter(|| {
                for &scale in scales {
                    let _ = black_box(ScaleReading::evaluate(black_box(scale), len / 2, len));
                }
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_evaluate);
criterion_main!(benches);
