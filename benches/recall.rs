//! Recall vs budget benchmarks.
//!
//! Measures the fundamental ANN tradeoff: how much accuracy do you sacrifice
//! for speed? Prints recall@10 at each `checks` setting before timing it.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use kdforest::benchmark::{clustered, ground_truth, mean_recall};
use kdforest::{ForestParams, KdForest, PointSet};

const K: usize = 10;

fn bench_recall_vs_checks(c: &mut Criterion) {
    let dim = 32;
    let data = clustered(20_000, dim, 50, 0.08, 42);
    let queries = clustered(100, dim, 50, 0.08, 43);
    let points = PointSet::new(&data, dim).unwrap();
    let gt = ground_truth(&points, &queries, K);
    let forest = KdForest::build(points, ForestParams::default()).unwrap();

    let mut group = c.benchmark_group("recall_vs_checks");
    for checks in [16, 64, 256, 1024, 4096] {
        let retrieved: Vec<Vec<u32>> = queries
            .chunks_exact(dim)
            .map(|q| forest.search(q, K, checks).unwrap().iter().map(|n| n.id).collect())
            .collect();
        println!(
            "checks={checks:5} recall@{K}={:.3}",
            mean_recall(&gt, &retrieved, K)
        );

        group.bench_with_input(BenchmarkId::from_parameter(checks), &checks, |b, &checks| {
            b.iter(|| {
                for q in queries.chunks_exact(dim) {
                    black_box(forest.search(black_box(q), K, checks).unwrap());
                }
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_recall_vs_checks);
criterion_main!(benches);
