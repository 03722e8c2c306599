//! Build and query throughput of the k-d forest.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use kdforest::benchmark::{clustered, uniform};
use kdforest::{ForestParams, KdForest, SearchScratch};

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    group.sample_size(10);

    for &(n, dim) in &[(10_000, 32), (50_000, 32), (10_000, 128)] {
        let data = clustered(n, dim, 50, 0.05, 42);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(
            BenchmarkId::new(format!("d{dim}"), n),
            &data,
            |b, data| {
                b.iter(|| KdForest::from_slice(black_box(data.as_slice()), dim, ForestParams::default()).unwrap())
            },
        );
    }
    group.finish();
}

fn bench_search_checks(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_checks");
    let dim = 64;
    let data = clustered(50_000, dim, 100, 0.05, 42);
    let queries = uniform(100, dim, 7);
    let forest = KdForest::from_slice(&data, dim, ForestParams::default()).unwrap();

    for checks in [32, 128, 512, 2048] {
        group.bench_with_input(BenchmarkId::from_parameter(checks), &checks, |b, &checks| {
            let mut scratch = SearchScratch::new();
            let mut out = Vec::with_capacity(10);
            b.iter(|| {
                for q in queries.chunks_exact(dim) {
                    forest
                        .search_into(black_box(q), 10, checks, &mut scratch, &mut out)
                        .unwrap();
                }
                black_box(out.len())
            })
        });
    }
    group.finish();
}

fn bench_search_trees(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_trees");
    let dim = 64;
    let data = clustered(50_000, dim, 100, 0.05, 42);
    let queries = uniform(100, dim, 7);

    for trees in [1, 4, 8, 16] {
        let forest = KdForest::from_slice(&data, dim, ForestParams::default().with_trees(trees)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(trees), &forest, |b, forest| {
            b.iter(|| {
                for q in queries.chunks_exact(dim) {
                    black_box(forest.search(black_box(q), 10, 256).unwrap());
                }
            })
        });
    }
    group.finish();
}

fn bench_exact(c: &mut Criterion) {
    let dim = 64;
    let data = clustered(50_000, dim, 100, 0.05, 42);
    let queries = uniform(10, dim, 7);
    let forest = KdForest::from_slice(&data, dim, ForestParams::default().with_trees(1)).unwrap();

    c.bench_function("search_exact_50k", |b| {
        b.iter(|| {
            for q in queries.chunks_exact(dim) {
                black_box(forest.search_exact(black_box(q), 10).unwrap());
            }
        })
    });
}

criterion_group!(
    benches,
    bench_build,
    bench_search_checks,
    bench_search_trees,
    bench_exact
);
criterion_main!(benches);
