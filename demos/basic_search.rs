//! Basic forest search.
//!
//! Builds a forest over clustered vectors, runs a few queries at increasing
//! budgets and reports recall against exact search.
//!
//! ```sh
//! cargo run --example basic_search
//! ```

use kdforest::benchmark::{clustered, ground_truth, mean_recall};
use kdforest::{ForestParams, KdForest, PointSet};

fn main() -> kdforest::Result<()> {
    let dim = 24;
    let n = 10_000;
    let k = 10;

    let data = clustered(n, dim, 40, 0.06, 42);
    let queries = clustered(200, dim, 40, 0.06, 7);

    let points = PointSet::new(&data, dim)?;
    let truth = ground_truth(&points, &queries, k);

    let start = std::time::Instant::now();
    let forest = KdForest::build(points, ForestParams::default())?;
    let stats = forest.stats();
    println!(
        "built {} trees over {} points in {:?} ({} leaves, max depth {}, {} KiB)",
        stats.num_trees,
        stats.num_points,
        start.elapsed(),
        stats.leaf_nodes,
        stats.max_depth,
        stats.size_bytes / 1024
    );

    for checks in [32, 128, 512, 2048] {
        let start = std::time::Instant::now();
        let mut retrieved = Vec::with_capacity(truth.len());
        for q in queries.chunks_exact(dim) {
            retrieved.push(forest.search(q, k, checks)?.iter().map(|r| r.id).collect::<Vec<_>>());
        }
        let per_query = start.elapsed() / truth.len() as u32;
        println!(
            "checks={checks:5}  recall@{k}={:.3}  {:?}/query",
            mean_recall(&truth, &retrieved, k),
            per_query
        );
    }

    let nearest = forest.search(&queries[..dim], 3, 256)?;
    println!("first query, 3 nearest:");
    for r in nearest {
        println!("  id={:5}  squared_distance={:.4}", r.id, r.distance);
    }
    Ok(())
}
