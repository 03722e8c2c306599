//! Seeded synthetic datasets, flat row-major.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::distance::exact_knn;
use crate::points::PointSet;
use crate::scalar::Scalar;

/// `n` points with coordinates uniform in `[0, 1)`.
pub fn uniform(n: usize, dim: usize, seed: u64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n * dim).map(|_| rng.random::<f32>()).collect()
}

/// `n` points drawn around `n_clusters` uniform centers with Gaussian noise
/// of standard deviation `cluster_std`, clamped to `[0, 1]`.
pub fn clustered(n: usize, dim: usize, n_clusters: usize, cluster_std: f32, seed: u64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    let n_clusters = n_clusters.max(1);

    let centers: Vec<f32> = (0..n_clusters * dim).map(|_| rng.random::<f32>()).collect();

    let mut data = Vec::with_capacity(n * dim);
    for _ in 0..n {
        let c = rng.random_range(0..n_clusters);
        for &center in &centers[c * dim..(c + 1) * dim] {
            // Box-Muller; u1 in (0, 1] keeps ln finite.
            let u1: f32 = 1.0 - rng.random::<f32>();
            let u2: f32 = rng.random();
            let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos();
            data.push((center + z * cluster_std).clamp(0.0, 1.0));
        }
    }
    data
}

/// Exact `k` nearest neighbor ids for each row of the flat `queries` slice.
pub fn ground_truth<T: Scalar>(points: &PointSet<'_, T>, queries: &[T], k: usize) -> Vec<Vec<u32>> {
    queries
        .chunks_exact(points.dimension())
        .map(|q| exact_knn(points, q, k).into_iter().map(|n| n.id).collect())
        .collect()
}
