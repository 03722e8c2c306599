//! Variance-guided randomized split selection and in-place partitioning.

use rand::Rng;

use crate::points::PointSet;
use crate::scalar::{Discriminant, Scalar};

/// Number of leading points of a range used to estimate per-dimension variance.
pub const VARIANCE_SAMPLE: usize = 128;

/// Number of highest-variance dimensions the split dimension is drawn from.
pub const SPLIT_CANDIDATES: usize = 5;

/// Discriminant dimension and threshold of an internal node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Split<D> {
    pub dim: usize,
    pub threshold: D,
}

/// Pick a split for the points in `ids`.
///
/// Mean and variance are estimated over the first `VARIANCE_SAMPLE` ids only.
/// The split dimension is drawn uniformly from the `SPLIT_CANDIDATES`
/// highest-variance dimensions, and the threshold is the sample mean along it.
/// Consumes exactly one value from `rng`.
pub fn choose_split<T, R>(points: &PointSet<'_, T>, ids: &[u32], rng: &mut R) -> Split<T::Disc>
where
    T: Scalar,
    R: Rng + ?Sized,
{
    let dimension = points.dimension();
    let count = ids.len().min(VARIANCE_SAMPLE);

    let zero = <T::Disc as Discriminant>::zero();
    let mut sum = vec![zero; dimension];
    let mut sum_sq = vec![zero; dimension];
    for &id in &ids[..count] {
        for (d, &x) in points.point(id).iter().enumerate() {
            let x = x.to_disc();
            sum[d] = sum[d] + x;
            sum_sq[d] = sum_sq[d] + x * x;
        }
    }

    let n = T::Disc::from_count(count);
    let mut variances: Vec<(T::Disc, usize)> = sum
        .iter()
        .zip(sum_sq.iter())
        .enumerate()
        .map(|(d, (&s, &ss))| {
            let var = if count <= 1 {
                zero
            } else {
                (ss - s * s / n) / T::Disc::from_count(count - 1)
            };
            (var, d)
        })
        .collect();

    // Descending by variance, ties toward the higher dimension.
    let by_variance_desc = |a: &(T::Disc, usize), b: &(T::Disc, usize)| {
        b.0.cmp_total(&a.0).then_with(|| b.1.cmp(&a.1))
    };

    // Only the top candidates need ordering; a full sort dominates build time
    // for wide vectors.
    let candidates = SPLIT_CANDIDATES.min(dimension);
    if candidates < dimension {
        variances.select_nth_unstable_by(candidates - 1, by_variance_desc);
    }
    variances[..candidates].sort_unstable_by(by_variance_desc);

    let dim = variances[rng.random_range(0..candidates)].1;
    Split {
        dim,
        threshold: sum[dim] / n,
    }
}

/// Two-pointer partition of `ids`: values below the threshold first.
///
/// Returns the number of ids on the left side.
pub fn partition<T: Scalar>(points: &PointSet<'_, T>, ids: &mut [u32], split: &Split<T::Disc>) -> usize {
    let mut l = 0;
    let mut r = ids.len();
    while l != r {
        if points.value(ids[l], split.dim).to_disc() < split.threshold {
            l += 1;
        } else {
            r -= 1;
            ids.swap(l, r);
        }
    }
    l
}
