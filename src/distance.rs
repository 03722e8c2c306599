//! Squared Euclidean distance and the exact linear-scan baseline.
//!
//! The forest only needs squared L2: its branch bounds rely on the distance
//! decomposing additively per axis. The primitive itself is
//! [`Scalar::squared_distance`], whose accumulator type depends on the
//! element type (see [`crate::scalar`]).

use crate::forest::search::select_closest;
use crate::forest::Neighbor;
use crate::points::PointSet;
use crate::scalar::Scalar;

/// Squared Euclidean distance between two equal-length vectors.
///
/// # Panics
///
/// Debug builds assert that the lengths match.
#[inline]
#[must_use]
pub fn squared_distance<T: Scalar>(a: &[T], b: &[T]) -> T::Dist {
    debug_assert_eq!(a.len(), b.len(), "vector length mismatch");
    T::squared_distance(a, b)
}

/// Exact `k` nearest neighbors of `query` by scanning every point.
///
/// Results are sorted ascending by distance; at most `min(k, points.len())`.
pub fn exact_knn<T: Scalar>(points: &PointSet<'_, T>, query: &[T], k: usize) -> Vec<Neighbor<T::Dist>> {
    let mut all: Vec<Neighbor<T::Dist>> = (0..points.len() as u32)
        .map(|id| Neighbor {
            id,
            distance: squared_distance(query, points.point(id)),
        })
        .collect();
    let taken = select_closest(&mut all, k);
    all.truncate(taken);
    all
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squared_distance_is_zero_for_identical() {
        let a = [1.0_f32, 2.0, 3.0];
        assert_eq!(squared_distance(&a, &a), 0.0);
    }

    #[test]
    fn exact_knn_orders_by_distance() {
        let data = [0.0_f64, 5.0, 1.0, 3.0, 2.0];
        let points = PointSet::new(&data, 1).unwrap();
        let ids: Vec<u32> = exact_knn(&points, &[2.1], 3).iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![4, 3, 2]);
    }

    #[test]
    fn exact_knn_caps_at_point_count() {
        let data = [0_i16, 1, 2, 3];
        let points = PointSet::new(&data, 2).unwrap();
        assert_eq!(exact_knn(&points, &[0, 0], 10).len(), 2);
    }
}
