//! Randomized k-d tree over a borrowed point set.
//!
//! A [`SplitTree`] recursively partitions a permutation of point ids into
//! bounded leaves using a variance-guided randomized split (see [`split`]).
//!
//! Nodes live in two arenas owned by the tree, one per node kind, so an
//! internal node never pays for the leaf id buffer and vice versa. Children
//! are referenced by a tagged [`NodeRef`] handle into the matching arena.
//!
//! # References
//!
//! - Silpa-Anan & Hartley (2008): "Optimised KD-trees for fast image descriptor matching"
//! - Muja & Lowe (2009): "Fast approximate nearest neighbors with automatic algorithm configuration"

pub mod split;

use rand::Rng;
use smallvec::SmallVec;

use crate::error::{KdForestError, Result};
use crate::points::PointSet;
use crate::scalar::{Discriminant, Scalar};

pub use split::{choose_split, partition, Split, SPLIT_CANDIDATES, VARIANCE_SAMPLE};

/// A range of at most this many points becomes a leaf.
pub const LEAF_MAX_POINTS: usize = 14;

/// Handle to a node in one tree's arenas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRef {
    Internal(u32),
    Leaf(u32),
}

/// Internal node: values below `threshold` along `dim` went left.
#[derive(Debug, Clone, PartialEq)]
pub struct InternalNode<D> {
    dim: u32,
    threshold: D,
    left: NodeRef,
    right: NodeRef,
}

impl<D: Discriminant> InternalNode<D> {
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim as usize
    }

    #[inline]
    pub fn threshold(&self) -> D {
        self.threshold
    }

    #[inline]
    pub fn left(&self) -> NodeRef {
        self.left
    }

    #[inline]
    pub fn right(&self) -> NodeRef {
        self.right
    }
}

/// Leaf node holding 1..=[`LEAF_MAX_POINTS`] point ids inline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafNode {
    ids: SmallVec<[u32; LEAF_MAX_POINTS]>,
}

impl LeafNode {
    #[inline]
    pub fn ids(&self) -> &[u32] {
        &self.ids
    }
}

/// One randomized k-d tree. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitTree<D> {
    root: NodeRef,
    internals: Vec<InternalNode<D>>,
    leaves: Vec<LeafNode>,
}

impl<D: Discriminant> SplitTree<D> {
    /// Build a tree over the points named by `ids`.
    ///
    /// `ids` is partitioned in place and is only scratch space for the build;
    /// leaves keep their own copies. `rng` advances once per internal node,
    /// in pre-order (parent, then the whole left subtree, then the right).
    pub fn build<T, R>(points: &PointSet<'_, T>, ids: &mut [u32], rng: &mut R) -> Result<Self>
    where
        T: Scalar<Disc = D>,
        R: Rng + ?Sized,
    {
        if ids.is_empty() {
            return Err(KdForestError::EmptyIndex);
        }
        if let Some(&bad) = ids.iter().find(|&&id| id as usize >= points.len()) {
            return Err(KdForestError::InvalidParameter(format!(
                "point id {bad} out of range for {} points",
                points.len()
            )));
        }

        let mut tree = Self {
            root: NodeRef::Leaf(0),
            internals: Vec::with_capacity(ids.len() / LEAF_MAX_POINTS),
            leaves: Vec::with_capacity(ids.len() / LEAF_MAX_POINTS + 1),
        };
        tree.root = tree.build_node(points, ids, rng);
        tree.internals.shrink_to_fit();
        tree.leaves.shrink_to_fit();
        Ok(tree)
    }

    fn build_node<T, R>(&mut self, points: &PointSet<'_, T>, ids: &mut [u32], rng: &mut R) -> NodeRef
    where
        T: Scalar<Disc = D>,
        R: Rng + ?Sized,
    {
        if ids.len() <= LEAF_MAX_POINTS {
            let handle = self.leaves.len() as u32;
            self.leaves.push(LeafNode {
                ids: SmallVec::from_slice(ids),
            });
            return NodeRef::Leaf(handle);
        }

        let split = choose_split(points, ids, rng);
        let mut mid = partition(points, ids, &split);

        // Everything landed on one side (duplicate-heavy data). Halving keeps
        // depth logarithmic; the ids are already permuted, only the cut moves.
        if mid == 0 || mid == ids.len() {
            tracing::trace!(
                points = ids.len(),
                dim = split.dim,
                "degenerate split, cutting at the midpoint"
            );
            mid = ids.len() / 2;
        }

        let slot = self.internals.len();
        self.internals.push(InternalNode {
            // PointSet caps the dimension at u32::MAX.
            dim: split.dim as u32,
            threshold: split.threshold,
            left: NodeRef::Leaf(0),
            right: NodeRef::Leaf(0),
        });

        let (left_ids, right_ids) = ids.split_at_mut(mid);
        let left = self.build_node(points, left_ids, rng);
        let right = self.build_node(points, right_ids, rng);

        let node = &mut self.internals[slot];
        node.left = left;
        node.right = right;
        NodeRef::Internal(slot as u32)
    }

    #[inline]
    pub fn root(&self) -> NodeRef {
        self.root
    }

    #[inline]
    pub fn internal(&self, handle: u32) -> &InternalNode<D> {
        &self.internals[handle as usize]
    }

    #[inline]
    pub fn leaf(&self, handle: u32) -> &LeafNode {
        &self.leaves[handle as usize]
    }

    pub fn internal_count(&self) -> usize {
        self.internals.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    /// All leaves, in build order.
    pub fn leaves(&self) -> impl Iterator<Item = &LeafNode> + '_ {
        self.leaves.iter()
    }

    /// Length in edges of the longest root-to-leaf path (0 for a lone leaf).
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(self.root, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            match node {
                NodeRef::Leaf(_) => max_depth = max_depth.max(depth),
                NodeRef::Internal(i) => {
                    let n = self.internal(i);
                    stack.push((n.left, depth + 1));
                    stack.push((n.right, depth + 1));
                }
            }
        }
        max_depth
    }

    /// Ids of every point stored below `node`.
    pub fn point_ids(&self, node: NodeRef) -> Vec<u32> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(node) = stack.pop() {
            match node {
                NodeRef::Leaf(i) => out.extend_from_slice(self.leaf(i).ids()),
                NodeRef::Internal(i) => {
                    let n = self.internal(i);
                    stack.push(n.right);
                    stack.push(n.left);
                }
            }
        }
        out
    }

    /// Approximate heap footprint of the node arenas.
    pub fn size_bytes(&self) -> usize {
        self.internals.capacity() * std::mem::size_of::<InternalNode<D>>()
            + self.leaves.capacity() * std::mem::size_of::<LeafNode>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn random_points(n: usize, dim: usize, seed: u64) -> Vec<f32> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n * dim).map(|_| rng.random::<f32>()).collect()
    }

    fn build(data: &[f32], dim: usize, seed: u64) -> SplitTree<f32> {
        let points = PointSet::new(data, dim).unwrap();
        let mut ids: Vec<u32> = (0..points.len() as u32).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        SplitTree::build(&points, &mut ids, &mut rng).unwrap()
    }

    #[test]
    fn small_range_is_single_leaf() {
        let data = random_points(LEAF_MAX_POINTS, 3, 1);
        let tree = build(&data, 3, 1);
        assert_eq!(tree.root(), NodeRef::Leaf(0));
        assert_eq!(tree.internal_count(), 0);
        assert_eq!(tree.depth(), 0);
    }

    #[test]
    fn leaves_partition_point_set() {
        let n = 1000;
        let data = random_points(n, 8, 3);
        let tree = build(&data, 8, 3);

        let mut all: Vec<u32> = Vec::new();
        for leaf in tree.leaves() {
            assert!(!leaf.ids().is_empty());
            assert!(leaf.ids().len() <= LEAF_MAX_POINTS);
            all.extend_from_slice(leaf.ids());
        }
        all.sort_unstable();
        assert_eq!(all, (0..n as u32).collect::<Vec<_>>());
        assert_eq!(tree.internal_count() + 1, tree.leaf_count());
    }

    #[test]
    fn internal_nodes_respect_threshold() {
        let dim = 4;
        let data = random_points(500, dim, 11);
        let tree = build(&data, dim, 11);

        for i in 0..tree.internal_count() as u32 {
            let node = tree.internal(i);
            let value = |id: u32| data[id as usize * dim + node.dim()];
            for id in tree.point_ids(node.left()) {
                assert!(value(id) < node.threshold());
            }
            for id in tree.point_ids(node.right()) {
                assert!(value(id) >= node.threshold());
            }
        }
    }

    #[test]
    fn identical_points_stay_logarithmic() {
        let n = 4096;
        let data = vec![0.5_f32; n * 3];
        let tree = build(&data, 3, 5);
        let bound = (n as f64).log2().ceil() as usize + 2;
        assert!(tree.depth() <= bound, "depth {} > {}", tree.depth(), bound);
        assert_eq!(tree.point_ids(tree.root()).len(), n);
    }

    #[test]
    fn same_seed_same_structure() {
        let data = random_points(300, 6, 9);
        assert_eq!(build(&data, 6, 42), build(&data, 6, 42));
    }

    #[test]
    fn arenas_hold_no_slack() {
        for n in [100, 1000, 10_000] {
            let data = random_points(n, 16, 21);
            let tree = build(&data, 16, 21);
            let used = tree.internal_count() * std::mem::size_of::<InternalNode<f32>>()
                + tree.leaf_count() * std::mem::size_of::<LeafNode>();
            assert_eq!(tree.size_bytes(), used, "n = {n}");
        }
    }

    #[test]
    fn internal_node_stays_compact() {
        // dim (u32) + threshold (f32) + two 8-byte handles.
        assert_eq!(std::mem::size_of::<InternalNode<f32>>(), 24);
    }

    #[test]
    fn rejects_empty_range() {
        let data = [1.0_f32, 2.0];
        let points = PointSet::new(&data, 2).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let result = SplitTree::build(&points, &mut [], &mut rng);
        assert_eq!(result.unwrap_err(), KdForestError::EmptyIndex);
    }

    #[test]
    fn rejects_out_of_range_id() {
        let data = [1.0_f32, 2.0];
        let points = PointSet::new(&data, 1).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(SplitTree::build(&points, &mut [0, 5], &mut rng).is_err());
    }
}
