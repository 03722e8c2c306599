//! Forest of randomized k-d trees searched together.
//!
//! All trees index the same borrowed point set. They differ only through the
//! random split choices, drawn from one stream that runs through the trees
//! in build order, so a forest is reproducible from `(seed, num_trees)`.
//!
//! Search is best-bin-first across the whole forest: one greedy descent per
//! tree seeds a shared frontier of unexplored branches, which is then drained
//! in order of distance lower bound until enough distinct points have been
//! scored. See [`search`] for details.

pub mod search;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{KdForestError, Result};
use crate::kdtree::SplitTree;
use crate::points::PointSet;
use crate::scalar::Scalar;

pub use search::{Neighbor, SearchScratch};

/// Forest construction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForestParams {
    /// Number of independently randomized trees.
    pub num_trees: usize,

    /// Seed of the split-selection random stream.
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            num_trees: 8,
            seed: 42,
        }
    }
}

impl ForestParams {
    pub fn with_trees(mut self, num_trees: usize) -> Self {
        self.num_trees = num_trees;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_trees == 0 {
            return Err(KdForestError::InvalidParameter(
                "num_trees must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Structural statistics of a built forest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForestStats {
    pub num_points: usize,
    pub dimension: usize,
    pub num_trees: usize,
    pub internal_nodes: usize,
    pub leaf_nodes: usize,
    /// Deepest root-to-leaf path over all trees, in edges.
    pub max_depth: usize,
    /// Node arenas only; the point data is borrowed.
    pub size_bytes: usize,
}

/// Randomized k-d forest over a borrowed point set.
///
/// Read-only after construction, so a shared `&KdForest` can serve
/// concurrent searches as long as each caller brings its own scratch.
#[derive(Debug, Clone)]
pub struct KdForest<'a, T: Scalar> {
    points: PointSet<'a, T>,
    trees: Vec<SplitTree<T::Disc>>,
}

impl<'a, T: Scalar> KdForest<'a, T> {
    /// Build a forest seeded from `params.seed`.
    pub fn build(points: PointSet<'a, T>, params: ForestParams) -> Result<Self> {
        params.validate()?;
        let mut rng = StdRng::seed_from_u64(params.seed);
        Self::build_with_rng(points, params.num_trees, &mut rng)
    }

    /// Build a forest from a flat row-major slice of `n * dimension` elements.
    pub fn from_slice(data: &'a [T], dimension: usize, params: ForestParams) -> Result<Self> {
        Self::build(PointSet::new(data, dimension)?, params)
    }

    /// Build a forest drawing split choices from a caller-supplied stream.
    ///
    /// Trees are built one after another and `rng` is never reset, so tree
    /// `i` continues where tree `i - 1` left off.
    pub fn build_with_rng<R: Rng + ?Sized>(
        points: PointSet<'a, T>,
        num_trees: usize,
        rng: &mut R,
    ) -> Result<Self> {
        if num_trees == 0 {
            return Err(KdForestError::InvalidParameter(
                "num_trees must be greater than 0".to_string(),
            ));
        }

        let n = points.len() as u32;
        let mut trees = Vec::with_capacity(num_trees);
        for t in 0..num_trees {
            // Partitioning is destructive: every tree starts from a fresh
            // identity permutation.
            let mut ids: Vec<u32> = (0..n).collect();
            let tree = SplitTree::build(&points, &mut ids, rng)?;
            tracing::debug!(
                tree = t,
                leaves = tree.leaf_count(),
                depth = tree.depth(),
                "built split tree"
            );
            trees.push(tree);
        }

        let forest = Self { points, trees };
        tracing::info!(
            points = forest.num_points(),
            dimension = forest.dimension(),
            trees = num_trees,
            "built k-d forest"
        );
        Ok(forest)
    }

    #[inline]
    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    #[inline]
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.points.dimension()
    }

    #[inline]
    pub fn points(&self) -> &PointSet<'a, T> {
        &self.points
    }

    #[inline]
    pub fn trees(&self) -> &[SplitTree<T::Disc>] {
        &self.trees
    }

    pub fn stats(&self) -> ForestStats {
        ForestStats {
            num_points: self.num_points(),
            dimension: self.dimension(),
            num_trees: self.num_trees(),
            internal_nodes: self.trees.iter().map(SplitTree::internal_count).sum(),
            leaf_nodes: self.trees.iter().map(SplitTree::leaf_count).sum(),
            max_depth: self.trees.iter().map(SplitTree::depth).max().unwrap_or(0),
            size_bytes: self.trees.iter().map(SplitTree::size_bytes).sum::<usize>()
                + self.trees.capacity() * std::mem::size_of::<SplitTree<T::Disc>>(),
        }
    }
}
