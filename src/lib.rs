//! kdforest: randomized k-d forest for approximate nearest neighbor search.
//!
//! Indexes a caller-owned array of N points in D dimensions and answers
//! "k closest points to this query" under a fixed work budget, trading
//! exactness for speed.
//!
//! - `kdtree/`: one randomized k-d tree (variance-guided split, arena nodes)
//! - `forest/`: several trees over the same points, searched together with
//!   best-bin-first priority search
//! - `scalar`: element types and their widened threshold/distance types
//! - `benchmark/`: recall metrics and synthetic datasets
//!
//! ```rust
//! use kdforest::{ForestParams, KdForest};
//!
//! let data = [0.0_f32, 0.0, 1.0, 0.0, 0.0, 1.0, 10.0, 10.0];
//! let forest = KdForest::from_slice(&data, 2, ForestParams::default())?;
//! let nearest = forest.search(&[0.0, 0.1], 1, 4)?;
//! assert_eq!(nearest[0].id, 0);
//! # Ok::<(), kdforest::KdForestError>(())
//! ```
//!
//! # Critical Nuances
//!
//! ## Budget, not recall
//!
//! `checks` bounds the number of distinct points whose true distance is
//! computed. Recall grows with it, never shrinks, and reaches 1.0 once it
//! covers the whole point set. It is checked between leaves, so a search can
//! score up to one leaf more than requested, plus one leaf per tree for the
//! initial descents.
//!
//! ## Why several trees
//!
//! A single k-d tree degrades quickly with dimension: the query's true
//! neighbor often sits across a split near the root. Independently
//! randomized trees place those boundaries differently, and the shared
//! frontier lets the search jump to whichever tree has the most promising
//! unexplored branch.
//!
//! ## Reproducibility
//!
//! One random stream runs through all tree builds in order. The same seed,
//! tree count and point set always give the same forest and the same results.

pub mod benchmark;
pub mod distance;
pub mod error;
pub mod forest;
pub mod kdtree;
pub mod points;
pub mod scalar;

// Re-exports
pub use error::{KdForestError, Result};
pub use forest::{ForestParams, ForestStats, KdForest, Neighbor, SearchScratch};
pub use kdtree::{NodeRef, SplitTree, LEAF_MAX_POINTS};
pub use points::PointSet;
pub use scalar::{Discriminant, Distance, Scalar};
