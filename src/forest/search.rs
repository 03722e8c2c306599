//! Best-bin-first search across all trees of a forest.
//!
//! Algorithm:
//! - Descend every tree once, greedily following the side of each split the
//!   query falls on, and push each skipped sibling onto one global min-heap
//!   keyed by a lower bound on its squared distance to the query.
//! - Score every unseen point in each leaf reached.
//! - While fewer than `checks` distinct points have been scored, pop the
//!   cheapest branch anywhere in the forest and descend from it the same way.
//! - Return the `k` closest scored points.
//!
//! A point stored in several trees is scored once per query.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::distance;
use crate::error::{KdForestError, Result};
use crate::forest::KdForest;
use crate::kdtree::NodeRef;
use crate::scalar::{Discriminant, Distance, Scalar};

/// A search result: point id and squared distance to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor<D> {
    pub id: u32,
    pub distance: D,
}

/// Unexplored subtree on the frontier.
#[derive(Debug, Clone, Copy)]
struct Branch<D> {
    bound: D,
    tree: u32,
    node: NodeRef,
}

impl<D: Discriminant> PartialEq for Branch<D> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<D: Discriminant> Eq for Branch<D> {}

impl<D: Discriminant> Ord for Branch<D> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap: smaller bound = higher priority
        self.bound.cmp_total(&other.bound).reverse()
    }
}

impl<D: Discriminant> PartialOrd for Branch<D> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Per-caller working memory for [`KdForest::search_into`].
///
/// Holds the frontier, the seen-set and the scored candidates. Reusing one
/// scratch across queries avoids reallocating them; sharing one between
/// concurrent searches is not possible, since searching borrows it mutably.
#[derive(Debug)]
pub struct SearchScratch<T: Scalar> {
    frontier: BinaryHeap<Branch<T::Disc>>,
    seen: Vec<bool>,
    candidates: Vec<Neighbor<T::Dist>>,
}

impl<T: Scalar> Default for SearchScratch<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> SearchScratch<T> {
    pub fn new() -> Self {
        Self {
            frontier: BinaryHeap::new(),
            seen: Vec::new(),
            candidates: Vec::new(),
        }
    }

    /// Number of distinct points scored by the last search.
    pub fn scored(&self) -> usize {
        self.candidates.len()
    }

    fn reset(&mut self, num_points: usize) {
        self.frontier.clear();
        if self.seen.len() == num_points {
            // Only the previous query's marks need clearing.
            for c in &self.candidates {
                self.seen[c.id as usize] = false;
            }
        } else {
            self.seen.clear();
            self.seen.resize(num_points, false);
        }
        self.candidates.clear();
    }
}

impl<T: Scalar> KdForest<'_, T> {
    /// Approximate `k` nearest neighbors of `query`, closest first.
    ///
    /// `checks` is the number of distinct points to score before stopping; it
    /// is raised to `k` if smaller. Larger budgets never make the result worse,
    /// and a budget of at least `num_points()` scores every point, which makes
    /// the search exact. At most `min(k, num_points())` neighbors are returned.
    pub fn search(&self, query: &[T], k: usize, checks: usize) -> Result<Vec<Neighbor<T::Dist>>> {
        let mut scratch = SearchScratch::new();
        let mut out = Vec::with_capacity(k.min(self.num_points()));
        self.search_into(query, k, checks, &mut scratch, &mut out)?;
        Ok(out)
    }

    /// Like [`search`](Self::search), reusing caller-owned scratch and output.
    ///
    /// `out` is cleared first.
    pub fn search_into(
        &self,
        query: &[T],
        k: usize,
        checks: usize,
        scratch: &mut SearchScratch<T>,
        out: &mut Vec<Neighbor<T::Dist>>,
    ) -> Result<()> {
        self.validate_query(query, k)?;
        let checks = checks.max(k);
        scratch.reset(self.num_points());

        let zero = <T::Disc as Discriminant>::zero();
        for (t, tree) in self.trees().iter().enumerate() {
            self.descend(t, tree.root(), zero, query, scratch);
        }

        let mut pops = 0usize;
        while scratch.candidates.len() < checks {
            let Some(branch) = scratch.frontier.pop() else {
                break;
            };
            pops += 1;
            self.descend(branch.tree as usize, branch.node, branch.bound, query, scratch);
        }

        let taken = select_closest(&mut scratch.candidates, k);
        out.clear();
        out.extend_from_slice(&scratch.candidates[..taken]);

        tracing::trace!(
            scored = scratch.candidates.len(),
            pops,
            frontier = scratch.frontier.len(),
            returned = taken,
            "forest search finished"
        );
        Ok(())
    }

    /// Exact `k` nearest neighbors by linear scan, closest first.
    pub fn search_exact(&self, query: &[T], k: usize) -> Result<Vec<Neighbor<T::Dist>>> {
        self.validate_query(query, k)?;
        Ok(distance::exact_knn(self.points(), query, k))
    }

    fn validate_query(&self, query: &[T], k: usize) -> Result<()> {
        if query.is_empty() {
            return Err(KdForestError::EmptyQuery);
        }
        if query.len() != self.dimension() {
            return Err(KdForestError::DimensionMismatch {
                query_dim: query.len(),
                index_dim: self.dimension(),
            });
        }
        if k == 0 {
            return Err(KdForestError::InvalidParameter(
                "k must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Greedy descent from `start` in tree `tree_idx`, then score the leaf.
    ///
    /// Every sibling skipped on the way is pushed with `base` plus its own
    /// squared gap to the query along the split axis.
    fn descend(
        &self,
        tree_idx: usize,
        start: NodeRef,
        base: T::Disc,
        query: &[T],
        scratch: &mut SearchScratch<T>,
    ) {
        let tree = &self.trees()[tree_idx];
        let zero = <T::Disc as Discriminant>::zero();
        let mut cur = start;
        loop {
            match cur {
                NodeRef::Internal(i) => {
                    let node = tree.internal(i);
                    let diff = query[node.dim()].to_disc() - node.threshold();
                    let (follow, other) = if diff < zero {
                        (node.left(), node.right())
                    } else {
                        (node.right(), node.left())
                    };
                    scratch.frontier.push(Branch {
                        bound: base + diff * diff,
                        tree: tree_idx as u32,
                        node: other,
                    });
                    cur = follow;
                }
                NodeRef::Leaf(i) => {
                    for &id in tree.leaf(i).ids() {
                        let seen = &mut scratch.seen[id as usize];
                        if *seen {
                            continue;
                        }
                        *seen = true;
                        scratch.candidates.push(Neighbor {
                            id,
                            distance: T::squared_distance(query, self.points().point(id)),
                        });
                    }
                    return;
                }
            }
        }
    }
}

/// Move the `k` closest candidates to the front, sorted ascending.
///
/// Returns how many are valid (`min(k, candidates.len())`).
pub(crate) fn select_closest<D: Distance>(candidates: &mut [Neighbor<D>], k: usize) -> usize {
    let taken = k.min(candidates.len());
    if taken == 0 {
        return 0;
    }
    let by_distance = |a: &Neighbor<D>, b: &Neighbor<D>| a.distance.cmp_total(&b.distance);
    if taken < candidates.len() {
        candidates.select_nth_unstable_by(taken - 1, by_distance);
    }
    candidates[..taken].sort_unstable_by(by_distance);
    taken
}
