// Copyright (c) The IncludeGuardian Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The reachability index: per-source reachability plus a path-count
//! matrix, precomputed once and shared read-only by every analysis.

use crate::errors::{Error, Result};
use crate::graph::{FileGraph, FileHandle};
use fixedbitset::FixedBitSet;

/// Precomputed reachability and path-count data for a [`FileGraph`].
///
/// Built once per graph and shared by reference across all analyses: the
/// graph and reachability index are immutable during analysis. Memory is
/// `O(n^2)` -- an `n x n` flat path-count matrix plus `n` reachability
/// bitsets.
#[derive(Debug)]
pub struct ReachabilityIndex {
    len: usize,
    reachable: Vec<FixedBitSet>,
    // Flat n*n matrix; path_counts[from * len + to].
    path_counts: Vec<u32>,
}

impl ReachabilityIndex {
    /// Computes the reachability index for `graph`.
    ///
    /// For each vertex `v`, this walks every path starting at `v` exactly
    /// once per edge on that path, so the cost is `O(sum of |paths from
    /// v|)` -- exponential in the worst case. Overflowing a path count
    /// beyond `u32` is reported as [`Error::PathCountOverflow`] rather
    /// than silently wrapping.
    pub fn build(graph: &FileGraph) -> Result<Self> {
        let len = graph.node_count();
        let mut reachable = vec![FixedBitSet::with_capacity(len); len];
        let mut path_counts = vec![0u32; len * len];

        for start in graph.handles() {
            let from = start.index();
            let mut stack = vec![start];
            while let Some(v) = stack.pop() {
                reachable[from].insert(v.index());
                let slot = &mut path_counts[from * len + v.index()];
                *slot = slot.checked_add(1).ok_or(Error::PathCountOverflow { from: start, to: v })?;
                for w in graph.out_neighbors(v) {
                    stack.push(w);
                }
            }
        }

        Ok(Self { len, reachable, path_counts })
    }

    /// Returns the set of nodes reachable from `start`, including `start`
    /// itself.
    pub fn reachable_from(&self, start: FileHandle) -> &FixedBitSet {
        &self.reachable[start.index()]
    }

    /// The number of distinct simple paths from `from` to `to`.
    ///
    /// `path_count(s, s) == 1` (the trivial path). This implicitly treats
    /// every path through a DFS tree as distinct, including those through
    /// shared diamond dependencies.
    pub fn path_count(&self, from: FileHandle, to: FileHandle) -> u32 {
        self.path_counts[from.index() * self.len + to.index()]
    }

    /// `true` iff `to` is reachable from `from`.
    pub fn is_reachable(&self, from: FileHandle, to: FileHandle) -> bool {
        self.path_count(from, to) > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::DiamondGraph;

    #[test]
    fn diamond_reachability_and_path_counts() {
        let fx = DiamondGraph::new();
        let reach = ReachabilityIndex::build(&fx.graph).unwrap();

        assert!(reach.is_reachable(fx.a, fx.d));
        assert_eq!(reach.path_count(fx.a, fx.d), 2);
        assert_eq!(reach.path_count(fx.a, fx.a), 1);
        assert!(!reach.is_reachable(fx.d, fx.a));
    }

    #[test]
    fn reachable_from_includes_self() {
        let fx = DiamondGraph::new();
        let reach = ReachabilityIndex::build(&fx.graph).unwrap();
        assert!(reach.reachable_from(fx.a).contains(fx.a.index()));
    }

    #[test]
    fn path_count_consistent_with_reachability_set() {
        let fx = DiamondGraph::new();
        let reach = ReachabilityIndex::build(&fx.graph).unwrap();
        for h in fx.graph.handles() {
            let in_set = reach.reachable_from(fx.a).contains(h.index());
            let via_count = reach.path_count(fx.a, h) > 0;
            assert_eq!(in_set, via_count);
        }
    }
}
