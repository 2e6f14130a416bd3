// Copyright (c) The IncludeGuardian Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Total compilation cost reachable from a set of sources, grounded in
//! `get_total_cost.cpp`.

use crate::cost::Cost;
use crate::graph::{FileGraph, FileHandle};
use rayon::prelude::*;
use std::ops::Add;

/// The total cost of compiling a set of sources: the sum of every file's
/// [`crate::graph::FileNode::true_cost`] reachable from any of them (each
/// file counted once), plus the separately-tracked cost of precompiled
/// files (which `true_cost` reports as zero, so it needs its own total to
/// be visible at all).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TotalCost {
    pub true_cost: Cost,
    pub precompiled: Cost,
}

impl Add for TotalCost {
    type Output = TotalCost;

    fn add(self, rhs: TotalCost) -> TotalCost {
        TotalCost {
            true_cost: self.true_cost + rhs.true_cost,
            precompiled: self.precompiled + rhs.precompiled,
        }
    }
}

/// Computes [`TotalCost`] for the subgraph reachable from `sources`.
///
/// Each source is walked by an independent DFS in parallel; the per-source
/// totals are then reduced. A file reachable from more than one source is
/// only charged once per DFS that reaches it, but is *not* deduplicated
/// across sources -- this matches `get_total_cost.cpp`, which reports the
/// cost of compiling the sources as a set of independent translation units,
/// not the cost of the union of files they touch.
pub fn from_graph(graph: &FileGraph, sources: &[FileHandle]) -> TotalCost {
    sources
        .par_iter()
        .map(|&source| {
            let mut seen = vec![false; graph.node_count()];
            let mut stack = vec![source];
            let mut total = TotalCost::default();
            while let Some(v) = stack.pop() {
                if seen[v.index()] {
                    continue;
                }
                seen[v.index()] = true;
                let node = match graph.node(v) {
                    Some(n) => n,
                    None => continue,
                };
                total.true_cost += node.true_cost();
                if node.is_precompiled {
                    total.precompiled += node.underlying_cost;
                }
                stack.extend(graph.out_neighbors(v));
            }
            total
        })
        .reduce(TotalCost::default, Add::add)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::DiamondGraph;

    #[test]
    fn diamond_total_cost_sums_every_file_once_per_source() {
        let fx = DiamondGraph::new();
        let total = from_graph(&fx.graph, &fx.sources());
        let expected: Cost = fx.graph.handles().map(|h| fx.graph.node(h).unwrap().true_cost()).sum();
        assert_eq!(total.true_cost, expected);
        assert_eq!(total.precompiled, Cost::ZERO);
    }

    #[test]
    fn precompiled_files_contribute_to_precompiled_total_but_not_true_cost() {
        use crate::graph::{FileGraph, FileNode};
        let mut g = FileGraph::new();
        let a = g.add_node(FileNode::new("a.c".into(), false, false));
        let pch = g.add_node(FileNode::new("pch.h".into(), false, true));
        g.node_mut(pch).unwrap().underlying_cost = Cost::new(500, 5000);
        g.add_edge(a, pch, crate::graph::IncludeEdge { code: "pch".into(), line_number: 1, is_removable: false });

        let total = from_graph(&g, &[a]);
        assert_eq!(total.precompiled, Cost::new(500, 5000));
        assert_eq!(total.true_cost, Cost::ZERO);
    }
}
