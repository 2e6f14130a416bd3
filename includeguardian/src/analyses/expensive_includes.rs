// Copyright (c) The IncludeGuardian Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ranks individual `#include` directives by the cost that would be saved
//! if they were removed, grounded in `find_expensive_includes.cpp`.
//!
//! The core of this analysis is a dual DFS per candidate edge: first,
//! confirm the edge is even on a live path from the source (and that there
//! is no other path to its target, or removing it saves nothing); then walk
//! from the edge's target, charging every file not otherwise reachable from
//! the source as a saving.

use crate::cost::Cost;
use crate::graph::{FileGraph, FileHandle, IncludeHandle};
use crate::reachability::ReachabilityIndex;
use rayon::prelude::*;
use std::sync::Mutex;

/// One `#include` directive and the cost its removal would save.
#[derive(Clone, Debug, PartialEq)]
pub struct IncludeAndSaving {
    pub file: FileHandle,
    pub include: IncludeHandle,
    pub saving: Cost,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum SearchState {
    NotSeen,
    SeenInitial,
    SeenFollowup,
}

/// Per-thread scratch space for the dual DFS. Built fresh for each edge so
/// parallel workers never share state (the original's `DFSHelper` is reused
/// sequentially per edge within a worker; here it is local to the closure).
struct DfsHelper<'g> {
    graph: &'g FileGraph,
    reach: &'g ReachabilityIndex,
    state: Vec<SearchState>,
    stack: Vec<FileHandle>,
}

impl<'g> DfsHelper<'g> {
    fn new(graph: &'g FileGraph, reach: &'g ReachabilityIndex) -> Self {
        Self { graph, reach, state: vec![SearchState::NotSeen; graph.node_count()], stack: Vec::new() }
    }

    /// The total true cost of every file unreachable from `from` once
    /// `removed_include` (from `includer` to `includee`) is taken out of
    /// consideration.
    fn total_cost_of_unreachable(&mut self, from: FileHandle, includer: FileHandle, includee: FileHandle, removed_include: IncludeHandle) -> Cost {
        if !self.reach.is_reachable(from, includer) {
            return Cost::ZERO;
        }

        self.state.iter_mut().for_each(|s| *s = SearchState::NotSeen);
        self.stack.clear();
        self.stack.push(from);

        while let Some(v) = self.stack.pop() {
            match self.state[v.index()] {
                SearchState::SeenFollowup => unreachable!("state reset before reuse"),
                SearchState::SeenInitial => continue,
                SearchState::NotSeen => {}
            }
            self.state[v.index()] = SearchState::SeenInitial;

            for (w, edge) in self.graph.out_edges(v) {
                if edge == removed_include {
                    continue;
                }
                if w == includee {
                    // another path reaches `includee`; nothing is saved
                    self.stack.clear();
                    return Cost::ZERO;
                }
                self.stack.push(w);
            }
        }

        let mut savings = Cost::ZERO;
        self.stack.push(includee);
        while let Some(v) = self.stack.pop() {
            match self.state[v.index()] {
                SearchState::SeenFollowup => continue,
                SearchState::NotSeen => {
                    savings += self.graph.node(v).map(|n| n.true_cost()).unwrap_or(Cost::ZERO);
                    self.state[v.index()] = SearchState::SeenFollowup;
                }
                SearchState::SeenInitial => {
                    self.state[v.index()] = SearchState::SeenFollowup;
                }
            }
            self.stack.extend(self.graph.out_neighbors(v));
        }

        savings
    }
}

/// Finds every removable `#include` directive whose removal would save at
/// least `minimum_token_count_cut_off` tokens, summed across `sources`.
pub fn from_graph(
    graph: &FileGraph,
    reach: &ReachabilityIndex,
    sources: &[FileHandle],
    minimum_token_count_cut_off: i64,
) -> Vec<IncludeAndSaving> {
    let results = Mutex::new(Vec::new());
    if sources.is_empty() {
        return Vec::new();
    }

    let edges: Vec<(FileHandle, FileHandle, IncludeHandle)> = graph.edges().collect();
    edges.par_iter().for_each(|&(includer, includee, include)| {
        let includer_node = match graph.node(includer) {
            Some(n) => n,
            None => return,
        };
        if includer_node.is_external {
            return;
        }
        let edge = match graph.edge(include) {
            Some(e) => e,
            None => return,
        };
        if !edge.is_removable {
            return;
        }

        let mut helper = DfsHelper::new(graph, reach);
        let saved: Cost = sources
            .iter()
            .map(|&source| helper.total_cost_of_unreachable(source, includer, includee, include))
            .sum();

        if saved.tokens() >= minimum_token_count_cut_off {
            results.lock().unwrap().push(IncludeAndSaving { file: includer, include, saving: saved });
        }
    });

    results.into_inner().unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::WInclude;

    #[test]
    fn removing_a_diamond_branch_saves_nothing_if_target_still_reachable() {
        use crate::test_fixtures::DiamondGraph;
        let fx = DiamondGraph::new();
        let reach = ReachabilityIndex::build(&fx.graph).unwrap();
        let (_, _, a_to_b) = fx.graph.out_edges(fx.a).find(|(t, _)| *t == fx.b).map(|(t, e)| (fx.a, t, e)).unwrap();
        let results = from_graph(&fx.graph, &reach, &fx.sources(), 1);
        // a->b is not removable-savings because d is still reached via a->c->d
        assert!(results.iter().all(|r| r.include != a_to_b));
    }

    #[test]
    fn w_include_main_to_a_h_is_the_only_access_path() {
        let fx = WInclude::new();
        let reach = ReachabilityIndex::build(&fx.graph).unwrap();
        let (_, main_to_a) = fx.graph.out_edges(fx.main_c).find(|(t, _)| *t == fx.a_h).unwrap();
        let results = from_graph(&fx.graph, &reach, &fx.sources(), 1);
        let found = results.iter().find(|r| r.include == main_to_a);
        assert!(found.is_some(), "removing main->a.h should report a saving");
    }
}
