// Copyright (c) The IncludeGuardian Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recommends external files to add to the precompiled header, grounded in
//! `recommend_precompiled.cpp`.
//!
//! A candidate must already be included directly by the project
//! (`internal_incoming > 0`) -- recommending an external library's private
//! transitive header risks breaking on the library's next release -- and
//! the saving must clear the larger of `minimum_token_count_cut_off` and
//! `minimum_saving_ratio * extra_precompiled_size`, since padding the
//! precompiled header with a file nobody reuses pessimises incremental
//! rebuilds.

use crate::cost::Cost;
use crate::graph::{FileGraph, FileHandle};
use rayon::prelude::*;
use std::sync::Mutex;

/// A recommended precompiled-header addition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrecompiledRecommendation {
    pub file: FileHandle,
    pub saving: Cost,
    pub extra_precompiled_size: Cost,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum SearchState {
    NotSeen,
    Seen,
}

/// Finds every external, not-yet-precompiled file that's a good candidate
/// to add to the precompiled header.
pub fn from_graph(
    graph: &FileGraph,
    sources: &[FileHandle],
    minimum_token_count_cut_off: i64,
    minimum_saving_ratio: f64,
) -> Vec<PrecompiledRecommendation> {
    assert!(minimum_saving_ratio > 0.0);
    let results = Mutex::new(Vec::new());
    let n = graph.node_count();

    graph.handles().collect::<Vec<_>>().par_iter().for_each(|&file| {
        let node = match graph.node(file) {
            Some(x) => x,
            None => return,
        };
        if node.internal_incoming == 0 {
            return;
        }
        if !node.is_external {
            return;
        }
        if node.is_precompiled {
            return;
        }

        let mut newly_precompiled = vec![false; n];
        let mut state = vec![SearchState::NotSeen; n];
        let mut stack = vec![file];
        let mut extra_precompiled_size = Cost::ZERO;

        while let Some(v) = stack.pop() {
            if state[v.index()] == SearchState::Seen {
                continue;
            }
            if graph.node(v).map(|n2| n2.is_precompiled).unwrap_or(false) {
                continue;
            }
            newly_precompiled[v.index()] = true;
            extra_precompiled_size += graph.node(v).map(|n2| n2.underlying_cost).unwrap_or(Cost::ZERO);
            state[v.index()] = SearchState::Seen;
            stack.extend(graph.out_neighbors(v));
        }

        let cutoff_token_count =
            ((minimum_saving_ratio * extra_precompiled_size.tokens() as f64) as i64).max(minimum_token_count_cut_off);

        let mut saving = Cost::ZERO;
        for (i, &source) in sources.iter().enumerate() {
            let remaining_sources = (sources.len() - i) as i64;
            if extra_precompiled_size.tokens() * remaining_sources + saving.tokens() < cutoff_token_count {
                return;
            }

            stack.clear();
            stack.push(source);
            while let Some(v) = stack.pop() {
                if state[v.index()] == SearchState::Seen {
                    continue;
                }
                if newly_precompiled[v.index()] {
                    saving += graph.node(v).map(|n2| n2.underlying_cost).unwrap_or(Cost::ZERO);
                }
                state[v.index()] = SearchState::Seen;
                stack.extend(graph.out_neighbors(v));
            }
            state.iter_mut().for_each(|s| *s = SearchState::NotSeen);
        }

        if saving.tokens() >= cutoff_token_count {
            results.lock().unwrap().push(PrecompiledRecommendation { file, saving, extra_precompiled_size });
        }
    });

    results.into_inner().unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{FileGraph, FileNode, IncludeEdge};

    #[test]
    fn external_header_included_directly_by_several_sources_is_recommended() {
        let mut g = FileGraph::new();
        let vec_h = g.add_node(FileNode::new("vector".into(), true, false));
        g.node_mut(vec_h).unwrap().underlying_cost = Cost::new(10_000, 100_000);
        g.node_mut(vec_h).unwrap().internal_incoming = 2;

        let a = g.add_node(FileNode::new("a.c".into(), false, false));
        let b = g.add_node(FileNode::new("b.c".into(), false, false));
        g.add_edge(a, vec_h, IncludeEdge { code: "<vector>".into(), line_number: 1, is_removable: true });
        g.add_edge(b, vec_h, IncludeEdge { code: "<vector>".into(), line_number: 1, is_removable: true });

        let results = from_graph(&g, &[a, b], 1, 0.5);
        assert!(results.iter().any(|r| r.file == vec_h));
    }

    #[test]
    fn private_transitive_external_header_is_not_recommended() {
        let mut g = FileGraph::new();
        let private_h = g.add_node(FileNode::new("__detail.h".into(), true, false));
        g.node_mut(private_h).unwrap().internal_incoming = 0;
        let results = from_graph(&g, &[], 1, 0.5);
        assert!(results.iter().all(|r| r.file != private_h));
    }

    #[test]
    fn already_precompiled_file_is_skipped() {
        let mut g = FileGraph::new();
        let h = g.add_node(FileNode::new("pch.h".into(), true, true));
        g.node_mut(h).unwrap().internal_incoming = 1;
        let results = from_graph(&g, &[], 1, 0.5);
        assert!(results.iter().all(|r| r.file != h));
    }
}
