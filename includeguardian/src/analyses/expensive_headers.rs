// Copyright (c) The IncludeGuardian Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ranks files by the cost that would be saved if they (and everything
//! exclusively reachable through them) were made unreachable from every
//! source but one -- i.e. "privatized" so other translation units stop
//! pulling them in. Grounded in `find_expensive_headers.cpp`.

use crate::cost::Cost;
use crate::graph::{FileGraph, FileHandle};
use crate::reachability::ReachabilityIndex;
use rayon::prelude::*;
use std::sync::Mutex;

/// A candidate file and the cost saved if it became unreachable from every
/// source but the ones that must keep reaching it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExpensiveHeader {
    pub file: FileHandle,
    pub saving: Cost,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum SearchState {
    NotSeen,
    Seen,
}

/// Computes [`ExpensiveHeader::saving`] for a single `file` against every
/// source in `sources`.
fn saving_for(graph: &FileGraph, dag: &ReachabilityIndex, sources: &[FileHandle], file: FileHandle) -> Cost {
    let n = graph.node_count();
    let mut state = vec![SearchState::NotSeen; n];
    let mut stack = vec![file];
    let mut reachable_from_file = vec![false; n];
    let mut total_size = Cost::ZERO;

    while let Some(v) = stack.pop() {
        if state[v.index()] == SearchState::Seen {
            continue;
        }
        total_size += graph.node(v).map(|nn| nn.true_cost()).unwrap_or(Cost::ZERO);
        reachable_from_file[v.index()] = true;
        state[v.index()] = SearchState::Seen;
        stack.extend(graph.out_neighbors(v));
    }

    let mut savings = Cost::ZERO;
    for &source in sources {
        if source == file {
            continue;
        }
        if !dag.is_reachable(source, file) {
            continue;
        }

        state.iter_mut().for_each(|s| *s = SearchState::NotSeen);
        state[file.index()] = SearchState::Seen;
        savings += total_size;

        stack.clear();
        stack.push(source);
        while let Some(v) = stack.pop() {
            if state[v.index()] == SearchState::Seen {
                continue;
            }
            if reachable_from_file[v.index()] {
                savings -= graph.node(v).map(|nn| nn.true_cost()).unwrap_or(Cost::ZERO);
            }
            state[v.index()] = SearchState::Seen;
            stack.extend(graph.out_neighbors(v));
        }
    }

    savings
}

/// Finds every internal file whose privatization would save at least
/// `minimum_token_count_cut_off` tokens across `sources`.
pub fn from_graph(
    graph: &FileGraph,
    reach: &ReachabilityIndex,
    sources: &[FileHandle],
    minimum_token_count_cut_off: i64,
) -> Vec<ExpensiveHeader> {
    let results = Mutex::new(Vec::new());

    graph.handles().collect::<Vec<_>>().par_iter().for_each(|&file| {
        let node = match graph.node(file) {
            Some(n) => n,
            None => return,
        };
        if node.is_external {
            return;
        }

        let saving = saving_for(graph, reach, sources, file);
        if saving.tokens() >= minimum_token_count_cut_off {
            results.lock().unwrap().push(ExpensiveHeader { file, saving });
        }
    });

    results.into_inner().unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::MultiLevel;

    #[test]
    fn sink_shared_by_two_sources_saves_its_cost_once_per_reaching_source() {
        let fx = MultiLevel::new();
        let reach = ReachabilityIndex::build(&fx.graph).unwrap();
        // h is a sink reachable from both a and b; since nothing else sits
        // "under" it to create overlap, privatizing it would save its own
        // cost once for every other source that currently reaches it.
        let h_cost = fx.graph.node(fx.h).unwrap().true_cost();
        let saving = saving_for(&fx.graph, &reach, &fx.sources(), fx.h);
        assert_eq!(saving, h_cost * 2);
    }

    #[test]
    fn unreachable_source_contributes_no_saving() {
        let fx = MultiLevel::new();
        let reach = ReachabilityIndex::build(&fx.graph).unwrap();
        let results = from_graph(&fx.graph, &reach, &[fx.a], 1);
        assert!(results.iter().all(|r| r.file != fx.a));
    }
}
