// Copyright (c) The IncludeGuardian Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ranks source files whose paired header is cheap enough, relative to the
//! private implementation it drags in, that nothing would be lost by
//! treating the header as the only public surface. Grounded in
//! `find_unnecessary_sources.cpp`.

use crate::cost::Cost;
use crate::graph::{FileGraph, FileHandle};
use crate::reachability::ReachabilityIndex;
use rayon::prelude::*;
use std::sync::Mutex;

const SOURCE: u8 = 0b10;
const HEADER: u8 = 0b01;

/// A source file and the net saving of inlining its body into its header
/// (the cost it alone contributes, minus the extra cost other sources
/// would incur from no longer being able to reach the header without it).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnnecessarySource {
    pub source: FileHandle,
    pub saving: Cost,
    pub extra_cost: Cost,
}

/// Finds every paired source whose net saving (`saving - extra_cost`) meets
/// `minimum_token_count_cut_off`.
pub fn from_graph(
    graph: &FileGraph,
    reach: &ReachabilityIndex,
    sources: &[FileHandle],
    minimum_token_count_cut_off: i64,
) -> Vec<UnnecessarySource> {
    let results = Mutex::new(Vec::new());
    let n = graph.node_count();

    sources.par_iter().for_each(|&source| {
        let node = match graph.node(source) {
            Some(x) => x,
            None => return,
        };
        let header = match node.component {
            Some(h) => h,
            None => return,
        };
        if node.is_external {
            return;
        }

        let mut reachable = vec![0u8; n];
        let mut stack = vec![source];
        let mut reachable_from_source_only = Cost::ZERO;
        let mut num_reachable_from_source_only = 0i64;
        let mut saving = Cost::ZERO;

        while let Some(v) = stack.pop() {
            if reachable[v.index()] & SOURCE != 0 {
                continue;
            }
            reachable[v.index()] |= SOURCE;
            let cost = graph.node(v).map(|n2| n2.underlying_cost).unwrap_or(Cost::ZERO);
            saving += cost;
            reachable_from_source_only += cost;
            num_reachable_from_source_only += 1;
            stack.extend(graph.out_neighbors(v));
        }

        if saving.tokens() < minimum_token_count_cut_off {
            return;
        }

        stack.clear();
        stack.push(header);
        while let Some(v) = stack.pop() {
            if reachable[v.index()] & HEADER != 0 {
                continue;
            }
            reachable[v.index()] |= HEADER;
            num_reachable_from_source_only -= 1;
            let cost = graph.node(v).map(|n2| n2.underlying_cost).unwrap_or(Cost::ZERO);
            reachable_from_source_only -= cost;
            stack.extend(graph.out_neighbors(v));
        }

        let extra: Cost = sources
            .iter()
            .map(|&start_source| {
                if start_source == source {
                    return Cost::ZERO;
                }
                if !reach.is_reachable(start_source, header) {
                    return Cost::ZERO;
                }

                let mut total = reachable_from_source_only;
                let mut seen = vec![false; n];
                let mut count = 0i64;
                let mut stack = vec![start_source];
                while let Some(v) = stack.pop() {
                    if count >= num_reachable_from_source_only {
                        break;
                    }
                    if seen[v.index()] {
                        continue;
                    }
                    seen[v.index()] = true;

                    if reachable[v.index()] == SOURCE {
                        count += 1;
                        let cost = graph.node(v).map(|n2| n2.underlying_cost).unwrap_or(Cost::ZERO);
                        total -= cost;
                    }
                    stack.extend(graph.out_neighbors(v));
                }
                total
            })
            .sum();

        if saving.tokens() - extra.tokens() >= minimum_token_count_cut_off {
            results.lock().unwrap().push(UnnecessarySource { source, saving, extra_cost: extra });
        }
    });

    results.into_inner().unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::WInclude;

    #[test]
    fn paired_source_without_competing_includers_is_reported() {
        let fx = WInclude::new();
        let reach = ReachabilityIndex::build(&fx.graph).unwrap();
        let results = from_graph(&fx.graph, &reach, &fx.sources(), 1);
        assert!(results.iter().any(|r| r.source == fx.a_c));
    }

    #[test]
    fn main_is_skipped_since_it_has_no_paired_header() {
        let fx = WInclude::new();
        let reach = ReachabilityIndex::build(&fx.graph).unwrap();
        let results = from_graph(&fx.graph, &reach, &fx.sources(), 1);
        assert!(results.iter().all(|r| r.source != fx.main_c));
    }
}
