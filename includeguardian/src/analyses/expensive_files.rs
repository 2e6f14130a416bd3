// Copyright (c) The IncludeGuardian Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ranks files by how much their cost is multiplied across the sources
//! that reach them, grounded in `find_expensive_files.cpp`.

use crate::graph::{FileGraph, FileHandle};
use crate::reachability::ReachabilityIndex;
use rayon::prelude::*;
use std::sync::Mutex;

/// A file and the number of given sources that reach it.
///
/// `reachable_source_count * token count` approximates how many times this
/// file's cost is paid across a full rebuild of every source.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FileAndCost {
    pub file: FileHandle,
    pub reachable_source_count: u32,
}

/// Finds every internal file whose reachable-source-weighted token count
/// meets `minimum_token_count_cut_off`.
///
/// Returns an empty `Vec` immediately if `sources` is empty, matching the
/// original's early-out (there is nothing to be expensive *for*).
pub fn from_graph(
    graph: &FileGraph,
    reach: &ReachabilityIndex,
    sources: &[FileHandle],
    minimum_token_count_cut_off: i64,
) -> Vec<FileAndCost> {
    let results = Mutex::new(Vec::new());
    if sources.is_empty() {
        return Vec::new();
    }

    graph.handles().collect::<Vec<_>>().par_iter().for_each(|&file| {
        let node = match graph.node(file) {
            Some(n) => n,
            None => return,
        };
        if node.is_external {
            return;
        }

        let reachable_count = sources.iter().filter(|&&s| reach.is_reachable(s, file)).count() as u32;

        if (reachable_count as i64) * node.true_cost().tokens() >= minimum_token_count_cut_off {
            results.lock().unwrap().push(FileAndCost { file, reachable_source_count: reachable_count });
        }
    });

    results.into_inner().unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::DiamondGraph;

    #[test]
    fn diamond_node_d_is_reached_by_both_branches() {
        let fx = DiamondGraph::new();
        let reach = ReachabilityIndex::build(&fx.graph).unwrap();
        let results = from_graph(&fx.graph, &reach, &[fx.b, fx.c], 1);
        let d = results.iter().find(|r| r.file == fx.d).expect("d should be reported");
        assert_eq!(d.reachable_source_count, 2);
    }

    #[test]
    fn empty_sources_yields_no_results() {
        let fx = DiamondGraph::new();
        let reach = ReachabilityIndex::build(&fx.graph).unwrap();
        assert!(from_graph(&fx.graph, &reach, &[], 1).is_empty());
    }

    #[test]
    fn external_files_are_never_reported() {
        let mut fx = DiamondGraph::new();
        fx.graph.node_mut(fx.d).unwrap().is_external = true;
        let reach = ReachabilityIndex::build(&fx.graph).unwrap();
        let results = from_graph(&fx.graph, &reach, &fx.sources(), 1);
        assert!(results.iter().all(|r| r.file != fx.d));
    }
}
