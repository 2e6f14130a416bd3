// Copyright (c) The IncludeGuardian Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flags source files whose paired header is included by few enough other
//! files that the whole component is a candidate for deletion or a closer
//! look. Grounded in `find_unused_components.cpp`.

use crate::cost::Cost;
use crate::graph::{FileGraph, FileHandle};
use rayon::prelude::*;
use std::sync::Mutex;

use super::total_cost;

/// A source file whose paired header has few includers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnusedComponent {
    pub source: FileHandle,
    pub cost: Cost,
}

/// Finds every source in `sources` whose header is included by at most
/// `included_by_at_most` other files (not counting the component's own
/// source->header edge) and whose own total cost meets
/// `minimum_token_count_cut_off`.
pub fn from_graph(
    graph: &FileGraph,
    sources: &[FileHandle],
    included_by_at_most: u32,
    minimum_token_count_cut_off: i64,
) -> Vec<UnusedComponent> {
    let results = Mutex::new(Vec::new());

    sources.par_iter().for_each(|&v| {
        let header = match graph.node(v).and_then(|n| n.component) {
            Some(h) => h,
            None => return,
        };

        // account for the component's own source->header include
        if graph.in_degree(header) as u32 > included_by_at_most + 1 {
            return;
        }

        let cost = total_cost::from_graph(graph, &[v]).true_cost;
        if cost.tokens() >= minimum_token_count_cut_off {
            results.lock().unwrap().push(UnusedComponent { source: v, cost });
        }
    });

    results.into_inner().unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::WInclude;

    #[test]
    fn lightly_included_component_is_reported() {
        let fx = WInclude::new();
        // a.h is included by a.c (the pairing edge) and main.c: in-degree 2.
        let results = from_graph(&fx.graph, &fx.sources(), 1, 1);
        assert!(results.iter().any(|r| r.source == fx.a_c));
    }

    #[test]
    fn tighter_threshold_excludes_the_same_component() {
        let fx = WInclude::new();
        let results = from_graph(&fx.graph, &fx.sources(), 0, 1);
        assert!(results.iter().all(|r| r.source != fx.a_c));
    }

    #[test]
    fn main_without_a_component_is_skipped() {
        let fx = WInclude::new();
        let results = from_graph(&fx.graph, &fx.sources(), 1, 1);
        assert!(results.iter().all(|r| r.source != fx.main_c));
    }
}
