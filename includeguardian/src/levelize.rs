// Copyright (c) The IncludeGuardian Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Topological levelization, grounded in `topological_order.cpp`.
//!
//! The approach: build an auxiliary graph with every non-external include
//! edge reversed, plus a virtual root with an edge to every "leaf" file
//! (one with no outgoing includes), plus a forward edge from every source
//! back to its paired header -- which, combined with the already-reversed
//! header->source edge, forms a 2-cycle that forces a header and its
//! source into the same strongly connected component, and therefore the
//! same level. Strongly connected components are then collapsed and
//! assigned a level by the longest path from the root, computed as a
//! Bellman-Ford shortest path with edge weight -1 across a component
//! boundary and 0 within one.
//!
//! A level whose component group has more than one file indicates either a
//! genuine include cycle in the original graph, or (far more commonly) a
//! deliberately paired header and source -- callers should not assume a
//! multi-file group is an error.

use crate::graph::{FileGraph, FileHandle};
use petgraph::algo::kosaraju_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

/// One level of the build order: the files that become available to
/// compile once everything at lower levels is done. Grouped
/// by the strongly connected component they ended up in.
pub type Level = Vec<Vec<FileHandle>>;

/// Computes the levelized build order reachable from `sources`.
///
/// Returns one [`Level`] per rank, ordered from the leaves (files with no
/// internal dependencies) to the sources. Returns an empty `Vec` if
/// `sources` is empty.
pub fn from_graph(graph: &FileGraph, sources: &[FileHandle]) -> Vec<Level> {
    if sources.is_empty() {
        return Vec::new();
    }

    let n = graph.node_count();
    let mut aux: DiGraph<(), (), u32> = DiGraph::with_capacity(n + 1, graph.edge_count());
    for _ in 0..=n {
        aux.add_node(());
    }
    let root = NodeIndex::new(n);
    let aux_index = |h: FileHandle| NodeIndex::new(h.index());

    for (from, to, _) in graph.edges() {
        if !graph.node(to).map(|x| x.is_external).unwrap_or(false) {
            aux.add_edge(aux_index(to), aux_index(from), ());
        }
    }
    for h in graph.handles() {
        let is_external = graph.node(h).map(|x| x.is_external).unwrap_or(false);
        if graph.out_degree(h) == 0 && !is_external {
            aux.add_edge(root, aux_index(h), ());
        }
    }
    for &source in sources {
        if let Some(component) = graph.node(source).and_then(|x| x.component) {
            aux.add_edge(aux_index(source), aux_index(component), ());
        }
    }

    let sccs = kosaraju_scc(&aux);
    let mut component_of = vec![0usize; n + 1];
    for (component_id, members) in sccs.iter().enumerate() {
        for &v in members {
            component_of[v.index()] = component_id;
        }
    }

    let levels = longest_path_levels(&aux, root, &component_of);
    let num_levels = match levels.iter().max() {
        Some(&m) if m > 0 => m as usize,
        _ => return Vec::new(),
    };

    let mut by_component: Vec<(usize, FileHandle)> =
        graph.handles().map(|h| (component_of[h.index()], h)).collect();
    by_component.sort_by_key(|&(component_id, _)| component_id);

    let mut output: Vec<Level> = vec![Vec::new(); num_levels];
    let mut i = 0;
    while i < by_component.len() {
        let component_id = by_component[i].0;
        let mut j = i;
        while j < by_component.len() && by_component[j].0 == component_id {
            j += 1;
        }
        let level = levels[by_component[i].1.index()];
        if level > 0 {
            output[level as usize - 1].push(by_component[i..j].iter().map(|&(_, h)| h).collect());
        }
        i = j;
    }

    output
}

/// Bellman-Ford longest-path-from-root over the collapsed component graph:
/// edge weight is 1 when it crosses into a different component, 0
/// otherwise. `aux` is guaranteed acyclic once traversed at the component
/// granularity, so `|V|` relaxation rounds always converge.
fn longest_path_levels(aux: &DiGraph<(), (), u32>, root: NodeIndex, component_of: &[usize]) -> Vec<i64> {
    let n = aux.node_count();
    let mut dist = vec![i64::MIN; n];
    dist[root.index()] = 0;

    for _ in 0..n {
        let mut changed = false;
        for edge in aux.edge_references() {
            let (s, t) = (edge.source(), edge.target());
            if dist[s.index()] == i64::MIN {
                continue;
            }
            let weight = if component_of[s.index()] != component_of[t.index()] { 1 } else { 0 };
            let candidate = dist[s.index()] + weight;
            if candidate > dist[t.index()] {
                dist[t.index()] = candidate;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    dist.iter().map(|&d| if d == i64::MIN { 0 } else { d }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{DiamondGraph, WInclude};

    #[test]
    fn diamond_levelizes_leaves_first() {
        let fx = DiamondGraph::new();
        let levels = from_graph(&fx.graph, &fx.sources());
        assert_eq!(levels.len(), 3);
        assert_eq!(levels[0], vec![vec![fx.d]]);
        let level_two: Vec<FileHandle> = levels[1].iter().flatten().copied().collect();
        assert!(level_two.contains(&fx.b) && level_two.contains(&fx.c));
        assert_eq!(levels[2], vec![vec![fx.a]]);
    }

    #[test]
    fn paired_header_and_source_land_on_the_same_level() {
        let fx = WInclude::new();
        let levels = from_graph(&fx.graph, &fx.sources());
        let group_with_a_h = levels.iter().flatten().find(|g| g.contains(&fx.a_h)).unwrap();
        assert!(group_with_a_h.contains(&fx.a_c));
    }

    #[test]
    fn empty_sources_yields_no_levels() {
        let fx = DiamondGraph::new();
        assert!(from_graph(&fx.graph, &[]).is_empty());
    }
}
