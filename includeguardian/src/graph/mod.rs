// Copyright (c) The IncludeGuardian Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The file graph: a directed graph over files with typed node/edge
//! attributes and an optional component-pairing backlink.

mod dot;

pub use dot::{DotVisitor, FileDotVisitor};

use crate::cost::Cost;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::path::{Path, PathBuf};

/// A stable, densely-packed handle to a file node.
///
/// Handles are assigned in insertion order over `[0, n)`, which lets
/// analyses index fixed-size scratch arrays by handle instead of hashing.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, serde::Serialize, serde::Deserialize)]
pub struct FileHandle(pub(crate) u32);

impl FileHandle {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }

    fn from_node_index(ix: NodeIndex<u32>) -> Self {
        FileHandle(ix.index() as u32)
    }

    fn to_node_index(self) -> NodeIndex<u32> {
        NodeIndex::new(self.index())
    }
}

/// A stable handle to an include edge.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub struct IncludeHandle(pub(crate) u32);

impl IncludeHandle {
    fn from_edge_index(ix: EdgeIndex<u32>) -> Self {
        IncludeHandle(ix.index() as u32)
    }

    fn to_edge_index(self) -> EdgeIndex<u32> {
        EdgeIndex::new(self.0 as usize)
    }
}

/// Attributes attached to a file node.
///
/// [`crate::builder`] upholds the invariants documented on each field
/// below once construction completes.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct FileNode {
    /// Logical, normalized, relative path.
    pub path: PathBuf,
    /// True if this file was only reached via a system-style (angled,
    /// search-path) include -- the tool has no authority to modify it.
    pub is_external: bool,
    /// True if this file, or a file that included it, is a precompiled
    /// header.
    pub is_precompiled: bool,
    /// This file's own cost after preprocessing its own body, excluding
    /// transitively included files.
    pub underlying_cost: Cost,
    /// Number of non-external predecessors. Pre-counted during graph
    /// construction: `internal_incoming[n] ==
    /// |{e : e.target = n, not e.source.is_external}|`.
    pub internal_incoming: u32,
    /// The paired header/source peer, if any. Symmetric: if `n.component
    /// == Some(m)` then `m.component == Some(n)`.
    pub component: Option<FileHandle>,
}

impl FileNode {
    pub(crate) fn new(path: PathBuf, is_external: bool, is_precompiled: bool) -> Self {
        Self {
            path,
            is_external,
            is_precompiled,
            underlying_cost: Cost::ZERO,
            internal_incoming: 0,
            component: None,
        }
    }

    /// A precompiled file's cost is charged once to the PCH rather than to
    /// each including source, so its true cost is zero.
    pub fn true_cost(&self) -> Cost {
        if self.is_precompiled {
            Cost::ZERO
        } else {
            self.underlying_cost
        }
    }
}

/// Attributes attached to an include edge.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct IncludeEdge {
    /// Verbatim directive text, e.g. `"foo.hpp"` or `<bar>`.
    pub code: String,
    /// 1-based line number in the including file. 0 is reserved for
    /// directives implanted by the driver (forced includes).
    pub line_number: u32,
    /// False for forced includes and for the canonical header/source
    /// pairing edge; true otherwise.
    pub is_removable: bool,
}

/// The directed file-dependency graph.
///
/// Immutable once [`crate::builder::GraphBuilder::finish`] returns;
/// analyses take a read-only reference. Handles are stable for the
/// lifetime of the graph.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct FileGraph {
    pub(crate) inner: DiGraph<FileNode, IncludeEdge, u32>,
}

impl FileGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self { inner: DiGraph::default() }
    }

    pub(crate) fn add_node(&mut self, node: FileNode) -> FileHandle {
        FileHandle::from_node_index(self.inner.add_node(node))
    }

    pub(crate) fn add_edge(&mut self, from: FileHandle, to: FileHandle, edge: IncludeEdge) -> IncludeHandle {
        let ix = self.inner.add_edge(from.to_node_index(), to.to_node_index(), edge);
        IncludeHandle::from_edge_index(ix)
    }

    /// The number of file nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// The number of include edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Returns the attributes for `handle`, or `None` if it doesn't belong
    /// to this graph.
    pub fn node(&self, handle: FileHandle) -> Option<&FileNode> {
        self.inner.node_weight(handle.to_node_index())
    }

    pub(crate) fn node_mut(&mut self, handle: FileHandle) -> Option<&mut FileNode> {
        self.inner.node_weight_mut(handle.to_node_index())
    }

    /// Returns the attributes for `handle`, or `None` if it doesn't belong
    /// to this graph.
    pub fn edge(&self, handle: IncludeHandle) -> Option<&IncludeEdge> {
        self.inner.edge_weight(handle.to_edge_index())
    }

    /// Iterates over every file handle in the graph, in handle order.
    pub fn handles(&self) -> impl Iterator<Item = FileHandle> + '_ {
        self.inner.node_indices().map(FileHandle::from_node_index)
    }

    /// Iterates over every include edge, yielding `(from, to, handle)`.
    pub fn edges(&self) -> impl Iterator<Item = (FileHandle, FileHandle, IncludeHandle)> + '_ {
        self.inner.edge_references().map(|e| {
            (
                FileHandle::from_node_index(e.source()),
                FileHandle::from_node_index(e.target()),
                IncludeHandle::from_edge_index(e.id()),
            )
        })
    }

    /// Iterates over the out-neighbours (includees) of `handle`.
    pub fn out_neighbors(&self, handle: FileHandle) -> impl Iterator<Item = FileHandle> + '_ {
        self.inner
            .neighbors_directed(handle.to_node_index(), Direction::Outgoing)
            .map(FileHandle::from_node_index)
    }

    /// Iterates over `(to, edge_handle)` for each outgoing edge of `handle`.
    pub fn out_edges(&self, handle: FileHandle) -> impl Iterator<Item = (FileHandle, IncludeHandle)> + '_ {
        self.inner
            .edges_directed(handle.to_node_index(), Direction::Outgoing)
            .map(|e| (FileHandle::from_node_index(e.target()), IncludeHandle::from_edge_index(e.id())))
    }

    /// The number of outgoing edges from `handle`.
    pub fn out_degree(&self, handle: FileHandle) -> usize {
        self.inner.edges_directed(handle.to_node_index(), Direction::Outgoing).count()
    }

    /// The number of incoming edges to `handle`, external or not.
    pub fn in_degree(&self, handle: FileHandle) -> usize {
        self.inner.edges_directed(handle.to_node_index(), Direction::Incoming).count()
    }

    /// Looks up a file by its logical path. Linear in the number of nodes;
    /// callers that need this repeatedly should build their own index.
    pub fn find_by_path(&self, path: &Path) -> Option<FileHandle> {
        self.handles().find(|&h| self.node(h).map(|n| n.path == *path).unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_pairing_is_symmetric_by_construction() {
        let mut g = FileGraph::new();
        let h = g.add_node(FileNode::new("a.h".into(), false, false));
        let c = g.add_node(FileNode::new("a.c".into(), false, false));
        g.node_mut(h).unwrap().component = Some(c);
        g.node_mut(c).unwrap().component = Some(h);
        assert_eq!(g.node(h).unwrap().component, Some(c));
        assert_eq!(g.node(c).unwrap().component, Some(h));
    }

    #[test]
    fn true_cost_is_zero_iff_precompiled() {
        let mut g = FileGraph::new();
        let h = g.add_node(FileNode::new("pch.h".into(), false, true));
        g.node_mut(h).unwrap().underlying_cost = Cost::new(100, 1000);
        assert_eq!(g.node(h).unwrap().true_cost(), Cost::ZERO);

        let h2 = g.add_node(FileNode::new("a.h".into(), false, false));
        g.node_mut(h2).unwrap().underlying_cost = Cost::new(100, 1000);
        assert_eq!(g.node(h2).unwrap().true_cost(), Cost::new(100, 1000));
    }
}
