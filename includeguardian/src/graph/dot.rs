// Copyright (c) The IncludeGuardian Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `dot` (Graphviz) export of a [`FileGraph`], for diagnostic use. Not part
//! of the analysis surface -- a hand-rolled writer that walks nodes/edges
//! itself rather than relying on a fixed label format, so callers can
//! customise labelling through [`DotVisitor`] without forking the writer.

use super::{FileGraph, FileHandle, IncludeHandle};
use std::fmt;

/// Customises how nodes and edges are labelled in a `dot` export.
pub trait DotVisitor {
    /// Returns the label to use for a file node.
    fn visit_file(&self, handle: FileHandle) -> String;
    /// Returns the label to use for an include edge.
    fn visit_include(&self, handle: IncludeHandle) -> String;
}

/// The default visitor: labels nodes with their path and edges with their
/// verbatim include text.
pub struct FileDotVisitor<'g> {
    graph: &'g FileGraph,
}

impl<'g> FileDotVisitor<'g> {
    pub fn new(graph: &'g FileGraph) -> Self {
        Self { graph }
    }
}

impl<'g> DotVisitor for FileDotVisitor<'g> {
    fn visit_file(&self, handle: FileHandle) -> String {
        self.graph
            .node(handle)
            .map(|n| n.path.display().to_string())
            .unwrap_or_default()
    }

    fn visit_include(&self, handle: IncludeHandle) -> String {
        self.graph.edge(handle).map(|e| e.code.clone()).unwrap_or_default()
    }
}

struct DotFmt<'g, V> {
    graph: &'g FileGraph,
    visitor: V,
}

impl<'g, V: DotVisitor> fmt::Display for DotFmt<'g, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "digraph includeguardian {{")?;
        for handle in self.graph.handles() {
            writeln!(
                f,
                "    {} [label=\"{}\"];",
                handle.index(),
                escape(&self.visitor.visit_file(handle))
            )?;
        }
        for (from, to, edge) in self.graph.edges() {
            writeln!(
                f,
                "    {} -> {} [label=\"{}\"];",
                from.index(),
                to.index(),
                escape(&self.visitor.visit_include(edge))
            )?;
        }
        writeln!(f, "}}")
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

impl FileGraph {
    /// Renders this graph in Graphviz `dot` format using the given visitor
    /// to label nodes and edges.
    pub fn display_dot<'g, V: DotVisitor + 'g>(&'g self, visitor: V) -> impl fmt::Display + 'g {
        DotFmt { graph: self, visitor }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::FileNode;

    #[test]
    fn renders_nodes_and_edges() {
        let mut g = FileGraph::new();
        let a = g.add_node(FileNode::new("a.h".into(), false, false));
        let b = g.add_node(FileNode::new("b.h".into(), false, false));
        g.add_edge(
            a,
            b,
            crate::graph::IncludeEdge {
                code: "\"b.h\"".to_string(),
                line_number: 1,
                is_removable: true,
            },
        );
        let rendered = g.display_dot(FileDotVisitor::new(&g)).to_string();
        assert!(rendered.contains("a.h"));
        assert!(rendered.contains("b.h"));
        assert!(rendered.contains("->"));
    }
}
