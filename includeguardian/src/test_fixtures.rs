// Copyright (c) The IncludeGuardian Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixture graphs shared by unit and integration tests, mirroring the
//! `DiamondGraph` / `MultiLevel` / `LongChain` / `WInclude` /
//! `CascadingInclude` test fixtures of the original C++ implementation.

use crate::cost::Cost;
use crate::graph::{FileGraph, FileHandle, FileNode, IncludeEdge};

fn node(g: &mut FileGraph, path: &str, tokens: i64, bytes: u64) -> FileHandle {
    let h = g.add_node(FileNode::new(path.into(), false, false));
    g.node_mut(h).unwrap().underlying_cost = Cost::new(tokens, bytes);
    h
}

fn link(g: &mut FileGraph, from: FileHandle, to: FileHandle, code: &str) {
    g.add_edge(
        from,
        to,
        IncludeEdge {
            code: code.to_string(),
            line_number: 1,
            is_removable: true,
        },
    );
}

fn set_internal_parents(g: &mut FileGraph, h: FileHandle, count: u32) {
    g.node_mut(h).unwrap().internal_incoming = count;
}

/// ```text
///      a
///     / \
///    b   c
///     \ /
///      d
/// ```
/// Costs are powers of ten so that reachability-weighted sums are
/// unambiguous in assertions: a=1, b=10, c=100, d=1000.
pub struct DiamondGraph {
    pub graph: FileGraph,
    pub a: FileHandle,
    pub b: FileHandle,
    pub c: FileHandle,
    pub d: FileHandle,
}

impl DiamondGraph {
    pub fn new() -> Self {
        let mut graph = FileGraph::new();
        let a = node(&mut graph, "a", 1, 2_000_000_000);
        let b = node(&mut graph, "b", 10, 200_000_000);
        let c = node(&mut graph, "c", 100, 20_000_000);
        let d = node(&mut graph, "d", 1000, 2_000_000);
        set_internal_parents(&mut graph, b, 1);
        set_internal_parents(&mut graph, c, 1);
        set_internal_parents(&mut graph, d, 2);
        link(&mut graph, a, b, "a->b");
        link(&mut graph, a, c, "a->c");
        link(&mut graph, b, d, "b->d");
        link(&mut graph, c, d, "c->d");
        Self { graph, a, b, c, d }
    }

    pub fn sources(&self) -> Vec<FileHandle> {
        vec![self.a]
    }
}

/// ```text
///      a   b
///     / \ / \
///    c   d  e
///     \ /  / \
///      f  g  /
///       \ | /
///         h
/// ```
pub struct MultiLevel {
    pub graph: FileGraph,
    pub a: FileHandle,
    pub b: FileHandle,
    pub c: FileHandle,
    pub d: FileHandle,
    pub e: FileHandle,
    pub f: FileHandle,
    pub g: FileHandle,
    pub h: FileHandle,
}

impl MultiLevel {
    pub fn new() -> Self {
        let mut graph = FileGraph::new();
        let a = node(&mut graph, "a", 1, 2_000_000_000);
        let b = node(&mut graph, "b", 10, 200_000_000);
        let c = node(&mut graph, "c", 100, 20_000_000);
        let d = node(&mut graph, "d", 1000, 2_000_000);
        let e = node(&mut graph, "e", 10000, 200_000);
        let f = node(&mut graph, "f", 100000, 20_000);
        let g = node(&mut graph, "g", 1000000, 2000);
        let h = node(&mut graph, "h", 10000000, 200);
        set_internal_parents(&mut graph, c, 1);
        set_internal_parents(&mut graph, d, 2);
        set_internal_parents(&mut graph, e, 1);
        set_internal_parents(&mut graph, f, 2);
        set_internal_parents(&mut graph, g, 1);
        set_internal_parents(&mut graph, h, 2);
        link(&mut graph, a, c, "a->c");
        link(&mut graph, a, d, "a->d");
        link(&mut graph, b, d, "b->d");
        link(&mut graph, b, e, "b->e");
        link(&mut graph, c, f, "c->f");
        link(&mut graph, d, f, "d->f");
        link(&mut graph, e, g, "e->g");
        link(&mut graph, e, h, "e->h");
        link(&mut graph, f, h, "f->h");
        link(&mut graph, g, h, "g->h");
        Self { graph, a, b, c, d, e, f, g, h }
    }

    pub fn sources(&self) -> Vec<FileHandle> {
        vec![self.a, self.b]
    }
}

/// ```text
///      a
///     / \
///    b   c
///     \ /
///      d
///     / \
///    e   f
///     \ / \
///      g   |
///     / \ /
///    h   i
///     \ /
///      j
/// ```
pub struct LongChain {
    pub graph: FileGraph,
    pub a: FileHandle,
    pub b: FileHandle,
    pub c: FileHandle,
    pub d: FileHandle,
    pub e: FileHandle,
    pub f: FileHandle,
    pub g: FileHandle,
    pub h: FileHandle,
    pub i: FileHandle,
    pub j: FileHandle,
}

impl LongChain {
    pub fn new() -> Self {
        let mut graph = FileGraph::new();
        let a = node(&mut graph, "a", 1, 2_000_000_000);
        let b = node(&mut graph, "b", 10, 200_000_000);
        let c = node(&mut graph, "c", 100, 20_000_000);
        let d = node(&mut graph, "d", 1000, 2_000_000);
        let e = node(&mut graph, "e", 10000, 200_000);
        let f = node(&mut graph, "f", 100000, 20_000);
        let g = node(&mut graph, "g", 1000000, 2000);
        let h = node(&mut graph, "h", 10000000, 200);
        let i = node(&mut graph, "i", 100000000, 20);
        let j = node(&mut graph, "j", 1000000000, 2);
        set_internal_parents(&mut graph, b, 1);
        set_internal_parents(&mut graph, c, 1);
        set_internal_parents(&mut graph, d, 2);
        set_internal_parents(&mut graph, e, 1);
        set_internal_parents(&mut graph, f, 1);
        set_internal_parents(&mut graph, g, 2);
        set_internal_parents(&mut graph, h, 1);
        set_internal_parents(&mut graph, i, 2);
        set_internal_parents(&mut graph, j, 2);
        link(&mut graph, a, b, "a->b");
        link(&mut graph, a, c, "a->c");
        link(&mut graph, b, d, "b->d");
        link(&mut graph, c, d, "c->d");
        link(&mut graph, d, e, "d->e");
        link(&mut graph, d, f, "d->f");
        link(&mut graph, e, g, "e->g");
        link(&mut graph, f, g, "f->g");
        link(&mut graph, f, i, "f->i");
        link(&mut graph, g, h, "g->h");
        link(&mut graph, g, i, "g->i");
        link(&mut graph, h, j, "h->j");
        link(&mut graph, i, j, "i->j");
        Self { graph, a, b, c, d, e, f, g, h, i, j }
    }

    pub fn sources(&self) -> Vec<FileHandle> {
        vec![self.a]
    }
}

fn pair(g: &mut FileGraph, header: FileHandle, source: FileHandle) {
    g.node_mut(header).unwrap().component = Some(source);
    g.node_mut(source).unwrap().component = Some(header);
}

fn component_link(g: &mut FileGraph, source: FileHandle, header: FileHandle, code: &str) {
    g.add_edge(
        source,
        header,
        IncludeEdge {
            code: code.to_string(),
            line_number: 1,
            is_removable: false,
        },
    );
}

/// Two (header, source) components plus a main that includes both headers.
pub struct WInclude {
    pub graph: FileGraph,
    pub a_h: FileHandle,
    pub a_c: FileHandle,
    pub b_h: FileHandle,
    pub b_c: FileHandle,
    pub main_c: FileHandle,
}

impl WInclude {
    pub fn new() -> Self {
        let mut graph = FileGraph::new();
        let a_h = node(&mut graph, "a.h", 1, 20_000_000_000);
        let a_c = node(&mut graph, "a.c", 10, 2_000_000_000);
        let b_h = node(&mut graph, "b.h", 100, 200_000_000);
        let b_c = node(&mut graph, "b.c", 1000, 20_000_000);
        let main_c = node(&mut graph, "main.c", 12345, 98765);
        set_internal_parents(&mut graph, a_h, 2);
        set_internal_parents(&mut graph, b_h, 2);
        component_link(&mut graph, a_c, a_h, "a->a");
        component_link(&mut graph, b_c, b_h, "b->b");
        link(&mut graph, main_c, a_h, "main->a");
        link(&mut graph, main_c, b_h, "main->b");
        pair(&mut graph, a_h, a_c);
        pair(&mut graph, b_h, b_c);
        Self { graph, a_h, a_c, b_h, b_c, main_c }
    }

    pub fn sources(&self) -> Vec<FileHandle> {
        vec![self.a_c, self.b_c, self.main_c]
    }
}

/// Four linked header/source components plus a main that includes only
/// `a.h`, with each header including the next: `a.h -> b.h -> c.h -> d.h`.
pub struct CascadingInclude {
    pub graph: FileGraph,
    pub a_h: FileHandle,
    pub a_c: FileHandle,
    pub b_h: FileHandle,
    pub b_c: FileHandle,
    pub c_h: FileHandle,
    pub c_c: FileHandle,
    pub d_h: FileHandle,
    pub d_c: FileHandle,
    pub main_c: FileHandle,
}

impl CascadingInclude {
    pub fn new() -> Self {
        let mut graph = FileGraph::new();
        let a_h = node(&mut graph, "a.h", 1, 20_000_000_000);
        let a_c = node(&mut graph, "a.c", 10, 2_000_000_000);
        let b_h = node(&mut graph, "b.h", 100, 200_000_000);
        let b_c = node(&mut graph, "b.c", 1000, 20_000_000);
        let c_h = node(&mut graph, "c.h", 10000, 2_000_000);
        let c_c = node(&mut graph, "c.c", 100000, 200_000);
        let d_h = node(&mut graph, "d.h", 1000000, 20_000);
        let d_c = node(&mut graph, "d.c", 10000000, 2000);
        let main_c = node(&mut graph, "main.c", 12345, 98765);
        set_internal_parents(&mut graph, a_h, 2);
        set_internal_parents(&mut graph, b_h, 3);
        set_internal_parents(&mut graph, c_h, 3);
        set_internal_parents(&mut graph, d_h, 3);
        component_link(&mut graph, a_c, a_h, "a->a");
        component_link(&mut graph, b_c, b_h, "b->b");
        component_link(&mut graph, c_c, c_h, "c->c");
        component_link(&mut graph, d_c, d_h, "d->d");
        link(&mut graph, a_h, b_h, "a->b");
        link(&mut graph, b_h, c_h, "b->c");
        link(&mut graph, c_h, d_h, "c->d");
        link(&mut graph, main_c, a_h, "main->a");
        pair(&mut graph, a_h, a_c);
        pair(&mut graph, b_h, b_c);
        pair(&mut graph, c_h, c_c);
        pair(&mut graph, d_h, d_c);
        Self {
            graph,
            a_h,
            a_c,
            b_h,
            b_c,
            c_h,
            c_c,
            d_h,
            d_c,
            main_c,
        }
    }

    pub fn sources(&self) -> Vec<FileHandle> {
        vec![self.main_c, self.a_c, self.b_c, self.c_c, self.d_c]
    }
}
