// Copyright (c) The IncludeGuardian Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The include-trace builder: consumes the [`PreprocessorEvent`] stream
//! emitted by a preprocessor collaborator and assembles a [`FileGraph`].
//!
//! Grounded in `IncludeScanner` (`build_graph.cpp`), with one deliberate
//! deviation: that scanner pushes the translation unit's source handle
//! onto the result's source list twice (once when the main file is first
//! seen, once more at `MainFileEnd`), which is a bug rather than
//! behaviour worth preserving. This builder pushes a source handle
//! exactly once, at `SourceStart`.

use crate::collaborators::{FileIdentity, FileKind, FileTypeClassifier, PreprocessorEvent, PreprocessorOracle};
use crate::cost::Cost;
use crate::graph::{FileGraph, FileHandle, FileNode, IncludeEdge};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// An `#include` directive whose target file the collaborator could not
/// resolve. Recorded rather than silently dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MissingInclude {
    pub includer: FileHandle,
    pub filename: String,
}

/// Everything the builder produced from one or more translation units.
#[derive(Clone, Debug, Default)]
pub struct BuildResult {
    pub graph: FileGraph,
    /// One handle per translation unit fed in, in the order `SourceStart`
    /// events arrived. Each source handle appears exactly once.
    pub sources: Vec<FileHandle>,
    pub missing_includes: Vec<MissingInclude>,
    /// Files seen without an effective include guard, reported once each.
    pub unguarded_files: Vec<FileHandle>,
}

/// Per-file bookkeeping the builder keeps keyed by physical identity,
/// persisting across however many times the file is entered and exited.
struct FileState {
    handle: FileHandle,
    /// Relative path computed the last time this file was reached via an
    /// angled include; used to resolve subsequent quoted includes relative
    /// to it.
    angled_rel: PathBuf,
    fully_processed: bool,
    file_size_overridden: bool,
    token_count_overridden: bool,
}

/// A live entry on the builder's call stack: which file is open, and the
/// cumulative-token baseline to measure this entry's consumption against.
struct StackFrame {
    identity: FileIdentity,
    token_snapshot: i64,
}

/// Assembles a [`FileGraph`] from an ordered [`PreprocessorEvent`] stream.
///
/// A single builder can be fed events from more than one translation unit
/// back to back (each bracketed by `SourceStart` ... `MainFileEnd`); files
/// shared between units are folded into the same node: no duplicate node
/// is ever created for the same physical identity.
pub struct GraphBuilder {
    graph: FileGraph,
    by_identity: HashMap<FileIdentity, FileState>,
    stack: Vec<StackFrame>,
    sources: Vec<FileHandle>,
    missing_includes: Vec<MissingInclude>,
    unguarded_files: Vec<FileHandle>,
    unguarded_reported: std::collections::HashSet<FileIdentity>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            graph: FileGraph::new(),
            by_identity: HashMap::new(),
            stack: Vec::new(),
            sources: Vec::new(),
            missing_includes: Vec::new(),
            unguarded_files: Vec::new(),
            unguarded_reported: std::collections::HashSet::new(),
        }
    }

    /// Feeds one event to the builder. `oracle` and `classifier` are taken
    /// per call so a caller can swap them out between translation units
    /// (e.g. when arguments differ per compilation-database entry).
    pub fn feed(
        &mut self,
        event: PreprocessorEvent,
        oracle: &dyn PreprocessorOracle,
        classifier: &dyn FileTypeClassifier,
    ) {
        match event {
            PreprocessorEvent::SourceStart { path, identity } => self.on_source_start(path, identity, classifier),
            PreprocessorEvent::Enter { file } => self.on_enter(file, oracle),
            PreprocessorEvent::Exit { file } => self.on_exit(file, oracle),
            PreprocessorEvent::Include {
                from_loc,
                filename,
                is_angled,
                resolved_file,
                relative_path,
                is_system,
            } => self.on_include(from_loc.line, filename, is_angled, resolved_file, relative_path, is_system, classifier),
            PreprocessorEvent::Pragma { text } => self.on_pragma(text),
            PreprocessorEvent::MainFileEnd => self.on_main_file_end(oracle),
        }
    }

    /// Consumes the builder, returning everything it has assembled.
    pub fn finish(self) -> BuildResult {
        BuildResult {
            graph: self.graph,
            sources: self.sources,
            missing_includes: self.missing_includes,
            unguarded_files: self.unguarded_files,
        }
    }

    fn state_for(
        &mut self,
        identity: FileIdentity,
        path: &Path,
        classifier: &dyn FileTypeClassifier,
        includer_is_precompiled: bool,
    ) -> FileHandle {
        if let Some(st) = self.by_identity.get(&identity) {
            return st.handle;
        }
        let kind = classifier.classify(path);
        let is_precompiled = includer_is_precompiled || kind == FileKind::PrecompiledHeader;
        let handle = self.graph.add_node(FileNode::new(normalize(path), false, is_precompiled));
        self.by_identity.insert(
            identity,
            FileState {
                handle,
                angled_rel: normalize(path),
                fully_processed: false,
                file_size_overridden: false,
                token_count_overridden: false,
            },
        );
        handle
    }

    fn on_source_start(&mut self, path: PathBuf, identity: FileIdentity, classifier: &dyn FileTypeClassifier) {
        let handle = self.state_for(identity, &path, classifier, false);
        self.sources.push(handle);
        self.stack.push(StackFrame { identity, token_snapshot: 0 });
    }

    fn on_enter(&mut self, file: FileIdentity, oracle: &dyn PreprocessorOracle) {
        let snapshot = oracle.cumulative_token_count() as i64;
        self.stack.push(StackFrame { identity: file, token_snapshot: snapshot });
    }

    fn on_exit(&mut self, file: FileIdentity, oracle: &dyn PreprocessorOracle) {
        debug_assert_eq!(self.stack.last().map(|f| f.identity), Some(file));
        let finished_size = oracle.file_size_bytes(file);
        let current_tokens = oracle.cumulative_token_count() as i64;
        let guarded = oracle.is_file_guarded(file);

        if guarded {
            if let Some(top) = self.stack.last() {
                let delta = current_tokens - top.token_snapshot;
                self.apply_cost(top.identity, delta, finished_size);
            }
            if let Some(st) = self.by_identity.get_mut(&file) {
                st.fully_processed = true;
            }
            self.stack.pop();
            if let Some(new_top) = self.stack.last_mut() {
                new_top.token_snapshot = current_tokens;
            }
        } else {
            if self.unguarded_reported.insert(file) {
                if let Some(st) = self.by_identity.get(&file) {
                    self.unguarded_files.push(st.handle);
                }
            }
            self.stack.pop();
            if let Some(new_top) = self.stack.last() {
                let delta = current_tokens - new_top.token_snapshot;
                let includer = new_top.identity;
                self.apply_cost(includer, delta, finished_size);
                if let Some(new_top) = self.stack.last_mut() {
                    new_top.token_snapshot = current_tokens;
                }
            }
        }
    }

    fn on_main_file_end(&mut self, oracle: &dyn PreprocessorOracle) {
        if let Some(bottom) = self.stack.first() {
            let identity = bottom.identity;
            let current_tokens = oracle.cumulative_token_count() as i64;
            let delta = current_tokens - bottom.token_snapshot;
            let size = oracle.file_size_bytes(identity);
            self.apply_cost(identity, delta, size);
        }
        self.stack.clear();
    }

    fn apply_cost(&mut self, identity: FileIdentity, token_delta: i64, byte_size: u64) {
        let (handle, size_overridden, token_overridden) = match self.by_identity.get(&identity) {
            Some(st) => (st.handle, st.file_size_overridden, st.token_count_overridden),
            None => return,
        };
        if let Some(node) = self.graph.node_mut(handle) {
            if !token_overridden {
                node.underlying_cost += Cost::new(token_delta, 0);
            }
            if !size_overridden {
                node.underlying_cost += Cost::new(0, byte_size);
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn on_include(
        &mut self,
        from_line: Option<u32>,
        filename: String,
        is_angled: bool,
        resolved_file: Option<FileIdentity>,
        relative_path: PathBuf,
        is_system: bool,
        classifier: &dyn FileTypeClassifier,
    ) {
        let includer_frame = match self.stack.last() {
            Some(f) => f,
            None => return,
        };
        let includer_identity = includer_frame.identity;
        let includer_already_done = self
            .by_identity
            .get(&includer_identity)
            .map(|st| st.fully_processed)
            .unwrap_or(false);
        if includer_already_done {
            return;
        }
        let includer_handle = self.by_identity.get(&includer_identity).map(|st| st.handle);
        let includer_handle = match includer_handle {
            Some(h) => h,
            None => return,
        };

        let resolved = match resolved_file {
            Some(id) => id,
            None => {
                self.missing_includes.push(MissingInclude { includer: includer_handle, filename });
                return;
            }
        };

        let logical_path = if is_angled {
            relative_path.clone()
        } else {
            let parent_angled = self
                .by_identity
                .get(&includer_identity)
                .map(|st| st.angled_rel.clone())
                .unwrap_or_default();
            normalize(&parent_angled.parent().unwrap_or_else(|| Path::new("")).join(&relative_path))
        };

        let includer_is_precompiled = self.graph.node(includer_handle).map(|n| n.is_precompiled).unwrap_or(false);
        let newly_created = !self.by_identity.contains_key(&resolved);
        let target_handle = self.state_for(resolved, &logical_path, classifier, includer_is_precompiled);
        if newly_created {
            if let Some(st) = self.by_identity.get_mut(&resolved) {
                st.angled_rel = logical_path.clone();
            }
        }
        if is_system {
            if let Some(node) = self.graph.node_mut(target_handle) {
                node.is_external = true;
            }
        }

        let includer_is_external = self.graph.node(includer_handle).map(|n| n.is_external).unwrap_or(false);
        if !includer_is_external {
            if let Some(node) = self.graph.node_mut(target_handle) {
                node.internal_incoming += 1;
            }
        }

        let is_component_edge = self
            .graph
            .node(target_handle)
            .and_then(|n| n.component)
            .map(|peer| peer == includer_handle)
            .unwrap_or(false);
        let is_forced = from_line.is_none();
        self.graph.add_edge(
            includer_handle,
            target_handle,
            IncludeEdge {
                code: filename,
                line_number: from_line.unwrap_or(0),
                is_removable: !is_forced && !is_component_edge,
            },
        );
    }

    fn on_pragma(&mut self, text: String) {
        let identity = match self.stack.last() {
            Some(f) => f.identity,
            None => return,
        };
        let handle = match self.by_identity.get(&identity) {
            Some(st) => st.handle,
            None => return,
        };

        if let Some(n) = parse_pragma_arg(&text, "override_file_size") {
            if let Some(st) = self.by_identity.get_mut(&identity) {
                st.file_size_overridden = true;
            }
            if let Some(node) = self.graph.node_mut(handle) {
                node.underlying_cost = Cost::new(node.underlying_cost.tokens(), n as u64);
            }
        } else if let Some(n) = parse_pragma_arg(&text, "override_token_count") {
            if let Some(st) = self.by_identity.get_mut(&identity) {
                st.token_count_overridden = true;
            }
            if let Some(node) = self.graph.node_mut(handle) {
                node.underlying_cost = Cost::new(n, node.underlying_cost.bytes());
            }
        }
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses `name(123)` out of a pragma's verbatim text, returning `123`.
fn parse_pragma_arg(text: &str, name: &str) -> Option<i64> {
    let rest = text.trim().strip_prefix(name)?;
    let rest = rest.trim_start();
    let inner = rest.strip_prefix('(')?.strip_suffix(')')?;
    inner.trim().parse().ok()
}

/// Collapses `.`/`..` components without touching the filesystem; the
/// builder never sees paths it can `canonicalize` (identities, not paths,
/// come from the collaborator).
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            std::path::Component::CurDir => {}
            std::path::Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
