// Copyright (c) The IncludeGuardian Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types returned by this crate.
//!
//! Per the propagation policy: a resolution miss (an include directive that
//! can't be resolved to a file) and an unguarded-file warning are *data*,
//! not errors -- they show up in [`crate::builder::BuildResult`]. Everything
//! in this enum is a condition that stops the pipeline.

use crate::graph::FileHandle;
use std::path::PathBuf;

/// The error type for all fallible operations in this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The CLI or embedding application passed in a value this crate
    /// can't act on (e.g. a malformed `--cutoff`).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Walking the source tree (or resolving `--dir`) failed with an I/O
    /// error. This is fatal: the builder can't produce a graph without it.
    #[error("failed to resolve directory '{path}': {source}")]
    DirectoryResolution {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The preprocessor collaborator reported a catastrophic failure (not
    /// a missing include, which is recoverable) while building the graph.
    #[error("failed to build include graph: {0}")]
    BuilderFailure(String),

    /// `load` was given a persisted graph in an incompatible format.
    #[error("failed to deserialize persisted graph: {0}")]
    Serialization(String),

    /// [`crate::reachability::ReachabilityIndex`] path-count accumulation
    /// overflowed. The tool assumes path counts fit in 32 bits; a graph
    /// that violates this is reported rather than silently wrapped.
    #[error("path count from {from:?} to {to:?} overflowed")]
    PathCountOverflow { from: FileHandle, to: FileHandle },

    /// A caller-supplied handle does not belong to the graph it was passed
    /// to. Unlike an internal invariant violation (which panics), this can
    /// legitimately happen when handles from two different graphs are
    /// mixed up by a caller, so it's a recoverable error.
    #[error("unknown file handle: {0:?}")]
    UnknownHandle(FileHandle),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
