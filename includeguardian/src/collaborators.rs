// Copyright (c) The IncludeGuardian Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Traits describing the external collaborators this crate consumes. Only
//! the interfaces they expose to the core are specified here -- the
//! preprocessor itself, the compilation-database loader, and the report
//! writer live in `includeguardian-cli` (or another embedder).

use std::path::{Path, PathBuf};

/// One event in the ordered trace a preprocessor collaborator emits for a
/// single translation unit. See [`crate::builder`] for the state machine
/// that consumes this stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PreprocessorEvent {
    /// The preprocessor is about to start processing a new translation
    /// unit rooted at `path`, whose physical identity is `identity`.
    SourceStart { path: PathBuf, identity: FileIdentity },
    /// The preprocessor has entered `file` (already materialised in the
    /// graph by a prior `Include` event, or the unit's own source file).
    Enter { file: FileIdentity },
    /// The preprocessor is leaving the file most recently entered.
    Exit { file: FileIdentity },
    /// An `#include` directive was encountered.
    Include {
        from_loc: IncludeLocation,
        filename: String,
        is_angled: bool,
        resolved_file: Option<FileIdentity>,
        relative_path: PathBuf,
        is_system: bool,
    },
    /// A `#pragma` directive was encountered; `text` is its verbatim spelling.
    Pragma { text: String },
    /// The main translation unit has finished.
    MainFileEnd,
}

/// The physical identity of a file, stable across multiple inclusions of
/// the same file: no two distinct identities ever resolve to the same
/// graph node. An embedder backed by a real filesystem would derive this
/// from (device, inode); a test double may use any stable key.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct FileIdentity(pub u64);

/// Where an `#include` directive's hash token was spelled.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IncludeLocation {
    /// `None` when the include is implanted by the driver's forced-include
    /// predefines buffer rather than appearing in a real file.
    pub line: Option<u32>,
}

/// The preprocessor oracle: on top of the event stream, the builder needs
/// to ask it two things about the file it's currently leaving.
pub trait PreprocessorOracle {
    /// `true` if `file` has an effective include guard (a `#pragma once`
    /// or the classic symbol-guard idiom), meaning the preprocessor will
    /// include its body at most once per translation unit.
    fn is_file_guarded(&self, file: FileIdentity) -> bool;

    /// The cumulative number of preprocessing tokens emitted so far in the
    /// current translation unit.
    fn cumulative_token_count(&self) -> u64;

    /// The on-disk byte size of `file`.
    fn file_size_bytes(&self, file: FileIdentity) -> u64;
}

/// What a path resolves to, for the purposes of scanning a source tree and
/// flagging precompiled-header files.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FileKind {
    Source,
    Header,
    PrecompiledHeader,
    Ignore,
}

/// Classifies paths into [`FileKind`]s. Consulted by the scanner to locate
/// translation-unit entry points and to flag precompiled files.
pub trait FileTypeClassifier {
    fn classify(&self, path: &Path) -> FileKind;
}

/// One entry in a compilation database: a source file plus the working
/// directory and argument list clang-style tools need to reproduce its
/// build command.
#[derive(Clone, Debug)]
pub struct CompilationEntry {
    pub source_path: PathBuf,
    pub working_directory: PathBuf,
    pub arguments: Vec<String>,
}

/// A compilation database: enumerable over source file paths,
/// yielding a working directory and argument list per path. The driver
/// augments entries with forced-include, include-dir, and extra-arg
/// adjusters before handing them to the preprocessor collaborator.
pub trait CompilationDatabase {
    fn entries(&self) -> Vec<CompilationEntry>;
}
