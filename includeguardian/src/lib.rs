//! `includeguardian` builds a directed file-inclusion graph from a
//! preprocessor trace and runs a suite of analyses that quantify concrete
//! opportunities to reduce compilation cost: expensive files, expensive
//! include directives, header-privatization candidates, source-inlining
//! candidates, unused components, precompiled-header recommendations, and
//! topological levelization.
//!
//! This crate is the analysis engine only. It does not invoke a compiler,
//! load a compilation database, or format a report -- those are external
//! collaborators that speak to this crate through the traits and types in
//! [`collaborators`].

pub mod builder;
pub mod collaborators;
pub mod cost;
pub mod errors;
pub mod graph;
pub mod levelize;
pub mod persist;
pub mod reachability;

pub mod analyses;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod test_fixtures;

pub use cost::Cost;
pub use errors::Error;
pub use graph::{FileGraph, FileHandle, IncludeHandle};
pub use reachability::ReachabilityIndex;
