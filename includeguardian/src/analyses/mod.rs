// Copyright (c) The IncludeGuardian Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The analysis suite: each submodule answers one question about the
//! graph, takes a read-only [`crate::graph::FileGraph`] plus a
//! precomputed [`crate::reachability::ReachabilityIndex`], and returns a
//! ranked `Vec` of candidates.
//!
//! Every analysis here fans out over `rayon`: workers push into a single
//! `Mutex`-guarded result vector rather than merging per-thread
//! accumulators, so ordering artefacts from thread scheduling don't leak
//! into the output -- the mutex is held only for the `push`.

pub mod expensive_files;
pub mod expensive_headers;
pub mod expensive_includes;
pub mod recommend_pch;
pub mod total_cost;
pub mod unnecessary_sources;
pub mod unused_components;

pub use expensive_files::FileAndCost;
pub use expensive_headers::ExpensiveHeader;
pub use expensive_includes::IncludeAndSaving;
pub use recommend_pch::PrecompiledRecommendation;
pub use total_cost::TotalCost;
pub use unnecessary_sources::UnnecessarySource;
pub use unused_components::UnusedComponent;
