// Copyright (c) The IncludeGuardian Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The command-line surface: a driver-only layer over the analysis core,
//! parsed with `clap`'s derive API.

use includeguardian::Error;
use std::path::PathBuf;

/// A `--cutoff` percentage, validated to lie in `[0, 100]`.
///
/// Stored as a percentage rather than a raw token count because the
/// meaningful threshold scales with the size of the codebase being
/// analysed; the driver converts it to an absolute token cutoff once the
/// graph's total cost is known.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cutoff(f64);

impl Cutoff {
    pub fn percent(self) -> f64 {
        self.0
    }

    /// Converts this percentage to an absolute token-count threshold given
    /// the total token cost of the sources under analysis.
    pub fn as_token_count(self, total_tokens: i64) -> i64 {
        ((self.0 / 100.0) * total_tokens as f64).round() as i64
    }
}

impl std::str::FromStr for Cutoff {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let v: f64 = s.parse().map_err(|_| Error::Configuration(format!("'{}' is not a number", s)))?;
        if !(0.0..=100.0).contains(&v) {
            return Err(Error::Configuration(format!("--cutoff must be in [0, 100], got {}", v)));
        }
        Ok(Cutoff(v))
    }
}

/// Analyses the pack's compilation-cost reduction opportunities.
#[derive(Debug, clap::Parser)]
#[clap(name = "includeguardian", about = "Finds compilation-cost reduction opportunities in a C/C++ codebase")]
pub struct Cli {
    /// Translation-unit entry points to analyse.
    pub sources: Vec<PathBuf>,

    /// Add a directory to the include search path.
    #[clap(short = 'I', multiple_occurrences = true)]
    pub include_dirs: Vec<PathBuf>,

    /// Add a directory to the system include search path.
    #[clap(long = "isystem", multiple_occurrences = true)]
    pub system_include_dirs: Vec<PathBuf>,

    /// A header forcibly included at the start of every translation unit.
    #[clap(long = "forced-includes", multiple_occurrences = true)]
    pub forced_includes: Vec<PathBuf>,

    /// An extra argument appended to every preprocessor invocation.
    #[clap(long = "extra-arg", multiple_occurrences = true)]
    pub extra_arg: Vec<String>,

    /// An extra argument prepended to every preprocessor invocation.
    #[clap(long = "extra-arg-before", multiple_occurrences = true)]
    pub extra_arg_before: Vec<String>,

    /// Root directory sources are resolved relative to.
    #[clap(long = "dir")]
    pub dir: Option<PathBuf>,

    /// Directory containing a `compile_commands.json` compilation database.
    #[clap(short = 'p')]
    pub build_dir: Option<PathBuf>,

    /// Load a previously-persisted graph instead of scanning sources.
    #[clap(long = "load")]
    pub load: Option<PathBuf>,

    /// Persist the constructed graph to this path before analysing it.
    #[clap(long = "save")]
    pub save: Option<PathBuf>,

    /// Minimum saving, as a percentage of total cost, for a finding to be
    /// reported.
    #[clap(long = "cutoff", default_value = "0.25")]
    pub cutoff: Cutoff,

    /// Minimum ratio of saved cost to precompiled-header growth for a PCH
    /// recommendation to be reported.
    #[clap(long = "pch-ratio", default_value = "1.5")]
    pub pch_ratio: f64,

    /// Run the full analysis suite (default when no other mode is given).
    #[clap(long = "analyze")]
    pub analyze: bool,

    /// Print the topological (levelized) build order instead of savings
    /// analyses.
    #[clap(long = "topological-order")]
    pub topological_order: bool,

    /// Include the resolved source list in the report.
    #[clap(long = "show-sources")]
    pub show_sources: bool,

    /// Prefer recommending the smaller of two equally-saving files, to
    /// reduce the size of the precompiled header.
    #[clap(long = "smaller-file-opt")]
    pub smaller_file_opt: bool,
}
