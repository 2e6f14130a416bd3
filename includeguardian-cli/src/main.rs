// Copyright (c) The IncludeGuardian Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `includeguardian` binary: loads or builds a file graph, runs the
//! requested analyses, and renders a colourised YAML-style report.
//!
//! Building a graph from scratch requires a real preprocessor oracle and
//! compilation database, which are external collaborators this binary
//! doesn't implement either -- an embedder wires its own clang/libclang
//! integration in behind [`includeguardian::collaborators::PreprocessorOracle`].
//! This binary's job is everything downstream of a graph: `--load` a
//! previously-persisted one, analyse it, and report.

mod cli;
mod report;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::Cli;
use includeguardian::persist::PersistedGraph;
use includeguardian::{analyses, levelize, reachability::ReachabilityIndex, Error};
use report::Report;
use std::fs::File;
use std::io::BufReader;
use termcolor::{ColorChoice, StandardStream};
use tracing::info;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => Ok(()),
        Err(err) => {
            tracing::error!("{:#}", err);
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let persisted = load_graph(cli)?;
    let PersistedGraph { graph, sources } = persisted;

    info!(files = graph.node_count(), sources = sources.len(), "loaded graph");

    if let Some(save_path) = &cli.save {
        let file = File::create(save_path).with_context(|| format!("failed to create {}", save_path.display()))?;
        PersistedGraph { graph: graph.clone(), sources: sources.clone() }
            .write_json(file)
            .context("failed to persist graph")?;
    }

    let stdout = StandardStream::stdout(ColorChoice::Auto);
    let mut lock = stdout.lock();
    let mut report = Report::new(&mut lock);

    if cli.show_sources {
        report.sources(&graph, &sources)?;
    }

    if cli.topological_order {
        let levels = levelize::from_graph(&graph, &sources);
        report.topological_order(&graph, &levels)?;
        return Ok(());
    }

    // `--analyze` is the default mode whenever neither `--topological-order`
    // nor `--show-sources` alone was requested.
    let reach = ReachabilityIndex::build(&graph).map_err(anyhow::Error::from)?;
    let total = analyses::total_cost::from_graph(&graph, &sources);
    let cutoff = cli.cutoff.as_token_count(total.true_cost.tokens());

    report.parameters(&cli.cutoff)?;
    report.total_cost(total)?;
    report.expensive_files(&graph, &analyses::expensive_files::from_graph(&graph, &reach, &sources, cutoff))?;
    report.expensive_includes(&graph, &analyses::expensive_includes::from_graph(&graph, &reach, &sources, cutoff))?;
    report.expensive_headers(&graph, &analyses::expensive_headers::from_graph(&graph, &reach, &sources, cutoff))?;
    report.unnecessary_sources(&graph, &analyses::unnecessary_sources::from_graph(&graph, &reach, &sources, cutoff))?;
    report.unused_components(&graph, &analyses::unused_components::from_graph(&graph, &sources, 1, cutoff))?;
    report.recommend_pch(&graph, &analyses::recommend_pch::from_graph(&graph, &sources, cutoff, cli.pch_ratio))?;

    Ok(())
}

fn load_graph(cli: &Cli) -> Result<PersistedGraph> {
    if let Some(load_path) = &cli.load {
        let file = File::open(load_path).with_context(|| format!("failed to open {}", load_path.display()))?;
        return PersistedGraph::read_json(BufReader::new(file))
            .map_err(anyhow::Error::from)
            .context("failed to deserialize persisted graph");
    }

    if cli.sources.is_empty() {
        bail!(Error::Configuration("no sources given and no --load path provided".to_string()));
    }

    bail!(Error::Configuration(
        "scanning sources requires an embedder-provided preprocessor collaborator; pass --load instead".to_string()
    ));
}
