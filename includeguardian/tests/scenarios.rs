// Copyright (c) The IncludeGuardian Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The literal scenarios from the testable-properties section: fixed
//! fixture graphs with hand-computed expected outputs, exercised through
//! the public analysis API rather than internal state.

use includeguardian::analyses;
use includeguardian::collaborators::{FileIdentity, FileKind, FileTypeClassifier, PreprocessorEvent, PreprocessorOracle};
use includeguardian::levelize;
use includeguardian::reachability::ReachabilityIndex;
use includeguardian::test_fixtures::{CascadingInclude, DiamondGraph, LongChain, MultiLevel, WInclude};
use std::cell::Cell;
use std::collections::HashMap;
use std::path::Path;

#[test]
fn diamond_expensive_files_reports_all_four_nodes_once_each() {
    let fx = DiamondGraph::new();
    let sources = fx.sources();
    let reach = ReachabilityIndex::build(&fx.graph).unwrap();

    let mut results = analyses::expensive_files::from_graph(&fx.graph, &reach, &sources, 1);
    results.sort_by_key(|r| r.file);
    assert_eq!(results.len(), 4);
    for r in &results {
        assert_eq!(r.reachable_source_count, 1);
    }
}

#[test]
fn diamond_expensive_includes_only_reports_branch_entries() {
    let fx = DiamondGraph::new();
    let sources = fx.sources();
    let reach = ReachabilityIndex::build(&fx.graph).unwrap();

    let results = analyses::expensive_includes::from_graph(&fx.graph, &reach, &sources, 1);
    assert_eq!(results.len(), 2);

    let saving_into = |target: includeguardian::FileHandle| {
        fx.graph
            .out_edges(fx.a)
            .find(|&(t, _)| t == target)
            .and_then(|(_, include)| results.iter().find(|r| r.include == include))
            .map(|r| r.saving)
    };

    let cost_of = |h: includeguardian::FileHandle| fx.graph.node(h).unwrap().underlying_cost;
    assert_eq!(saving_into(fx.b), Some(cost_of(fx.b)));
    assert_eq!(saving_into(fx.c), Some(cost_of(fx.c)));
}

#[test]
fn diamond_total_cost_is_1111_tokens() {
    let fx = DiamondGraph::new();
    let sources = fx.sources();
    let total = analyses::total_cost::from_graph(&fx.graph, &sources);
    assert_eq!(total.true_cost.tokens(), 1111);
}

#[test]
fn multi_level_expensive_files_matches_reach_counts() {
    let fx = MultiLevel::new();
    let sources = fx.sources();
    let reach = ReachabilityIndex::build(&fx.graph).unwrap();

    let results = analyses::expensive_files::from_graph(&fx.graph, &reach, &sources, 1);
    assert_eq!(results.len(), 8);

    let expected: HashMap<includeguardian::FileHandle, u32> = [
        (fx.a, 1),
        (fx.b, 1),
        (fx.c, 1),
        (fx.d, 2),
        (fx.e, 1),
        (fx.f, 2),
        (fx.g, 1),
        (fx.h, 2),
    ]
    .into_iter()
    .collect();

    for r in &results {
        assert_eq!(r.reachable_source_count, expected[&r.file], "file {:?}", r.file);
    }
}

#[test]
fn multi_level_total_cost_sums_both_branches() {
    let fx = MultiLevel::new();
    let sources = fx.sources();
    let total = analyses::total_cost::from_graph(&fx.graph, &sources);

    let cost_of = |h: includeguardian::FileHandle| fx.graph.node(h).unwrap().underlying_cost;
    let expected = cost_of(fx.a) + cost_of(fx.c) + cost_of(fx.d) + cost_of(fx.f) + cost_of(fx.h)
        + cost_of(fx.b) + cost_of(fx.d) + cost_of(fx.e) + cost_of(fx.f) + cost_of(fx.g) + cost_of(fx.h);

    assert_eq!(total.true_cost, expected);
}

#[test]
fn w_include_unused_components_threshold_behaviour() {
    let fx = WInclude::new();
    let sources = fx.sources();

    let loose = analyses::unused_components::from_graph(&fx.graph, &sources, 1, 0);
    let mut loose_sources: Vec<_> = loose.iter().map(|c| c.source).collect();
    loose_sources.sort();
    let mut expected: Vec<_> = vec![fx.a_c, fx.b_c];
    expected.sort();
    assert_eq!(loose_sources, expected);

    let tight = analyses::unused_components::from_graph(&fx.graph, &sources, 0, 0);
    assert!(tight.is_empty());
}

#[test]
fn cascading_include_unnecessary_sources_matches_formulas() {
    let fx = CascadingInclude::new();
    let sources = fx.sources();
    let reach = ReachabilityIndex::build(&fx.graph).unwrap();

    let results = analyses::unnecessary_sources::from_graph(&fx.graph, &reach, &sources, 0);
    let mut by_source: HashMap<includeguardian::FileHandle, _> = results.into_iter().map(|r| (r.source, r)).collect();
    assert_eq!(by_source.len(), 4);

    let cost_of = |h: includeguardian::FileHandle| fx.graph.node(h).unwrap().underlying_cost;

    let a = by_source.remove(&fx.a_c).unwrap();
    assert_eq!(a.saving, cost_of(fx.a_c) + cost_of(fx.a_h) + cost_of(fx.b_h) + cost_of(fx.c_h) + cost_of(fx.d_h));
    assert_eq!(a.extra_cost, cost_of(fx.a_c));
}

#[test]
fn long_chain_expensive_includes_returns_five_directives() {
    let fx = LongChain::new();
    let sources = fx.sources();
    let reach = ReachabilityIndex::build(&fx.graph).unwrap();

    let results = analyses::expensive_includes::from_graph(&fx.graph, &reach, &sources, 1);
    assert_eq!(results.len(), 5);

    let cost_of = |h: includeguardian::FileHandle| fx.graph.node(h).unwrap().underlying_cost;
    let mut savings: Vec<i64> = results.iter().map(|r| r.saving.tokens()).collect();
    savings.sort_unstable();

    let mut expected: Vec<i64> = vec![
        cost_of(fx.b).tokens(),
        cost_of(fx.c).tokens(),
        cost_of(fx.e).tokens(),
        cost_of(fx.f).tokens(),
        cost_of(fx.h).tokens(),
    ];
    expected.sort_unstable();

    assert_eq!(savings, expected);
}

#[test]
fn w_include_levelizes_component_pairs_beneath_main() {
    let fx = WInclude::new();
    let sources = fx.sources();

    let levels = levelize::from_graph(&fx.graph, &sources);
    assert_eq!(levels.len(), 2);

    let level0: Vec<_> = levels[0].iter().flatten().copied().collect();
    assert!(level0.contains(&fx.a_h) && level0.contains(&fx.a_c));
    assert!(level0.contains(&fx.b_h) && level0.contains(&fx.b_c));

    let level1: Vec<_> = levels[1].iter().flatten().copied().collect();
    assert_eq!(level1, vec![fx.main_c]);

    let a_pair = levels[0].iter().find(|g| g.contains(&fx.a_h)).unwrap();
    assert!(a_pair.contains(&fx.a_c));
    let b_pair = levels[0].iter().find(|g| g.contains(&fx.b_h)).unwrap();
    assert!(b_pair.contains(&fx.b_c));
}

struct FakeOracle {
    tokens: Cell<u64>,
    sizes: HashMap<u64, u64>,
}

impl PreprocessorOracle for FakeOracle {
    fn is_file_guarded(&self, _file: FileIdentity) -> bool {
        true
    }
    fn cumulative_token_count(&self) -> u64 {
        self.tokens.get()
    }
    fn file_size_bytes(&self, file: FileIdentity) -> u64 {
        *self.sizes.get(&file.0).unwrap_or(&0)
    }
}

struct FakeClassifier;
impl FileTypeClassifier for FakeClassifier {
    fn classify(&self, _path: &Path) -> FileKind {
        FileKind::Source
    }
}

#[test]
fn override_pragma_wins_over_the_real_token_stream() {
    let oracle = FakeOracle { tokens: Cell::new(0), sizes: HashMap::new() };
    let classifier = FakeClassifier;
    let mut builder = includeguardian::builder::GraphBuilder::new();

    builder.feed(
        PreprocessorEvent::SourceStart { path: "main.c".into(), identity: FileIdentity(1) },
        &oracle,
        &classifier,
    );
    builder.feed(PreprocessorEvent::Pragma { text: "override_token_count(42)".to_string() }, &oracle, &classifier);
    oracle.tokens.set(9999);
    builder.feed(PreprocessorEvent::MainFileEnd, &oracle, &classifier);

    let result = builder.finish();
    let main_h = result.sources[0];
    assert_eq!(result.graph.node(main_h).unwrap().underlying_cost.tokens(), 42);
}
