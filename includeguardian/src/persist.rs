// Copyright (c) The IncludeGuardian Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persisting a built graph, so a slow preprocessor trace only needs to
//! be collected once. `FileGraph`, `FileHandle` and
//! `IncludeHandle` already derive `serde::{Serialize, Deserialize}`; this
//! module just adds the envelope (sources) and the JSON read/write
//! entry points.

use crate::errors::Result;
use crate::graph::{FileGraph, FileHandle};
use std::io::{Read, Write};

/// Everything needed to resume analysis without re-running the
/// preprocessor: the graph plus the source handles the original scan
/// collected.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct PersistedGraph {
    pub graph: FileGraph,
    pub sources: Vec<FileHandle>,
}

impl PersistedGraph {
    /// Serializes this graph to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes this graph as JSON to `writer`.
    pub fn write_json<W: Write>(&self, writer: W) -> Result<()> {
        Ok(serde_json::to_writer_pretty(writer, self)?)
    }

    /// Parses a graph previously written by [`PersistedGraph::to_json`] or
    /// [`PersistedGraph::write_json`].
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Reads a graph as JSON from `reader`.
    pub fn read_json<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::DiamondGraph;

    #[test]
    fn round_trips_through_json() {
        let fx = DiamondGraph::new();
        let sources = fx.sources();
        let persisted = PersistedGraph { graph: fx.graph, sources };
        let json = persisted.to_json().unwrap();
        let restored = PersistedGraph::from_json(&json).unwrap();
        assert_eq!(restored.graph.node_count(), persisted.graph.node_count());
        assert_eq!(restored.sources, persisted.sources);
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        let err = PersistedGraph::from_json("not json").unwrap_err();
        assert!(matches!(err, crate::errors::Error::Serialization(_)));
    }
}
