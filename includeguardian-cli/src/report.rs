// Copyright (c) The IncludeGuardian Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The colourised YAML-style report writer: renders findings as a
//! YAML-like document on a text output stream, independent of the
//! analysis core.
//!
//! Grounded in the `yaml_value` family of free functions in
//! `includeguardian.cpp`: each scalar type gets its own colour (keys blue,
//! strings yellow, numbers red, punctuation white, comments green) and
//! byte counts are annotated with a human-readable comment, the way that
//! file renders `# 4.20 KiB` next to a raw byte count.

use anyhow::Result;
use includeguardian::analyses::{ExpensiveHeader, FileAndCost, IncludeAndSaving, PrecompiledRecommendation, UnnecessarySource, UnusedComponent};
use includeguardian::{Cost, FileGraph, FileHandle};
use std::io::Write;
use termcolor::{Color, ColorSpec, WriteColor};

fn key_color() -> ColorSpec {
    let mut c = ColorSpec::new();
    c.set_fg(Some(Color::Blue)).set_intense(true);
    c
}

fn str_color() -> ColorSpec {
    let mut c = ColorSpec::new();
    c.set_fg(Some(Color::Yellow)).set_intense(true);
    c
}

fn num_color() -> ColorSpec {
    let mut c = ColorSpec::new();
    c.set_fg(Some(Color::Red)).set_intense(true);
    c
}

fn comment_color() -> ColorSpec {
    let mut c = ColorSpec::new();
    c.set_fg(Some(Color::Green));
    c
}

/// Formats a byte count with a binary (KiB/MiB/...) suffix, to 3
/// significant figures.
pub fn format_file_size(bytes: u64) -> String {
    const SUFFIXES: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB", "ZiB"];
    let mut value = bytes as f64;
    let mut suffix_index = 0;
    while value >= 1024.0 && suffix_index + 1 < SUFFIXES.len() {
        value /= 1024.0;
        suffix_index += 1;
    }
    if value >= 1000.0 {
        format!("{} {}", value.round() as i64, SUFFIXES[suffix_index])
    } else {
        format!("{:.2} {}", value, SUFFIXES[suffix_index])
    }
}

/// Writes YAML-like scalar values to a colour-capable output stream.
pub struct Report<'w, W: WriteColor> {
    out: &'w mut W,
}

impl<'w, W: WriteColor> Report<'w, W> {
    pub fn new(out: &'w mut W) -> Self {
        Self { out }
    }

    pub fn heading(&mut self, text: &str) -> Result<()> {
        self.out.set_color(&key_color())?;
        writeln!(self.out, "{}:", text)?;
        self.out.reset()?;
        Ok(())
    }

    pub fn key(&mut self, key: &str) -> Result<()> {
        self.out.set_color(&key_color())?;
        write!(self.out, "  {}: ", key)?;
        self.out.reset()?;
        Ok(())
    }

    pub fn string_value(&mut self, s: &str) -> Result<()> {
        self.out.set_color(&str_color())?;
        writeln!(self.out, "\"{}\"", s.replace('"', "\\\""))?;
        self.out.reset()?;
        Ok(())
    }

    pub fn int_value(&mut self, v: i64) -> Result<()> {
        self.out.set_color(&num_color())?;
        writeln!(self.out, "{}", v)?;
        self.out.reset()?;
        Ok(())
    }

    pub fn file_size_value(&mut self, bytes: u64) -> Result<()> {
        self.out.set_color(&num_color())?;
        write!(self.out, "{}", bytes)?;
        self.out.set_color(&comment_color())?;
        writeln!(self.out, " # {}", format_file_size(bytes))?;
        self.out.reset()?;
        Ok(())
    }

    pub fn cost_value(&mut self, cost: Cost) -> Result<()> {
        self.out.set_color(&num_color())?;
        write!(self.out, "{} tokens, ", cost.tokens())?;
        self.out.set_color(&comment_color())?;
        writeln!(self.out, "{}", format_file_size(cost.bytes()))?;
        self.out.reset()?;
        Ok(())
    }

    pub fn percent_value(&mut self, p: f64) -> Result<()> {
        self.out.set_color(&num_color())?;
        write!(self.out, "{:.2}", p)?;
        self.out.set_color(&comment_color())?;
        writeln!(self.out, " # (%)")?;
        self.out.reset()?;
        Ok(())
    }

    fn path(&mut self, graph: &FileGraph, file: FileHandle) -> String {
        graph.node(file).map(|n| n.path.display().to_string()).unwrap_or_default()
    }

    pub fn expensive_files(&mut self, graph: &FileGraph, results: &[FileAndCost]) -> Result<()> {
        self.heading("expensive_files")?;
        for r in results {
            self.key("file")?;
            let path = self.path(graph, r.file);
            self.string_value(&path)?;
            self.key("reachable_source_count")?;
            self.int_value(r.reachable_source_count as i64)?;
        }
        Ok(())
    }

    pub fn expensive_includes(&mut self, graph: &FileGraph, results: &[IncludeAndSaving]) -> Result<()> {
        self.heading("expensive_includes")?;
        for r in results {
            self.key("file")?;
            let path = self.path(graph, r.file);
            self.string_value(&path)?;
            self.key("include")?;
            let code = graph.edge(r.include).map(|e| e.code.clone()).unwrap_or_default();
            self.string_value(&code)?;
            self.key("line")?;
            let line = graph.edge(r.include).map(|e| e.line_number).unwrap_or(0);
            self.int_value(line as i64)?;
            self.key("saving")?;
            self.cost_value(r.saving)?;
        }
        Ok(())
    }

    pub fn expensive_headers(&mut self, graph: &FileGraph, results: &[ExpensiveHeader]) -> Result<()> {
        self.heading("expensive_headers")?;
        for r in results {
            self.key("file")?;
            let path = self.path(graph, r.file);
            self.string_value(&path)?;
            self.key("saving")?;
            self.cost_value(r.saving)?;
        }
        Ok(())
    }

    pub fn unnecessary_sources(&mut self, graph: &FileGraph, results: &[UnnecessarySource]) -> Result<()> {
        self.heading("unnecessary_sources")?;
        for r in results {
            self.key("source")?;
            let path = self.path(graph, r.source);
            self.string_value(&path)?;
            self.key("saving")?;
            self.cost_value(r.saving)?;
            self.key("extra_cost")?;
            self.cost_value(r.extra_cost)?;
        }
        Ok(())
    }

    pub fn unused_components(&mut self, graph: &FileGraph, results: &[UnusedComponent]) -> Result<()> {
        self.heading("unused_components")?;
        for r in results {
            self.key("source")?;
            let path = self.path(graph, r.source);
            self.string_value(&path)?;
            self.key("cost")?;
            self.cost_value(r.cost)?;
        }
        Ok(())
    }

    pub fn recommend_pch(&mut self, graph: &FileGraph, results: &[PrecompiledRecommendation]) -> Result<()> {
        self.heading("recommend_precompiled")?;
        for r in results {
            self.key("file")?;
            let path = self.path(graph, r.file);
            self.string_value(&path)?;
            self.key("saving")?;
            self.cost_value(r.saving)?;
            self.key("extra_precompiled_size")?;
            self.cost_value(r.extra_precompiled_size)?;
        }
        Ok(())
    }

    pub fn total_cost(&mut self, total: includeguardian::analyses::TotalCost) -> Result<()> {
        self.heading("total_cost")?;
        self.key("true_cost")?;
        self.cost_value(total.true_cost)?;
        self.key("precompiled")?;
        self.cost_value(total.precompiled)?;
        Ok(())
    }

    pub fn parameters(&mut self, cutoff: &crate::cli::Cutoff) -> Result<()> {
        self.heading("parameters")?;
        self.key("cutoff")?;
        self.percent_value(cutoff.percent())?;
        Ok(())
    }

    pub fn sources(&mut self, graph: &FileGraph, sources: &[FileHandle]) -> Result<()> {
        self.heading("sources")?;
        for &s in sources {
            self.key("path")?;
            let path = self.path(graph, s);
            self.string_value(&path)?;
        }
        Ok(())
    }

    pub fn topological_order(&mut self, graph: &FileGraph, levels: &[includeguardian::levelize::Level]) -> Result<()> {
        self.heading("topological_order")?;
        for (i, level) in levels.iter().enumerate() {
            self.heading(&format!("  level_{}", i))?;
            for group in level {
                let paths: Vec<String> = group.iter().map(|&h| self.path(graph, h)).collect();
                self.key("component")?;
                self.string_value(&paths.join(", "))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_file_sizes_with_binary_suffixes() {
        assert_eq!(format_file_size(0), "0.00 B");
        assert_eq!(format_file_size(1024), "1.00 KiB");
        assert_eq!(format_file_size(1024 * 1024), "1.00 MiB");
    }

    #[test]
    fn large_values_round_to_integers() {
        assert_eq!(format_file_size(1024 * 1000), "1000 KiB");
    }
}
