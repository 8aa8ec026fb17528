//! Multi-source feature-space merging
//!
//! Each source contributes a contiguous block of global feature indices:
//! source `i` owns `(offsets[i - 1], offsets[i]]`. A source's local index
//! `j` becomes `offsets[i - 1] + j`; pairs that land past the source's
//! upper boundary are dropped and reported. Merged rows are streamed to a
//! [`RowSink`] one at a time; no merged matrix is ever held in memory.

use std::io::BufWriter;
use std::path::Path;

use rayon::prelude::*;
use svmfeat_core::format::constants::BIAS_DISABLED;
use svmfeat_core::validation::{cumulative_offsets, validate_offsets};
use svmfeat_core::{ArgumentError, LabeledRows, Problem, Result, RowSink, SvmError};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::builder::ProblemBuilder;
use crate::config::BuildConfig;
use crate::writer::WireWriter;

/// How source boundaries in the merged space are chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OffsetMode {
    /// Derive boundaries from each source's feature dimension (training)
    Compute,
    /// Reuse boundaries from an earlier merge (test time)
    Align(Vec<i64>),
}

/// A named problem taking part in a merge
#[derive(Debug, Clone)]
pub struct Source<M = Problem> {
    pub name: String,
    pub problem: M,
}

impl<M> Source<M> {
    pub fn new(name: impl Into<String>, problem: M) -> Self {
        Self {
            name: name.into(),
            problem,
        }
    }
}

/// Outcome of a successful merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    /// Source names in merge order
    pub sources: Vec<String>,
    /// Upper boundary of each source in the merged space
    pub offsets: Vec<i64>,
    /// Rows written
    pub rows: usize,
    /// Pairs dropped per source for exceeding its boundary
    pub dropped: Vec<usize>,
}

impl MergeReport {
    /// Dimension of the merged feature space
    pub fn feature_dim(&self) -> i64 {
        self.offsets.last().copied().unwrap_or(0)
    }

    pub fn total_dropped(&self) -> usize {
        self.dropped.iter().sum()
    }
}

/// Merges several problems into one wider feature space
#[derive(Debug, Clone, Default)]
pub struct ProblemMerger {
    build: BuildConfig,
}

impl ProblemMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how sources are read in [`ProblemMerger::merge_files`].
    ///
    /// The bias setting is ignored; merged sources never carry a bias.
    pub fn with_build_config(mut self, config: BuildConfig) -> Self {
        self.build = config.with_bias(BIAS_DISABLED);
        self
    }

    /// Merge built sources, streaming merged rows into `sink`.
    ///
    /// Row labels come from the first source. Every source must have the
    /// same number of rows, and computed offsets must fit in an `i64`.
    pub fn merge<M, S>(&self, sources: &[Source<M>], mode: &OffsetMode, sink: &mut S) -> Result<MergeReport>
    where
        M: LabeledRows,
        S: RowSink,
    {
        let first = sources.first().ok_or(ArgumentError::NoSources)?;
        let offsets = match mode {
            OffsetMode::Compute => cumulative_offsets(sources.iter().map(|s| s.problem.feature_dim()))?,
            OffsetMode::Align(offsets) => {
                validate_offsets(offsets, sources.len())?;
                offsets.clone()
            }
        };

        let rows = first.problem.row_count();
        for source in &sources[1..] {
            let count = source.problem.row_count();
            if count != rows {
                return Err(SvmError::consistency(&first.name, rows, &source.name, count));
            }
        }
        debug!(sources = sources.len(), rows, ?offsets, "merging sources");

        let capacity: usize = sources
            .iter()
            .map(|s| (0..rows).map(|r| s.problem.row(r).len()).max().unwrap_or(0))
            .sum();
        let mut pairs: Vec<(i64, f64)> = Vec::with_capacity(capacity);
        let mut dropped = vec![0usize; sources.len()];

        for row in 0..rows {
            pairs.clear();
            let mut base = 0i64;
            for (i, source) in sources.iter().enumerate() {
                let nodes = source.problem.row(row);
                let limit = offsets[i] - base;
                let keep = nodes.partition_point(|node| node.index <= limit);
                pairs.extend(nodes[..keep].iter().map(|node| (base + node.index, node.value)));
                dropped[i] += nodes.len() - keep;
                base = offsets[i];
            }
            sink.write_row(first.problem.label(row), &pairs)?;
        }
        sink.finish()?;

        for ((source, &count), &boundary) in sources.iter().zip(&dropped).zip(&offsets) {
            if count > 0 {
                warn!(
                    source = %source.name,
                    dropped = count,
                    boundary,
                    "dropped features beyond source boundary"
                );
            }
        }

        Ok(MergeReport {
            sources: sources.iter().map(|s| s.name.clone()).collect(),
            offsets,
            rows,
            dropped,
        })
    }

    /// Build every source file in parallel.
    ///
    /// When several sources fail, the error of the earliest one in input
    /// order is returned.
    pub fn load_sources<P: AsRef<Path> + Sync>(&self, paths: &[P]) -> Result<Vec<Source>> {
        let builder = ProblemBuilder::new(self.build.clone().with_bias(BIAS_DISABLED));
        let results: Vec<Result<Source>> = paths
            .par_iter()
            .map(|path| {
                let path = path.as_ref();
                builder
                    .build_from_path(path)
                    .map(|problem| Source::new(path.display().to_string(), problem))
            })
            .collect();
        results.into_iter().collect()
    }

    /// Merge source files into `output`.
    ///
    /// The merge is written to a uniquely named temporary file in the
    /// output's directory that replaces `output` only on success. On failure
    /// the temporary file is removed and `output` is left untouched.
    /// `output` may be one of the inputs.
    pub fn merge_files<P, Q>(&self, inputs: &[P], output: Q, mode: &OffsetMode) -> Result<MergeReport>
    where
        P: AsRef<Path> + Sync,
        Q: AsRef<Path>,
    {
        if inputs.is_empty() {
            return Err(ArgumentError::NoSources.into());
        }
        if let OffsetMode::Align(offsets) = mode {
            validate_offsets(offsets, inputs.len())?;
        }

        let sources = self.load_sources(inputs)?;

        let output = output.as_ref();
        let out_name = output.display().to_string();
        let dir = output
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let result = NamedTempFile::new_in(dir)
            .map_err(|e| SvmError::open(&out_name, e))
            .and_then(|mut tmp| {
                debug!(path = %tmp.path().display(), "writing merge to temporary file");
                let report = self.merge_into(&sources, mode, &mut tmp, &out_name)?;
                tmp.persist(output)
                    .map_err(|e| SvmError::write(&out_name, e.error))?;
                Ok(report)
            });

        match result {
            Ok(report) => {
                info!(
                    output = %out_name,
                    rows = report.rows,
                    feature_dim = report.feature_dim(),
                    "merged sources"
                );
                Ok(report)
            }
            Err(err) => {
                warn!(output = %out_name, error = %err, "discarded partial merge output");
                Err(err)
            }
        }
    }

    fn merge_into<M: LabeledRows>(
        &self,
        sources: &[Source<M>],
        mode: &OffsetMode,
        tmp: &mut NamedTempFile,
        out_name: &str,
    ) -> Result<MergeReport> {
        let mut writer = WireWriter::named(BufWriter::new(tmp.as_file_mut()), out_name);
        self.merge(sources, mode, &mut writer)
    }
}
