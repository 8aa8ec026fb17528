//! Two-pass problem construction
//!
//! The first pass validates every record and tallies rows, pairs and the
//! largest index. The second pass rewinds the source and fills an arena
//! reserved at its exact final size.

use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use svmfeat_core::format::constants::UNNAMED_SOURCE;
use svmfeat_core::validation::parse_record_bytes;
use svmfeat_core::{Problem, ProblemAssembler, RecordError, Result, SvmError};
use tracing::{debug, info};

use crate::config::BuildConfig;
use crate::line_reader::LineReader;

/// Totals gathered by the counting pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Tally {
    rows: usize,
    elements: usize,
    max_index: i64,
}

/// Builds [`Problem`]s from LIBSVM-format text
#[derive(Debug, Clone, Default)]
pub struct ProblemBuilder {
    config: BuildConfig,
}

impl ProblemBuilder {
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Build from a re-readable stream
    pub fn build<R: Read + Seek>(&self, reader: R) -> Result<Problem> {
        self.build_named(reader, UNNAMED_SOURCE)
    }

    /// Build from a re-readable stream, naming it in any error
    pub fn build_named<R: Read + Seek>(&self, reader: R, source_name: &str) -> Result<Problem> {
        let mut lines = LineReader::with_capacity(self.config.initial_line_capacity, reader);

        let tally = count_pass(&mut lines, source_name, self.config.bias_enabled())?;
        debug!(
            source = source_name,
            rows = tally.rows,
            elements = tally.elements,
            max_index = tally.max_index,
            "count pass complete"
        );

        lines.rewind().map_err(|e| SvmError::read(source_name, e))?;
        let problem = self.fill_pass(&mut lines, source_name, tally)?;

        info!(
            source = source_name,
            rows = problem.row_count(),
            feature_dim = problem.feature_dim(),
            bias = problem.bias(),
            "built problem"
        );
        Ok(problem)
    }

    /// Open and build from a file.
    ///
    /// Non-empty files are memory-mapped when enabled in the config.
    pub fn build_from_path<P: AsRef<Path>>(&self, path: P) -> Result<Problem> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let file = File::open(path).map_err(|e| SvmError::open(&name, e))?;

        if self.config.use_mmap {
            if let Some(problem) = self.build_mapped(&file, &name)? {
                return Ok(problem);
            }
        }
        self.build_named(file, &name)
    }

    #[cfg(feature = "mmap")]
    fn build_mapped(&self, file: &File, name: &str) -> Result<Option<Problem>> {
        let len = file.metadata().map_err(|e| SvmError::read(name, e))?.len();
        if len == 0 {
            return Ok(None);
        }

        // SAFETY: Read-only mapping; the file is not written through this
        // process while the map is alive
        let mmap = unsafe { memmap2::Mmap::map(file) }.map_err(|e| SvmError::read(name, e))?;
        debug!(source = name, bytes = len, "memory-mapped source");
        self.build_named(std::io::Cursor::new(mmap), name).map(Some)
    }

    #[cfg(not(feature = "mmap"))]
    fn build_mapped(&self, _file: &File, _name: &str) -> Result<Option<Problem>> {
        Ok(None)
    }

    fn fill_pass<R: Read>(&self, lines: &mut LineReader<R>, source_name: &str, tally: Tally) -> Result<Problem> {
        let mut assembler = ProblemAssembler::with_capacity(
            source_name,
            tally.rows,
            tally.elements,
            self.config.bias,
            tally.max_index,
        )?;
        debug!(
            source = source_name,
            bias_enabled = self.config.bias_enabled(),
            "arena reserved"
        );

        let mut line_no = 0u64;
        while let Some(line) = lines.next_line().map_err(|e| SvmError::read(source_name, e))? {
            line_no += 1;
            let fail = |kind| SvmError::format(source_name, line_no, kind);

            let (label, pairs) = parse_record_bytes(line).map_err(fail)?;
            assembler.begin_row(label).map_err(fail)?;
            for node in pairs {
                assembler.push(node.map_err(fail)?).map_err(fail)?;
            }
            assembler.end_row().map_err(fail)?;
        }

        assembler
            .finish()
            .map_err(|kind| SvmError::format(source_name, line_no + 1, kind))
    }
}

/// Tally the source, rejecting an index that leaves no room for the bias
/// node when bias is enabled
fn count_pass<R: Read>(lines: &mut LineReader<R>, source_name: &str, bias_enabled: bool) -> Result<Tally> {
    let mut tally = Tally::default();
    let mut line_no = 0u64;

    while let Some(line) = lines.next_line().map_err(|e| SvmError::read(source_name, e))? {
        line_no += 1;
        let fail = |kind| SvmError::format(source_name, line_no, kind);

        let (_, pairs) = parse_record_bytes(line).map_err(fail)?;
        for node in pairs {
            let node = node.map_err(fail)?;
            if bias_enabled && node.index == i64::MAX {
                return Err(fail(RecordError::InvalidIndex));
            }
            tally.elements += 1;
            tally.max_index = tally.max_index.max(node.index);
        }
        tally.rows += 1;
    }

    Ok(tally)
}
