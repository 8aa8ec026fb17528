//! LIBSVM-format text output
//!
//! Labels and values are written with the shortest representation that
//! parses back to the same `f64`, so a write/read cycle is lossless.

use std::fmt;
use std::io::Write;

use svmfeat_core::{FeatureNode, Problem, Result, RowSink, SvmError};

/// Source name reported for writers created without one
const UNNAMED_SINK: &str = "<output>";

/// Float formatting for the wire format
///
/// Plain decimal for ordinary magnitudes, exponent notation for very
/// large or very small ones to keep lines short.
struct WireFloat(f64);

impl fmt::Display for WireFloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let abs = self.0.abs();
        if abs >= 1e16 || (abs > 0.0 && abs < 1e-5) {
            write!(f, "{:e}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Writes rows as `label index:value ...` lines
#[derive(Debug)]
pub struct WireWriter<W: Write> {
    inner: W,
    name: String,
    rows_written: usize,
}

impl<W: Write> WireWriter<W> {
    pub fn new(inner: W) -> Self {
        Self::named(inner, UNNAMED_SINK)
    }

    /// Create a writer whose errors name `name`
    pub fn named(inner: W, name: impl Into<String>) -> Self {
        Self {
            inner,
            name: name.into(),
            rows_written: 0,
        }
    }

    /// Write one row of nodes
    pub fn write_record(&mut self, label: f64, nodes: &[FeatureNode]) -> Result<()> {
        self.write_line(label, nodes.iter().map(|node| (node.index, node.value)))
    }

    /// Write every row of a problem.
    ///
    /// Bias nodes are left out, so reading the output back with the same
    /// bias setting reproduces the problem.
    pub fn write_problem(&mut self, problem: &Problem) -> Result<()> {
        let bias_nodes = usize::from(problem.has_bias());
        for (label, nodes) in problem.rows() {
            self.write_record(label, &nodes[..nodes.len() - bias_nodes])?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush().map_err(|e| SvmError::write(&self.name, e))
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Flush and return the inner writer
    pub fn into_inner(mut self) -> Result<W> {
        self.flush()?;
        Ok(self.inner)
    }

    fn write_line<I>(&mut self, label: f64, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (i64, f64)>,
    {
        let name = &self.name;
        let fail = |e: std::io::Error| SvmError::write(name, e);

        write!(self.inner, "{}", WireFloat(label)).map_err(fail)?;
        for (index, value) in pairs {
            write!(self.inner, " {}:{}", index, WireFloat(value)).map_err(fail)?;
        }
        self.inner.write_all(b"\n").map_err(fail)?;

        self.rows_written += 1;
        Ok(())
    }
}

impl<W: Write> RowSink for WireWriter<W> {
    fn write_row(&mut self, label: f64, pairs: &[(i64, f64)]) -> Result<()> {
        self.write_line(label, pairs.iter().copied())
    }

    fn finish(&mut self) -> Result<()> {
        self.flush()
    }
}
