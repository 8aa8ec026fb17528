//! Abstract interfaces for sparse problem access
//!
//! Traits are pure interfaces; `Problem` implements the matrix traits and
//! the I/O crate implements sinks over writers.

pub mod matrix;
pub mod sink;

pub use matrix::{LabeledRows, SparseMatrix};
pub use sink::{MergedRow, RowSink};
