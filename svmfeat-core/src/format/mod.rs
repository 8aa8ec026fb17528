//! Sparse problem definitions for the LIBSVM wire format
//!
//! This module contains the in-memory representation of parsed data.
//! No I/O operations - only data layout and invariants.

pub mod constants;
pub mod node;
pub mod problem;

pub use node::FeatureNode;
pub use problem::{Problem, ProblemAssembler};
