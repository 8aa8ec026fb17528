//! svmfeat Core - Sparse Problem Definitions
//!
//! This crate provides the in-memory sparse problem layout, the record
//! grammar of the LIBSVM text format and value normalization. It performs
//! no I/O; reading, writing and merging files lives in the `svmfeat` crate.

pub mod error;
pub mod format;
pub mod normalize;
pub mod traits;
pub mod validation;

pub use error::*;
pub use format::*;
pub use normalize::{compute_idf, normalize, normalize_row, NormalizeConfig};
pub use traits::*;
