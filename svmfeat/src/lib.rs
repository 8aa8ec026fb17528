//! svmfeat - Sparse Feature Loading and Merging
//!
//! This library reads LIBSVM-format sparse data into exact-size in-memory
//! problems, normalizes their values, and merges several feature sources
//! into one wide feature space.
//!
//! ## Architecture
//!
//! svmfeat follows a definitions/implementation separation:
//!
//! - **svmfeat-core**: Problem layout, record grammar, normalization and errors (no I/O)
//! - **svmfeat**: Line reading, two-pass building, writing and file-level merging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use svmfeat::{compute_idf, normalize, BuildConfig, NormalizeConfig, ProblemBuilder};
//!
//! fn example() -> svmfeat::Result<()> {
//!     let builder = ProblemBuilder::new(BuildConfig::default().with_bias(1.0));
//!     let mut problem = builder.build_from_path("train.svm")?;
//!
//!     let weights = compute_idf(&problem);
//!     normalize(&mut problem, &NormalizeConfig::tf_idf(), Some(weights.as_slice()))?;
//!
//!     println!("{} rows, {} features", problem.row_count(), problem.feature_dim());
//!     Ok(())
//! }
//! ```
//!
//! Merging sources produced by different feature extractors:
//!
//! ```rust,no_run
//! use svmfeat::{OffsetMode, ProblemMerger};
//!
//! fn example() -> svmfeat::Result<()> {
//!     let merger = ProblemMerger::new();
//!     let report = merger.merge_files(&["words.svm", "chars.svm"], "merged.svm", &OffsetMode::Compute)?;
//!
//!     // Test data must reuse the training boundaries
//!     let aligned = OffsetMode::Align(report.offsets.clone());
//!     merger.merge_files(&["words.t", "chars.t"], "merged.t", &aligned)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **mmap** (default): Memory-map input files during builds
//! - **serde** (default): Serializable configs and the persisted [`FeatureSpace`]
//! - **cli**: Dependencies of the `merge_sources` example

// Re-export core abstractions and definitions
pub use svmfeat_core::{
    // Problem layout
    FeatureNode, Problem, ProblemAssembler,
    // Traits
    LabeledRows, MergedRow, RowSink, SparseMatrix,
    // Normalization
    compute_idf, normalize, normalize_row, NormalizeConfig,
    // Error handling
    ArgumentError, IoReason, RecordError, Result, SvmError,
};

// Implementation modules
pub mod builder;
pub mod config;
#[cfg(feature = "serde")]
pub mod feature_space;
pub mod line_reader;
pub mod merger;
pub mod writer;

// Public exports
pub use builder::ProblemBuilder;
pub use config::BuildConfig;
#[cfg(feature = "serde")]
pub use feature_space::FeatureSpace;
pub use line_reader::LineReader;
pub use merger::{MergeReport, OffsetMode, ProblemMerger, Source};
pub use writer::WireWriter;
