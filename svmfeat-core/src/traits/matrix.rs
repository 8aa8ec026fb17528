//! Core matrix abstraction traits
//!
//! Feature indices are 1-based throughout, matching the wire format.

use crate::format::FeatureNode;

/// Core sparse matrix trait for format-agnostic access
pub trait SparseMatrix {
    /// Get the value stored at a 1-based feature index
    ///
    /// Returns `None` if the element is zero (not stored) or if the
    /// row is out of bounds.
    fn get_element(&self, row: usize, index: i64) -> Option<f64>;

    /// Get dimensions as (rows, feature dimension)
    fn dimensions(&self) -> (usize, i64);

    /// Get number of stored nodes, sentinels excluded
    fn nnz(&self) -> usize;
}

/// Row-oriented access to a labeled sparse matrix
///
/// This is what the merger consumes: a label and an ordered node slice
/// per row, with strictly increasing indices.
pub trait LabeledRows: SparseMatrix {
    /// Label of a row
    fn label(&self, row: usize) -> f64;

    /// Real nodes of a row, sentinel excluded
    fn row(&self, row: usize) -> &[FeatureNode];

    /// Number of rows
    fn row_count(&self) -> usize {
        self.dimensions().0
    }

    /// Feature dimension
    fn feature_dim(&self) -> i64 {
        self.dimensions().1
    }
}
