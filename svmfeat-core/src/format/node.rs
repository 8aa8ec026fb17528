//! Feature node layout

use super::constants::SENTINEL_INDEX;

/// One `(index, value)` pair of a sparse row
///
/// Indices are 1-based. A node with index [`SENTINEL_INDEX`] terminates
/// a row inside the problem arena.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeatureNode {
    pub index: i64,
    pub value: f64,
}

impl FeatureNode {
    pub const fn new(index: i64, value: f64) -> Self {
        Self { index, value }
    }

    /// Row terminator
    pub const fn sentinel() -> Self {
        Self {
            index: SENTINEL_INDEX,
            value: 0.0,
        }
    }

    pub const fn is_sentinel(&self) -> bool {
        self.index == SENTINEL_INDEX
    }
}

impl From<(i64, f64)> for FeatureNode {
    fn from((index, value): (i64, f64)) -> Self {
        Self::new(index, value)
    }
}
