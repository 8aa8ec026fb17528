//! TF-IDF style value normalization
//!
//! Stages run per row in a fixed order, each consuming the previous
//! stage's output: binary, term frequency, idf, L2 norm. Only values
//! change; indices and row layout are untouched.

use crate::error::{ArgumentError, Result};
use crate::format::{FeatureNode, Problem};

/// Which normalization stages to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NormalizeConfig {
    /// Replace every nonzero value with 1
    pub binary: bool,
    /// Divide by the row's value sum
    pub tf: bool,
    /// Multiply by per-feature idf weights
    pub idf: bool,
    /// Divide by the row's Euclidean norm
    pub l2norm: bool,
}

impl Default for NormalizeConfig {
    /// Binary features with unit-length rows
    fn default() -> Self {
        Self {
            binary: true,
            tf: false,
            idf: false,
            l2norm: true,
        }
    }
}

impl NormalizeConfig {
    /// All stages disabled
    pub const fn none() -> Self {
        Self {
            binary: false,
            tf: false,
            idf: false,
            l2norm: false,
        }
    }

    /// Term frequency times idf, no binarization or length normalization
    pub const fn tf_idf() -> Self {
        Self {
            binary: false,
            tf: true,
            idf: true,
            l2norm: false,
        }
    }

    pub fn with_binary(mut self, enabled: bool) -> Self {
        self.binary = enabled;
        self
    }

    pub fn with_tf(mut self, enabled: bool) -> Self {
        self.tf = enabled;
        self
    }

    pub fn with_idf(mut self, enabled: bool) -> Self {
        self.idf = enabled;
        self
    }

    pub fn with_l2norm(mut self, enabled: bool) -> Self {
        self.l2norm = enabled;
        self
    }

    /// True when no stage is enabled
    pub fn is_identity(&self) -> bool {
        !(self.binary || self.tf || self.idf || self.l2norm)
    }
}

/// Compute idf weights over a problem.
///
/// `weights[j - 1] = ln(rows / df[j])` where `df[j]` counts rows holding a
/// nonzero value at feature `j`; features never seen get weight 0. The
/// vector has `feature_dim` entries. Compute this before normalizing the
/// rows it will be applied to.
pub fn compute_idf(problem: &Problem) -> Vec<f64> {
    let dim = usize::try_from(problem.feature_dim()).unwrap_or(0);
    let mut weights = vec![0.0f64; dim];

    for (_, nodes) in problem.rows() {
        for node in nodes {
            if node.value != 0.0 {
                if let Some(df) = weights.get_mut(slot(node.index)) {
                    *df += 1.0;
                }
            }
        }
    }

    let rows = problem.row_count() as f64;
    for weight in &mut weights {
        *weight = if *weight > 0.0 {
            (rows / *weight).ln()
        } else {
            0.0
        };
    }

    weights
}

/// Normalize every row of a problem in place.
///
/// `weights` is required when the idf stage is enabled.
pub fn normalize(problem: &mut Problem, config: &NormalizeConfig, weights: Option<&[f64]>) -> Result<()> {
    if config.idf && weights.is_none() {
        return Err(ArgumentError::MissingIdfWeights.into());
    }
    if config.is_identity() {
        return Ok(());
    }

    for row in 0..problem.row_count() {
        apply_stages(problem.row_mut(row), config, weights);
    }
    Ok(())
}

/// Normalize a single row in place, e.g. a row about to be predicted.
///
/// Features beyond the end of `weights` keep their value in the idf stage;
/// they were not seen when the weights were computed.
pub fn normalize_row(row: &mut [FeatureNode], config: &NormalizeConfig, weights: Option<&[f64]>) -> Result<()> {
    if config.idf && weights.is_none() {
        return Err(ArgumentError::MissingIdfWeights.into());
    }
    apply_stages(row, config, weights);
    Ok(())
}

fn apply_stages(row: &mut [FeatureNode], config: &NormalizeConfig, weights: Option<&[f64]>) {
    if config.binary {
        for node in row.iter_mut() {
            if node.value != 0.0 {
                node.value = 1.0;
            }
        }
    }

    if config.tf {
        let sum: f64 = row.iter().map(|node| node.value).sum();
        scale(row, sum);
    }

    if let (true, Some(weights)) = (config.idf, weights) {
        for node in row.iter_mut() {
            if let Some(weight) = weights.get(slot(node.index)) {
                node.value *= weight;
            }
        }
    }

    if config.l2norm {
        let norm = row.iter().map(|node| node.value * node.value).sum::<f64>().sqrt();
        scale(row, norm);
    }
}

/// Divide all values by `divisor` unless it is zero
fn scale(row: &mut [FeatureNode], divisor: f64) {
    if divisor != 0.0 {
        for node in row.iter_mut() {
            node.value /= divisor;
        }
    }
}

/// Weight slot of a 1-based index; out-of-range for non-positive indices
fn slot(index: i64) -> usize {
    usize::try_from(index - 1).unwrap_or(usize::MAX)
}
