//! Build configuration
//!
//! Controls how a [`crate::ProblemBuilder`] reads its sources.

use svmfeat_core::format::constants::{BIAS_DISABLED, DEFAULT_LINE_CAPACITY};

/// Configuration for two-pass problem construction
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuildConfig {
    /// Bias value appended to every row; negative disables it
    pub bias: f64,
    /// Initial line buffer size in bytes
    pub initial_line_capacity: usize,
    /// Memory-map non-empty input files instead of buffered reads
    pub use_mmap: bool,
}

impl BuildConfig {
    /// Create config with a bias term
    pub fn with_bias(mut self, bias: f64) -> Self {
        self.bias = bias;
        self
    }

    /// Set the initial line buffer size (at least one byte)
    pub fn with_initial_line_capacity(mut self, capacity: usize) -> Self {
        self.initial_line_capacity = capacity.max(1);
        self
    }

    /// Enable or disable memory mapping of input files
    pub fn with_mmap(mut self, enabled: bool) -> Self {
        self.use_mmap = enabled;
        self
    }

    pub fn bias_enabled(&self) -> bool {
        self.bias >= 0.0
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            bias: BIAS_DISABLED,
            initial_line_capacity: DEFAULT_LINE_CAPACITY,
            use_mmap: cfg!(feature = "mmap"),
        }
    }
}
