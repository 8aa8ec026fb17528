//! Format constants for the sparse record wire format

/// Index carried by the node that terminates every row
pub const SENTINEL_INDEX: i64 = -1;

/// Bias value meaning "no bias feature"
pub const BIAS_DISABLED: f64 = -1.0;

/// Initial line buffer size in bytes
pub const DEFAULT_LINE_CAPACITY: usize = 1024;

/// Separator between a feature index and its value
pub const PAIR_SEPARATOR: char = ':';

/// Source name used when the caller does not supply one
pub const UNNAMED_SOURCE: &str = "<input>";
