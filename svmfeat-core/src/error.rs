//! Error types for svmfeat operations

use thiserror::Error;

/// Reason a single line failed record validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordError {
    /// Line holds no label token
    EmptyLine,
    /// Label is not a complete floating-point literal
    InvalidLabel,
    /// Feature token has no `:` between index and value
    MissingSeparator,
    /// Feature index is not a complete integer
    InvalidIndex,
    /// Feature index is not greater than the previous one on the line
    NonIncreasingIndex,
    /// Feature value is not a complete floating-point literal
    InvalidValue,
    /// Line is not valid UTF-8
    InvalidEncoding,
    /// Record layout differs from what the counting pass observed
    CountMismatch,
}

impl core::fmt::Display for RecordError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            RecordError::EmptyLine => "empty line",
            RecordError::InvalidLabel => "invalid label",
            RecordError::MissingSeparator => "missing ':' in feature",
            RecordError::InvalidIndex => "invalid feature index",
            RecordError::NonIncreasingIndex => "feature indices must be strictly increasing",
            RecordError::InvalidValue => "invalid feature value",
            RecordError::InvalidEncoding => "line is not valid UTF-8",
            RecordError::CountMismatch => "source changed between counting and filling",
        };
        write!(f, "{msg}")
    }
}

/// I/O step that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoReason {
    Open,
    Read,
    Write,
    Allocate,
}

impl core::fmt::Display for IoReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            IoReason::Open => "open",
            IoReason::Read => "read",
            IoReason::Write => "write",
            IoReason::Allocate => "allocate memory for",
        };
        write!(f, "{msg}")
    }
}

/// Invalid caller-supplied arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentError {
    /// A merge was requested with zero sources
    NoSources,
    /// Alignment offsets do not match the number of sources
    OffsetCount { expected: usize, actual: usize },
    /// Alignment offsets are negative or decreasing
    InvalidOffsets,
    /// idf stage enabled without a weight vector
    MissingIdfWeights,
    /// A bias index, feature dimension or merge boundary exceeds `i64`
    IndexOverflow,
}

impl core::fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ArgumentError::NoSources => write!(f, "at least one source must be given to merge"),
            ArgumentError::OffsetCount { expected, actual } => {
                write!(f, "expected {expected} offsets (one per source), got {actual}")
            }
            ArgumentError::InvalidOffsets => {
                write!(f, "offsets must be non-negative and non-decreasing")
            }
            ArgumentError::MissingIdfWeights => {
                write!(f, "idf normalization requested without idf weights")
            }
            ArgumentError::IndexOverflow => {
                write!(f, "feature indices exceed the 64-bit index range")
            }
        }
    }
}

/// Errors that can occur while building, normalizing or merging problems
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SvmError {
    /// A line violated the sparse record grammar
    #[error("input format error at line {line} in {source_name}: {kind}")]
    Format {
        source_name: String,
        line: u64,
        kind: RecordError,
    },

    /// A source or sink could not be opened, read, written or allocated
    #[error("cannot {reason} {source_name}: {detail}")]
    Io {
        source_name: String,
        reason: IoReason,
        detail: String,
    },

    /// Merge sources disagree on the number of rows
    #[error("#insts in {source_b} = {count_b}, but #insts in {source_a} = {count_a}")]
    Consistency {
        source_a: String,
        count_a: usize,
        source_b: String,
        count_b: usize,
    },

    /// Invalid arguments
    #[error("invalid argument: {0}")]
    Argument(ArgumentError),
}

impl SvmError {
    /// Creates a format error for a 1-based line number.
    #[must_use]
    pub fn format(source_name: impl Into<String>, line: u64, kind: RecordError) -> Self {
        Self::Format {
            source_name: source_name.into(),
            line,
            kind,
        }
    }

    #[must_use]
    pub fn open(source_name: impl Into<String>, detail: impl core::fmt::Display) -> Self {
        Self::io(source_name, IoReason::Open, detail)
    }

    #[must_use]
    pub fn read(source_name: impl Into<String>, detail: impl core::fmt::Display) -> Self {
        Self::io(source_name, IoReason::Read, detail)
    }

    #[must_use]
    pub fn write(source_name: impl Into<String>, detail: impl core::fmt::Display) -> Self {
        Self::io(source_name, IoReason::Write, detail)
    }

    #[must_use]
    pub fn allocate(source_name: impl Into<String>, detail: impl core::fmt::Display) -> Self {
        Self::io(source_name, IoReason::Allocate, detail)
    }

    fn io(source_name: impl Into<String>, reason: IoReason, detail: impl core::fmt::Display) -> Self {
        Self::Io {
            source_name: source_name.into(),
            reason,
            detail: detail.to_string(),
        }
    }

    /// Creates a row-count mismatch error between two merge sources.
    #[must_use]
    pub fn consistency(
        source_a: impl Into<String>,
        count_a: usize,
        source_b: impl Into<String>,
        count_b: usize,
    ) -> Self {
        Self::Consistency {
            source_a: source_a.into(),
            count_a,
            source_b: source_b.into(),
            count_b,
        }
    }

    /// Numeric status code for file-level operations.
    ///
    /// Positive values are the offending 1-based line number, `-1` is an
    /// open/read/write failure, `-2` memory exhaustion, `-3` a row-count
    /// mismatch between merge sources and `-4` an argument error.
    pub fn code(&self) -> i64 {
        match self {
            SvmError::Format { line, .. } => i64::try_from(*line).unwrap_or(i64::MAX),
            SvmError::Io {
                reason: IoReason::Allocate,
                ..
            } => -2,
            SvmError::Io { .. } => -1,
            SvmError::Consistency { .. } => -3,
            SvmError::Argument(_) => -4,
        }
    }
}

impl From<ArgumentError> for SvmError {
    fn from(err: ArgumentError) -> Self {
        SvmError::Argument(err)
    }
}

/// Result type for svmfeat operations
pub type Result<T> = core::result::Result<T, SvmError>;
