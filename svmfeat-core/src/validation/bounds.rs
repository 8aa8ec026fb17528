//! Arena sizing and feature-space boundary arithmetic
//!
//! Pure functions with overflow protection; no I/O.

use crate::error::ArgumentError;

/// Number of arena nodes needed for a problem
///
/// Every row carries one sentinel, plus one bias node when bias is
/// enabled. Returns `None` if the total does not fit in `usize`.
pub const fn arena_capacity(element_count: usize, row_count: usize, bias_enabled: bool) -> Option<usize> {
    let with_sentinels = match element_count.checked_add(row_count) {
        Some(n) => n,
        None => return None,
    };
    if bias_enabled {
        with_sentinels.checked_add(row_count)
    } else {
        Some(with_sentinels)
    }
}

/// Feature dimension given the largest parsed index
///
/// The bias feature, when enabled, takes the next index after the data.
/// Returns `None` if that index does not fit in `i64`.
pub const fn feature_dimension(max_index: i64, bias_enabled: bool) -> Option<i64> {
    if bias_enabled {
        max_index.checked_add(1)
    } else {
        Some(max_index)
    }
}

/// Cumulative upper boundaries of each source in a merged feature space
///
/// `offsets[i] = offsets[i - 1] + dims[i]`, starting from zero.
pub fn cumulative_offsets<I: IntoIterator<Item = i64>>(dims: I) -> Result<Vec<i64>, ArgumentError> {
    let mut acc = 0i64;
    dims.into_iter()
        .map(|dim| {
            acc = acc.checked_add(dim).ok_or(ArgumentError::IndexOverflow)?;
            Ok(acc)
        })
        .collect()
}

/// Validate caller-supplied offsets for `source_count` sources
pub fn validate_offsets(offsets: &[i64], source_count: usize) -> Result<(), ArgumentError> {
    if offsets.len() != source_count {
        return Err(ArgumentError::OffsetCount {
            expected: source_count,
            actual: offsets.len(),
        });
    }

    let mut prev = 0i64;
    for &offset in offsets {
        if offset < prev {
            return Err(ArgumentError::InvalidOffsets);
        }
        prev = offset;
    }

    Ok(())
}
