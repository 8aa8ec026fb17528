//! Record and layout validation
//!
//! This module contains pure validation functions with no I/O dependencies:
//! line grammar checks and arena / feature-space arithmetic.

pub mod bounds;
pub mod parsing;

pub use bounds::{arena_capacity, cumulative_offsets, feature_dimension, validate_offsets};
pub use parsing::{collect_record, parse_feature, parse_record, parse_record_bytes, Pairs};
