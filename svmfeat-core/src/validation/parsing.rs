//! Sparse record parsing
//!
//! Grammar per line: `label (WS+ index ':' value)* WS*`. Numeric tokens
//! must parse completely and indices must strictly increase within a
//! line. Parsing is allocation-free: pairs are produced lazily from the
//! borrowed line.

use crate::error::RecordError;
use crate::format::constants::PAIR_SEPARATOR;
use crate::format::FeatureNode;
use core::iter::FusedIterator;

/// Parse the label of a line and return an iterator over its pairs
pub fn parse_record(line: &str) -> Result<(f64, Pairs<'_>), RecordError> {
    let mut tokens = Tokens { rest: line };
    let label = tokens.next().ok_or(RecordError::EmptyLine)?;
    let label = label.parse::<f64>().map_err(|_| RecordError::InvalidLabel)?;

    Ok((
        label,
        Pairs {
            tokens,
            prev: 0,
            failed: false,
        },
    ))
}

/// Same as [`parse_record`] for raw line bytes
pub fn parse_record_bytes(line: &[u8]) -> Result<(f64, Pairs<'_>), RecordError> {
    let line = core::str::from_utf8(line).map_err(|_| RecordError::InvalidEncoding)?;
    parse_record(line)
}

/// Parse a whole line into an owned row
pub fn collect_record(line: &str) -> Result<(f64, Vec<FeatureNode>), RecordError> {
    let (label, pairs) = parse_record(line)?;
    let nodes = pairs.collect::<Result<Vec<_>, _>>()?;
    Ok((label, nodes))
}

/// Parse one `index:value` token whose index must exceed `prev`
pub fn parse_feature(token: &str, prev: i64) -> Result<FeatureNode, RecordError> {
    let (index, value) = token
        .split_once(PAIR_SEPARATOR)
        .ok_or(RecordError::MissingSeparator)?;

    let index = index.parse::<i64>().map_err(|_| RecordError::InvalidIndex)?;
    if index <= prev {
        return Err(RecordError::NonIncreasingIndex);
    }

    let value = value.parse::<f64>().map_err(|_| RecordError::InvalidValue)?;

    Ok(FeatureNode::new(index, value))
}

/// Lazily validated pairs of one record
///
/// Yields `Err` once on the first invalid token and then stops.
#[derive(Debug, Clone)]
pub struct Pairs<'a> {
    tokens: Tokens<'a>,
    prev: i64,
    failed: bool,
}

impl<'a> Iterator for Pairs<'a> {
    type Item = Result<FeatureNode, RecordError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let token = self.tokens.next()?;
        let parsed = parse_feature(token, self.prev);
        match &parsed {
            Ok(node) => self.prev = node.index,
            Err(_) => self.failed = true,
        }
        Some(parsed)
    }
}

impl<'a> FusedIterator for Pairs<'a> {}

/// ASCII whitespace, vertical tab included
fn is_separator(c: char) -> bool {
    c.is_ascii_whitespace() || c == '\x0b'
}

/// Non-empty tokens between separators
#[derive(Debug, Clone)]
struct Tokens<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let start = self.rest.trim_start_matches(is_separator);
        if start.is_empty() {
            self.rest = start;
            return None;
        }
        let end = start.find(is_separator).unwrap_or(start.len());
        let (token, rest) = start.split_at(end);
        self.rest = rest;
        Some(token)
    }
}
