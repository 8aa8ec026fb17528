//! In-memory sparse problem backed by one exact-size node arena
//!
//! Every row is an `(offset, len)` span into the arena. A row's real nodes
//! (bias included) are followed by a sentinel node, so the arena holds
//! exactly `elements + rows (+ rows when bias is enabled)` nodes.

use super::node::FeatureNode;
use crate::error::{ArgumentError, RecordError, Result, SvmError};
use crate::traits::{LabeledRows, SparseMatrix};
use crate::validation::bounds::{arena_capacity, feature_dimension};

/// Source name reported for problems assembled in memory
const IN_MEMORY_SOURCE: &str = "<rows>";

/// Location of one row inside the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RowSpan {
    /// Arena position of the row's first node
    offset: usize,
    /// Number of real nodes, bias included, sentinel excluded
    len: usize,
}

/// A complete sparse matrix with one label per row
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    feature_dim: i64,
    bias: f64,
    labels: Vec<f64>,
    rows: Vec<RowSpan>,
    arena: Vec<FeatureNode>,
}

impl Problem {
    /// Build a problem from in-memory rows of `(index, value)` pairs.
    ///
    /// Rows follow the same rules as parsed records: indices must be
    /// positive and strictly increasing, and leave room for the bias index
    /// when bias is enabled. A violation is reported as a format error on
    /// the 1-based row number.
    pub fn from_rows<R: AsRef<[(i64, f64)]>>(rows: &[(f64, R)], bias: f64) -> Result<Self> {
        let mut elements = 0usize;
        let mut max_index = 0i64;
        for (row, (_, pairs)) in rows.iter().enumerate() {
            let line = row as u64 + 1;
            let mut prev = 0i64;
            for &(index, _) in pairs.as_ref() {
                if index <= prev {
                    return Err(SvmError::format(IN_MEMORY_SOURCE, line, RecordError::NonIncreasingIndex));
                }
                if bias >= 0.0 && index == i64::MAX {
                    return Err(SvmError::format(IN_MEMORY_SOURCE, line, RecordError::InvalidIndex));
                }
                prev = index;
            }
            elements += pairs.as_ref().len();
            max_index = max_index.max(prev);
        }

        let mut assembler =
            ProblemAssembler::with_capacity(IN_MEMORY_SOURCE, rows.len(), elements, bias, max_index)?;
        for (row, (label, pairs)) in rows.iter().enumerate() {
            let line = row as u64 + 1;
            let fail = |kind: RecordError| SvmError::format(IN_MEMORY_SOURCE, line, kind);
            assembler.begin_row(*label).map_err(fail)?;
            for &(index, value) in pairs.as_ref() {
                assembler.push(FeatureNode::new(index, value)).map_err(fail)?;
            }
            assembler.end_row().map_err(fail)?;
        }
        assembler
            .finish()
            .map_err(|kind| SvmError::format(IN_MEMORY_SOURCE, rows.len() as u64, kind))
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of addressable feature indices, bias column included
    pub fn feature_dim(&self) -> i64 {
        self.feature_dim
    }

    /// Bias value; negative when no bias feature is present
    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn has_bias(&self) -> bool {
        self.bias >= 0.0
    }

    pub fn labels(&self) -> &[f64] {
        &self.labels
    }

    pub fn label(&self, row: usize) -> f64 {
        self.labels[row]
    }

    /// Real nodes of a row, bias included, sentinel excluded
    pub fn row(&self, row: usize) -> &[FeatureNode] {
        let span = self.rows[row];
        &self.arena[span.offset..span.offset + span.len]
    }

    /// Nodes of a row including the terminating sentinel
    pub fn row_with_sentinel(&self, row: usize) -> &[FeatureNode] {
        let span = self.rows[row];
        &self.arena[span.offset..=span.offset + span.len]
    }

    pub(crate) fn row_mut(&mut self, row: usize) -> &mut [FeatureNode] {
        let span = self.rows[row];
        &mut self.arena[span.offset..span.offset + span.len]
    }

    /// Iterate rows as `(label, nodes)`
    pub fn rows(&self) -> impl ExactSizeIterator<Item = (f64, &[FeatureNode])> + '_ {
        (0..self.row_count()).map(move |row| (self.labels[row], self.row(row)))
    }

    /// The whole arena, sentinels included
    pub fn arena(&self) -> &[FeatureNode] {
        &self.arena
    }

    /// Number of parsed `(index, value)` pairs, excluding bias nodes
    pub fn element_count(&self) -> usize {
        let bias_nodes = if self.has_bias() { self.row_count() } else { 0 };
        self.arena.len() - self.row_count() - bias_nodes
    }

    /// Change the bias value.
    ///
    /// Updating an enabled bias rewrites the bias nodes in place. Enabling
    /// or disabling it rebuilds the arena at its new exact size and moves
    /// the feature dimension by one. Enabling fails if the largest index
    /// leaves no room for the bias index.
    pub fn set_bias(&mut self, bias: f64) -> Result<()> {
        match (self.has_bias(), bias >= 0.0) {
            (true, true) => {
                for span in &self.rows {
                    self.arena[span.offset + span.len - 1].value = bias;
                }
                self.bias = bias;
                Ok(())
            }
            (false, false) => {
                self.bias = bias;
                Ok(())
            }
            (had_bias, _) => self.rebuild_with_bias(had_bias, bias),
        }
    }

    fn rebuild_with_bias(&mut self, had_bias: bool, bias: f64) -> Result<()> {
        let enable = !had_bias;
        let feature_dim = if enable {
            self.feature_dim
                .checked_add(1)
                .ok_or(ArgumentError::IndexOverflow)?
        } else {
            self.feature_dim - 1
        };
        let capacity = arena_capacity(self.element_count(), self.row_count(), enable)
            .ok_or_else(|| SvmError::allocate(IN_MEMORY_SOURCE, "arena size overflows usize"))?;

        let mut arena = Vec::new();
        arena
            .try_reserve_exact(capacity)
            .map_err(|e| SvmError::allocate(IN_MEMORY_SOURCE, e))?;
        let mut rows = Vec::new();
        rows.try_reserve_exact(self.row_count())
            .map_err(|e| SvmError::allocate(IN_MEMORY_SOURCE, e))?;

        for span in &self.rows {
            let real = if had_bias { span.len - 1 } else { span.len };
            let offset = arena.len();
            arena.extend_from_slice(&self.arena[span.offset..span.offset + real]);
            if enable {
                arena.push(FeatureNode::new(feature_dim, bias));
            }
            rows.push(RowSpan {
                offset,
                len: arena.len() - offset,
            });
            arena.push(FeatureNode::sentinel());
        }

        self.arena = arena;
        self.rows = rows;
        self.feature_dim = feature_dim;
        self.bias = bias;
        Ok(())
    }
}

impl SparseMatrix for Problem {
    fn get_element(&self, row: usize, index: i64) -> Option<f64> {
        if row >= self.row_count() {
            return None;
        }
        let nodes = self.row(row);
        nodes
            .binary_search_by_key(&index, |node| node.index)
            .ok()
            .map(|pos| nodes[pos].value)
    }

    fn dimensions(&self) -> (usize, i64) {
        (self.row_count(), self.feature_dim)
    }

    fn nnz(&self) -> usize {
        self.arena.len() - self.row_count()
    }
}

impl LabeledRows for Problem {
    fn label(&self, row: usize) -> f64 {
        Problem::label(self, row)
    }

    fn row(&self, row: usize) -> &[FeatureNode] {
        Problem::row(self, row)
    }
}

/// Fills a [`Problem`] arena exactly once from pre-counted totals
///
/// Capacity is reserved up front from the counting pass; any attempt to
/// write more rows or pairs than were counted is rejected rather than
/// reallocating.
#[derive(Debug)]
pub struct ProblemAssembler {
    labels: Vec<f64>,
    rows: Vec<RowSpan>,
    arena: Vec<FeatureNode>,
    bias: f64,
    max_index: i64,
    feature_dim: i64,
    planned_rows: usize,
    planned_elements: usize,
    elements: usize,
    row_start: Option<usize>,
}

impl ProblemAssembler {
    /// Reserve exact storage for `row_count` rows holding `element_count`
    /// pairs whose largest index is `max_index`.
    ///
    /// With bias enabled, `max_index` must be below `i64::MAX` so the bias
    /// node has an index.
    pub fn with_capacity(
        source_name: &str,
        row_count: usize,
        element_count: usize,
        bias: f64,
        max_index: i64,
    ) -> Result<Self> {
        let bias_enabled = bias >= 0.0;
        let feature_dim = feature_dimension(max_index, bias_enabled).ok_or(ArgumentError::IndexOverflow)?;
        let capacity = arena_capacity(element_count, row_count, bias_enabled)
            .ok_or_else(|| SvmError::allocate(source_name, "arena size overflows usize"))?;

        let mut labels = Vec::new();
        let mut rows = Vec::new();
        let mut arena = Vec::new();
        labels
            .try_reserve_exact(row_count)
            .and_then(|()| rows.try_reserve_exact(row_count))
            .and_then(|()| arena.try_reserve_exact(capacity))
            .map_err(|e| SvmError::allocate(source_name, e))?;

        Ok(Self {
            labels,
            rows,
            arena,
            bias,
            max_index,
            feature_dim,
            planned_rows: row_count,
            planned_elements: element_count,
            elements: 0,
            row_start: None,
        })
    }

    pub fn begin_row(&mut self, label: f64) -> core::result::Result<(), RecordError> {
        if self.row_start.is_some() || self.labels.len() == self.planned_rows {
            return Err(RecordError::CountMismatch);
        }
        self.labels.push(label);
        self.row_start = Some(self.arena.len());
        Ok(())
    }

    /// Append one pair to the open row.
    ///
    /// Callers guarantee strictly increasing indices within the row.
    pub fn push(&mut self, node: FeatureNode) -> core::result::Result<(), RecordError> {
        let start = self.row_start.ok_or(RecordError::CountMismatch)?;
        if self.elements == self.planned_elements || node.index > self.max_index {
            return Err(RecordError::CountMismatch);
        }
        debug_assert!(self.arena.len() == start || self.arena[self.arena.len() - 1].index < node.index);
        self.arena.push(node);
        self.elements += 1;
        Ok(())
    }

    /// Close the open row, appending the bias node and the sentinel.
    pub fn end_row(&mut self) -> core::result::Result<(), RecordError> {
        let offset = self.row_start.take().ok_or(RecordError::CountMismatch)?;
        if self.bias >= 0.0 {
            // the bias feature is the last dimension
            self.arena.push(FeatureNode::new(self.feature_dim, self.bias));
        }
        self.rows.push(RowSpan {
            offset,
            len: self.arena.len() - offset,
        });
        self.arena.push(FeatureNode::sentinel());
        Ok(())
    }

    pub fn finish(self) -> core::result::Result<Problem, RecordError> {
        if self.row_start.is_some()
            || self.rows.len() != self.planned_rows
            || self.elements != self.planned_elements
        {
            return Err(RecordError::CountMismatch);
        }
        Ok(Problem {
            feature_dim: self.feature_dim,
            bias: self.bias,
            labels: self.labels,
            rows: self.rows,
            arena: self.arena,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::constants::BIAS_DISABLED;

    fn sample(bias: f64) -> Problem {
        Problem::from_rows(
            &[
                (1.0, vec![(1, 0.5), (3, 0.2)]),
                (-1.0, vec![(2, 1.0)]),
            ],
            bias,
        )
        .unwrap()
    }

    #[test]
    fn test_from_rows_without_bias() {
        let prob = sample(BIAS_DISABLED);
        assert_eq!(prob.row_count(), 2);
        assert_eq!(prob.feature_dim(), 3);
        assert_eq!(prob.labels(), &[1.0, -1.0]);
        assert_eq!(
            prob.row(0),
            &[FeatureNode::new(1, 0.5), FeatureNode::new(3, 0.2)]
        );
        assert_eq!(prob.row(1), &[FeatureNode::new(2, 1.0)]);
        assert_eq!(prob.arena().len(), 3 + 2);
        assert_eq!(prob.element_count(), 3);
    }

    #[test]
    fn test_from_rows_with_bias() {
        let prob = sample(1.0);
        assert_eq!(prob.feature_dim(), 4);
        assert_eq!(prob.arena().len(), 3 + 2 + 2);
        for row in 0..prob.row_count() {
            let nodes = prob.row(row);
            assert_eq!(nodes.last(), Some(&FeatureNode::new(4, 1.0)));
            let terminated = prob.row_with_sentinel(row);
            assert!(terminated.last().unwrap().is_sentinel());
        }
        assert_eq!(prob.element_count(), 3);
    }

    #[test]
    fn test_from_rows_rejects_non_increasing() {
        let err = Problem::from_rows(
            &[(1.0, vec![(1, 1.0)]), (1.0, vec![(2, 1.0), (2, 1.0)])],
            BIAS_DISABLED,
        )
        .unwrap_err();
        assert_eq!(err.code(), 2);
    }

    #[test]
    fn test_get_element() {
        let prob = sample(BIAS_DISABLED);
        assert_eq!(prob.get_element(0, 3), Some(0.2));
        assert_eq!(prob.get_element(0, 2), None);
        assert_eq!(prob.get_element(5, 1), None);
        assert_eq!(prob.dimensions(), (2, 3));
        assert_eq!(prob.nnz(), 3);
    }

    #[test]
    fn test_set_bias_updates_value_in_place() {
        let mut prob = sample(1.0);
        prob.set_bias(2.5).unwrap();
        assert_eq!(prob.feature_dim(), 4);
        assert_eq!(prob.row(1), &[FeatureNode::new(2, 1.0), FeatureNode::new(4, 2.5)]);
    }

    #[test]
    fn test_set_bias_enable_and_disable() {
        let mut prob = sample(BIAS_DISABLED);
        prob.set_bias(1.0).unwrap();
        assert!(prob.has_bias());
        assert_eq!(prob.feature_dim(), 4);
        assert_eq!(prob.arena().len(), 3 + 2 + 2);
        assert_eq!(prob.row(0).last(), Some(&FeatureNode::new(4, 1.0)));

        prob.set_bias(-1.0).unwrap();
        assert!(!prob.has_bias());
        assert_eq!(prob, sample(BIAS_DISABLED));
    }

    #[test]
    fn test_assembler_rejects_extra_rows() {
        let mut asm = ProblemAssembler::with_capacity("t", 1, 1, BIAS_DISABLED, 4).unwrap();
        asm.begin_row(1.0).unwrap();
        asm.push(FeatureNode::new(4, 1.0)).unwrap();
        assert_eq!(asm.push(FeatureNode::new(5, 1.0)), Err(RecordError::CountMismatch));
        asm.end_row().unwrap();
        assert_eq!(asm.begin_row(2.0), Err(RecordError::CountMismatch));
        let prob = asm.finish().unwrap();
        assert_eq!(prob.row_count(), 1);
        assert_eq!(prob.feature_dim(), 4);
    }

    #[test]
    fn test_assembler_rejects_bias_past_largest_index() {
        let err = ProblemAssembler::with_capacity("t", 1, 1, 1.0, i64::MAX).unwrap_err();
        assert_eq!(err, SvmError::Argument(ArgumentError::IndexOverflow));

        let asm = ProblemAssembler::with_capacity("t", 1, 1, BIAS_DISABLED, i64::MAX);
        assert!(asm.is_ok());
    }

    #[test]
    fn test_largest_index_with_and_without_bias() {
        let rows = [(1.0, vec![(1, 1.0)]), (1.0, vec![(2, 1.0), (i64::MAX, 1.0)])];

        let prob = Problem::from_rows(&rows, BIAS_DISABLED).unwrap();
        assert_eq!(prob.feature_dim(), i64::MAX);
        assert_eq!(prob.row(1).last(), Some(&FeatureNode::new(i64::MAX, 1.0)));

        let err = Problem::from_rows(&rows, 1.0).unwrap_err();
        assert_eq!(err, SvmError::format("<rows>", 2, RecordError::InvalidIndex));
    }

    #[test]
    fn test_enable_bias_without_room_fails() {
        let mut prob = Problem::from_rows(&[(1.0, vec![(i64::MAX, 1.0)])], BIAS_DISABLED).unwrap();
        let before = prob.clone();

        let err = prob.set_bias(1.0).unwrap_err();
        assert_eq!(err.code(), -4);
        assert_eq!(prob, before);
    }

    #[test]
    fn test_assembler_rejects_short_fill() {
        let asm = ProblemAssembler::with_capacity("t", 2, 0, BIAS_DISABLED, 0).unwrap();
        assert_eq!(asm.finish().unwrap_err(), RecordError::CountMismatch);
    }

    #[test]
    fn test_empty_problem() {
        let rows: [(f64, Vec<(i64, f64)>); 0] = [];
        let prob = Problem::from_rows(&rows, 1.0).unwrap();
        assert_eq!(prob.row_count(), 0);
        assert_eq!(prob.feature_dim(), 1);
        assert!(prob.arena().is_empty());
    }
}
