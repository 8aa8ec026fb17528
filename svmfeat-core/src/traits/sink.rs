//! Output interface for streamed row producers

use crate::error::Result;

/// Destination for rows produced one at a time
///
/// Rows are handed over as borrowed pair slices so that a producer never
/// has to materialize more than the current row.
pub trait RowSink {
    /// Accept one row. `pairs` holds strictly increasing indices.
    fn write_row(&mut self, label: f64, pairs: &[(i64, f64)]) -> Result<()>;

    /// Called once after the last row
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// An owned row collected by the in-memory sink
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRow {
    pub label: f64,
    pub pairs: Vec<(i64, f64)>,
}

impl RowSink for Vec<MergedRow> {
    fn write_row(&mut self, label: f64, pairs: &[(i64, f64)]) -> Result<()> {
        self.push(MergedRow {
            label,
            pairs: pairs.to_vec(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_sink_collects_rows() {
        let mut sink: Vec<MergedRow> = Vec::new();
        sink.write_row(1.0, &[(1, 0.5), (4, 2.0)]).unwrap();
        sink.write_row(-1.0, &[]).unwrap();
        sink.finish().unwrap();

        assert_eq!(sink.len(), 2);
        assert_eq!(sink[0].pairs, vec![(1, 0.5), (4, 2.0)]);
        assert_eq!(sink[1].label, -1.0);
        assert!(sink[1].pairs.is_empty());
    }
}
