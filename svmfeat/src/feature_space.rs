//! Persisted merge boundaries
//!
//! A training merge fixes where each source's features live in the merged
//! space. Saving those boundaries lets a later test-time merge align to
//! them with [`OffsetMode::Align`].

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use svmfeat_core::{Result, SvmError};

use crate::merger::{MergeReport, OffsetMode};

/// Source names and their upper boundaries in a merged feature space
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSpace {
    pub sources: Vec<String>,
    pub offsets: Vec<i64>,
}

impl FeatureSpace {
    pub fn new(sources: Vec<String>, offsets: Vec<i64>) -> Self {
        Self { sources, offsets }
    }

    /// Total merged dimension
    pub fn feature_dim(&self) -> i64 {
        self.offsets.last().copied().unwrap_or(0)
    }

    /// Offset mode that reproduces these boundaries
    pub fn align(&self) -> OffsetMode {
        OffsetMode::Align(self.offsets.clone())
    }

    /// Write as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let file = File::create(path).map_err(|e| SvmError::open(&name, e))?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self).map_err(|e| SvmError::write(&name, e))?;
        writer.flush().map_err(|e| SvmError::write(&name, e))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let file = File::open(path).map_err(|e| SvmError::open(&name, e))?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| SvmError::read(&name, e))
    }
}

impl From<&MergeReport> for FeatureSpace {
    fn from(report: &MergeReport) -> Self {
        Self::new(report.sources.clone(), report.offsets.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("space.json");

        let space = FeatureSpace::new(vec!["words.svm".into(), "chars.svm".into()], vec![120, 4120]);
        space.save(&path).unwrap();

        let loaded = FeatureSpace::load(&path).unwrap();
        assert_eq!(loaded, space);
        assert_eq!(loaded.feature_dim(), 4120);
        assert_eq!(loaded.align(), OffsetMode::Align(vec![120, 4120]));
    }

    #[test]
    fn test_from_report() {
        let report = MergeReport {
            sources: vec!["a".into(), "b".into()],
            offsets: vec![3, 5],
            rows: 2,
            dropped: vec![0, 0],
        };
        let space = FeatureSpace::from(&report);
        assert_eq!(space.sources, report.sources);
        assert_eq!(space.offsets, vec![3, 5]);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert_eq!(FeatureSpace::load(&missing).unwrap_err().code(), -1);

        let garbage = dir.path().join("garbage.json");
        std::fs::write(&garbage, "{ not json").unwrap();
        let err = FeatureSpace::load(&garbage).unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }
}
