use std::fs;

use approx::assert_relative_eq;
use svmfeat::{
    compute_idf, normalize, normalize_row, BuildConfig, FeatureNode, NormalizeConfig, ProblemBuilder, RecordError,
    SvmError, WireWriter,
};
use tempfile::NamedTempFile;

fn source(contents: &str) -> NamedTempFile {
    let file = NamedTempFile::new().unwrap();
    fs::write(file.path(), contents).unwrap();
    file
}

#[test]
fn mapped_and_buffered_builds_agree() {
    let text: String = (1..=200)
        .map(|i| format!("{} {}:{} {}:0.5\n", i % 3, i, i as f64 / 7.0, i + 300))
        .collect();
    let file = source(&text);

    let mapped = ProblemBuilder::new(BuildConfig::default().with_mmap(true))
        .build_from_path(file.path())
        .unwrap();
    let buffered = ProblemBuilder::new(BuildConfig::default().with_mmap(false).with_initial_line_capacity(8))
        .build_from_path(file.path())
        .unwrap();

    assert_eq!(mapped, buffered);
    assert_eq!(mapped.row_count(), 200);
    assert_eq!(mapped.feature_dim(), 500);
    assert_eq!(mapped.element_count(), 400);
}

#[test]
fn empty_file_builds_empty_problem() {
    let file = source("");
    let prob = ProblemBuilder::new(BuildConfig::default().with_bias(1.0))
        .build_from_path(file.path())
        .unwrap();
    assert_eq!(prob.row_count(), 0);
    assert_eq!(prob.feature_dim(), 1);
}

#[test]
fn missing_file_is_open_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ProblemBuilder::default()
        .build_from_path(dir.path().join("nope.svm"))
        .unwrap_err();
    assert_eq!(err.code(), -1);
    assert!(err.to_string().starts_with("cannot open"));
}

#[test]
fn format_error_carries_path_and_line() {
    let file = source("1 1:1\n1 2:1\n1 2:1 2:3\n");
    let err = ProblemBuilder::default().build_from_path(file.path()).unwrap_err();
    match &err {
        SvmError::Format { source_name, line, kind } => {
            assert_eq!(source_name, &file.path().display().to_string());
            assert_eq!(*line, 3);
            assert_eq!(*kind, RecordError::NonIncreasingIndex);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.code(), 3);
}

#[test]
fn bias_toggle_after_build() {
    let file = source("1 1:1 3:1\n-1 2:1\n");
    let mut prob = ProblemBuilder::default().build_from_path(file.path()).unwrap();
    assert_eq!(prob.feature_dim(), 3);

    prob.set_bias(1.0).unwrap();
    assert_eq!(prob.feature_dim(), 4);
    assert_eq!(prob.row(1), &[FeatureNode::new(2, 1.0), FeatureNode::new(4, 1.0)]);

    let with_bias = ProblemBuilder::new(BuildConfig::default().with_bias(1.0))
        .build_from_path(file.path())
        .unwrap();
    assert_eq!(prob, with_bias);
}

#[test]
fn tf_idf_pipeline_end_to_end() {
    let file = source("1 1:2 2:2\n0 2:4\n1 1:1 3:3\n");
    let mut prob = ProblemBuilder::default().build_from_path(file.path()).unwrap();

    let weights = compute_idf(&prob);
    assert_relative_eq!(weights[0], (1.5f64).ln());
    assert_relative_eq!(weights[1], (1.5f64).ln());
    assert_relative_eq!(weights[2], (3.0f64).ln());

    let config = NormalizeConfig::tf_idf().with_l2norm(true);
    normalize(&mut prob, &config, Some(weights.as_slice())).unwrap();

    // row 0: tf [0.5, 0.5], equal idf, unit norm
    let expected = 1.0 / 2.0f64.sqrt();
    assert_relative_eq!(prob.row(0)[0].value, expected);
    assert_relative_eq!(prob.row(0)[1].value, expected);
    // row 1: single feature
    assert_relative_eq!(prob.row(1)[0].value, 1.0);

    // a prediction row gets the same treatment
    let mut row = [FeatureNode::new(1, 2.0), FeatureNode::new(2, 2.0), FeatureNode::new(9, 1.0)];
    normalize_row(&mut row, &config, Some(weights.as_slice())).unwrap();
    let norm: f64 = row.iter().map(|n| n.value * n.value).sum::<f64>().sqrt();
    assert_relative_eq!(norm, 1.0, epsilon = 1e-12);
}

#[test]
fn reserialized_problem_parses_identically() {
    let file = source("3 1:0.1 5:0.30000000000000004\n-2 2:1e-9 4:123456789012\n7\n");
    let prob = ProblemBuilder::default().build_from_path(file.path()).unwrap();

    let mut writer = WireWriter::new(Vec::new());
    writer.write_problem(&prob).unwrap();
    let out = source(&String::from_utf8(writer.into_inner().unwrap()).unwrap());

    let again = ProblemBuilder::default().build_from_path(out.path()).unwrap();
    assert_eq!(again, prob);
}
