use std::io::Cursor;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use svmfeat::{
    compute_idf, normalize, BuildConfig, MergedRow, NormalizeConfig, OffsetMode, Problem, ProblemBuilder,
    ProblemMerger, Source,
};

/// LIBSVM text with `rows` rows of up to `per_row` features below `dim`
fn generate(rows: usize, per_row: usize, dim: i64, seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut text = String::new();
    for _ in 0..rows {
        let mut indices: Vec<i64> = (0..per_row).map(|_| rng.gen_range(1..=dim)).collect();
        indices.sort_unstable();
        indices.dedup();

        text.push_str(if rng.gen_bool(0.5) { "+1" } else { "-1" });
        for index in indices {
            let value: f64 = rng.gen_range(0.0..10.0);
            text.push_str(&format!(" {index}:{value}"));
        }
        text.push('\n');
    }
    text
}

fn build(text: &str) -> Problem {
    ProblemBuilder::new(BuildConfig::default().with_bias(1.0))
        .build(Cursor::new(text.as_bytes()))
        .unwrap()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for rows in [1_000, 10_000] {
        let text = generate(rows, 50, 100_000, 7);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &text, |b, text| {
            b.iter(|| build(black_box(text)))
        });
    }
    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let problem = build(&generate(10_000, 50, 100_000, 11));
    let weights = compute_idf(&problem);

    let mut group = c.benchmark_group("normalize");
    group.bench_function("compute_idf", |b| b.iter(|| compute_idf(black_box(&problem))));
    for (name, config) in [
        ("binary_l2", NormalizeConfig::default()),
        ("tf_idf_l2", NormalizeConfig::tf_idf().with_l2norm(true)),
    ] {
        group.bench_function(name, |b| {
            b.iter_batched(
                || problem.clone(),
                |mut p| normalize(&mut p, &config, Some(weights.as_slice())).unwrap(),
                criterion::BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let sources: Vec<Source> = (0..3)
        .map(|i| Source::new(format!("source{i}"), build(&generate(5_000, 30, 20_000, 100 + i))))
        .collect();

    c.bench_function("merge/3x5000", |b| {
        b.iter(|| {
            let mut rows: Vec<MergedRow> = Vec::with_capacity(5_000);
            ProblemMerger::new()
                .merge(black_box(&sources), &OffsetMode::Compute, &mut rows)
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_build, bench_normalize, bench_merge);
criterion_main!(benches);
