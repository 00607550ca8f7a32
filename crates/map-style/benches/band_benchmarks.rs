//! Benchmarks for contour band computation.
//!
//! Run with: cargo bench --package map-style --bench band_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use map_common::{BoundingBox, ContourConfig, LabelConfig, VectorFeature};
use map_style::{contour_fragments, ContourBandColorer, ContourFragment};
use rand::Rng;
use test_utils::contour_feature;

/// Generate fragments on a 10m interval with random extents.
fn generate_fragments(count: usize, levels: usize) -> Vec<ContourFragment> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            let x: f64 = rng.gen_range(0.0..1000.0);
            let y: f64 = rng.gen_range(0.0..1000.0);
            ContourFragment {
                elevation: 1800.0 + 10.0 * rng.gen_range(0..levels) as f64,
                extent: BoundingBox::new(
                    x,
                    y,
                    x + rng.gen_range(1.0..200.0),
                    y + rng.gen_range(1.0..200.0),
                ),
            }
        })
        .collect()
}

// =============================================================================
// BAND TABLE BENCHMARKS
// =============================================================================

fn bench_compute_bands(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_bands");
    let config = ContourConfig::default();
    let labels = LabelConfig::default();
    let colorer = ContourBandColorer::new(&config, &labels);

    for count in [100, 1000, 10000] {
        let fragments = generate_fragments(count, 60);
        group.bench_with_input(BenchmarkId::from_parameter(count), &fragments, |b, f| {
            b.iter(|| black_box(colorer.compute_bands(black_box(f), 15)));
        });
    }

    group.finish();
}

fn bench_collect_fragments(c: &mut Criterion) {
    let mut group = c.benchmark_group("contour_fragments");
    let view = BoundingBox::new(250.0, 250.0, 750.0, 750.0);

    let features: Vec<VectorFeature> = generate_fragments(5000, 60)
        .into_iter()
        .map(|f| contour_feature(f.elevation, f.extent))
        .collect();

    group.bench_function("5000_features", |b| {
        b.iter(|| black_box(contour_fragments(black_box(&features), &view)));
    });

    let fragments = contour_fragments(&features, &view);
    let bands = ContourBandColorer::new(&ContourConfig::default(), &LabelConfig::default())
        .compute_bands(&fragments, 15);
    group.bench_function("lookup_all_levels", |b| {
        b.iter(|| {
            for level in 0..60 {
                black_box(bands.get(1800.0 + 10.0 * level as f64));
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_compute_bands, bench_collect_fragments);
criterion_main!(benches);
