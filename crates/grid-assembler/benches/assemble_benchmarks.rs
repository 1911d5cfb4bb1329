//! Benchmarks for time-grid assembly.
//!
//! Run with: cargo bench --package grid-assembler --bench assemble_benchmarks

use chrono::Duration;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use grid_assembler::{assemble, assemble_many, build_axis, derive_wind_components, normalize_arrows};
use profiler_common::DaySource;
use test_utils::fixtures::time::reference_now;
use test_utils::patterned_day_source;

const VARIABLES: [&str; 3] = ["wind_speed", "wind_from_direction", "upward_air_velocity"];

/// Three consecutive full days ending today, oldest first.
fn three_days(cadence: u32, levels: usize) -> Vec<Option<DaySource>> {
    let today = reference_now().date_naive();
    let altitude: Vec<f32> = (0..levels).map(|i| 150.0 + i as f32 * 144.0).collect();
    (0..3)
        .rev()
        .map(|back| {
            Some(patterned_day_source(
                today - Duration::days(back),
                cadence,
                &altitude,
                &VARIABLES,
                back as f32 * 10_000.0,
            ))
        })
        .collect()
}

// =============================================================================
// ASSEMBLY BENCHMARKS
// =============================================================================

fn bench_assemble(c: &mut Criterion) {
    let mut group = c.benchmark_group("assemble_48h");

    for &(cadence, levels) in &[(15u32, 60usize), (5, 60), (5, 120)] {
        let sources = three_days(cadence, levels);
        let axis = build_axis(cadence, 2, reference_now()).unwrap();
        group.throughput(Throughput::Elements((axis.len() * levels) as u64));

        group.bench_with_input(
            BenchmarkId::new("single", format!("{}min_{}lv", cadence, levels)),
            &sources,
            |b, sources| {
                b.iter(|| black_box(assemble("wind_speed", &axis, sources).unwrap()));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("many", format!("{}min_{}lv", cadence, levels)),
            &sources,
            |b, sources| {
                b.iter(|| black_box(assemble_many(&VARIABLES, &axis, sources).unwrap()));
            },
        );
    }

    group.finish();
}

// =============================================================================
// WIND BENCHMARKS
// =============================================================================

fn bench_wind(c: &mut Criterion) {
    let mut group = c.benchmark_group("wind");

    let sources = three_days(5, 120);
    let axis = build_axis(5, 2, reference_now()).unwrap();
    let assembly = assemble_many(&VARIABLES[..2], &axis, &sources).unwrap();
    let speed = &assembly.grids[0];
    let direction = &assembly.grids[1];

    group.bench_function("derive_components", |b| {
        b.iter(|| black_box(derive_wind_components(speed, direction).unwrap()));
    });

    let components = derive_wind_components(speed, direction).unwrap();
    group.bench_function("normalize_arrows", |b| {
        b.iter(|| black_box(normalize_arrows(&components, 1.0)));
    });

    group.finish();
}

criterion_group!(benches, bench_assemble, bench_wind);
criterion_main!(benches);
