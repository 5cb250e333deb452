use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use oncosol::dosing::{dose_cohort, CohortPatient};
use oncosol::prelude::*;
use std::hint::black_box;

/// Build a cohort of n patients with slight variation
fn build_cohort(n: usize) -> Vec<CohortPatient> {
    (0..n)
        .map(|i| {
            let scale = 1.0 + (i as f64 % 7.0) * 0.05;
            CohortPatient {
                id: format!("p{}", i),
                metrics: PatientMetrics::new(
                    160.0 * scale,
                    60.0 * scale,
                    40.0 + (i % 40) as f64,
                    70.0 * scale,
                    if i % 2 == 0 { Sex::Male } else { Sex::Female },
                ),
            }
        })
        .collect()
}

fn bench_single_regimen(c: &mut Criterion) {
    let library = ProtocolLibrary::seed();
    let protocol = library.get("R-CHOP (NHL)").expect("seed protocol");
    let patient = PatientMetrics::new(180.0, 80.0, 50.0, 100.0, Sex::Male);
    let options = DosingOptions::default();

    c.bench_function("regimen_r_chop", |b| {
        b.iter(|| compute_regimen(black_box(protocol), black_box(&patient), &options))
    });
}

fn bench_cohort(c: &mut Criterion) {
    let library = ProtocolLibrary::seed();
    let protocol = library.get("R-CHOP (NHL)").expect("seed protocol");
    let options = DosingOptions::default();

    let mut group = c.benchmark_group("cohort_r_chop");
    for size in [10, 100, 1000] {
        let cohort = build_cohort(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &cohort, |b, cohort| {
            b.iter(|| dose_cohort(black_box(protocol), black_box(cohort), &options))
        });
    }
    group.finish();
}

fn bench_breast_staging(c: &mut Criterion) {
    let table = CancerType::Breast.table();
    let codes: Vec<(&str, &str, &str)> = table.axes[0]
        .codes()
        .flat_map(|t| table.axes[1].codes().map(move |n| (t, n, "M0")))
        .collect();

    c.bench_function("breast_stage_all_codes", |b| {
        b.iter(|| {
            for (t, n, m) in &codes {
                black_box(classify_breast_stage(t, n, m));
            }
        })
    });
}

criterion_group!(
    benches,
    bench_single_regimen,
    bench_cohort,
    bench_breast_staging
);
criterion_main!(benches);
