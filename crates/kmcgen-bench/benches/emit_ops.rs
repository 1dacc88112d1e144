//! Criterion micro-benchmarks for source rendering.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use kmcgen_bench::diffusion_profile;
use kmcgen_compiler::compile;
use kmcgen_emit::{generate, EmitConfig};
use kmcgen_test_utils::fixtures;

fn bench_generate_fixture(c: &mut Criterion) {
    let model = fixtures::co_oxidation_2d();
    let plan = compile(&model).unwrap();
    let config = EmitConfig::default();
    c.bench_function("generate_co_oxidation_2d", |b| {
        b.iter(|| generate(black_box(&model), black_box(&plan), &config).unwrap());
    });
}

fn bench_generate_diffusion(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_diffusion");
    let config = EmitConfig::default();
    for species in [1usize, 4, 16] {
        let model = diffusion_profile(3, species).unwrap();
        let plan = compile(&model).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(species), &plan, |b, plan| {
            b.iter(|| generate(&model, black_box(plan), &config).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_generate_fixture, bench_generate_diffusion);
criterion_main!(benches);
