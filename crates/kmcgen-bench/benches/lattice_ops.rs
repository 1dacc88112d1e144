//! Criterion micro-benchmarks for the runtime index mapping.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use kmcgen_lattice::{IndexMapping, LatticeSite};

fn bench_to_index(c: &mut Criterion) {
    let mapping = IndexMapping::new(3, 4, &[32, 32, 32]).unwrap();
    let site = LatticeSite::new([17, 5, 30], 3);
    c.bench_function("to_index_3d", |b| {
        b.iter(|| mapping.to_index(black_box(&site)).unwrap());
    });
}

fn bench_to_coord(c: &mut Criterion) {
    let mapping = IndexMapping::new(3, 4, &[32, 32, 32]).unwrap();
    let last = mapping.volume();
    c.bench_function("to_coord_3d", |b| {
        b.iter(|| mapping.to_coord(black_box(last / 2)).unwrap());
    });
}

fn bench_canonical_ordering(c: &mut Criterion) {
    let mapping = IndexMapping::new(2, 2, &[64, 64]).unwrap();
    c.bench_function("canonical_ordering_2d_64", |b| {
        b.iter(|| mapping.canonical_ordering().count());
    });
}

criterion_group!(benches, bench_to_index, bench_to_coord, bench_canonical_ordering);
criterion_main!(benches);
