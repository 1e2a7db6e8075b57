//! Benchmarks for galaxy generation and record packing.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use galaxy::prelude::*;

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");

    for count in [1_000u32, 12_000, 50_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let config = GalaxyConfig::default()
                .with_particle_count(count)
                .with_seed(7);
            b.iter(|| {
                let mut generator = ParticleFieldGenerator::new(config.clone()).unwrap();
                black_box(generator.generate().unwrap())
            })
        });
    }

    group.finish();
}

fn bench_gaussian(c: &mut Criterion) {
    c.bench_function("gaussian", |b| {
        let mut sampler = RandomSampler::seeded(1);
        b.iter(|| black_box(sampler.gaussian()))
    });
}

fn bench_repack(c: &mut Criterion) {
    let mut group = c.benchmark_group("repack");
    let config = GalaxyConfig::default().with_seed(3);
    let field = ParticleFieldGenerator::new(config)
        .unwrap()
        .generate()
        .unwrap();
    let (_, vertices, _) = field.into_parts();

    group.bench_function("copy_all_12000", |b| {
        let mut array = VertexArray::<GalaxyVertex>::with_buffer(vertices.len()).unwrap();
        for (i, v) in vertices.iter().enumerate() {
            array.set(*v, i, false).unwrap();
        }
        b.iter(|| array.copy_all().unwrap())
    });

    group.bench_function("set_each_12000", |b| {
        let mut array = VertexArray::<GalaxyVertex>::with_buffer(vertices.len()).unwrap();
        b.iter(|| {
            for (i, v) in vertices.iter().enumerate() {
                array.set(*v, i, true).unwrap();
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_generate, bench_gaussian, bench_repack);
criterion_main!(benches);
