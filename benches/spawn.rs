use criterion::*;
use std::hint::black_box;

mod common;
use common::*;

fn spawn_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("spawn");

    for &(label, n) in &[
        ("spawn_10k", ENTITIES_SMALL),
        ("spawn_100k", ENTITIES_MED),
    ] {
        group.bench_function(label, |b| {
            b.iter_batched(
                make_registry,
                |mut registry| {
                    populate(&mut registry, n).unwrap();
                    black_box(registry);
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.bench_function("recycle_10k", |b| {
        b.iter_batched(
            || {
                let mut registry = make_registry();
                let entities = populate(&mut registry, ENTITIES_SMALL).unwrap();
                (registry, entities)
            },
            |(mut registry, entities)| {
                for entity in entities {
                    registry.destroy(entity);
                }
                populate(&mut registry, ENTITIES_SMALL).unwrap();
                black_box(registry);
            },
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

criterion_group!(benches, spawn_benchmark);
criterion_main!(benches);
