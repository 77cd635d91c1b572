use criterion::*;
use std::hint::black_box;

mod common;
use common::*;

fn iterate_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("iterate");

    group.bench_function("sum_positions_100k", |b| {
        b.iter_batched(
            || {
                let mut registry = make_registry();
                populate(&mut registry, ENTITIES_MED).unwrap();
                registry
            },
            |registry| {
                let store = registry.store::<Position>().unwrap();
                let total: f32 = store.payloads().unwrap().iter().map(|p| p.x).sum();
                black_box(total);
                black_box(registry);
            },
            BatchSize::LargeInput,
        );
    });

    group.bench_function("scale_wealth_100k", |b| {
        b.iter_batched(
            || {
                let mut registry = make_registry();
                let entities = populate(&mut registry, ENTITIES_MED).unwrap();
                (registry, entities)
            },
            |(mut registry, entities)| {
                for &entity in &entities {
                    registry.get_mut::<Wealth>(entity).unwrap().value *= 1.0001;
                }
                black_box(registry);
            },
            BatchSize::LargeInput,
        );
    });

    group.bench_function("walk_live_entities_100k", |b| {
        b.iter_batched(
            || {
                let mut registry = make_registry();
                populate(&mut registry, ENTITIES_MED).unwrap();
                registry
            },
            |registry| {
                let count = registry.entities().count();
                black_box(count);
                black_box(registry);
            },
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

criterion_group!(benches, iterate_benchmark);
criterion_main!(benches);
