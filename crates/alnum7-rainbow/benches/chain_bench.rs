//! Chain and table generation benchmarks
//!
//! Kept small enough to finish within a minute.

use std::time::Duration;

use alnum7_rainbow::{
    Password, Reducer,
    app::generator::{generate_table_range, generate_table_range_parallel},
    domain::chain::compute_chain,
    domain::seed::SeedRange,
    hash_password, reduce,
};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn ci_criterion() -> Criterion {
    Criterion::default()
        .sample_size(15)
        .measurement_time(Duration::from_secs(8))
}

fn bench_primitives(c: &mut Criterion) {
    let mut group = c.benchmark_group("primitives");
    let password = Password::MIN;
    let digest = hash_password(&password);

    group.bench_function("hash_password", |b| b.iter(|| hash_password(black_box(&password))));
    group.bench_function("reduce", |b| b.iter(|| reduce(black_box(&digest), 3)));

    group.finish();
}

fn bench_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain");

    for reducer in [Reducer::Fixed, Reducer::Positional] {
        group.bench_function(format!("compute_chain_1000_{}", reducer), |b| {
            b.iter(|| compute_chain(black_box(Password::MIN), 1000, &reducer))
        });
    }

    group.finish();
}

fn bench_table_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_generation");
    let range = SeedRange::new(Password::MIN, 1000);

    group.bench_function("sequential_1000x100", |b| {
        b.iter(|| generate_table_range(black_box(range), 100, &Reducer::Fixed))
    });
    group.bench_function("parallel_1000x100", |b| {
        b.iter(|| generate_table_range_parallel(black_box(range), 100, &Reducer::Fixed))
    });

    group.finish();
}

criterion_group! {
    name = benches;
    config = ci_criterion();
    targets = bench_primitives, bench_chain, bench_table_generation
}
criterion_main!(benches);
