// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Benchmarks for the amplitude engines.
//!
//! The segment tree applies diffusion as one lazy range update, so its cost
//! should stay flat as N grows while the Fenwick engine grows as N log N.
//!
//! Run with: cargo bench --bench diffusion

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

use qubit_os_grover::amplitude::{AmplitudeVector, EngineKind};
use qubit_os_grover::search::GroverSearch;

const SIZES: [i64; 3] = [1_024, 65_536, 1_000_000];

fn bench_diffusion(c: &mut Criterion) {
    let mut group = c.benchmark_group("amplitude/diffusion");

    for size in SIZES {
        for kind in EngineKind::ALL {
            let mut engine = kind.create(1_000_000);
            if engine.initialize(size).is_err() {
                continue;
            }
            group.bench_with_input(BenchmarkId::new(kind.to_string(), size), &size, |b, _| {
                b.iter(|| {
                    engine.apply_oracle(0).unwrap();
                    engine.apply_diffusion().unwrap();
                    black_box(engine.size());
                })
            });
        }
    }

    group.finish();
}

fn bench_find_max(c: &mut Criterion) {
    let mut group = c.benchmark_group("amplitude/find_max");

    for size in SIZES {
        group.throughput(Throughput::Elements(size as u64));
        for kind in EngineKind::ALL {
            let mut engine = kind.create(1_000_000);
            engine.initialize(size).unwrap();
            engine.apply_oracle(size / 2).unwrap();
            engine.apply_diffusion().unwrap();
            group.bench_with_input(BenchmarkId::new(kind.to_string(), size), &size, |b, _| {
                b.iter(|| black_box(engine.find_max_amplitude_index().unwrap()))
            });
        }
    }

    group.finish();
}

fn bench_full_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search/execute");
    group.sample_size(10);

    for size in [1_024i64, 65_536] {
        for kind in EngineKind::ALL {
            let search = GroverSearch::new(kind);
            group.bench_with_input(BenchmarkId::new(kind.to_string(), size), &size, |b, &size| {
                b.iter(|| black_box(search.execute(size, size - 1).unwrap()))
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_diffusion, bench_find_max, bench_full_search);
criterion_main!(benches);
