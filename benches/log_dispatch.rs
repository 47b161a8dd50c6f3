//! Benchmarks for engine log dispatch through the trampoline

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use vlc_bridge::{Instance, LogLevel, StubEngine, VersionId};

fn benchmark_callback_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("log_callback_dispatch");

    for len in [16usize, 256, 4096].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(len), len, |b, &len| {
            let mut instance = Instance::<StubEngine>::new().unwrap();
            let emitter = StubEngine::emitter(&instance);
            let total = Arc::new(AtomicU64::new(0));
            let sink = Arc::clone(&total);
            instance.on_log(move |record| {
                let len = record.message.map_or(0, str::len) as u64;
                sink.fetch_add(len, Ordering::Relaxed);
            });

            let message = "x".repeat(len);
            b.iter(|| {
                black_box(emitter.emit(LogLevel::Debug, "bench", black_box(&message)));
            });
        });
    }

    group.finish();
}

fn benchmark_disabled_dispatch(c: &mut Criterion) {
    let instance = Instance::<StubEngine>::new().unwrap();
    let emitter = StubEngine::emitter(&instance);

    c.bench_function("log_disabled_dispatch", |b| {
        b.iter(|| black_box(emitter.emit(LogLevel::Debug, "bench", "dropped")));
    });
}

fn benchmark_version_compare(c: &mut Criterion) {
    let a = VersionId::new(3, 0, 20, 0);
    let b = VersionId::new(4, 0, 0, 1);

    c.bench_function("version_compare", |bench| {
        bench.iter(|| black_box(black_box(a) < black_box(b)));
    });
    c.bench_function("version_parse", |bench| {
        bench.iter(|| black_box("3.0.20 Vetinari".parse::<VersionId>().unwrap()));
    });
}

criterion_group!(
    benches,
    benchmark_callback_dispatch,
    benchmark_disabled_dispatch,
    benchmark_version_compare
);
criterion_main!(benches);
