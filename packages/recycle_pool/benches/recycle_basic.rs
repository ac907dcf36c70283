//! Basic benchmarks for the `recycle_pool` package.

#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::convert::Infallible;
use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use recycle_pool::{ManageItem, RecyclePool};

criterion_group!(benches, entrypoint);
criterion_main!(benches);

const BUFFER_CAPACITY: usize = 4096;

struct ManageBuffers;

impl ManageItem for ManageBuffers {
    type Item = Vec<u8>;
    type Error = Infallible;

    fn create(&self) -> Result<Self::Item, Self::Error> {
        Ok(Vec::with_capacity(BUFFER_CAPACITY))
    }

    fn is_valid(&self, buffer: &Self::Item) -> bool {
        buffer.capacity() >= BUFFER_CAPACITY
    }
}

fn entrypoint(c: &mut Criterion) {
    let mut group = c.benchmark_group("rp_cycle");

    group.bench_function("fresh_construction", |b| {
        let pool = RecyclePool::new(ManageBuffers);

        b.iter(|| {
            let item = pool.create().unwrap();
            black_box(&item);
            item.detach(); // never return: every iteration constructs
        });
    });

    group.bench_function("reuse", |b| {
        let pool = RecyclePool::new(ManageBuffers);
        drop(pool.get().unwrap()); // warm: one idle item cycles forever

        b.iter(|| {
            let item = pool.get().unwrap();
            black_box(&item);
        });
    });

    group.finish();

    let mut sweep_group = c.benchmark_group("rp_sweep");

    sweep_group.bench_function("hundred_valid", |b| {
        let pool = RecyclePool::new(ManageBuffers);
        let handles: Vec<_> = (0..100).map(|_| pool.get().unwrap()).collect();
        drop(handles);

        b.iter(|| {
            pool.erase_invalid();
            black_box(pool.len());
        });
    });

    sweep_group.finish();
}
