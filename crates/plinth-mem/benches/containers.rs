//! Container performance benchmarks.
//!
//! Measures:
//! - `DynArray` push growth against `Vec`
//! - Front insertion (tail shifting)
//! - `HashSet` add and find across rehashes
//! - Slot reuse after churn

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use plinth_mem::{DynArray, HashSet, InlineAllocation, SlotTable};

fn bench_push(c: &mut Criterion) {
    let mut group = c.benchmark_group("push");

    for size in [100, 10_000].iter() {
        group.bench_with_input(BenchmarkId::new("dyn_array", size), size, |b, &size| {
            b.iter(|| {
                let mut arr = DynArray::new();
                for n in 0..size {
                    arr.push(black_box(n));
                }
                arr
            });
        });
        group.bench_with_input(BenchmarkId::new("inline_256", size), size, |b, &size| {
            b.iter(|| {
                let mut arr: DynArray<u32, InlineAllocation<256>> = DynArray::default();
                for n in 0..size {
                    arr.push(black_box(n));
                }
                arr
            });
        });
        group.bench_with_input(BenchmarkId::new("vec", size), size, |b, &size| {
            b.iter(|| {
                let mut vec = Vec::new();
                for n in 0..size {
                    vec.push(black_box(n));
                }
                vec
            });
        });
    }

    group.finish();
}

fn bench_insert_front(c: &mut Criterion) {
    c.bench_function("insert_front_1000", |b| {
        b.iter(|| {
            let mut arr = DynArray::new();
            for n in 0..1_000u32 {
                arr.insert(0, n);
            }
            arr
        });
    });
}

fn bench_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("hash_set");

    for size in [100, 10_000].iter() {
        group.bench_with_input(BenchmarkId::new("add", size), size, |b, &size| {
            b.iter(|| {
                let mut set: HashSet<u64> = HashSet::new();
                for n in 0..size {
                    set.add(black_box(n));
                }
                set
            });
        });

        let set: HashSet<u64> = (0..*size).collect();
        group.bench_with_input(BenchmarkId::new("find", size), size, |b, &size| {
            b.iter(|| {
                for n in 0..size {
                    black_box(set.contains(&n));
                }
            });
        });
    }

    group.finish();
}

fn bench_slot_churn(c: &mut Criterion) {
    c.bench_function("slot_churn", |b| {
        let mut table = SlotTable::new();
        let mut live: Vec<_> = (0..1_000u32).map(|n| table.insert(n)).collect();

        b.iter(|| {
            for index in live.drain(..500) {
                black_box(table.remove(index));
            }
            for n in 0..500u32 {
                live.push(table.insert(n));
            }
        });
    });
}

criterion_group!(benches, bench_push, bench_insert_front, bench_set, bench_slot_churn);
criterion_main!(benches);
