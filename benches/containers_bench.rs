//! Benchmark for the ordered containers vs standard BTreeSet and BTreeMap.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use ordtree::containers::{OrderedMap, OrderedSet};
use std::collections::{BTreeMap, BTreeSet};
use std::hint::black_box;

// =============================================================================
// set insert Benchmark
// =============================================================================

fn benchmark_set_insert(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("set_insert");

    for size in [100, 1000, 10000] {
        // Every key twice, so half of the inserts are rejected duplicates.
        let keys: Vec<i32> = (0..size).chain(0..size).collect();

        group.bench_with_input(BenchmarkId::new("OrderedSet", size), &keys, |bencher, keys| {
            bencher.iter(|| {
                let mut set = OrderedSet::new();
                for key in keys {
                    set.insert(black_box(*key)).unwrap();
                }
                black_box(set)
            });
        });

        group.bench_with_input(BenchmarkId::new("BTreeSet", size), &keys, |bencher, keys| {
            bencher.iter(|| {
                let mut set = BTreeSet::new();
                for key in keys {
                    set.insert(black_box(*key));
                }
                black_box(set)
            });
        });
    }

    group.finish();
}

// =============================================================================
// map get Benchmark
// =============================================================================

fn benchmark_map_get(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("map_get");

    for size in [100, 1000, 10000] {
        let ordered: OrderedMap<i32, i32> = (0..size).map(|index| (index, index * 2)).collect();
        let standard: BTreeMap<i32, i32> = (0..size).map(|index| (index, index * 2)).collect();

        group.bench_with_input(BenchmarkId::new("OrderedMap", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut sum = 0;
                for key in 0..size {
                    if let Some(&value) = ordered.get(&black_box(key)) {
                        sum += value;
                    }
                }
                black_box(sum)
            });
        });

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut sum = 0;
                for key in 0..size {
                    if let Some(&value) = standard.get(&black_box(key)) {
                        sum += value;
                    }
                }
                black_box(sum)
            });
        });
    }

    group.finish();
}

// =============================================================================
// map counting Benchmark
// =============================================================================

fn benchmark_map_counting(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("map_counting");

    for size in [1000, 10000] {
        let words: Vec<i32> = (0..size).map(|index| index % 97).collect();

        group.bench_with_input(BenchmarkId::new("OrderedMap", size), &words, |bencher, words| {
            bencher.iter(|| {
                let mut counts: OrderedMap<i32, usize> = OrderedMap::new();
                for word in words {
                    *counts.get_or_insert_default(black_box(*word)).unwrap() += 1;
                }
                black_box(counts)
            });
        });

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &words, |bencher, words| {
            bencher.iter(|| {
                let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
                for word in words {
                    *counts.entry(black_box(*word)).or_default() += 1;
                }
                black_box(counts)
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_set_insert,
    benchmark_map_get,
    benchmark_map_counting
);
criterion_main!(benches);
