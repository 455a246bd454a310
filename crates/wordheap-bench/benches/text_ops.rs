//! Criterion micro-benchmarks for the string helpers.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use wordheap_arena::{Heap, HeapConfig};
use wordheap_text::{compare, concat, decimal, find, store};

/// Benchmark: Store and free a 64-byte string.
fn bench_store(c: &mut Criterion) {
    let mut heap = Heap::new(HeapConfig::default()).unwrap();
    let bytes = [b'x'; 64];

    c.bench_function("text_store_64", |b| {
        b.iter(|| {
            let p = store(&mut heap, black_box(&bytes)).unwrap();
            heap.free(p).unwrap();
        });
    });
}

/// Benchmark: Join two 100-byte strings.
fn bench_concat(c: &mut Criterion) {
    let mut heap = Heap::new(HeapConfig::default()).unwrap();
    let a = store(&mut heap, &[b'a'; 100]).unwrap();
    let z = store(&mut heap, &[b'z'; 100]).unwrap();

    c.bench_function("text_concat_100_100", |b| {
        b.iter(|| {
            let p = concat(&mut heap, a, z).unwrap();
            heap.free(p).unwrap();
        });
    });
}

/// Benchmark: Compare and search within a 1000-byte string.
fn bench_compare_find(c: &mut Criterion) {
    let mut heap = Heap::new(HeapConfig::default()).unwrap();
    let mut hay = vec![b'a'; 1000];
    hay[990..].copy_from_slice(b"needle!!!!");
    let hay = store(&mut heap, &hay).unwrap();
    let needle = store(&mut heap, b"needle").unwrap();

    c.bench_function("text_compare_1000", |b| {
        b.iter(|| black_box(compare(&heap, hay, needle).unwrap()));
    });
    c.bench_function("text_find_1000", |b| {
        b.iter(|| black_box(find(&heap, hay, needle).unwrap()));
    });
}

/// Benchmark: Format and free i32::MIN.
fn bench_decimal(c: &mut Criterion) {
    let mut heap = Heap::new(HeapConfig::default()).unwrap();

    c.bench_function("text_decimal_min", |b| {
        b.iter(|| {
            let p = decimal(&mut heap, black_box(i32::MIN)).unwrap();
            heap.free(p).unwrap();
        });
    });
}

criterion_group!(benches, bench_store, bench_concat, bench_compare_find, bench_decimal);
criterion_main!(benches);
