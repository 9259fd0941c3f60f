//! Criterion benchmarks for signature comparison.
//!
//! Run with:
//!   cargo bench --bench compare

use criterion::{criterion_group, criterion_main, Criterion};

use ssdeep::noise::{gen_buffer, perturb};
use ssdeep::{compare, hash_buf};

fn bench_compare(c: &mut Criterion) {
    let original = gen_buffer(1_048_576, 1);
    let mut edited = original.clone();
    perturb(&mut edited, 2, 16);

    let d1 = hash_buf(&original).unwrap();
    let d2 = hash_buf(&edited).unwrap();
    let unrelated = hash_buf(&gen_buffer(1_048_576, 3)).unwrap();

    c.bench_function("compare_similar", |b| {
        b.iter(|| compare(&d1, &d2).unwrap())
    });
    c.bench_function("compare_unrelated", |b| {
        b.iter(|| compare(&d1, &unrelated).unwrap())
    });
    c.bench_function("compare_identical", |b| {
        b.iter(|| compare(&d1, &d1).unwrap())
    });
}

criterion_group!(benches, bench_compare);
criterion_main!(benches);
