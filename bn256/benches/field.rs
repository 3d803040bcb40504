//! Base field benchmarks.

use bn256::FieldElement;
use criterion::{criterion_group, criterion_main, Criterion};
use hex_literal::hex;

fn fe(bytes: &[u8; 32]) -> FieldElement {
    FieldElement::from_bytes(bytes).unwrap()
}

fn bench_field(c: &mut Criterion) {
    let a = fe(&hex!(
        "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef"
    ));
    let b = fe(&hex!(
        "2468ace02468ace02468ace02468ace02468ace02468ace02468ace02468ace0"
    ));

    let mut group = c.benchmark_group("field");
    group.bench_function("add", |bench| bench.iter(|| a + b));
    group.bench_function("mul", |bench| bench.iter(|| a * b));
    group.bench_function("square", |bench| bench.iter(|| a.square()));
    group.bench_function("invert", |bench| bench.iter(|| a.invert()));
    group.bench_function("sqrt", |bench| bench.iter(|| a.sqrt()));
    group.finish();
}

criterion_group!(benches, bench_field);
criterion_main!(benches);
