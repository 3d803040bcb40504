//! Curve and pairing benchmarks.

use bn256::{pairing, CurvePoint, Scalar, TwistPoint};
use criterion::{criterion_group, criterion_main, Criterion};

fn bench_pairing(c: &mut Criterion) {
    let g = CurvePoint::GENERATOR;
    let h = TwistPoint::GENERATOR;
    let k = Scalar::from_u64(0x79cc_4519_7a87_9d8a);

    let mut group = c.benchmark_group("curve");
    group.bench_function("g1_double", |bench| bench.iter(|| g.double()));
    group.bench_function("g1_add", |bench| bench.iter(|| g.add(&g.double())));
    group.bench_function("g1_mul", |bench| bench.iter(|| g.mul(&k)));
    group.bench_function("pairing", |bench| bench.iter(|| pairing(&g, &h)));
    group.finish();
}

criterion_group!(benches, bench_pairing);
criterion_main!(benches);
