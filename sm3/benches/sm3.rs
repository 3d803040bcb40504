//! SM3 throughput benchmarks.

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use sm3::digest;

fn bench_sm3(c: &mut Criterion) {
    let mut group = c.benchmark_group("sm3");
    for size in [64usize, 1024, 8192] {
        let data = vec![0xa5u8; size];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_function(format!("digest/{size}"), |b| b.iter(|| digest(&data)));
    }
    group.finish();
}

criterion_group!(benches, bench_sm3);
criterion_main!(benches);
