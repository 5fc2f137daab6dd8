//! Benchmarks `count` on a small family of pattern/target graphs.

use counting_homomorphisms::{count, Graph};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

fn cycle(n: usize) -> Graph {
    let edges: Vec<(u32, u32)> = (0..n as u32).map(|i| (i, (i + 1) % n as u32)).collect();
    Graph::try_new(n, &edges).unwrap()
}

fn path(n: usize) -> Graph {
    let edges: Vec<(u32, u32)> = (0..n as u32 - 1).map(|i| (i, i + 1)).collect();
    Graph::try_new(n, &edges).unwrap()
}

fn bench_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("count");
    for n in [4usize, 6, 8] {
        let pattern = path(4);
        let target = cycle(n);
        group.bench_with_input(BenchmarkId::new("path4_into_cycle", n), &n, |b, _| {
            b.iter(|| count(&pattern, &target).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_count);
criterion_main!(benches);
