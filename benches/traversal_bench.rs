//! Benchmarks for ledger traversal engines

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ledgerblas::{exposure, trace, traverse, Chain, CostMetric, RelationName, TraversalMode, UNBOUNDED};

/// Deterministic scale-free-ish payment graph: every address pays `fan`
/// others, biased towards low ids.
fn synthetic_chain(addresses: u64, fan: u64) -> Chain {
    let mut state = 0x9E37_79B9_7F4A_7C15u64;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };

    let mut chain = Chain::new();
    for src in 0..addresses {
        for _ in 0..fan {
            let r = next();
            let dst = if (r >> 60) & 1 == 1 {
                r % addresses
            } else {
                r % (addresses / 16 + 1)
            };
            if dst != src {
                chain
                    .add_edge(RelationName::SenderReceiver, src, dst, 1 + (r >> 32) % 1_000)
                    .unwrap();
                chain.add_edge(RelationName::Flow, src, dst, 1 + (r >> 32) % 1_000).unwrap();
            }
        }
    }
    chain.flush();
    chain
}

fn bench_traverse(c: &mut Criterion) {
    let mut group = c.benchmark_group("traverse");

    for size in [1_000u64, 10_000, 50_000] {
        let chain = synthetic_chain(size, 4);
        group.throughput(Throughput::Elements(size));

        group.bench_with_input(BenchmarkId::new("level", size), &chain, |b, chain| {
            b.iter(|| {
                traverse(chain, black_box(&[0u64][..]), RelationName::SenderReceiver, UNBOUNDED, TraversalMode::Level)
                    .unwrap()
            });
        });

        group.bench_with_input(BenchmarkId::new("parent", size), &chain, |b, chain| {
            b.iter(|| {
                traverse(chain, black_box(&[0u64][..]), RelationName::SenderReceiver, UNBOUNDED, TraversalMode::Parent)
                    .unwrap()
            });
        });
    }

    group.finish();
}

fn bench_exposure(c: &mut Criterion) {
    let mut group = c.benchmark_group("exposure");
    let chain = synthetic_chain(10_000, 4);

    for metric in [CostMetric::Hops, CostMetric::Weight] {
        group.bench_function(format!("{:?}", metric).to_lowercase(), |b| {
            b.iter(|| exposure(&chain, black_box(&[0u64, 1, 2][..]), RelationName::SenderReceiver, UNBOUNDED, metric).unwrap());
        });
    }

    group.finish();
}

fn bench_trace(c: &mut Criterion) {
    let mut group = c.benchmark_group("trace");
    let chain = synthetic_chain(10_000, 4);
    let start: Vec<u64> = (0..8).collect();
    let end: Vec<u64> = (9_000..9_064).collect();

    for depth in [4usize, 8, 16] {
        group.bench_with_input(BenchmarkId::new("hops", depth), &depth, |b, &depth| {
            b.iter(|| {
                trace(&chain, black_box(&start), black_box(&end), RelationName::Flow, depth, CostMetric::Hops)
                    .unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_traverse, bench_exposure, bench_trace);
criterion_main!(benches);
