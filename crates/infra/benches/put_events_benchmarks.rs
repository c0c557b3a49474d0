use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use relaybus_core::CorrelationIds;
use relaybus_events::{EventBatch, EventEntry};
use relaybus_infra::decorate_batch;

fn sample_context() -> CorrelationIds {
    [
        ("x-correlation-id", "01890a5d-ac96-774b-b9aa-000000000000"),
        ("debug-log-enabled", "true"),
        ("call-chain-length", "3"),
    ]
    .into_iter()
    .collect()
}

fn sample_batch(size: usize) -> EventBatch {
    (0..size)
        .map(|i| {
            EventEntry::new(
                "bench",
                "bench.event",
                format!(
                    r#"{{"eventType":"entry_{i}","username":"theburningmonk","payload":"{}"}}"#,
                    "x".repeat(128)
                ),
            )
        })
        .collect()
}

fn bench_decoration(c: &mut Criterion) {
    let context = sample_context();

    let mut group = c.benchmark_group("decorate_batch");
    for size in [1usize, 10, 100] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let batch = sample_batch(size);
            b.iter(|| {
                let decorated =
                    decorate_batch(black_box(&context), black_box(batch.clone())).unwrap();
                black_box(decorated)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_decoration);
criterion_main!(benches);
