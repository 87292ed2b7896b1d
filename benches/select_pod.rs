use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use podscore::fleet::{generate_fleet, FleetSpec};
use podscore::scoring::{decode_and_select_pod, select_pod};

fn bench_select_pod(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_pod");

    for pods in [30usize, 1000] {
        let fleet = generate_fleet(&FleetSpec {
            pods,
            adapters_per_pod: 30,
            max_queue: 10,
        });
        let raw = serde_json::to_vec(&fleet).expect("fleet serializes");

        group.bench_with_input(BenchmarkId::new("records", pods), &fleet, |b, fleet| {
            b.iter(|| select_pod(black_box(fleet)))
        });
        group.bench_with_input(BenchmarkId::new("json_bytes", pods), &raw, |b, raw| {
            b.iter(|| decode_and_select_pod(black_box(raw)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_select_pod);
criterion_main!(benches);
