use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use kiln_parallel::{Parallel, Sequential};
use kiln_sequence::{reduce, Generator, Range};
use std::hint::black_box;

fn bench_sum_range(c: &mut Criterion) {
    let parallel = Parallel::with_threads(4).unwrap();
    let mut group = c.benchmark_group("sum_range");
    for &len in &[1u64 << 10, 1 << 16, 1 << 20] {
        let range = Range::new(0, len, 1);
        for max_depth in [0usize, 4, 9, 16] {
            let config = reduce::Config { max_depth };
            group.bench_with_input(
                BenchmarkId::new(format!("sequential/depth={max_depth}"), len),
                &range,
                |b, range| {
                    b.iter(|| reduce::sum(&Sequential, black_box(*range), 0, &config));
                },
            );
            group.bench_with_input(
                BenchmarkId::new(format!("parallel/depth={max_depth}"), len),
                &range,
                |b, range| {
                    b.iter(|| reduce::sum(&parallel, black_box(*range), 0, &config));
                },
            );
        }
    }
    group.finish();
}

fn bench_sum_nested(c: &mut Criterion) {
    let parallel = Parallel::with_threads(4).unwrap();
    let config = reduce::Config::default();

    // A single unsplittable outer element forces the reducer into the children.
    let nested = Range::new(0, 1, 1).nest(|_| Range::new(0, 1 << 18, 1).map(|x| x % 7));
    c.bench_function(
        &format!("{}/fn=sum_nested parallel", module_path!()),
        |b| {
            b.iter(|| reduce::sum(&parallel, black_box(nested.clone()), 0, &config));
        },
    );
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = bench_sum_range, bench_sum_nested,
}
criterion_main!(benches);
