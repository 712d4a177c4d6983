//! Thread-count scaling of the row-partitioned multiply.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rowmul::generate::generate_values;
use rowmul::{Matrix, multiply, multiply_parallel};
use std::hint::black_box;

fn random_matrix(n: usize, seed: u64) -> Matrix {
    let mut rng = StdRng::seed_from_u64(seed);
    Matrix::from_vec(n, generate_values(n, &mut rng).unwrap()).unwrap()
}

fn bench_threads(c: &mut Criterion) {
    let mut group = c.benchmark_group("multiply");
    group.sample_size(10);

    for size in [128, 256, 512] {
        let a = random_matrix(size, 1);
        let b = random_matrix(size, 2);
        group.throughput(Throughput::Elements((2 * size * size * size) as u64));

        group.bench_with_input(BenchmarkId::new("naive", size), &size, |bench, _| {
            bench.iter(|| multiply(black_box(&a), black_box(&b)).unwrap())
        });

        for threads in [1, 2, 4, 8] {
            group.bench_with_input(
                BenchmarkId::new(format!("{}_threads", threads), size),
                &threads,
                |bench, &threads| {
                    bench.iter(|| multiply_parallel(black_box(&a), black_box(&b), threads).unwrap())
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_threads);
criterion_main!(benches);
