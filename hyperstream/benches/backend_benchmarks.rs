use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use hyperstream_core::backend::scalar;
use hyperstream_core::{word_count_for, BinaryHv};
use hyperstream_core::generate_random_hv;

/// Dimensions spanning the policy threshold (default 16384).
const DIMS: &[usize] = &[2048, 10000, 16384, 65536, 262144];

fn random_words(dim: usize, symbol: u64) -> Vec<u64> {
    let mut hv = BinaryHv::new(dim);
    generate_random_hv(7, symbol, &mut hv);
    hv.words().to_vec()
}

fn bench_hamming_kernels(c: &mut Criterion) {
    let mut group = c.benchmark_group("Hamming Kernels");
    for &dim in DIMS {
        let a = random_words(dim, 1);
        let b = random_words(dim, 2);
        group.throughput(Throughput::Bytes((word_count_for(dim) * 8) as u64));

        group.bench_with_input(BenchmarkId::new("scalar", dim), &dim, |bencher, &_| {
            bencher.iter(|| black_box(scalar::hamming_words(black_box(&a), black_box(&b))))
        });

        #[cfg(target_arch = "x86_64")]
        {
            use hyperstream_core::backend::{avx2, sse2};
            if is_x86_feature_detected!("sse2") {
                group.bench_with_input(BenchmarkId::new("sse2", dim), &dim, |bencher, &_| {
                    bencher.iter(|| black_box(sse2::hamming_words(black_box(&a), black_box(&b))))
                });
            }
            if is_x86_feature_detected!("avx2") {
                group.bench_with_input(BenchmarkId::new("avx2", dim), &dim, |bencher, &_| {
                    bencher.iter(|| black_box(avx2::hamming_words(black_box(&a), black_box(&b))))
                });
            }
        }

        #[cfg(target_arch = "aarch64")]
        {
            use hyperstream_core::backend::neon;
            group.bench_with_input(BenchmarkId::new("neon", dim), &dim, |bencher, &_| {
                bencher.iter(|| black_box(neon::hamming_words(black_box(&a), black_box(&b))))
            });
        }
    }
    group.finish();
}

fn bench_bind_kernels(c: &mut Criterion) {
    let mut group = c.benchmark_group("Bind Kernels");
    for &dim in DIMS {
        let a = random_words(dim, 1);
        let b = random_words(dim, 2);
        let mut out = vec![0u64; word_count_for(dim)];
        group.throughput(Throughput::Bytes((word_count_for(dim) * 8) as u64));

        group.bench_with_input(BenchmarkId::new("scalar", dim), &dim, |bencher, &_| {
            bencher.iter(|| scalar::bind_words(black_box(&a), black_box(&b), &mut out))
        });

        #[cfg(target_arch = "x86_64")]
        {
            use hyperstream_core::backend::{avx2, sse2};
            if is_x86_feature_detected!("sse2") {
                group.bench_with_input(BenchmarkId::new("sse2", dim), &dim, |bencher, &_| {
                    bencher.iter(|| sse2::bind_words(black_box(&a), black_box(&b), &mut out))
                });
            }
            if is_x86_feature_detected!("avx2") {
                group.bench_with_input(BenchmarkId::new("avx2", dim), &dim, |bencher, &_| {
                    bencher.iter(|| avx2::bind_words(black_box(&a), black_box(&b), &mut out))
                });
            }
        }
    }
    group.finish();
}

fn bench_batch_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("Batch Hamming Scan");
    for &dim in &[2048usize, 16384] {
        for &rows in &[64usize, 1024] {
            let mut query = BinaryHv::new(dim);
            generate_random_hv(1, 0, &mut query);
            let mut db = Vec::with_capacity(rows * word_count_for(dim));
            for i in 0..rows {
                db.extend_from_slice(&random_words(dim, i as u64));
            }
            group.throughput(Throughput::Bytes((db.len() * 8) as u64));
            group.bench_with_input(
                BenchmarkId::new(format!("d{}", dim), rows),
                &rows,
                |bencher, &rows| {
                    bencher.iter(|| {
                        black_box(hyperstream_core::hamming_batch(
                            black_box(&query),
                            black_box(&db),
                            rows,
                        ))
                    })
                },
            );
        }
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_hamming_kernels,
    bench_bind_kernels,
    bench_batch_scan,
);
criterion_main!(benches);
