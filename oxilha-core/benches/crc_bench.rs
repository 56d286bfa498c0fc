//! Benchmarks for the header checksums
//!
//! - CRC-16 throughput across header-sized and larger inputs
//! - Incremental vs single-shot CRC-16
//! - Byte-sum over level 0/1 header spans

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use oxilha_core::crc::{Crc16, calc_crc, calc_sum};
use std::hint::black_box;

/// Generate test data patterns for benchmarking
mod test_data {
    /// Random data - varied byte values
    pub fn random(size: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(size);
        let mut seed: u64 = 0x123456789ABCDEF0;
        for _ in 0..size {
            // Linear congruential generator
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
            data.push((seed >> 32) as u8);
        }
        data
    }

    /// Text-like data
    pub fn text_like(size: usize) -> Vec<u8> {
        let text = b"The quick brown fox jumps over the lazy dog. ";
        let mut data = Vec::with_capacity(size);
        while data.len() < size {
            let remaining = size - data.len();
            let chunk_size = remaining.min(text.len());
            data.extend_from_slice(&text[..chunk_size]);
        }
        data
    }
}

/// Benchmark CRC-16 across different data sizes
fn bench_crc16_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("crc16_sizes");

    let sizes = [
        ("32B", 32),
        ("256B", 256),
        ("4KB", 4 * 1024),
        ("64KB", 64 * 1024),
    ];

    for (size_name, size) in sizes {
        let data = test_data::text_like(size);

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size_name), &data, |b, data| {
            b.iter(|| {
                let checksum = Crc16::compute(black_box(data));
                black_box(checksum);
            });
        });
    }

    group.finish();
}

/// Benchmark incremental CRC-16 calculation
fn bench_crc16_incremental(c: &mut Criterion) {
    let mut group = c.benchmark_group("crc16_incremental");

    let size = 4 * 1024;
    let data = test_data::random(size);

    group.throughput(Throughput::Bytes(size as u64));
    group.bench_with_input(
        BenchmarkId::from_parameter("single_shot"),
        &data,
        |b, data| {
            b.iter(|| black_box(calc_crc(0, black_box(data))));
        },
    );

    // Extended header records are a few bytes to a few hundred bytes long
    for chunk_size in [5, 32, 256] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("chunks_{}", chunk_size)),
            &data,
            |b, data| {
                b.iter(|| {
                    let mut crc = Crc16::new();
                    for chunk in data.chunks(chunk_size) {
                        crc.update(black_box(chunk));
                    }
                    black_box(crc.finalize());
                });
            },
        );
    }

    group.finish();
}

/// Benchmark the level 0/1 byte-sum
fn bench_calc_sum(c: &mut Criterion) {
    let mut group = c.benchmark_group("calc_sum");

    for size in [22, 255] {
        let data = test_data::random(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| black_box(calc_sum(black_box(data))));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_crc16_sizes,
    bench_crc16_incremental,
    bench_calc_sum,
);
criterion_main!(benches);
