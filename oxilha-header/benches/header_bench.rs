//! Benchmarks for header decoding and encoding at each level.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use oxilha_header::{EncodeOptions, LhaHeader, encode_header, method};
use std::hint::black_box;

fn sample(level: u8) -> LhaHeader {
    let mut header = LhaHeader::new(
        b"project\xffsrc\xffmodule\xffimplementation.rs".to_vec(),
        method::LH5,
    );
    header.header_level = level;
    header.packed_size = 12_345;
    header.original_size = 67_890;
    header.crc = Some(0x4242);
    header.unix_last_modified_stamp = 1_700_000_000;
    header.user = b"developer".to_vec();
    header.group = b"staff".to_vec();
    header
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for level in 0..=2u8 {
        let bytes = sample(level).encode().expect("encode sample header");
        group.bench_with_input(BenchmarkId::new("level", level), &bytes, |b, bytes| {
            b.iter(|| black_box(LhaHeader::decode(black_box(bytes))));
        });
    }

    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");

    for level in 0..=2u8 {
        let header = sample(level);
        group.bench_with_input(BenchmarkId::new("unix", level), &header, |b, header| {
            b.iter(|| black_box(header.encode()));
        });
        group.bench_with_input(BenchmarkId::new("generic", level), &header, |b, header| {
            b.iter(|| black_box(encode_header(header, &EncodeOptions::GENERIC)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_decode, bench_encode);
criterion_main!(benches);
