//! Criterion benchmarks for the batch extractor
//!
//! Run with: cargo bench -p cepstra-extractor

use cepstra_core::ParameterMap;
use cepstra_extractor::BatchExtractor;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use std::f32::consts::PI;

const SAMPLE_RATE: f32 = 44100.0;

fn generate_sine(size: usize, frequency: f32) -> Vec<f32> {
    (0..size)
        .map(|i| (2.0 * PI * frequency * i as f32 / SAMPLE_RATE).sin())
        .collect()
}

fn bench_compute(c: &mut Criterion) {
    let mut group = c.benchmark_group("Batch_Compute");
    let mut extractor = BatchExtractor::new().unwrap();

    for &seconds in &[1usize, 5] {
        let signal = generate_sine(seconds * SAMPLE_RATE as usize, 440.0);
        group.throughput(Throughput::Elements(signal.len() as u64));
        group.bench_with_input(BenchmarkId::new("seconds", seconds), &signal, |b, signal| {
            b.iter(|| black_box(extractor.compute(black_box(signal)).unwrap()))
        });
    }

    group.finish();
}

fn bench_frame_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("Batch_FrameSize");
    let signal = generate_sine(SAMPLE_RATE as usize, 440.0);

    for &frame_size in &[512i64, 1024, 2048, 4096] {
        let mut extractor = BatchExtractor::new().unwrap();
        extractor
            .configure(
                &ParameterMap::new()
                    .with("frameSize", frame_size)
                    .with("hopSize", frame_size / 2),
            )
            .unwrap();
        group.bench_with_input(
            BenchmarkId::from_parameter(frame_size),
            &signal,
            |b, signal| b.iter(|| black_box(extractor.compute(black_box(signal)).unwrap())),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_compute, bench_frame_sizes);
criterion_main!(benches);
