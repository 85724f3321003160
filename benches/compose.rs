//! Benchmarks for pipeline compositing.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use filterchain::prelude::*;

fn solid(format: PixelFormat, size: u32, px: Pixel) -> Raster {
    let mut raster = Raster::new(format, Rect::from_size(size, size));
    raster.fill(px);
    raster
}

/// Benchmark draw_at with each operator and a few worker counts.
fn bench_draw_at(c: &mut Criterion) {
    let mut group = c.benchmark_group("draw_at");
    let size = 1024u32;
    group.throughput(Throughput::Elements(u64::from(size) * u64::from(size)));

    let src = solid(PixelFormat::Nrgba8, size, Pixel::from_rgba8(255, 0, 0, 128));

    for workers in [1usize, 2, 6] {
        let pipeline = Pipeline::with_options(Options::new().with_workers(workers), vec![Box::new(Identity)]);

        for op in [Operator::Replace, Operator::Over] {
            let mut dst = solid(PixelFormat::Rgba8, size, Pixel::from_rgba8(0, 0, 255, 255));
            let id = BenchmarkId::new(format!("{op:?}").to_lowercase(), workers);
            group.bench_function(id, |b| {
                b.iter(|| {
                    pipeline
                        .draw_at(&mut dst.view_mut(), &src.view(), black_box(Point::new(-7, 13)), op)
                        .unwrap()
                })
            });
        }
    }

    group.finish();
}

/// Benchmark the blend kernel on its own.
fn bench_blend_over(c: &mut Criterion) {
    let under = Pixel::new(0.1, 0.2, 0.3, 0.8);
    let over = Pixel::new(0.9, 0.5, 0.1, 0.4);
    c.bench_function("blend_over", |b| b.iter(|| blend_over(black_box(under), black_box(over))));
}

criterion_group!(benches, bench_draw_at, bench_blend_over);
criterion_main!(benches);
