//! Benchmark MSER component-tree construction and region selection.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use vlfeat_core::grid::Grid;
use vlfeat_core::mser::{MserConfig, MserDetector};

fn scattered_discs(size: usize, count: usize) -> Grid<u8> {
  let mut grid = Grid::<u8>::new(size, size).unwrap();
  let radius = (size as f32 / (count as f32 * 2.0)).max(3.0);
  for i in 0..count {
    let cx = ((i as f32 + 0.5) / count as f32) * size as f32;
    let cy = size as f32 / 2.0;
    for y in 0..size {
      for x in 0..size {
        let dx = x as f32 - cx;
        let dy = y as f32 - cy;
        if dx * dx + dy * dy <= radius * radius {
          grid.set(x, y, 255);
        }
      }
    }
  }
  grid
}

fn bench_process(c: &mut Criterion) {
  let mut group = c.benchmark_group("mser_process");
  for size in [64usize, 128, 256] {
    let image = scattered_discs(size, 6);
    group.bench_with_input(BenchmarkId::new("size", size), &size, |b, _| {
      b.iter(|| {
        let mut detector = MserDetector::new(MserConfig::default()).unwrap();
        detector.process(black_box(&image)).unwrap();
        black_box(detector.regions().len())
      })
    });
  }
  group.finish();
}

fn bench_ellipse_fit(c: &mut Criterion) {
  let image = scattered_discs(128, 6);
  c.bench_function("mser_fit_ellipses (128x128, 6 discs)", |b| {
    b.iter(|| {
      let mut detector = MserDetector::new(MserConfig::default()).unwrap();
      detector.process(black_box(&image)).unwrap();
      black_box(detector.fit_ellipses().len())
    })
  });
}

criterion_group!(benches, bench_process, bench_ellipse_fit);
criterion_main!(benches);
