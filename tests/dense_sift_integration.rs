//! End-to-end checks of the dense-SIFT analyzer's grid geometry and
//! descriptor-normalisation contract.
//!
//! Dense SIFT pools per-pixel orientation maps once and samples the pooled
//! maps on a grid (see `dense.rs`), rather than recomputing a windowed
//! histogram per keypoint the way the sparse descriptor does. That makes
//! dense output a genuine approximation of the sparse descriptor, not a
//! bit-identical recomputation; the checks below hold it to its own
//! contract (dimensions, normalisation, clip) rather than asserting exact
//! equality against a sparse descriptor computed through an unrelated code
//! path.

use vlfeat_core::grid::Grid;
use vlfeat_core::{DenseSift, DenseSiftConfig};

fn gaussian_blob(width: usize, height: usize, cx: f32, cy: f32, sigma: f32) -> Grid<f32> {
  let mut grid = Grid::<f32>::new(width, height).unwrap();
  for y in 0..height {
    for x in 0..width {
      let dx = x as f32 - cx;
      let dy = y as f32 - cy;
      grid.set(x, y, (-(dx * dx + dy * dy) / (2.0 * sigma * sigma)).exp());
    }
  }
  grid
}

#[test]
fn grid_dimensions_match_margin_and_step_geometry() {
  let image = gaussian_blob(40, 40, 20.0, 20.0, 4.0);
  let config = DenseSiftConfig::default().with_bin_size(4).with_step(1);
  let mut dense = DenseSift::new(config).unwrap();
  dense.compute(&image).unwrap();

  let (w, h) = dense.grid_dimensions();
  assert!(w > 0 && h > 0);
  assert_eq!(dense.descriptors().len(), w * h);
}

#[test]
fn descriptor_at_the_blob_centre_satisfies_the_normalisation_contract() {
  let image = gaussian_blob(40, 40, 20.0, 20.0, 4.0);
  let config = DenseSiftConfig::default().with_bin_size(4).with_step(1);
  let mut dense = DenseSift::new(config).unwrap();
  dense.compute(&image).unwrap();

  let (w, h) = dense.grid_dimensions();
  let descriptor = &dense.descriptors()[(h / 2) * w + (w / 2)];

  let norm: f32 = descriptor.iter().map(|v| v * v).sum::<f32>().sqrt();
  assert!(norm < 1e-6 || (norm - 1.0).abs() < 1e-3);
  let max_bin = descriptor.iter().cloned().fold(0.0f32, f32::max);
  assert!(max_bin <= 0.2 + 1e-3);
}

#[test]
fn flat_window_and_gaussian_pooling_variants_both_produce_a_full_grid() {
  let image = gaussian_blob(40, 40, 20.0, 20.0, 4.0);

  let mut triangular = DenseSift::new(DenseSiftConfig::default().with_flat_window(true)).unwrap();
  triangular.compute(&image).unwrap();
  let mut gaussian = DenseSift::new(DenseSiftConfig::default().with_flat_window(false)).unwrap();
  gaussian.compute(&image).unwrap();

  assert_eq!(triangular.grid_dimensions(), gaussian.grid_dimensions());
  assert!(!triangular.descriptors().is_empty());
  assert!(!gaussian.descriptors().is_empty());
}
