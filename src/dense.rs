//! C6: dense SIFT — the same orientation-histogram and gradient-window
//! idea as C4, but amortised over the whole image: per-pixel orientation
//! maps are pooled once with a separable kernel, then sampled on a regular
//! grid instead of being recomputed per keypoint (spec §4.6 "Dense SIFT").

use crate::error::{CoreError, Result};
use crate::grid::Grid;
use crate::image::{convolve_separable, convolve_triangular, gradient_polar, Padding, PolarGradient};

const NTHETA: usize = 8;
const NX: usize = 4;
const NY: usize = 4;
/// 4x4x8, flattened with `theta` changing fastest (matches the sparse
/// descriptor's layout in `sift::descriptor`).
pub const DESCRIPTOR_LEN: usize = NX * NY * NTHETA;
const DESCRIPTOR_CLIP: f32 = 0.2;

/// Dense SIFT parameters (spec §4.6 / §6 "bin size, step, bounds, flat
/// window?").
#[derive(Clone, Debug, PartialEq)]
pub struct DenseSiftConfig {
  pub bin_size: usize,
  pub step: usize,
  /// Triangular (`true`) vs. near-Gaussian (`false`) spatial pooling
  /// kernel.
  pub flat_window: bool,
  pub norm_thresh: f32,
}

impl Default for DenseSiftConfig {
  fn default() -> Self {
    Self {
      bin_size: 4,
      step: 1,
      flat_window: false,
      norm_thresh: 0.0,
    }
  }
}

impl DenseSiftConfig {
  pub fn validate(&self) -> Result<()> {
    if self.bin_size == 0 {
      return Err(CoreError::invalid("binSize must be >= 1"));
    }
    if self.step == 0 {
      return Err(CoreError::invalid("step must be >= 1"));
    }
    Ok(())
  }

  pub fn with_bin_size(mut self, v: usize) -> Self {
    self.bin_size = v;
    self
  }

  pub fn with_step(mut self, v: usize) -> Self {
    self.step = v;
    self
  }

  pub fn with_flat_window(mut self, v: bool) -> Self {
    self.flat_window = v;
    self
  }

  pub fn with_norm_thresh(mut self, v: f32) -> Self {
    self.norm_thresh = v;
    self
  }
}

/// Stateful dense-SIFT analyzer; `compute` overwrites any prior result.
pub struct DenseSift {
  config: DenseSiftConfig,
  descriptors: Vec<[f32; DESCRIPTOR_LEN]>,
  grid_width: usize,
  grid_height: usize,
}

impl DenseSift {
  pub fn new(config: DenseSiftConfig) -> Result<Self> {
    config.validate()?;
    Ok(Self {
      config,
      descriptors: Vec::new(),
      grid_width: 0,
      grid_height: 0,
    })
  }

  #[cfg_attr(feature = "trace", tracing::instrument(skip_all, name = "dense::compute"))]
  pub fn compute(&mut self, image: &Grid<f32>) -> Result<()> {
    self.descriptors.clear();
    self.grid_width = 0;
    self.grid_height = 0;

    let grad = gradient_polar(image)?;
    let channels = orientation_channels(&grad);
    let pooled = pool_channels(&channels, self.config.bin_size, self.config.flat_window)?;

    let bin = self.config.bin_size as f32;
    let margin = (2.0 * bin).ceil() as isize;
    let width = image.width() as isize;
    let height = image.height() as isize;
    let step = self.config.step as isize;

    if margin * 2 >= width || margin * 2 >= height {
      return Ok(());
    }

    let mut cy = margin;
    while cy < height - margin {
      let mut cx = margin;
      let mut row_width = 0usize;
      while cx < width - margin {
        let raw = sample_descriptor(&pooled, cx, cy, bin);
        let normalized = normalize(raw, self.config.norm_thresh);
        self.descriptors.push(normalized);
        row_width += 1;
        cx += step;
      }
      self.grid_width = row_width;
      self.grid_height += 1;
      cy += step;
    }

    Ok(())
  }

  pub fn descriptors(&self) -> &[[f32; DESCRIPTOR_LEN]] {
    &self.descriptors
  }

  pub fn grid_dimensions(&self) -> (usize, usize) {
    (self.grid_width, self.grid_height)
  }

  pub fn config(&self) -> &DenseSiftConfig {
    &self.config
  }
}

/// Trilinearly distribute each pixel's gradient into 8 per-pixel
/// orientation-weighted maps (spec §4.6 step 1).
fn orientation_channels(grad: &PolarGradient) -> Vec<Grid<f32>> {
  use std::f32::consts::PI;

  let width = grad.magnitude.width();
  let height = grad.magnitude.height();
  let mut channels: Vec<Grid<f32>> = (0..NTHETA)
    .map(|_| Grid::<f32>::new(width, height).expect("channel dims mirror the input image"))
    .collect();

  for y in 0..height {
    for x in 0..width {
      let mag = grad.magnitude.get(x, y);
      let theta = grad.orientation.get(x, y);
      let bin_f = theta / (2.0 * PI) * NTHETA as f32;
      let b0f = bin_f.floor();
      let frac = bin_f - b0f;
      let b0 = (b0f as isize).rem_euclid(NTHETA as isize) as usize;
      let b1 = (b0 + 1) % NTHETA;
      let v0 = channels[b0].get(x, y);
      channels[b0].set(x, y, v0 + mag * (1.0 - frac));
      let v1 = channels[b1].get(x, y);
      channels[b1].set(x, y, v1 + mag * frac);
    }
  }

  channels
}

/// Separable pooling of each orientation channel with a triangular
/// (`flat_window`) or near-Gaussian kernel sized to `bin_size` (spec
/// §4.6 step 2).
fn pool_channels(channels: &[Grid<f32>], bin_size: usize, flat_window: bool) -> Result<Vec<Grid<f32>>> {
  channels
    .iter()
    .map(|c| {
      if flat_window {
        convolve_triangular(c, bin_size, 1, 1, Padding::Zero)
      } else {
        let sigma = bin_size as f32 * 0.5;
        let radius = (sigma * 3.0).ceil().max(1.0) as isize;
        let mut kernel = Vec::with_capacity((2 * radius + 1) as usize);
        let mut sum = 0.0f32;
        for d in -radius..=radius {
          let v = (-(d as f32 * d as f32) / (2.0 * sigma * sigma)).exp();
          kernel.push(v);
          sum += v;
        }
        for v in &mut kernel {
          *v /= sum;
        }
        convolve_separable(c, &kernel, -radius, radius, 1, 1, Padding::Zero)
      }
    })
    .collect()
}

/// Sample the pooled orientation maps at the four bin centers spaced
/// `bin` pixels apart along each axis, forming the 4x4x8 descriptor (spec
/// §4.6 step 3).
fn sample_descriptor(pooled: &[Grid<f32>], cx: isize, cy: isize, bin: f32) -> [f32; DESCRIPTOR_LEN] {
  let mut out = [0f32; DESCRIPTOR_LEN];
  let offsets = [-1.5f32, -0.5, 0.5, 1.5];
  let max_x = (pooled[0].width() - 1) as f32;
  let max_y = (pooled[0].height() - 1) as f32;

  for (by, oy) in offsets.iter().enumerate() {
    for (bx, ox) in offsets.iter().enumerate() {
      let px = ((cx as f32 + ox * bin).round()).clamp(0.0, max_x) as usize;
      let py = ((cy as f32 + oy * bin).round()).clamp(0.0, max_y) as usize;
      for (t, channel) in pooled.iter().enumerate() {
        out[(by * NX + bx) * NTHETA + t] = channel.get(px, py);
      }
    }
  }

  out
}

/// Unit-L2-normalise, clip to `0.2`, renormalise — identical contract to
/// the sparse descriptor (spec §4.6 step 4).
fn normalize(raw: [f32; DESCRIPTOR_LEN], norm_thresh: f32) -> [f32; DESCRIPTOR_LEN] {
  let norm = raw.iter().map(|v| v * v).sum::<f32>().sqrt();
  if norm < norm_thresh {
    return [0.0; DESCRIPTOR_LEN];
  }
  let mut d = raw;
  if norm > 1e-12 {
    for v in d.iter_mut() {
      *v /= norm;
    }
  }
  for v in d.iter_mut() {
    if *v > DESCRIPTOR_CLIP {
      *v = DESCRIPTOR_CLIP;
    }
  }
  let renorm = d.iter().map(|v| v * v).sum::<f32>().sqrt();
  if renorm > 1e-12 {
    for v in d.iter_mut() {
      *v /= renorm;
    }
  }
  d
}

#[cfg(test)]
#[path = "dense_test.rs"]
mod dense_test;
