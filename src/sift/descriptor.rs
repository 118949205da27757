//! Gradient-window descriptor (spec §4.4 "Gradient-window descriptor") and
//! the owned storage for a batch of them.

use std::f32::consts::PI;

use crate::grid::Grid;
use crate::image::PolarGradient;

const NX: usize = 4;
const NY: usize = 4;
const NTHETA: usize = 8;
/// 4x4x8, flattened with `theta` changing fastest.
pub const DESCRIPTOR_LEN: usize = NX * NY * NTHETA;
/// Per-entry clip applied before the final renormalisation (spec §4.4,
/// Design Notes §9 "preserve bitwise").
const DESCRIPTOR_CLIP: f32 = 0.2;
/// Integer-quantisation scale for `floatDescriptors = false`.
const QUANTIZE_SCALE: f32 = 512.0;

/// Raw descriptor storage, either `f32` or quantized `u8` depending on
/// `SiftConfig::float_descriptors` (spec §6).
pub struct Descriptors {
  float_mode: bool,
  floats: Vec<[f32; DESCRIPTOR_LEN]>,
  bytes: Vec<[u8; DESCRIPTOR_LEN]>,
}

impl Descriptors {
  pub fn new() -> Self {
    Self {
      float_mode: false,
      floats: Vec::new(),
      bytes: Vec::new(),
    }
  }

  pub fn clear(&mut self, float_mode: bool) {
    self.float_mode = float_mode;
    self.floats.clear();
    self.bytes.clear();
  }

  pub fn push_float(&mut self, d: [f32; DESCRIPTOR_LEN]) {
    self.floats.push(d);
  }

  pub fn push_byte(&mut self, d: [u8; DESCRIPTOR_LEN]) {
    self.bytes.push(d);
  }

  pub fn is_float(&self) -> bool {
    self.float_mode
  }

  pub fn len(&self) -> usize {
    if self.float_mode {
      self.floats.len()
    } else {
      self.bytes.len()
    }
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn floats(&self) -> &[[f32; DESCRIPTOR_LEN]] {
    &self.floats
  }

  pub fn bytes(&self) -> &[[u8; DESCRIPTOR_LEN]] {
    &self.bytes
  }
}

impl Default for Descriptors {
  fn default() -> Self {
    Self::new()
  }
}

/// Accumulate the raw (unnormalised) 4x4x8 gradient-window histogram
/// around `(x, y)` at scale `sigma`, rotated by `theta`.
pub fn compute_descriptor(
  level: &Grid<f32>,
  grad: &PolarGradient,
  x: f32,
  y: f32,
  sigma: f32,
  theta: f32,
  magnif: f32,
  window_size: f32,
) -> [f32; DESCRIPTOR_LEN] {
  let mut hist = [0f32; DESCRIPTOR_LEN];

  let bin_side = magnif * sigma;
  if bin_side <= 0.0 {
    return hist;
  }
  let radius = (bin_side * (NX as f32 + 1.0) / 2.0).ceil().max(1.0) as isize;

  let cos_t = theta.cos();
  let sin_t = theta.sin();

  let width = level.width() as isize;
  let height = level.height() as isize;
  let xi = x.round() as isize;
  let yi = y.round() as isize;

  for dy in -radius..=radius {
    let py = yi + dy;
    if py < 1 || py >= height - 1 {
      continue;
    }
    for dx in -radius..=radius {
      let px = xi + dx;
      if px < 1 || px >= width - 1 {
        continue;
      }

      let rel_x = px as f32 - x;
      let rel_y = py as f32 - y;

      // Rotate the spatial offset into the descriptor frame: the
      // keypoint's dominant orientation maps onto the +x axis.
      let rot_x = cos_t * rel_x + sin_t * rel_y;
      let rot_y = -sin_t * rel_x + cos_t * rel_y;

      let nx = rot_x / bin_side;
      let ny = rot_y / bin_side;
      let bin_x = nx + NX as f32 / 2.0 - 0.5;
      let bin_y = ny + NY as f32 / 2.0 - 0.5;
      if bin_x <= -1.0 || bin_x >= NX as f32 || bin_y <= -1.0 || bin_y >= NY as f32 {
        continue;
      }

      let mag = grad.magnitude.get(px as usize, py as usize);
      let phi = grad.orientation.get(px as usize, py as usize);
      let rel_theta = (phi - theta).rem_euclid(2.0 * PI);
      let bin_t = rel_theta / (2.0 * PI) * NTHETA as f32;

      let spatial_dist2 = nx * nx + ny * ny;
      let weight = (-spatial_dist2 / (2.0 * window_size * window_size)).exp() * mag;

      trilinear_accumulate(&mut hist, bin_x, bin_y, bin_t, weight);
    }
  }

  hist
}

/// Distribute `weight` into the 8 (or fewer, near the theta wrap) cube
/// corners surrounding `(bin_x, bin_y, bin_t)`.
fn trilinear_accumulate(
  hist: &mut [f32; DESCRIPTOR_LEN],
  bin_x: f32,
  bin_y: f32,
  bin_t: f32,
  weight: f32,
) {
  let x0 = bin_x.floor();
  let y0 = bin_y.floor();
  let t0 = bin_t.floor();
  let fx = bin_x - x0;
  let fy = bin_y - y0;
  let ft = bin_t - t0;

  for (ix, wx) in [(x0 as isize, 1.0 - fx), (x0 as isize + 1, fx)] {
    if ix < 0 || ix >= NX as isize {
      continue;
    }
    for (iy, wy) in [(y0 as isize, 1.0 - fy), (y0 as isize + 1, fy)] {
      if iy < 0 || iy >= NY as isize {
        continue;
      }
      for (it, wt) in [(t0 as isize, 1.0 - ft), (t0 as isize + 1, ft)] {
        let itm = it.rem_euclid(NTHETA as isize) as usize;
        let idx = (iy as usize * NX + ix as usize) * NTHETA + itm;
        hist[idx] += weight * wx * wy * wt;
      }
    }
  }
}

/// Unit-L2-normalise, clip to `0.2`, renormalise (spec §4.4). Descriptors
/// whose pre-clip norm falls below `norm_thresh` are zeroed rather than
/// normalised (a near-zero-contrast window is not a meaningful direction).
pub fn normalize_descriptor(raw: [f32; DESCRIPTOR_LEN], norm_thresh: f32) -> [f32; DESCRIPTOR_LEN] {
  let norm = l2_norm(&raw);
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
  let renorm = l2_norm(&d);
  if renorm > 1e-12 {
    for v in d.iter_mut() {
      *v /= renorm;
    }
  }
  d
}

fn l2_norm(d: &[f32; DESCRIPTOR_LEN]) -> f32 {
  d.iter().map(|v| v * v).sum::<f32>().sqrt()
}

/// Integer quantisation: multiply by 512, clip to `[0, 255]` (spec §4.4,
/// Design Notes §9 "preserve bitwise").
pub fn quantize_descriptor(d: &[f32; DESCRIPTOR_LEN]) -> [u8; DESCRIPTOR_LEN] {
  let mut out = [0u8; DESCRIPTOR_LEN];
  for (o, v) in out.iter_mut().zip(d.iter()) {
    *o = (*v * QUANTIZE_SCALE).round().clamp(0.0, 255.0) as u8;
  }
  out
}

#[cfg(test)]
#[path = "descriptor_test.rs"]
mod descriptor_test;
