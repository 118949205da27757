//! C5: affine shape adaptation, orientation estimation on affine-normalised
//! patches, and patch extraction for downstream descriptors (spec §4.5).

use glam::{Mat2, Vec2};
use smallvec::SmallVec;

use crate::frame::Frame;
use crate::grid::Grid;
use crate::image::gradient_polar;
use crate::sift::assign_orientations;

/// Affine shape-adaptation parameters (spec §4.5 "Affine shape adaptation").
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineConfig {
  pub max_iterations: usize,
  /// Stop once `max(eigenvalue)/min(eigenvalue)` of the second-moment
  /// matrix is within this factor of 1 (isotropic, converged).
  pub convergence_ratio: f32,
  /// Reject a frame whose second-moment matrix is more anisotropic than
  /// this ratio even at the iteration cap (ill-conditioned).
  pub max_eigenvalue_ratio: f32,
  /// Half-width, in frame-local (unit-disc) units, of the moment
  /// estimation window.
  pub window_radius: f32,
}

impl Default for AffineConfig {
  fn default() -> Self {
    Self {
      max_iterations: 10,
      convergence_ratio: 1.1,
      max_eigenvalue_ratio: 6.0,
      window_radius: 3.0,
    }
  }
}

/// Iteratively estimates each frame's local second-moment matrix and warps
/// its shape toward isotropy (spec §4.5 "Affine shape adaptation").
pub struct AffineAdapter {
  config: AffineConfig,
}

impl AffineAdapter {
  pub fn new(config: AffineConfig) -> Self {
    Self { config }
  }

  /// Adapt `frame`'s shape against `level`. Returns `None` (not an error —
  /// spec §4.5 "drop features that fail to converge or whose A becomes
  /// ill-conditioned") on non-convergence or ill-conditioning.
  pub fn adapt(&self, frame: Frame, level: &Grid<f32>) -> Option<Frame> {
    let (cx, cy) = frame.center();
    let mut a = frame.shape();

    for _ in 0..self.config.max_iterations {
      let m = self.second_moment_matrix(level, cx, cy, a)?;
      let (eig_lo, eig_hi, eigvecs) = symmetric_eigen(m);
      if eig_lo <= 1e-12 {
        return None;
      }
      let ratio = eig_hi / eig_lo;
      if ratio > self.config.max_eigenvalue_ratio {
        return None;
      }
      if ratio <= self.config.convergence_ratio {
        return Frame::affine(cx, cy, a);
      }

      a = a * inverse_sqrt_symmetric(eig_lo, eig_hi, eigvecs);
    }

    None
  }

  /// Weighted second-moment (structure tensor) matrix over the patch
  /// `center + a*u`, `u` ranging over the unit disc, gradient estimated by
  /// a one-sided finite difference in world space.
  fn second_moment_matrix(&self, level: &Grid<f32>, cx: f32, cy: f32, a: Mat2) -> Option<Mat2> {
    const SAMPLES: usize = 9;
    let radius = self.config.window_radius;
    let step = 2.0 * radius / (SAMPLES as f32 - 1.0);
    let eps = 0.5f32 / radius.max(1e-6);

    let mut m00 = 0.0f32;
    let mut m01 = 0.0f32;
    let mut m11 = 0.0f32;
    let mut weight_sum = 0.0f32;

    for iy in 0..SAMPLES {
      for ix in 0..SAMPLES {
        let u = Vec2::new(-radius + ix as f32 * step, -radius + iy as f32 * step);
        let dist2 = u.length_squared();
        if dist2 > radius * radius {
          continue;
        }
        let weight = (-dist2 / (2.0 * (radius / 2.0).powi(2))).exp();

        let center = Vec2::new(cx, cy);
        let p = a * u + center;
        let px = a * Vec2::new(u.x + eps, u.y) + center;
        let py = a * Vec2::new(u.x, u.y + eps) + center;

        if !in_bounds(level, p) || !in_bounds(level, px) || !in_bounds(level, py) {
          continue;
        }

        let v = level.sample_bilinear(p.x, p.y);
        let gx = (level.sample_bilinear(px.x, px.y) - v) / eps;
        let gy = (level.sample_bilinear(py.x, py.y) - v) / eps;

        m00 += weight * gx * gx;
        m01 += weight * gx * gy;
        m11 += weight * gy * gy;
        weight_sum += weight;
      }
    }

    if weight_sum <= 0.0 {
      return None;
    }
    Some(Mat2::from_cols(
      Vec2::new(m00 / weight_sum, m01 / weight_sum),
      Vec2::new(m01 / weight_sum, m11 / weight_sum),
    ))
  }
}

fn in_bounds(level: &Grid<f32>, p: Vec2) -> bool {
  p.x >= 0.0 && p.y >= 0.0 && p.x <= (level.width() - 1) as f32 && p.y <= (level.height() - 1) as f32
}

/// Eigenvalues (`lo <= hi`) and an eigenvector matrix (columns `[v_lo,
/// v_hi]`, each a unit eigenvector) of a symmetric 2x2 matrix.
fn symmetric_eigen(m: Mat2) -> (f32, f32, Mat2) {
  let a = m.x_axis.x;
  let b = m.x_axis.y; // == m.y_axis.x for a symmetric input
  let d = m.y_axis.y;

  let trace = a + d;
  let diff = a - d;
  let disc = (diff * diff + 4.0 * b * b).max(0.0).sqrt();
  let lo = (trace - disc) / 2.0;
  let hi = (trace + disc) / 2.0;

  let (v_lo, v_hi) = if b.abs() > 1e-12 {
    let v_hi = Vec2::new(hi - d, b).normalize_or_zero();
    let v_lo = Vec2::new(-v_hi.y, v_hi.x);
    (v_lo, v_hi)
  } else if a >= d {
    (Vec2::new(0.0, 1.0), Vec2::new(1.0, 0.0))
  } else {
    (Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0))
  };

  (lo, hi, Mat2::from_cols(v_lo, v_hi))
}

/// `M^-1/2` for a symmetric positive-definite `M` given its eigen
/// decomposition: `V * diag(1/sqrt(lo), 1/sqrt(hi)) * V^T`.
fn inverse_sqrt_symmetric(eig_lo: f32, eig_hi: f32, eigvecs: Mat2) -> Mat2 {
  let d = Mat2::from_cols(
    Vec2::new(1.0 / eig_lo.sqrt(), 0.0),
    Vec2::new(0.0, 1.0 / eig_hi.sqrt()),
  );
  eigvecs * d * eigvecs.transpose()
}

/// Bilinearly sample a `(2*radius+1) x (2*radius+1)` patch around `frame`,
/// mapping patch coordinates to image coordinates via the frame's shape
/// and center, scaled by `extent` (spec §4.5 "Patch extraction").
pub fn extract_patch(frame: &Frame, level: &Grid<f32>, radius: usize, extent: f32) -> Grid<f32> {
  let side = 2 * radius + 1;
  let mut out = Grid::<f32>::new(side, side).expect("patch side is always non-zero");
  let (cx, cy) = frame.center();
  let a = frame.shape();
  let r = (radius as f32).max(1.0);
  let center = Vec2::new(cx, cy);

  for py in 0..side {
    for px in 0..side {
      let u = Vec2::new(extent * (px as f32 - radius as f32) / r, extent * (py as f32 - radius as f32) / r);
      let p = a * u + center;
      out.set(px, py, level.sample_bilinear(p.x, p.y));
    }
  }
  out
}

/// Orientation estimation on an affine-normalised patch (spec §4.5
/// "Orientation estimation"): the same histogram as C4, applied to a patch
/// already warped to a canonical frame; duplicates the caller's frame once
/// per accepted orientation.
pub fn orientations_on_patch(patch: &Grid<f32>, sigma: f32) -> SmallVec<[f32; 4]> {
  let grad = match gradient_polar(patch) {
    Ok(g) => g,
    Err(_) => return SmallVec::new(),
  };
  let cx = patch.width() as f32 / 2.0;
  let cy = patch.height() as f32 / 2.0;
  assign_orientations(&grad, cx, cy, sigma)
}

#[cfg(test)]
#[path = "affine_test.rs"]
mod affine_test;
