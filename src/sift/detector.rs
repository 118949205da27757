//! C3: DoG extremum detection, sub-pixel/sub-scale refinement, and
//! edge-response rejection (spec §4.3).

use glam::{Mat3, Vec3};

use crate::pyramid::Octave;

use super::config::SiftConfig;
use super::keypoint::Keypoint;

/// Pre-refinement screen: reject candidates below 80% of `peakThresh`
/// before paying for the 26-neighbour extremum test (spec §4.3, Design
/// Notes §9 "preserve bitwise").
const PEAK_PRESCREEN: f32 = 0.8;
/// Maximum number of integer re-centering iterations during refinement.
const REFINE_MAX_ITERS: u32 = 5;
/// Component of the Newton step beyond which the integer base point is
/// re-centered and refinement retried.
const REFINE_SHIFT_THRESH: f32 = 0.5;
/// Component of the final Newton step beyond which the candidate is
/// discarded as divergent.
const REFINE_DIVERGENCE: f32 = 1.5;

/// Detect, refine, and edge-filter every DoG extremum in `octave`.
pub fn detect_octave_extrema(octave: &Octave, config: &SiftConfig) -> Vec<Keypoint> {
  let geom = octave.geometry;
  let levels = geom.last_subdiv - 1; // S
  let width = geom.width;
  let height = geom.height;
  let mut keypoints = Vec::new();

  if width < 3 || height < 3 {
    return keypoints;
  }

  for s in (geom.first_subdiv + 1)..=(geom.last_subdiv - 2) {
    let cur = match octave.dog(s) {
      Some(level) => level,
      None => continue,
    };
    for y in 1..height - 1 {
      for x in 1..width - 1 {
        let value = cur.get(x, y);
        if value.abs() < PEAK_PRESCREEN * config.peak_thresh {
          continue;
        }
        if !is_local_extremum(octave, x, y, s, value) {
          continue;
        }
        if let Some(kp) = refine_and_reject(octave, x, y, s, config, levels) {
          keypoints.push(kp);
        }
      }
    }
  }

  keypoints
}

/// Strict local max/min test against all 26 neighbours across (x+-1, y+-1,
/// s+-1) (spec §4.3 "Extremum detection").
fn is_local_extremum(octave: &Octave, x: usize, y: usize, s: i32, value: f32) -> bool {
  let mut is_max = true;
  let mut is_min = true;

  for ds in -1..=1i32 {
    let level = match octave.dog(s + ds) {
      Some(level) => level,
      None => return false,
    };
    for dy in -1isize..=1 {
      for dx in -1isize..=1 {
        if ds == 0 && dx == 0 && dy == 0 {
          continue;
        }
        let nx = (x as isize + dx) as usize;
        let ny = (y as isize + dy) as usize;
        let neighbour = level.get(nx, ny);
        if neighbour >= value {
          is_max = false;
        }
        if neighbour <= value {
          is_min = false;
        }
        if !is_max && !is_min {
          return false;
        }
      }
    }
  }

  is_max || is_min
}

/// First and second derivatives of the DoG function at `(x, y, s)`, via
/// centred differences across the three adjacent DoG levels.
fn dog_derivatives(octave: &Octave, x: usize, y: usize, s: i32) -> Option<(Vec3, Mat3)> {
  let cur = octave.dog(s)?;
  let prev = octave.dog(s - 1)?;
  let next = octave.dog(s + 1)?;

  let (xp, xm, yp, ym) = (x + 1, x - 1, y + 1, y - 1);

  let dx = 0.5 * (cur.get(xp, y) - cur.get(xm, y));
  let dy = 0.5 * (cur.get(x, yp) - cur.get(x, ym));
  let ds = 0.5 * (next.get(x, y) - prev.get(x, y));

  let dxx = cur.get(xp, y) - 2.0 * cur.get(x, y) + cur.get(xm, y);
  let dyy = cur.get(x, yp) - 2.0 * cur.get(x, y) + cur.get(x, ym);
  let dss = next.get(x, y) - 2.0 * cur.get(x, y) + prev.get(x, y);
  let dxy = 0.25 * (cur.get(xp, yp) - cur.get(xp, ym) - cur.get(xm, yp) + cur.get(xm, ym));
  let dxs = 0.25 * (next.get(xp, y) - next.get(xm, y) - prev.get(xp, y) + prev.get(xm, y));
  let dys = 0.25 * (next.get(x, yp) - next.get(x, ym) - prev.get(x, yp) + prev.get(x, ym));

  let grad = Vec3::new(dx, dy, ds);
  // Symmetric by construction; columns double as rows.
  let hessian = Mat3::from_cols(
    Vec3::new(dxx, dxy, dxs),
    Vec3::new(dxy, dyy, dys),
    Vec3::new(dxs, dys, dss),
  );
  Some((grad, hessian))
}

/// Iterative sub-pixel refinement (spec §4.3 "Sub-pixel refinement"),
/// contrast rejection, and edge rejection. Returns `None` if the candidate
/// is rejected at any stage.
fn refine_and_reject(
  octave: &Octave,
  mut x: usize,
  mut y: usize,
  mut s: i32,
  config: &SiftConfig,
  levels: i32,
) -> Option<Keypoint> {
  let geom = octave.geometry;
  let width = geom.width;
  let height = geom.height;

  let xi = x as i32;
  let yi = y as i32;
  let si = s;

  let mut delta = Vec3::ZERO;
  let mut converged = false;

  for _ in 0..REFINE_MAX_ITERS {
    let (grad, hessian) = dog_derivatives(octave, x, y, s)?;
    if hessian.determinant().abs() < 1e-12 {
      return None;
    }
    delta = hessian.inverse() * (-grad);

    let mut shifted = false;
    if delta.x > REFINE_SHIFT_THRESH && x + 2 < width {
      x += 1;
      shifted = true;
    } else if delta.x < -REFINE_SHIFT_THRESH && x > 1 {
      x -= 1;
      shifted = true;
    }
    if delta.y > REFINE_SHIFT_THRESH && y + 2 < height {
      y += 1;
      shifted = true;
    } else if delta.y < -REFINE_SHIFT_THRESH && y > 1 {
      y -= 1;
      shifted = true;
    }
    if delta.z > REFINE_SHIFT_THRESH && s + 1 <= geom.last_subdiv - 2 {
      s += 1;
      shifted = true;
    } else if delta.z < -REFINE_SHIFT_THRESH && s - 1 >= geom.first_subdiv + 1 {
      s -= 1;
      shifted = true;
    }

    if !shifted {
      converged = true;
      break;
    }
  }

  let _ = converged; // hitting the iteration cap without settling is not itself fatal; the divergence check below is what matters.

  if delta.x.abs() > REFINE_DIVERGENCE
    || delta.y.abs() > REFINE_DIVERGENCE
    || delta.z.abs() > REFINE_DIVERGENCE
  {
    return None;
  }

  let (grad, _) = dog_derivatives(octave, x, y, s)?;
  let base_value = octave.dog(s)?.get(x, y);
  let refined_value = base_value + 0.5 * grad.dot(delta);
  if refined_value.abs() < config.peak_thresh {
    return None;
  }

  if !passes_edge_test(octave, x, y, s, config.edge_thresh) {
    return None;
  }

  let step = geom.step;
  let sigma = geom.base_sigma * 2f32.powf(geom.index as f32 + (s as f32 + delta.z) / levels as f32);
  let x_img = (x as f32 + delta.x) * step;
  let y_img = (y as f32 + delta.y) * step;

  Some(Keypoint {
    x: x_img,
    y: y_img,
    sigma,
    o: geom.index,
    s,
    xi,
    yi,
    si,
  })
}

/// Spatial-Hessian edge rejection (spec §4.3 "Edge rejection").
fn passes_edge_test(octave: &Octave, x: usize, y: usize, s: i32, edge_thresh: f32) -> bool {
  let cur = match octave.dog(s) {
    Some(level) => level,
    None => return false,
  };
  let (xp, xm, yp, ym) = (x + 1, x - 1, y + 1, y - 1);

  let dxx = cur.get(xp, y) - 2.0 * cur.get(x, y) + cur.get(xm, y);
  let dyy = cur.get(x, yp) - 2.0 * cur.get(x, y) + cur.get(x, ym);
  let dxy = 0.25 * (cur.get(xp, yp) - cur.get(xp, ym) - cur.get(xm, yp) + cur.get(xm, ym));

  let trace = dxx + dyy;
  let det = dxx * dyy - dxy * dxy;
  if det <= 0.0 {
    return false;
  }
  let ratio = trace * trace / det;
  let threshold = (edge_thresh + 1.0).powi(2) / edge_thresh;
  ratio <= threshold
}

#[cfg(test)]
#[path = "detector_test.rs"]
mod detector_test;
