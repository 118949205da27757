//! Dominant-orientation histogram (spec §4.4 "Orientation assignment").
//! Shared between the SIFT descriptor (C4) and the covariant frontend's
//! per-patch orientation estimation (C5).

use std::f32::consts::PI;

use smallvec::SmallVec;

use crate::image::PolarGradient;

const NUM_BINS: usize = 36;
/// Number of 3-tap moving-average smoothing passes; behavioural constant,
/// preserved bitwise per Design Notes §9.
const SMOOTHING_PASSES: usize = 6;
/// A histogram bin is reported as a peak within 80% of the maximum.
const PEAK_THRESHOLD_RATIO: f32 = 0.8;
/// At most 4 orientations per keypoint (spec §4.4).
pub const MAX_ORIENTATIONS: usize = 4;

/// Build the smoothed 36-bin orientation histogram around `(x, y)` at
/// scale `sigma`, then return every peak within 80% of the maximum as a
/// parabolically-refined angle in `[0, 2*pi)`.
pub fn assign_orientations(
  grad: &PolarGradient,
  x: f32,
  y: f32,
  sigma: f32,
) -> SmallVec<[f32; MAX_ORIENTATIONS]> {
  let win_sigma = 1.5 * sigma;
  let radius = (3.0 * win_sigma).ceil().max(1.0) as isize;

  let width = grad.magnitude.width() as isize;
  let height = grad.magnitude.height() as isize;
  let xi = x.round() as isize;
  let yi = y.round() as isize;

  let mut hist = [0f32; NUM_BINS];
  let radius2 = (radius * radius) as f32;

  for dy in -radius..=radius {
    let py = yi + dy;
    if py < 0 || py >= height {
      continue;
    }
    for dx in -radius..=radius {
      let px = xi + dx;
      if px < 0 || px >= width {
        continue;
      }
      let rx = px as f32 - x;
      let ry = py as f32 - y;
      let dist2 = rx * rx + ry * ry;
      if dist2 > radius2 {
        continue;
      }

      let weight = (-dist2 / (2.0 * win_sigma * win_sigma)).exp();
      let mag = grad.magnitude.get(px as usize, py as usize);
      let theta = grad.orientation.get(px as usize, py as usize);
      let contribution = weight * mag;

      let bin_f = theta / (2.0 * PI) * NUM_BINS as f32;
      let bin0 = bin_f.floor();
      let frac = bin_f - bin0;
      let b0 = (bin0 as isize).rem_euclid(NUM_BINS as isize) as usize;
      let b1 = (b0 + 1) % NUM_BINS;
      hist[b0] += contribution * (1.0 - frac);
      hist[b1] += contribution * frac;
    }
  }

  smooth_histogram(&mut hist);
  find_peaks(&hist)
}

/// 6 passes of a 3-tap circular moving average, a near-Gaussian smoother
/// cheap enough to apply repeatedly (spec §4.4).
fn smooth_histogram(hist: &mut [f32; NUM_BINS]) {
  for _ in 0..SMOOTHING_PASSES {
    let mut next = [0f32; NUM_BINS];
    for i in 0..NUM_BINS {
      let prev = hist[(i + NUM_BINS - 1) % NUM_BINS];
      let cur = hist[i];
      let nxt = hist[(i + 1) % NUM_BINS];
      next[i] = (prev + cur + nxt) / 3.0;
    }
    *hist = next;
  }
}

fn find_peaks(hist: &[f32; NUM_BINS]) -> SmallVec<[f32; MAX_ORIENTATIONS]> {
  let max_value = hist.iter().cloned().fold(0.0f32, f32::max);
  let mut peaks = SmallVec::new();
  if max_value <= 0.0 {
    return peaks;
  }

  for i in 0..NUM_BINS {
    let prev = hist[(i + NUM_BINS - 1) % NUM_BINS];
    let cur = hist[i];
    let nxt = hist[(i + 1) % NUM_BINS];
    if cur <= prev || cur <= nxt {
      continue;
    }
    if cur < PEAK_THRESHOLD_RATIO * max_value {
      continue;
    }

    // Parabolic refinement against the two neighbouring bins.
    let denom = prev - 2.0 * cur + nxt;
    let offset = if denom.abs() > 1e-12 {
      0.5 * (prev - nxt) / denom
    } else {
      0.0
    };
    let refined_bin = i as f32 + offset;
    let mut theta = refined_bin * (2.0 * PI / NUM_BINS as f32);
    if theta < 0.0 {
      theta += 2.0 * PI;
    } else if theta >= 2.0 * PI {
      theta -= 2.0 * PI;
    }

    peaks.push(theta);
    if peaks.len() == MAX_ORIENTATIONS {
      break;
    }
  }

  peaks
}

#[cfg(test)]
#[path = "orientation_test.rs"]
mod orientation_test;
