//! Polar gradient: magnitude and orientation, used by both the SIFT
//! orientation/descriptor stages and dense SIFT/HOG's per-pixel orientation
//! maps.

use std::f32::consts::PI;

use crate::grid::Grid;

/// Per-pixel gradient magnitude and orientation.
pub struct PolarGradient {
  /// `r = sqrt(gx^2 + gy^2)`.
  pub magnitude: Grid<f32>,
  /// `theta = atan2(gy, gx)` wrapped into `[0, 2*pi)`.
  pub orientation: Grid<f32>,
}

/// Compute the polar gradient of `src`. Interior pixels use centred
/// differences; border pixels use one-sided differences.
pub fn gradient_polar(src: &Grid<f32>) -> crate::error::Result<PolarGradient> {
  let width = src.width();
  let height = src.height();
  let mut magnitude = Grid::<f32>::new(width, height)?;
  let mut orientation = Grid::<f32>::new(width, height)?;

  for y in 0..height {
    for x in 0..width {
      let gx = if width == 1 {
        0.0
      } else if x == 0 {
        src.get(x + 1, y) - src.get(x, y)
      } else if x == width - 1 {
        src.get(x, y) - src.get(x - 1, y)
      } else {
        0.5 * (src.get(x + 1, y) - src.get(x - 1, y))
      };

      let gy = if height == 1 {
        0.0
      } else if y == 0 {
        src.get(x, y + 1) - src.get(x, y)
      } else if y == height - 1 {
        src.get(x, y) - src.get(x, y - 1)
      } else {
        0.5 * (src.get(x, y + 1) - src.get(x, y - 1))
      };

      magnitude.set(x, y, (gx * gx + gy * gy).sqrt());
      let mut theta = gy.atan2(gx);
      if theta < 0.0 {
        theta += 2.0 * PI;
      }
      orientation.set(x, y, theta);
    }
  }

  Ok(PolarGradient {
    magnitude,
    orientation,
  })
}

#[cfg(test)]
#[path = "gradient_test.rs"]
mod gradient_test;
