//! Separable convolution along image columns, plus the 2-D pass built from
//! it and the triangular-kernel variant used for dense descriptor pooling.
//!
//! # The column-pass trick
//!
//! A full 2-D separable convolution is two calls to [`convolve_columns`]
//! with `transpose = true`: the first pass filters along `y` and writes its
//! result transposed (rows become columns), so the second pass — which
//! always filters "along columns" — ends up filtering along the original
//! `x` axis. The output of the second pass is transposed back, producing a
//! normally-oriented image. [`convolve_separable`] wires this up.

use crate::error::{CoreError, Result};
use crate::grid::Grid;

/// Out-of-range sample policy at image borders.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Padding {
  /// Samples outside the grid are 0.
  Zero,
  /// Samples outside the grid repeat the nearest edge value.
  Continuity,
}

#[inline]
fn sample_padded(src: &Grid<f32>, x: usize, y: isize, padding: Padding) -> f32 {
  let height = src.height() as isize;
  match padding {
    Padding::Zero => {
      if y < 0 || y >= height {
        0.0
      } else {
        src.get(x, y as usize)
      }
    }
    Padding::Continuity => {
      let yc = y.clamp(0, height - 1) as usize;
      src.get(x, yc)
    }
  }
}

/// Convolve `src` along its columns (the `y` axis) with a filter whose taps
/// span `[filter_begin, filter_end]` inclusive (origin at tap 0), taking
/// every `step`-th output row.
///
/// When `transpose` is `false` the result has the same width as `src` and
/// height `(src.height() - 1) / step + 1`. When `transpose` is `true` the
/// result is written with width and height swapped relative to that, so
/// that a second column pass over the result filters along the original
/// `x` axis — see the module doc.
pub fn convolve_columns(
  src: &Grid<f32>,
  filter: &[f32],
  filter_begin: isize,
  filter_end: isize,
  step: usize,
  padding: Padding,
) -> Result<Grid<f32>> {
  convolve_columns_inner(src, filter, filter_begin, filter_end, step, padding, false)
}

/// Same as [`convolve_columns`] but writes the transposed layout described
/// in the module doc.
pub fn convolve_columns_transposed(
  src: &Grid<f32>,
  filter: &[f32],
  filter_begin: isize,
  filter_end: isize,
  step: usize,
  padding: Padding,
) -> Result<Grid<f32>> {
  convolve_columns_inner(src, filter, filter_begin, filter_end, step, padding, true)
}

fn convolve_columns_inner(
  src: &Grid<f32>,
  filter: &[f32],
  filter_begin: isize,
  filter_end: isize,
  step: usize,
  padding: Padding,
  transpose: bool,
) -> Result<Grid<f32>> {
  if step == 0 {
    return Err(CoreError::invalid("convolution step must be >= 1"));
  }
  if filter.is_empty() || filter_end - filter_begin + 1 != filter.len() as isize {
    return Err(CoreError::invalid(
      "filter length must equal filter_end - filter_begin + 1",
    ));
  }

  let width = src.width();
  let height = src.height();
  let out_height = (height - 1) / step + 1;

  let mut out = if transpose {
    Grid::<f32>::new(out_height, width)?
  } else {
    Grid::<f32>::new(width, out_height)?
  };

  for x in 0..width {
    for j in 0..out_height {
      let y0 = (j * step) as isize;
      let mut acc = 0.0f32;
      for (k, &coeff) in filter.iter().enumerate() {
        let d = filter_begin + k as isize;
        acc += coeff * sample_padded(src, x, y0 + d, padding);
      }
      if transpose {
        out.set(j, x, acc);
      } else {
        out.set(x, j, acc);
      }
    }
  }

  Ok(out)
}

/// Two-pass separable convolution: filters along `y` then along `x` with
/// the same 1-D kernel and independent sub-sampling steps per axis.
pub fn convolve_separable(
  src: &Grid<f32>,
  filter: &[f32],
  filter_begin: isize,
  filter_end: isize,
  step_x: usize,
  step_y: usize,
  padding: Padding,
) -> Result<Grid<f32>> {
  let tmp = convolve_columns_transposed(src, filter, filter_begin, filter_end, step_y, padding)?;
  convolve_columns_transposed(&tmp, filter, filter_begin, filter_end, step_x, padding)
}

/// Build an area-normalised triangular kernel of half-width `half_width`
/// (support `2*half_width - 1` taps, peak at the origin tap), then run the
/// 2-D separable convolution with it. Used by dense SIFT/HOG pooling.
pub fn convolve_triangular(
  src: &Grid<f32>,
  half_width: usize,
  step_x: usize,
  step_y: usize,
  padding: Padding,
) -> Result<Grid<f32>> {
  if half_width == 0 {
    return Err(CoreError::invalid("triangular half-width must be >= 1"));
  }
  let w = half_width as f32;
  let norm = w * w;
  let begin = -(half_width as isize - 1);
  let end = half_width as isize - 1;
  let filter: Vec<f32> = (begin..=end)
    .map(|d| (w - (d as f32).abs()) / norm)
    .collect();
  convolve_separable(src, &filter, begin, end, step_x, step_y, padding)
}

#[cfg(test)]
#[path = "convolution_test.rs"]
mod convolution_test;
