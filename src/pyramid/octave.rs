use crate::error::Result;
use crate::grid::Grid;
use crate::image::{convolve_separable, Padding};

/// Static geometry shared by every level of one octave.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OctaveGeometry {
  pub index: i32,
  pub width: usize,
  pub height: usize,
  /// `2^index`: input-image pixels per octave-local pixel.
  pub step: f32,
  pub base_sigma: f32,
  /// `S`, the configured scale subdivisions per octave — the denominator of
  /// the per-level scale law, *not* derivable from `last_subdiv -
  /// first_subdiv` (that span is `S+2`, covering the 3 extra Gaussian
  /// levels needed to produce `S+2` DoG levels).
  pub levels: i32,
  pub first_subdiv: i32,
  pub last_subdiv: i32,
}

impl OctaveGeometry {
  pub fn new(index: i32, width: usize, height: usize, base_sigma: f32, levels: i32) -> Self {
    Self {
      index,
      width,
      height,
      step: 2f32.powf(index as f32),
      base_sigma,
      levels,
      first_subdiv: -1,
      last_subdiv: levels + 1,
    }
  }
}

/// One octave: `S+3` Gaussian levels and `S+2` DoG levels sharing
/// `geometry`.
pub struct Octave {
  pub geometry: OctaveGeometry,
  gaussian_levels: Vec<Grid<f32>>,
  dog_levels: Vec<Grid<f32>>,
}

impl Octave {
  /// Build every Gaussian level (from the already-prepared `s = -1` base
  /// image) and the DoG levels derived from them.
  pub fn build(base: Grid<f32>, geometry: OctaveGeometry) -> Result<Self> {
    let levels = geometry.levels; // S
    let mut gaussian_levels = Vec::with_capacity((levels + 3) as usize);
    gaussian_levels.push(base);

    for s in (geometry.first_subdiv + 1)..=geometry.last_subdiv {
      let previous = gaussian_levels.last().unwrap();
      // Variance increment is in octave-local pixel units and does not
      // depend on the octave index (spec §4.2 "Algorithms").
      let variance = geometry.base_sigma.powi(2)
        * (2f32.powf(2.0 * s as f32 / levels as f32)
          - 2f32.powf(2.0 * (s - 1) as f32 / levels as f32));
      let sigma = variance.max(0.0).sqrt();
      let next = gaussian_kernel_convolve(previous, sigma)?;
      gaussian_levels.push(next);
    }

    let mut dog_levels = Vec::with_capacity((levels + 2) as usize);
    for pair in gaussian_levels.windows(2) {
      dog_levels.push(subtract(&pair[0], &pair[1])?);
    }

    Ok(Self {
      geometry,
      gaussian_levels,
      dog_levels,
    })
  }

  #[inline]
  fn gaussian_offset(&self, s: i32) -> Option<usize> {
    if s < self.geometry.first_subdiv || s > self.geometry.last_subdiv {
      None
    } else {
      Some((s - self.geometry.first_subdiv) as usize)
    }
  }

  pub fn gaussian(&self, s: i32) -> Option<&Grid<f32>> {
    self.gaussian_offset(s).map(|i| &self.gaussian_levels[i])
  }

  /// DoG levels span `first_subdiv ..= last_subdiv - 1`.
  pub fn dog(&self, s: i32) -> Option<&Grid<f32>> {
    if s < self.geometry.first_subdiv || s >= self.geometry.last_subdiv {
      return None;
    }
    Some(&self.dog_levels[(s - self.geometry.first_subdiv) as usize])
  }

  pub fn dog_subdiv_range(&self) -> std::ops::RangeInclusive<i32> {
    self.geometry.first_subdiv..=(self.geometry.last_subdiv - 1)
  }

  pub fn gaussian_level_count(&self) -> usize {
    self.gaussian_levels.len()
  }
}

fn gaussian_kernel_convolve(src: &Grid<f32>, sigma: f32) -> Result<Grid<f32>> {
  if sigma <= 1e-6 {
    return Ok(src.clone());
  }
  let radius = (sigma * 4.0).ceil().max(1.0) as isize;
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
  convolve_separable(src, &kernel, -radius, radius, 1, 1, Padding::Continuity)
}

fn subtract(a: &Grid<f32>, b: &Grid<f32>) -> Result<Grid<f32>> {
  let mut out = Grid::<f32>::new(a.width(), a.height())?;
  for y in 0..a.height() {
    for x in 0..a.width() {
      out.set(x, y, b.get(x, y) - a.get(x, y));
    }
  }
  Ok(out)
}

#[cfg(test)]
#[path = "octave_test.rs"]
mod octave_test;
