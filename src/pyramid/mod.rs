//! C2: the Gaussian/DoG scale-space pyramid.
//!
//! # Octave geometry
//!
//! Octave `o` holds `S+3` Gaussian levels indexed `-1 ..= S+1` and `S+2` DoG
//! levels (pointwise differences of consecutive Gaussian levels), where `S`
//! is the configured number of scale subdivisions per octave. A level with
//! subdivision index `s` has scale
//!
//! ```text
//! sigma(o, s) = base_sigma * 2^(o + s/S)
//! ```
//!
//! so `sigma(o, S) == 2 * sigma(o, 0)` for every octave (tested in
//! [`config::PyramidConfig`]'s module tests and in `tests/` scenario A).
//!
//! Octave `o+1` is seeded from octave `o`'s level at subdivision `s = S-1`
//! by plain 2x area sub-sampling (picking every other sample, not
//! averaging a 2x2 window) — this is the convention spec §9's open question
//! asks us to pick and document; VLFeat's own C sources use plain
//! sub-sampling of a level already smoothed to the handoff scale.

mod config;
mod octave;

pub use config::PyramidConfig;
pub use octave::{Octave, OctaveGeometry};

use crate::error::{CoreError, Result, TerminalOctave};
use crate::grid::Grid;
use crate::image::{convolve_separable, Padding};

/// The Gaussian + DoG scale-space pyramid over an input image.
///
/// Built once per image (`Pyramid::new`) and advanced one octave at a time
/// via [`Pyramid::next_octave`] until it returns [`TerminalOctave`].
pub struct Pyramid {
  config: PyramidConfig,
  input_width: usize,
  input_height: usize,
  current_octave_index: i32,
  current: Option<Octave>,
  /// Level `s = S-1` of the most recently built octave, pre-downsampling,
  /// carried forward to seed the next octave's base level.
  handoff_base: Option<Grid<f32>>,
}

impl Pyramid {
  /// Build the pyramid for `image` and construct its first octave.
  pub fn new(image: &Grid<f32>, config: PyramidConfig) -> Result<Self> {
    config.validate()?;

    let base = Self::prepare_base_image(image, &config)?;
    let input_width = image.width();
    let input_height = image.height();

    let mut pyramid = Pyramid {
      config,
      input_width,
      input_height,
      current_octave_index: 0,
      current: None,
      handoff_base: None,
    };
    pyramid.current_octave_index = pyramid.config.first_octave - 1;
    pyramid.handoff_base = Some(base);
    pyramid.next_octave().map_err(|TerminalOctave| {
      CoreError::invalid("pyramid configuration yields zero usable octaves")
    })?;
    Ok(pyramid)
  }

  /// Pre-smooth / resample the raw input to the first octave's base level,
  /// per spec §4.2: doubled+upsampled when `first_octave == -1`, or
  /// downsampled by `2^first_octave` when `first_octave >= 0`.
  fn prepare_base_image(image: &Grid<f32>, config: &PyramidConfig) -> Result<Grid<f32>> {
    if image.width() < 2 || image.height() < 2 {
      return Err(CoreError::invalid("input image must be at least 2x2"));
    }

    let geometric_base = if config.first_octave < 0 {
      upsample_double(image)?
    } else {
      let mut current = image.clone();
      for _ in 0..config.first_octave {
        current = downsample_half(&current)?;
      }
      current
    };

    // Pre-smooth from the nominal input sigma to sigma(first_octave, s=-1),
    // both expressed in octave-local pixel units (sigma(o,s) / 2^o), so the
    // 2^o factor common to both sides cancels and need not appear here.
    let target_local = config.sigma0 * 2f32.powf(-1.0 / config.levels as f32);
    let already_local = config.nominal_sigma * 2f32.powf(-config.first_octave as f32);
    let delta_variance = (target_local * target_local - already_local * already_local).max(0.0);
    if delta_variance > 1e-10 {
      smooth_in_place(&geometric_base, delta_variance.sqrt())
    } else {
      Ok(geometric_base)
    }
  }

  /// Advance to the next octave, building its `S+3` Gaussian levels and
  /// `S+2` DoG levels. Returns [`TerminalOctave`] once the next octave
  /// would fall below the minimum 2x2 Gaussian footprint.
  pub fn next_octave(&mut self) -> std::result::Result<(), TerminalOctave> {
    let next_index = self.current_octave_index + 1;
    let octaves_exhausted = self
      .config
      .octaves
      .map(|count| next_index >= self.config.first_octave + count as i32)
      .unwrap_or(false);
    if octaves_exhausted {
      return Err(TerminalOctave);
    }

    let base = match self.handoff_base.take() {
      Some(base) => base,
      None => return Err(TerminalOctave),
    };

    if base.width() < 2 || base.height() < 2 {
      return Err(TerminalOctave);
    }

    let geometry = OctaveGeometry::new(
      next_index,
      base.width(),
      base.height(),
      self.config.sigma0,
      self.config.levels,
    );

    let octave = Octave::build(base, geometry).map_err(|_| TerminalOctave)?;

    // Seed the next octave from this one's level s = S-1 via plain
    // sub-sampling (documented convention, spec §9).
    let seed_level = octave
      .gaussian(self.config.levels - 1)
      .expect("s=S-1 level always exists");
    self.handoff_base = downsample_half(seed_level).ok();

    self.current_octave_index = next_index;
    self.current = Some(octave);
    Ok(())
  }

  pub fn current_octave(&self) -> Option<&Octave> {
    self.current.as_ref()
  }

  pub fn current_octave_index(&self) -> i32 {
    self.current_octave_index
  }

  pub fn config(&self) -> &PyramidConfig {
    &self.config
  }

  pub fn input_dimensions(&self) -> (usize, usize) {
    (self.input_width, self.input_height)
  }
}

/// Bilinear 2x upsample (pixel doubling), used when `first_octave < 0`.
fn upsample_double(src: &Grid<f32>) -> Result<Grid<f32>> {
  let width = src.width() * 2;
  let height = src.height() * 2;
  let mut out = Grid::<f32>::new(width, height)?;
  for y in 0..height {
    for x in 0..width {
      let sx = x as f32 / 2.0;
      let sy = y as f32 / 2.0;
      out.set(x, y, src.sample_bilinear(sx, sy));
    }
  }
  Ok(out)
}

/// Plain 2x area sub-sample: take every other sample (no 2x2 averaging).
/// See the module doc for the rationale behind this choice of convention.
pub(crate) fn downsample_half(src: &Grid<f32>) -> Result<Grid<f32>> {
  let width = (src.width() / 2).max(1);
  let height = (src.height() / 2).max(1);
  let mut out = Grid::<f32>::new(width, height)?;
  for y in 0..height {
    for x in 0..width {
      out.set(x, y, src.get((x * 2).min(src.width() - 1), (y * 2).min(src.height() - 1)));
    }
  }
  Ok(out)
}

/// Convolve with a Gaussian of the given standard deviation (zero variance
/// is a no-op clone).
pub(crate) fn smooth_in_place(src: &Grid<f32>, sigma: f32) -> Result<Grid<f32>> {
  if sigma <= 0.0 {
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
