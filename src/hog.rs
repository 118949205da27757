//! C6: Histogram of Oriented Gradients, `UOCTTI` (31-d, signed + unsigned
//! orientation channels normalised against four neighbouring blocks) and
//! `DalalTriggs` (36-d, four overlapping 2x2-cell-block normalisations of
//! an unsigned histogram) variants (spec §4.6 "HOG").

use crate::error::{CoreError, Result};
use crate::grid::Grid;
use crate::image::gradient_polar;

const UNSIGNED_BINS: usize = 9;
const SIGNED_BINS: usize = 18;

/// Which of the two classic HOG cell layouts to produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HogVariant {
  /// Felzenszwalb/Girshick's 31-dimensional variant.
  Uoctti,
  /// Dalal & Triggs' original 36-dimensional variant.
  DalalTriggs,
}

impl HogVariant {
  pub fn descriptor_len(self) -> usize {
    match self {
      HogVariant::Uoctti => 31,
      HogVariant::DalalTriggs => 36,
    }
  }
}

/// HOG parameters (spec §4.6 "cell size, variant").
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HogConfig {
  pub cell_size: usize,
  pub variant: HogVariant,
}

impl Default for HogConfig {
  fn default() -> Self {
    Self {
      cell_size: 8,
      variant: HogVariant::Uoctti,
    }
  }
}

impl HogConfig {
  pub fn validate(&self) -> Result<()> {
    if self.cell_size == 0 {
      return Err(CoreError::invalid("cellSize must be >= 1"));
    }
    Ok(())
  }

  pub fn with_cell_size(mut self, v: usize) -> Self {
    self.cell_size = v;
    self
  }

  pub fn with_variant(mut self, v: HogVariant) -> Self {
    self.variant = v;
    self
  }
}

/// Per-cell unsigned and signed orientation energy, before block
/// normalisation.
struct CellHistograms {
  width: usize,
  height: usize,
  unsigned: Vec<[f32; UNSIGNED_BINS]>,
  signed: Vec<[f32; SIGNED_BINS]>,
}

impl CellHistograms {
  fn get_unsigned(&self, cx: isize, cy: isize) -> [f32; UNSIGNED_BINS] {
    if cx < 0 || cy < 0 || cx >= self.width as isize || cy >= self.height as isize {
      return [0.0; UNSIGNED_BINS];
    }
    self.unsigned[cy as usize * self.width + cx as usize]
  }

  fn get_signed(&self, cx: isize, cy: isize) -> [f32; SIGNED_BINS] {
    if cx < 0 || cy < 0 || cx >= self.width as isize || cy >= self.height as isize {
      return [0.0; SIGNED_BINS];
    }
    self.signed[cy as usize * self.width + cx as usize]
  }
}

/// Stateful HOG analyzer; `compute` overwrites any prior result.
pub struct Hog {
  config: HogConfig,
  descriptors: Vec<Vec<f32>>,
  grid_width: usize,
  grid_height: usize,
}

impl Hog {
  pub fn new(config: HogConfig) -> Result<Self> {
    config.validate()?;
    Ok(Self {
      config,
      descriptors: Vec::new(),
      grid_width: 0,
      grid_height: 0,
    })
  }

  #[cfg_attr(feature = "trace", tracing::instrument(skip_all, name = "hog::compute"))]
  pub fn compute(&mut self, image: &Grid<f32>) -> Result<()> {
    self.descriptors.clear();
    let cell_size = self.config.cell_size;
    let grid_width = image.width() / cell_size;
    let grid_height = image.height() / cell_size;
    self.grid_width = grid_width;
    self.grid_height = grid_height;

    if grid_width == 0 || grid_height == 0 {
      return Ok(());
    }

    let hist = self.accumulate_cells(image, grid_width, grid_height)?;

    for cy in 0..grid_height {
      for cx in 0..grid_width {
        let descriptor = match self.config.variant {
          HogVariant::DalalTriggs => dalal_triggs_cell(&hist, cx as isize, cy as isize),
          HogVariant::Uoctti => uoctti_cell(&hist, cx as isize, cy as isize),
        };
        self.descriptors.push(descriptor);
      }
    }

    Ok(())
  }

  /// Soft-bin every pixel's gradient into its cell's unsigned (`0..pi`)
  /// and signed (`0..2pi`) orientation histograms (spec §4.6 "accumulate
  /// per-cell orientation energy").
  fn accumulate_cells(&self, image: &Grid<f32>, grid_width: usize, grid_height: usize) -> Result<CellHistograms> {
    let grad = gradient_polar(image)?;
    let cell_size = self.config.cell_size as f32;
    let mut unsigned = vec![[0f32; UNSIGNED_BINS]; grid_width * grid_height];
    let mut signed = vec![[0f32; SIGNED_BINS]; grid_width * grid_height];

    for y in 0..image.height() {
      for x in 0..image.width() {
        let cx = (x as f32 / cell_size) as usize;
        let cy = (y as f32 / cell_size) as usize;
        if cx >= grid_width || cy >= grid_height {
          continue;
        }
        let mag = grad.magnitude.get(x, y);
        let theta = grad.orientation.get(x, y);
        let idx = cy * grid_width + cx;

        let signed_bin = theta / (2.0 * std::f32::consts::PI) * SIGNED_BINS as f32;
        add_soft_bin(&mut signed[idx], signed_bin, SIGNED_BINS, mag);

        let unsigned_theta = theta % std::f32::consts::PI;
        let unsigned_bin = unsigned_theta / std::f32::consts::PI * UNSIGNED_BINS as f32;
        add_soft_bin(&mut unsigned[idx], unsigned_bin, UNSIGNED_BINS, mag);
      }
    }

    Ok(CellHistograms {
      width: grid_width,
      height: grid_height,
      unsigned,
      signed,
    })
  }

  pub fn descriptors(&self) -> &[Vec<f32>] {
    &self.descriptors
  }

  pub fn grid_dimensions(&self) -> (usize, usize) {
    (self.grid_width, self.grid_height)
  }

  pub fn config(&self) -> &HogConfig {
    &self.config
  }
}

fn add_soft_bin(hist: &mut [f32], bin_f: f32, num_bins: usize, weight: f32) {
  let b0f = bin_f.floor();
  let frac = bin_f - b0f;
  let b0 = (b0f as isize).rem_euclid(num_bins as isize) as usize;
  let b1 = (b0 + 1) % num_bins;
  hist[b0] += weight * (1.0 - frac);
  hist[b1] += weight * frac;
}

fn cell_energy(unsigned: &[f32; UNSIGNED_BINS]) -> f32 {
  unsigned.iter().map(|v| v * v).sum()
}

/// The 4 neighbouring 2x2-cell block energies (spec §4.6 "normalise
/// against 4 neighbouring blocks"), one per corner of the cell.
fn block_norms(hist: &CellHistograms, cx: isize, cy: isize) -> [f32; 4] {
  let corners = [(-1isize, -1isize), (0, -1), (-1, 0), (0, 0)];
  let mut norms = [0f32; 4];
  for (i, (dx, dy)) in corners.iter().enumerate() {
    let mut energy = 0.0f32;
    for by in 0..2 {
      for bx in 0..2 {
        energy += cell_energy(&hist.get_unsigned(cx + dx + bx, cy + dy + by));
      }
    }
    norms[i] = (energy + 1e-4).sqrt();
  }
  norms
}

/// Dalal-Triggs: concatenate the cell's unsigned histogram, each copy
/// normalised (and clipped to `0.2`) against one of the 4 neighbouring
/// block energies (spec §4.6 "4 overlapping 2x2 cell blocks per cell").
fn dalal_triggs_cell(hist: &CellHistograms, cx: isize, cy: isize) -> Vec<f32> {
  let norms = block_norms(hist, cx, cy);
  let this_hist = hist.get_unsigned(cx, cy);

  let mut out = Vec::with_capacity(UNSIGNED_BINS * 4);
  for &norm in norms.iter() {
    for &v in this_hist.iter() {
      out.push((v / norm).min(0.2));
    }
  }
  out
}

/// UOCTTI: 18 signed + 9 unsigned orientation channels each normalised
/// 4 ways and summed (not concatenated), plus 4 texture-energy terms
/// (spec §4.6 "energy-variance-based normalisation plus truncation at
/// 0.2").
fn uoctti_cell(hist: &CellHistograms, cx: isize, cy: isize) -> Vec<f32> {
  let norms = block_norms(hist, cx, cy);
  let mut out = Vec::with_capacity(31);

  let signed_hist = hist.get_signed(cx, cy);
  for &v in signed_hist.iter() {
    let acc: f32 = norms.iter().map(|&n| (v / n).min(0.2)).sum();
    out.push(acc * 0.5);
  }

  let unsigned_hist = hist.get_unsigned(cx, cy);
  for &v in unsigned_hist.iter() {
    let acc: f32 = norms.iter().map(|&n| (v / n).min(0.2)).sum();
    out.push(acc * 0.5);
  }

  let energy = cell_energy(&unsigned_hist).sqrt();
  for &n in norms.iter() {
    out.push(0.2357 * energy / n.max(1e-6));
  }

  out
}

/// Render a HOG descriptor (of either variant) as a `cell_px x cell_px`
/// glyph: each unsigned-orientation bin becomes a bright line segment at
/// that orientation, brightness proportional to the bin's energy (spec
/// §4.6 "glyph renderer").
pub fn render_glyph(descriptor: &[f32], cell_px: usize) -> Grid<f32> {
  let cell_px = cell_px.max(1);
  let mut glyph = Grid::<f32>::new(cell_px, cell_px).expect("glyph tile side is always non-zero");
  let bins = UNSIGNED_BINS.min(descriptor.len());
  let cx = cell_px as f32 / 2.0;
  let cy = cell_px as f32 / 2.0;

  for b in 0..bins {
    let theta = (b as f32 + 0.5) / bins as f32 * std::f32::consts::PI;
    let dx = theta.cos();
    let dy = theta.sin();
    let weight = descriptor[b].max(0.0);
    let steps = cell_px;
    for i in 0..steps {
      let t = (i as f32 / (steps.saturating_sub(1)).max(1) as f32 - 0.5) * cell_px as f32;
      let x = (cx + dx * t).round();
      let y = (cy + dy * t).round();
      if x >= 0.0 && y >= 0.0 && (x as usize) < cell_px && (y as usize) < cell_px {
        let px = x as usize;
        let py = y as usize;
        let v = glyph.get(px, py).max(weight);
        glyph.set(px, py, v);
      }
    }
  }

  glyph
}

#[cfg(test)]
#[path = "hog_test.rs"]
mod hog_test;
