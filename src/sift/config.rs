//! SIFT detector/descriptor configuration (spec §6 "SIFT configuration").

use crate::error::{CoreError, Result};

/// Validated, builder-constructed configuration for [`super::SiftDetector`].
#[derive(Clone, Debug, PartialEq)]
pub struct SiftConfig {
  /// Index of the first octave; typically -1 (doubled input) or 0.
  pub first_octave: i32,
  /// Number of octaves; `None` derives a count from image size.
  pub octaves: Option<usize>,
  /// Scale subdivisions per octave (`S`), must be >= 1.
  pub levels_per_octave: i32,
  /// Contrast threshold on the refined DoG value.
  pub peak_thresh: f32,
  /// Edge-rejection ratio threshold.
  pub edge_thresh: f32,
  /// Minimum pre-clip descriptor norm; descriptors below it are zeroed.
  pub norm_thresh: f32,
  /// Descriptor window magnification.
  pub magnif: f32,
  /// Gaussian weighting std, in spatial bins, for the descriptor window.
  pub window_size: f32,
  /// Skip orientation assignment and emit a single frame at theta = 0.
  pub force_orientations: bool,
  /// Emit `f32` descriptors instead of quantized `u8`.
  pub float_descriptors: bool,
}

impl Default for SiftConfig {
  fn default() -> Self {
    Self {
      first_octave: 0,
      octaves: None,
      levels_per_octave: 3,
      peak_thresh: 0.0,
      edge_thresh: 10.0,
      norm_thresh: 0.0,
      magnif: 3.0,
      window_size: 2.0,
      force_orientations: false,
      float_descriptors: false,
    }
  }
}

impl SiftConfig {
  pub fn validate(&self) -> Result<()> {
    if self.levels_per_octave < 1 {
      return Err(CoreError::invalid("levelsPerOctave must be >= 1"));
    }
    if self.edge_thresh <= 0.0 {
      return Err(CoreError::invalid("edgeThresh must be > 0"));
    }
    if self.peak_thresh < 0.0 {
      return Err(CoreError::invalid("peakThresh must be >= 0"));
    }
    if self.norm_thresh < 0.0 {
      return Err(CoreError::invalid("normThresh must be >= 0"));
    }
    if self.magnif <= 0.0 {
      return Err(CoreError::invalid("magnif must be > 0"));
    }
    if self.window_size <= 0.0 {
      return Err(CoreError::invalid("windowSize must be > 0"));
    }
    if let Some(count) = self.octaves {
      if count == 0 {
        return Err(CoreError::invalid("octaves must be >= 1 when specified"));
      }
    }
    Ok(())
  }

  pub fn with_first_octave(mut self, v: i32) -> Self {
    self.first_octave = v;
    self
  }

  pub fn with_octaves(mut self, v: usize) -> Self {
    self.octaves = Some(v);
    self
  }

  pub fn with_levels_per_octave(mut self, v: i32) -> Self {
    self.levels_per_octave = v;
    self
  }

  pub fn with_peak_thresh(mut self, v: f32) -> Self {
    self.peak_thresh = v;
    self
  }

  pub fn with_edge_thresh(mut self, v: f32) -> Self {
    self.edge_thresh = v;
    self
  }

  pub fn with_norm_thresh(mut self, v: f32) -> Self {
    self.norm_thresh = v;
    self
  }

  pub fn with_magnif(mut self, v: f32) -> Self {
    self.magnif = v;
    self
  }

  pub fn with_window_size(mut self, v: f32) -> Self {
    self.window_size = v;
    self
  }

  pub fn with_force_orientations(mut self, v: bool) -> Self {
    self.force_orientations = v;
    self
  }

  pub fn with_float_descriptors(mut self, v: bool) -> Self {
    self.float_descriptors = v;
    self
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
