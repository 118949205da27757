use crate::error::{CoreError, Result};

/// Pyramid construction parameters (spec §4.2 / §6).
#[derive(Clone, Debug, PartialEq)]
pub struct PyramidConfig {
  /// Number of octaves to build; `None` derives a count from image size
  /// when the pyramid is constructed.
  pub octaves: Option<usize>,
  /// Scale subdivisions per octave (`S`), must be >= 1.
  pub levels: i32,
  /// Index of the first octave; typically -1 (doubled input) or 0.
  pub first_octave: i32,
  /// Base scale at subdivision 0 of octave 0.
  pub sigma0: f32,
  /// Smoothing already present in the raw input image.
  pub nominal_sigma: f32,
}

impl Default for PyramidConfig {
  fn default() -> Self {
    Self {
      octaves: None,
      levels: 3,
      first_octave: 0,
      sigma0: 1.6,
      nominal_sigma: 0.5,
    }
  }
}

impl PyramidConfig {
  pub fn validate(&self) -> Result<()> {
    if self.levels < 1 {
      return Err(CoreError::invalid("levels (S) must be >= 1"));
    }
    if self.first_octave < -1 {
      return Err(CoreError::invalid(
        "first_octave below -1 is not supported (single pixel-doubling step only)",
      ));
    }
    if self.sigma0 <= 0.0 {
      return Err(CoreError::invalid("sigma0 must be > 0"));
    }
    if self.nominal_sigma < 0.0 {
      return Err(CoreError::invalid("nominal_sigma must be >= 0"));
    }
    if let Some(count) = self.octaves {
      if count == 0 {
        return Err(CoreError::invalid("octaves must be >= 1 when specified"));
      }
    }
    Ok(())
  }

  /// Scale at subdivision `s` of octave `o`, in input-image coordinates.
  pub fn sigma(&self, o: i32, s: f32) -> f32 {
    self.sigma0 * 2f32.powf(o as f32 + s / self.levels as f32)
  }

  pub fn with_octaves(mut self, octaves: usize) -> Self {
    self.octaves = Some(octaves);
    self
  }

  pub fn with_levels(mut self, levels: i32) -> Self {
    self.levels = levels;
    self
  }

  pub fn with_first_octave(mut self, first_octave: i32) -> Self {
    self.first_octave = first_octave;
    self
  }

  pub fn with_sigma0(mut self, sigma0: f32) -> Self {
    self.sigma0 = sigma0;
    self
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
