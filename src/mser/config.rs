//! MSER configuration (spec §6 "MSER configuration").

/// MSER parameters. Unlike the other analyzers, MSER has no reject-on-
/// invalid failure mode: out-of-range values are clamped, never rejected
/// (spec §4.7 "Failure model").
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MserConfig {
  /// Grey-level step used by the variation computation.
  pub delta: u8,
  /// Fractional area lower bound, `area(r) / N_total`.
  pub min_area: f32,
  /// Fractional area upper bound.
  pub max_area: f32,
  /// Upper bound on `v(r)`.
  pub max_variation: f32,
  /// Minimum `(A(a) - A(r)) / A(a)` between nested selected regions.
  pub min_diversity: f32,
}

impl Default for MserConfig {
  fn default() -> Self {
    Self {
      delta: 5,
      min_area: 0.0001,
      max_area: 0.5,
      max_variation: 0.5,
      min_diversity: 0.2,
    }
  }
}

impl MserConfig {
  /// Clamp every field to its valid range.
  pub(crate) fn clamped(mut self) -> Self {
    self.min_area = self.min_area.clamp(0.0, 1.0);
    self.max_area = self.max_area.clamp(self.min_area, 1.0);
    self.max_variation = self.max_variation.max(0.0);
    self.min_diversity = self.min_diversity.clamp(0.0, 1.0);
    self
  }

  pub fn with_delta(mut self, v: u8) -> Self {
    self.delta = v;
    self
  }

  pub fn with_min_area(mut self, v: f32) -> Self {
    self.min_area = v;
    self
  }

  pub fn with_max_area(mut self, v: f32) -> Self {
    self.max_area = v;
    self
  }

  pub fn with_max_variation(mut self, v: f32) -> Self {
    self.max_variation = v;
    self
  }

  pub fn with_min_diversity(mut self, v: f32) -> Self {
    self.min_diversity = v;
    self
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
