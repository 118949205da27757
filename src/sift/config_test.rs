use super::*;

#[test]
fn default_config_validates() {
  assert!(SiftConfig::default().validate().is_ok());
}

#[test]
fn rejects_non_positive_edge_thresh() {
  let config = SiftConfig::default().with_edge_thresh(0.0);
  assert!(config.validate().is_err());
}

#[test]
fn rejects_zero_levels_per_octave() {
  let config = SiftConfig::default().with_levels_per_octave(0);
  assert!(config.validate().is_err());
}

#[test]
fn rejects_zero_octave_count() {
  let config = SiftConfig::default().with_octaves(0);
  assert!(config.validate().is_err());
}

#[test]
fn builders_compose() {
  let config = SiftConfig::default()
    .with_first_octave(-1)
    .with_octaves(4)
    .with_peak_thresh(0.01)
    .with_float_descriptors(true);
  assert_eq!(config.first_octave, -1);
  assert_eq!(config.octaves, Some(4));
  assert_eq!(config.peak_thresh, 0.01);
  assert!(config.float_descriptors);
  assert!(config.validate().is_ok());
}
