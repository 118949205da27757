use super::*;
use crate::grid::Grid;
use crate::pyramid::OctaveGeometry;

fn build_octave(width: usize, height: usize, fill: impl Fn(usize, usize) -> f32) -> Octave {
  let mut base = Grid::<f32>::new(width, height).unwrap();
  for y in 0..height {
    for x in 0..width {
      base.set(x, y, fill(x, y));
    }
  }
  let geometry = OctaveGeometry::new(0, width, height, 1.6, 3);
  Octave::build(base, geometry).unwrap()
}

#[test]
fn flat_image_has_no_extrema() {
  let octave = build_octave(32, 32, |_, _| 0.0);
  let config = SiftConfig::default();
  assert!(detect_octave_extrema(&octave, &config).is_empty());
}

#[test]
fn huge_peak_thresh_rejects_everything() {
  let octave = build_octave(32, 32, |x, y| {
    let dx = x as f32 - 16.0;
    let dy = y as f32 - 16.0;
    (-(dx * dx + dy * dy) / 8.0).exp()
  });
  let config = SiftConfig::default().with_peak_thresh(1e6);
  assert!(detect_octave_extrema(&octave, &config).is_empty());
}

#[test]
fn keypoints_stay_within_image_bounds() {
  let octave = build_octave(48, 48, |x, y| {
    let dx = x as f32 - 24.0;
    let dy = y as f32 - 24.0;
    (-(dx * dx + dy * dy) / 8.0).exp()
  });
  let config = SiftConfig::default().with_peak_thresh(0.001);
  for kp in detect_octave_extrema(&octave, &config) {
    assert!(kp.x >= 0.0 && kp.x <= 48.0);
    assert!(kp.y >= 0.0 && kp.y <= 48.0);
    assert!(kp.sigma > 0.0);
  }
}

#[test]
fn edge_test_rejects_degenerate_hessian() {
  // A perfectly flat DoG level has det(H) == 0 everywhere, which must be
  // rejected (spec §4.3 "reject if det(H2x2) <= 0").
  let octave = build_octave(16, 16, |_, _| 0.0);
  assert!(!passes_edge_test(&octave, 4, 4, 0, 10.0));
}
