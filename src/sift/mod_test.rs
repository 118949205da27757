use super::*;

fn gaussian_blob(width: usize, height: usize, cx: f32, cy: f32, sigma: f32, amplitude: f32) -> Grid<f32> {
  let mut g = Grid::<f32>::new(width, height).unwrap();
  for y in 0..height {
    for x in 0..width {
      let dx = x as f32 - cx;
      let dy = y as f32 - cy;
      let v = amplitude * (-(dx * dx + dy * dy) / (2.0 * sigma * sigma)).exp();
      g.set(x, y, v);
    }
  }
  g
}

#[test]
fn flat_image_yields_no_keypoints() {
  let image = Grid::<f32>::new(64, 64).unwrap();
  let mut detector = SiftDetector::new(SiftConfig::default()).unwrap();
  detector.detect(&image).unwrap();
  assert!(detector.keypoints().is_empty());
  assert!(detector.frames().is_empty());
  assert_eq!(detector.descriptors().len(), 0);
}

#[test]
fn single_peak_blob_produces_consistent_frames_and_descriptors() {
  let image = gaussian_blob(64, 64, 32.0, 32.0, 2.0, 1.0);
  let config = SiftConfig::default().with_peak_thresh(0.01).with_edge_thresh(10.0);
  let mut detector = SiftDetector::new(config).unwrap();
  detector.detect(&image).unwrap();

  // Every emitted frame has exactly one descriptor and lies in-bounds.
  assert_eq!(detector.frames().len(), detector.descriptors().len());
  for frame in detector.frames() {
    assert!(frame.sigma > 0.0);
    assert!(frame.x >= 0.0 && frame.x <= 64.0);
    assert!(frame.y >= 0.0 && frame.y <= 64.0);
    assert!(frame.theta >= 0.0 && frame.theta < 2.0 * std::f32::consts::PI);
  }
}

#[test]
fn force_orientations_emits_single_zero_theta_frame_per_keypoint() {
  let image = gaussian_blob(64, 64, 32.0, 32.0, 2.0, 1.0);
  let config = SiftConfig::default()
    .with_peak_thresh(0.01)
    .with_force_orientations(true);
  let mut detector = SiftDetector::new(config).unwrap();
  detector.detect(&image).unwrap();

  assert_eq!(detector.frames().len(), detector.keypoints().len());
  for frame in detector.frames() {
    assert_eq!(frame.theta, 0.0);
  }
}

#[test]
fn float_descriptors_toggle_output_representation() {
  let image = gaussian_blob(64, 64, 32.0, 32.0, 2.0, 1.0);
  let config = SiftConfig::default()
    .with_peak_thresh(0.01)
    .with_float_descriptors(true);
  let mut detector = SiftDetector::new(config).unwrap();
  detector.detect(&image).unwrap();
  assert!(detector.descriptors().is_float());

  let mut detector_bytes = SiftDetector::new(SiftConfig::default().with_peak_thresh(0.01)).unwrap();
  detector_bytes.detect(&image).unwrap();
  assert!(!detector_bytes.descriptors().is_float());
}

#[test]
fn detect_overwrites_prior_results() {
  let blob = gaussian_blob(64, 64, 32.0, 32.0, 2.0, 1.0);
  let flat = Grid::<f32>::new(64, 64).unwrap();
  let mut detector = SiftDetector::new(SiftConfig::default().with_peak_thresh(0.01)).unwrap();
  detector.detect(&blob).unwrap();
  assert!(!detector.keypoints().is_empty());
  detector.detect(&flat).unwrap();
  assert!(detector.keypoints().is_empty());
}
