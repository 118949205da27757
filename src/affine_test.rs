use super::*;
use crate::frame::Frame;

#[test]
fn symmetric_eigen_diagonal_matrix() {
  let m = Mat2::from_cols(Vec2::new(4.0, 0.0), Vec2::new(0.0, 1.0));
  let (lo, hi, vecs) = symmetric_eigen(m);
  assert!((lo - 1.0).abs() < 1e-5);
  assert!((hi - 4.0).abs() < 1e-5);
  // v_lo pairs with the smaller eigenvalue (the y axis here).
  assert!(vecs.x_axis.x.abs() < 1e-5);
}

#[test]
fn flat_image_fails_to_adapt() {
  let level = Grid::<f32>::new(40, 40).unwrap();
  let adapter = AffineAdapter::new(AffineConfig::default());
  let frame = Frame::Disc { x: 20.0, y: 20.0, sigma: 3.0 };
  assert!(adapter.adapt(frame, &level).is_none());
}

#[test]
fn extract_patch_has_expected_dimensions() {
  let level = Grid::<f32>::new(40, 40).unwrap();
  let frame = Frame::Point { x: 20.0, y: 20.0 };
  let patch = extract_patch(&frame, &level, 4, 1.0);
  assert_eq!(patch.width(), 9);
  assert_eq!(patch.height(), 9);
}

#[test]
fn extract_patch_center_matches_point_sample() {
  let mut level = Grid::<f32>::new(40, 40).unwrap();
  level.set(20, 20, 7.0);
  let frame = Frame::Point { x: 20.0, y: 20.0 };
  let patch = extract_patch(&frame, &level, 4, 1.0);
  assert_eq!(patch.get(4, 4), 7.0);
}

#[test]
fn zero_gradient_patch_has_no_orientation() {
  let patch = Grid::<f32>::new(16, 16).unwrap();
  let peaks = orientations_on_patch(&patch, 2.0);
  assert!(peaks.is_empty());
}
