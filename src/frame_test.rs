use super::*;

#[test]
fn affine_rejects_non_positive_determinant() {
  let degenerate = Mat2::from_cols(glam::Vec2::new(1.0, 0.0), glam::Vec2::new(0.0, -1.0));
  assert!(Frame::affine(0.0, 0.0, degenerate).is_none());
}

#[test]
fn affine_accepts_positive_determinant() {
  let a = Mat2::from_cols(glam::Vec2::new(2.0, 0.0), glam::Vec2::new(0.0, 2.0));
  assert!(Frame::affine(1.0, 2.0, a).is_some());
}

#[test]
fn center_matches_every_variant() {
  assert_eq!(Frame::Point { x: 1.0, y: 2.0 }.center(), (1.0, 2.0));
  assert_eq!(Frame::Disc { x: 1.0, y: 2.0, sigma: 3.0 }.center(), (1.0, 2.0));
}

#[test]
fn with_center_preserves_shape() {
  let frame = Frame::Disc { x: 0.0, y: 0.0, sigma: 4.0 };
  let moved = frame.with_center(5.0, 6.0);
  assert_eq!(moved.center(), (5.0, 6.0));
  assert_eq!(moved.shape(), frame.shape());
}
