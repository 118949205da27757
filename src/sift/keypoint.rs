//! Keypoint and frame records produced by the SIFT detector (spec §3
//! "Keypoint").

/// A detected DoG extremum, refined to sub-pixel/sub-scale accuracy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keypoint {
  /// Input-image-frame x coordinate.
  pub x: f32,
  /// Input-image-frame y coordinate.
  pub y: f32,
  /// Input-image-frame scale.
  pub sigma: f32,
  /// Producing octave index.
  pub o: i32,
  /// Producing (integer) subdivision index, after any integer shifts made
  /// during refinement.
  pub s: i32,
  /// Discrete octave-local grid location the refinement started from.
  pub xi: i32,
  pub yi: i32,
  pub si: i32,
}

/// A keypoint with an assigned orientation: one SIFT frame, one descriptor
/// (spec §4.4 "Each orientation produces a distinct descriptor").
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SiftFrame {
  pub x: f32,
  pub y: f32,
  pub sigma: f32,
  pub theta: f32,
}
