//! C5: the unified feature-frame type shared by every detector variant the
//! covariant frontend can produce (spec §3 "Feature frame", §4.5).

use glam::Mat2;

/// A generalised local feature: a point, a scale-covariant disc, a
/// similarity (scale + rotation), or a full affine shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Frame {
  Point { x: f32, y: f32 },
  Disc { x: f32, y: f32, sigma: f32 },
  Similarity { x: f32, y: f32, sigma: f32, theta: f32 },
  /// `a` must satisfy `det(a) > 0` (spec §3); callers that build one
  /// directly are responsible for that invariant, [`Frame::affine`]
  /// enforces it.
  Affine { x: f32, y: f32, a: Mat2 },
}

impl Frame {
  /// Build an affine frame, returning `None` if `det(a) <= 0`.
  pub fn affine(x: f32, y: f32, a: Mat2) -> Option<Self> {
    if a.determinant() > 0.0 {
      Some(Frame::Affine { x, y, a })
    } else {
      None
    }
  }

  pub fn center(&self) -> (f32, f32) {
    match *self {
      Frame::Point { x, y } => (x, y),
      Frame::Disc { x, y, .. } => (x, y),
      Frame::Similarity { x, y, .. } => (x, y),
      Frame::Affine { x, y, .. } => (x, y),
    }
  }

  /// The frame's shape as a 2x2 matrix mapping the unit disc onto the
  /// frame's support: identity for a bare point, `sigma * I` for a disc,
  /// a rotation-scale for a similarity, and `a` itself for an affine frame.
  pub fn shape(&self) -> Mat2 {
    match *self {
      Frame::Point { .. } => Mat2::IDENTITY,
      Frame::Disc { sigma, .. } => Mat2::from_cols(glam::Vec2::new(sigma, 0.0), glam::Vec2::new(0.0, sigma)),
      Frame::Similarity { sigma, theta, .. } => Mat2::from_angle(theta) * sigma,
      Frame::Affine { a, .. } => a,
    }
  }

  /// Rebuild this frame in place at a new center, keeping its shape.
  pub fn with_center(&self, x: f32, y: f32) -> Self {
    match *self {
      Frame::Point { .. } => Frame::Point { x, y },
      Frame::Disc { sigma, .. } => Frame::Disc { x, y, sigma },
      Frame::Similarity { sigma, theta, .. } => Frame::Similarity { x, y, sigma, theta },
      Frame::Affine { a, .. } => Frame::Affine { x, y, a },
    }
  }
}

#[cfg(test)]
#[path = "frame_test.rs"]
mod frame_test;
