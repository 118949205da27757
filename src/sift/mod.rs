//! C3/C4: the SIFT detector (DoG extrema, sub-pixel refinement, edge
//! rejection) and descriptor (orientation histogram, gradient-window
//! descriptor).

mod config;
mod descriptor;
mod detector;
mod keypoint;
mod orientation;

pub use config::SiftConfig;
pub use descriptor::Descriptors;
pub use keypoint::{Keypoint, SiftFrame};

/// Re-exported for the covariant frontend (C5), which assigns orientations
/// on affine-normalised patches with the same histogram machinery.
pub(crate) use orientation::assign_orientations;

use crate::error::Result;
use crate::grid::Grid;
use crate::image::gradient_polar;
use crate::pyramid::{Octave, Pyramid, PyramidConfig};

/// Stateful SIFT detector/descriptor analyzer. Owns every buffer it
/// produces; a fresh `detect` call overwrites prior results (spec §5
/// "Lifecycle").
pub struct SiftDetector {
  config: SiftConfig,
  keypoints: Vec<Keypoint>,
  frames: Vec<SiftFrame>,
  descriptors: Descriptors,
}

impl SiftDetector {
  pub fn new(config: SiftConfig) -> Result<Self> {
    config.validate()?;
    Ok(Self {
      config,
      keypoints: Vec::new(),
      frames: Vec::new(),
      descriptors: Descriptors::new(),
    })
  }

  #[cfg_attr(feature = "trace", tracing::instrument(skip_all, name = "sift::detect"))]
  pub fn detect(&mut self, image: &Grid<f32>) -> Result<()> {
    self.keypoints.clear();
    self.frames.clear();
    self.descriptors.clear(self.config.float_descriptors);

    let pyramid_config = PyramidConfig::default()
      .with_levels(self.config.levels_per_octave)
      .with_first_octave(self.config.first_octave)
      .with_sigma0(1.6);
    let pyramid_config = match self.config.octaves {
      Some(o) => pyramid_config.with_octaves(o),
      None => pyramid_config,
    };

    let mut pyramid = Pyramid::new(image, pyramid_config)?;

    loop {
      let octave = pyramid.current_octave().expect("pyramid has a current octave");
      let octave_keypoints = detector::detect_octave_extrema(octave, &self.config);

      for kp in &octave_keypoints {
        self.describe_keypoint(octave, *kp)?;
      }
      self.keypoints.extend(octave_keypoints);

      if pyramid.next_octave().is_err() {
        break;
      }
    }

    Ok(())
  }

  fn describe_keypoint(&mut self, octave: &Octave, kp: Keypoint) -> Result<()> {
    let step = octave.geometry.step;
    let x_local = kp.x / step;
    let y_local = kp.y / step;
    let sigma_local = kp.sigma / step;

    let nearest_s = kp.s.clamp(octave.geometry.first_subdiv, octave.geometry.last_subdiv);
    let level = octave.gaussian(nearest_s).expect("subdivision in range");
    let grad = gradient_polar(level)?;

    let orientations = if self.config.force_orientations {
      let mut v = smallvec::SmallVec::<[f32; 4]>::new();
      v.push(0.0);
      v
    } else {
      orientation::assign_orientations(&grad, x_local, y_local, sigma_local)
    };

    for theta in orientations {
      let raw = descriptor::compute_descriptor(
        level,
        &grad,
        x_local,
        y_local,
        sigma_local,
        theta,
        self.config.magnif,
        self.config.window_size,
      );
      let normalized = descriptor::normalize_descriptor(raw, self.config.norm_thresh);

      self.frames.push(SiftFrame {
        x: kp.x,
        y: kp.y,
        sigma: kp.sigma,
        theta,
      });

      if self.config.float_descriptors {
        self.descriptors.push_float(normalized);
      } else {
        self.descriptors.push_byte(descriptor::quantize_descriptor(&normalized));
      }
    }

    Ok(())
  }

  pub fn keypoints(&self) -> &[Keypoint] {
    &self.keypoints
  }

  pub fn frames(&self) -> &[SiftFrame] {
    &self.frames
  }

  pub fn descriptors(&self) -> &Descriptors {
    &self.descriptors
  }

  pub fn config(&self) -> &SiftConfig {
    &self.config
  }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
