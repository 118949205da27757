//! vlfeat_core - scale-space, SIFT, dense descriptor, and MSER primitives
//!
//! A computer-vision primitives library covering the local-feature core of
//! VLFeat: a Gaussian/DoG scale-space pyramid, the SIFT keypoint detector
//! and descriptor, a covariant-detector frontend with affine shape
//! adaptation, dense SIFT and HOG, and an MSER region detector. Every
//! analyzer owns its buffers, validates its configuration eagerly, and is
//! reusable across images within one process lifetime.
//!
//! # Example
//!
//! ```ignore
//! use vlfeat_core::grid::Grid;
//! use vlfeat_core::sift::{SiftConfig, SiftDetector};
//!
//! let image = Grid::<f32>::new(256, 256)?;
//! let mut detector = SiftDetector::new(SiftConfig::default())?;
//! detector.detect(&image)?;
//!
//! println!("found {} keypoints", detector.keypoints().len());
//! # Ok::<(), vlfeat_core::error::CoreError>(())
//! ```

pub mod affine;
pub mod dense;
pub mod error;
pub mod frame;
pub mod grid;
pub mod hog;
pub mod image;
pub mod mser;
pub mod pyramid;
pub mod sift;

pub use affine::{AffineAdapter, AffineConfig};
pub use dense::{DenseSift, DenseSiftConfig};
pub use error::{CoreError, Result, TerminalOctave};
pub use frame::Frame;
pub use grid::Grid;
pub use hog::{Hog, HogConfig, HogVariant};
pub use mser::{Ellipse, MserConfig, MserDetector, MserRegion};
pub use pyramid::{Pyramid, PyramidConfig};
pub use sift::{Descriptors, Keypoint, SiftConfig, SiftDetector, SiftFrame};
