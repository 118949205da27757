//! C1: scalar image operations on dense float (or integer, for the
//! integral image) grids — separable convolution, triangular pooling,
//! integral images, the parabola-envelope distance transform, and polar
//! gradients. Every other component builds on this module.

mod convolution;
mod distance_transform;
mod gradient;
mod integral;

pub use convolution::{convolve_columns, convolve_separable, convolve_triangular, Padding};
pub use distance_transform::{distance_transform_1d, distance_transform_2d, DistanceTransform2d};
pub use gradient::{gradient_polar, PolarGradient};
pub use integral::{integral_image, Summable};
