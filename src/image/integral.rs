//! Integral image (summed-area table), instantiated for the numeric types
//! spec §4.1 requires (int32, uint32, float, double).

use crate::error::Result;
use crate::grid::Grid;

/// Numeric types the integral image can be computed over.
pub trait Summable: Copy + Default + std::ops::Add<Output = Self> {}

impl Summable for f32 {}
impl Summable for f64 {}
impl Summable for i32 {}
impl Summable for u32 {}

/// Compute `I(x,y) = sum_{u<=x, v<=y} f(u,v)` in one forward pass per axis.
pub fn integral_image<T: Summable>(src: &Grid<T>) -> Result<Grid<T>> {
  let width = src.width();
  let height = src.height();
  let mut out = Grid::<T>::new(width, height)?;

  for y in 0..height {
    let mut running = T::default();
    for x in 0..width {
      running = running + src.get(x, y);
      let above = if y == 0 { T::default() } else { out.get(x, y - 1) };
      out.set(x, y, running + above);
    }
  }

  Ok(out)
}

#[cfg(test)]
#[path = "integral_test.rs"]
mod integral_test;
