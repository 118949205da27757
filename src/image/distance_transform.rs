//! Generalised distance transform via the lower envelope of parabolas
//! (Felzenszwalb & Huttenlocher), linear in the number of pixels. Used for
//! anisotropic per-axis coefficients as required by spec §4.1, not just the
//! unit-coefficient Euclidean case.

use crate::grid::Grid;

/// 1-D transform: `D(q) = min_p f(p) + a*(q - p - b)^2`.
///
/// Returns `(distances, argmin_p)`, both of length `f.len()`.
pub fn distance_transform_1d(f: &[f32], a: f32, b: f32) -> (Vec<f32>, Vec<usize>) {
  let n = f.len();
  let mut v = vec![0usize; n];
  let mut z = vec![0.0f32; n + 1];
  let mut k = 0usize;

  v[0] = 0;
  z[0] = f32::NEG_INFINITY;
  z[1] = f32::INFINITY;

  for q in 1..n {
    loop {
      let p = v[k];
      let s = intersection(f, a, b, p, q);
      if s <= z[k] && k > 0 {
        k -= 1;
      } else {
        k += 1;
        v[k] = q;
        z[k] = s;
        z[k + 1] = f32::INFINITY;
        break;
      }
    }
  }

  let mut distances = vec![0.0f32; n];
  let mut argmin = vec![0usize; n];
  let mut k = 0usize;
  for q in 0..n {
    while z[k + 1] < q as f32 {
      k += 1;
    }
    let p = v[k];
    let dq = q as f32 - p as f32 - b;
    distances[q] = a * dq * dq + f[p];
    argmin[q] = p;
  }

  (distances, argmin)
}

/// Intersection of the parabolas rooted at `p` and `q` in the lower
/// envelope: the `x` at which `a*(x-p-b)^2 + f[p] == a*(x-q-b)^2 + f[q]`.
#[inline]
fn intersection(f: &[f32], a: f32, b: f32, p: usize, q: usize) -> f32 {
  let (pf, qf) = (p as f32, q as f32);
  b + ((f[q] - f[p]) / a + qf * qf - pf * pf) / (2.0 * (qf - pf))
}

/// Result of a 2-D distance transform.
pub struct DistanceTransform2d {
  pub distance: Grid<f32>,
  /// Source pixel `(x, y)` achieving the minimum for each output pixel,
  /// present only when argmin tracking was requested.
  pub argmin: Option<Grid<[u32; 2]>>,
}

/// 2-D transform `D(x,y) = min_{u,v} f(u,v) + a_x*(x-u-b_x)^2 + a_y*(y-v-b_y)^2`,
/// computed as two separable 1-D passes (columns, then rows).
pub fn distance_transform_2d(
  f: &Grid<f32>,
  coeffs_x: (f32, f32),
  coeffs_y: (f32, f32),
  want_argmin: bool,
) -> crate::error::Result<DistanceTransform2d> {
  let width = f.width();
  let height = f.height();
  let (a_y, b_y) = coeffs_y;
  let (a_x, b_x) = coeffs_x;

  // Pass 1: transform each column along y.
  let mut intermediate = Grid::<f32>::new(width, height)?;
  let mut row_arg = Grid::<u32>::new(width, height)?;
  let mut column = vec![0.0f32; height];
  for x in 0..width {
    for y in 0..height {
      column[y] = f.get(x, y);
    }
    let (dist, arg) = distance_transform_1d(&column, a_y, b_y);
    for y in 0..height {
      intermediate.set(x, y, dist[y]);
      row_arg.set(x, y, arg[y] as u32);
    }
  }

  // Pass 2: transform each row along x.
  let mut distance = Grid::<f32>::new(width, height)?;
  let mut col_arg = Grid::<u32>::new(width, height)?;
  let mut row = vec![0.0f32; width];
  for y in 0..height {
    for x in 0..width {
      row[x] = intermediate.get(x, y);
    }
    let (dist, arg) = distance_transform_1d(&row, a_x, b_x);
    for x in 0..width {
      distance.set(x, y, dist[x]);
      col_arg.set(x, y, arg[x] as u32);
    }
  }

  let argmin = if want_argmin {
    let mut out = Grid::<[u32; 2]>::new(width, height)?;
    for y in 0..height {
      for x in 0..width {
        let u = col_arg.get(x, y);
        let v = row_arg.get(u as usize, y);
        out.set(x, y, [u, v]);
      }
    }
    Some(out)
  } else {
    None
  };

  Ok(DistanceTransform2d { distance, argmin })
}

#[cfg(test)]
#[path = "distance_transform_test.rs"]
mod distance_transform_test;
