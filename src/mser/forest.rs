//! Grey-level union-find component tree over image pixels (spec §4.7
//! "Component tree construction").

use crate::error::{try_filled_vec, CoreError, Result};
use crate::grid::Grid;

/// One node per pixel. `parent`/`area`/`gray_level` form the permanent
/// forest recorded during construction and are never mutated afterward;
/// `shortcut` caches the nearest strictly-higher-grey-level ancestor of
/// each node, compressed lazily by the variation step (spec §4.7
/// "a 'shortcut' pointer used by the variation step").
pub(crate) struct ComponentForest {
  pub(crate) parent: Vec<u32>,
  pub(crate) area: Vec<u32>,
  pub(crate) gray_level: Vec<u8>,
  shortcut: Vec<u32>,
  pub(crate) sum_x: Vec<f64>,
  pub(crate) sum_y: Vec<f64>,
  pub(crate) sum_xx: Vec<f64>,
  pub(crate) sum_xy: Vec<f64>,
  pub(crate) sum_yy: Vec<f64>,
  pub(crate) width: usize,
  #[allow(dead_code)]
  pub(crate) height: usize,
}

impl ComponentForest {
  /// Counting-sort pixels by grey level, then union each pixel into its
  /// already-visited 4-neighbours, always attaching the lower-or-equal
  /// component under the higher (spec §4.7 "Process pixels in grey-level
  /// order").
  pub(crate) fn build(image: &Grid<u8>) -> Result<Self> {
    let width = image.width();
    let height = image.height();
    let n = width * height;

    let mut parent: Vec<u32> = Vec::new();
    parent.try_reserve_exact(n).map_err(|_| CoreError::AllocationFailure {
      requested_bytes: n.saturating_mul(std::mem::size_of::<u32>()),
    })?;
    parent.extend(0..n as u32);
    let mut area = try_filled_vec(n, 1u32)?;
    let mut gray_level = try_filled_vec(n, 0u8)?;
    let mut sum_x = try_filled_vec(n, 0f64)?;
    let mut sum_y = try_filled_vec(n, 0f64)?;
    let mut sum_xx = try_filled_vec(n, 0f64)?;
    let mut sum_xy = try_filled_vec(n, 0f64)?;
    let mut sum_yy = try_filled_vec(n, 0f64)?;

    for y in 0..height {
      for x in 0..width {
        let i = y * width + x;
        gray_level[i] = image.get(x, y);
        sum_x[i] = x as f64;
        sum_y[i] = y as f64;
        sum_xx[i] = (x * x) as f64;
        sum_xy[i] = (x * y) as f64;
        sum_yy[i] = (y * y) as f64;
      }
    }

    let order = counting_sort_by_gray_level(&gray_level)?;
    let mut processed = try_filled_vec(n, false)?;

    for &p in &order {
      let p = p as usize;
      processed[p] = true;
      let px = (p % width) as isize;
      let py = (p / width) as isize;

      let mut root_p = p as u32;
      for (dx, dy) in [(-1isize, 0isize), (1, 0), (0, -1), (0, 1)] {
        let nx = px + dx;
        let ny = py + dy;
        if nx < 0 || ny < 0 || nx as usize >= width || ny as usize >= height {
          continue;
        }
        let q = ny as usize * width + nx as usize;
        if !processed[q] {
          continue;
        }

        let root_q = find(&parent, q as u32);
        root_p = find(&parent, root_p);
        if root_p != root_q {
          // p is always introduced no earlier than any already-processed
          // neighbour, so root_p's grey level is >= root_q's.
          parent[root_q as usize] = root_p;
          area[root_p as usize] += area[root_q as usize];
          sum_x[root_p as usize] += sum_x[root_q as usize];
          sum_y[root_p as usize] += sum_y[root_q as usize];
          sum_xx[root_p as usize] += sum_xx[root_q as usize];
          sum_xy[root_p as usize] += sum_xy[root_q as usize];
          sum_yy[root_p as usize] += sum_yy[root_q as usize];
        }
      }
    }

    let shortcut = parent.clone();

    Ok(Self {
      parent,
      area,
      gray_level,
      shortcut,
      sum_x,
      sum_y,
      sum_xx,
      sum_xy,
      sum_yy,
      width,
      height,
    })
  }

  pub(crate) fn len(&self) -> usize {
    self.parent.len()
  }

  pub(crate) fn is_root(&self, i: usize) -> bool {
    self.parent[i] as usize == i
  }

  /// Nearest ancestor of `i` with a strictly higher grey level than `i`,
  /// or `i` itself if `i` is a root. Resolves lazily and compresses the
  /// `shortcut` chain it traverses.
  fn higher_ancestor(&mut self, i: usize) -> usize {
    if self.is_root(i) {
      return i;
    }
    let sc = self.shortcut[i] as usize;
    if sc == i || self.gray_level[sc] > self.gray_level[i] {
      self.shortcut[i] = sc as u32;
      return sc;
    }
    let resolved = self.higher_ancestor(sc);
    self.shortcut[i] = resolved as u32;
    resolved
  }

  /// The ancestor of `i` at the first grey level `>= target`, or the root
  /// if none reaches it (spec §4.7 "Walk parent chain until reaching a
  /// node r' at grey level g + delta (or the root)").
  pub(crate) fn ancestor_at_or_above(&mut self, i: usize, target: u16) -> usize {
    let mut cur = i;
    loop {
      if self.gray_level[cur] as u16 >= target || self.is_root(cur) {
        return cur;
      }
      let next = self.higher_ancestor(cur);
      if next == cur {
        return cur;
      }
      cur = next;
    }
  }

  /// Reverse adjacency of `parent`: the direct children of every node.
  pub(crate) fn children_of(&self) -> Vec<Vec<u32>> {
    let mut children = vec![Vec::new(); self.len()];
    for i in 0..self.len() {
      if !self.is_root(i) {
        children[self.parent[i] as usize].push(i as u32);
      }
    }
    children
  }
}

fn find(parent: &[u32], mut i: u32) -> u32 {
  while parent[i as usize] != i {
    i = parent[i as usize];
  }
  i
}

/// Stable counting sort of pixel indices by grey level (256 buckets).
fn counting_sort_by_gray_level(gray_level: &[u8]) -> Result<Vec<u32>> {
  let mut counts = [0usize; 257];
  for &g in gray_level {
    counts[g as usize + 1] += 1;
  }
  for i in 1..counts.len() {
    counts[i] += counts[i - 1];
  }
  let mut cursor = counts;
  let mut order = try_filled_vec(gray_level.len(), 0u32)?;
  for (i, &g) in gray_level.iter().enumerate() {
    let slot = &mut cursor[g as usize];
    order[*slot] = i as u32;
    *slot += 1;
  }
  Ok(order)
}

#[cfg(test)]
#[path = "forest_test.rs"]
mod forest_test;
