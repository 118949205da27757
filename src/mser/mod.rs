//! C7: MSER (maximally stable extremal regions) — grey-level union-find
//! component tree, stability/area/diversity filtering, ellipse fit (spec
//! §4.7).

mod config;
mod ellipse;
mod forest;

pub use config::MserConfig;
pub use ellipse::Ellipse;

use crate::error::Result;
use crate::grid::Grid;
use forest::ComponentForest;

/// A selected extremal region.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MserRegion {
  pub pivot_x: usize,
  pub pivot_y: usize,
  pub area: u32,
  pub gray_level: u8,
  pub variation: f32,
}

/// Stateful MSER analyzer; `process` overwrites any prior result.
/// `fit_ellipses` is computed lazily on first call after `process` and
/// cached until the next `process` (spec §4.7 "frozen for extraction").
///
/// The grey-level union-find tree built by ascending-order processing is a
/// min-tree: node area grows monotonically toward the root as the
/// `gray <= g` threshold set grows, so only regions that are *locally
/// darker* than their surroundings ever appear as a stable node — a bright
/// blob on a darker background is an upper set and has no representing
/// node in that tree. `process` therefore builds the tree twice, once over
/// the image and once over its grey-level complement (spec §4.7 "both
/// polarities"), and merges the two region lists; VLFeat calls these
/// MSER- and MSER+.
pub struct MserDetector {
  config: MserConfig,
  regions: Vec<MserRegion>,
  region_is_bright: Vec<bool>,
  forest_dark: Option<ComponentForest>,
  forest_bright: Option<ComponentForest>,
  ellipses: Option<Vec<Ellipse>>,
}

impl MserDetector {
  pub fn new(config: MserConfig) -> Result<Self> {
    Ok(Self {
      config: config.clamped(),
      regions: Vec::new(),
      region_is_bright: Vec::new(),
      forest_dark: None,
      forest_bright: None,
      ellipses: None,
    })
  }

  #[cfg_attr(feature = "trace", tracing::instrument(skip_all, name = "mser::process"))]
  pub fn process(&mut self, image: &Grid<u8>) -> Result<()> {
    self.regions.clear();
    self.region_is_bright.clear();
    self.ellipses = None;

    let mut forest_dark = ComponentForest::build(image)?;
    let dark_regions = select_regions(&mut forest_dark, &self.config, false);

    let complement = invert_image(image)?;
    let mut forest_bright = ComponentForest::build(&complement)?;
    let bright_regions = select_regions(&mut forest_bright, &self.config, true);

    self.region_is_bright.extend(std::iter::repeat(false).take(dark_regions.len()));
    self.region_is_bright.extend(std::iter::repeat(true).take(bright_regions.len()));
    self.regions.extend(dark_regions);
    self.regions.extend(bright_regions);

    self.forest_dark = Some(forest_dark);
    self.forest_bright = Some(forest_bright);
    Ok(())
  }

  pub fn regions(&self) -> &[MserRegion] {
    &self.regions
  }

  pub fn fit_ellipses(&mut self) -> &[Ellipse] {
    if self.ellipses.is_none() {
      let forest_dark = self.forest_dark.as_ref();
      let forest_bright = self.forest_bright.as_ref();
      let computed = self
        .regions
        .iter()
        .zip(self.region_is_bright.iter())
        .filter_map(|(r, &is_bright)| {
          let forest = if is_bright { forest_bright } else { forest_dark }?;
          let i = r.pivot_y * forest.width + r.pivot_x;
          Some(Ellipse::from_moments(
            forest.area[i],
            forest.sum_x[i],
            forest.sum_y[i],
            forest.sum_xx[i],
            forest.sum_xy[i],
            forest.sum_yy[i],
          ))
        })
        .collect();
      self.ellipses = Some(computed);
    }
    self.ellipses.as_deref().unwrap_or(&[])
  }

  pub fn config(&self) -> &MserConfig {
    &self.config
  }
}

/// `255 - v` at every pixel; running the same ascending-order min-tree
/// construction over this image surfaces the regions that are stable
/// maxima in the original (spec §4.7 "both polarities").
fn invert_image(image: &Grid<u8>) -> Result<Grid<u8>> {
  let mut out = Grid::<u8>::new(image.width(), image.height())?;
  for y in 0..image.height() {
    for x in 0..image.width() {
      out.set(x, y, 255 - image.get(x, y));
    }
  }
  Ok(out)
}

/// Filter the component tree down to its maximally stable nodes: area
/// within bounds, local minimum of variation along the parent chain, and
/// not insufficiently diverse from an already-accepted nested ancestor.
/// `invert_gray` reports the *original* image's grey level on each region
/// when the tree was built over the complement.
fn select_regions(forest: &mut ComponentForest, config: &MserConfig, invert_gray: bool) -> Vec<MserRegion> {
  let n_total = forest.len() as f32;
  let delta = config.delta as u16;
  let min_area = config.min_area;
  let max_area = config.max_area;
  let max_variation = config.max_variation;
  let min_diversity = config.min_diversity;

  let children = forest.children_of();
  let width = forest.width;

  let mut candidates: Vec<(usize, f32, u32)> = Vec::new();
  for i in 0..forest.len() {
    if forest.is_root(i) {
      continue;
    }

    let variation = node_variation(forest, i, delta);
    let own_area = forest.area[i] as f32;
    let fraction = own_area / n_total;
    if fraction < min_area || fraction > max_area || variation > max_variation {
      continue;
    }

    let parent = forest.parent[i] as usize;
    let parent_variation = node_variation(forest, parent, delta);
    if variation > parent_variation {
      continue;
    }
    let beats_children = children[i].iter().all(|&c| variation <= node_variation(forest, c as usize, delta));
    if !beats_children {
      continue;
    }

    candidates.push((i, variation, forest.area[i]));
  }

  candidates.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

  let mut accepted: Vec<(usize, f32, u32)> = Vec::new();
  'candidates: for &(i, variation, area) in &candidates {
    for &(j, _, area_j) in &accepted {
      if !in_same_chain(forest, i, j) {
        continue;
      }
      let (small, large) = if area <= area_j { (area, area_j) } else { (area_j, area) };
      let diversity = (large as f32 - small as f32) / large as f32;
      if diversity < min_diversity {
        continue 'candidates;
      }
    }
    accepted.push((i, variation, area));
  }

  accepted
    .into_iter()
    .map(|(i, variation, area)| MserRegion {
      pivot_x: i % width,
      pivot_y: i / width,
      area,
      gray_level: if invert_gray { 255 - forest.gray_level[i] } else { forest.gray_level[i] },
      variation,
    })
    .collect()
}

fn node_variation(forest: &mut ComponentForest, i: usize, delta: u16) -> f32 {
  let target = forest.gray_level[i] as u16 + delta;
  let ancestor = forest.ancestor_at_or_above(i, target);
  let own_area = forest.area[i] as f32;
  (forest.area[ancestor] as f32 - own_area) / own_area
}

/// Whether `i` and `j` are in an ancestor/descendant relationship
/// (nested regions) — diversity suppression only compares nested
/// candidates (spec §4.7 "for each already-selected ancestor a").
fn in_same_chain(forest: &ComponentForest, i: usize, j: usize) -> bool {
  is_ancestor(forest, i, j) || is_ancestor(forest, j, i)
}

fn is_ancestor(forest: &ComponentForest, ancestor: usize, mut node: usize) -> bool {
  loop {
    if node == ancestor {
      return true;
    }
    if forest.is_root(node) {
      return false;
    }
    node = forest.parent[node] as usize;
  }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
