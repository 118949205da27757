use super::*;

fn gaussian_blob(width: usize, height: usize, cx: f32, cy: f32, sigma: f32) -> Grid<f32> {
  let mut grid = Grid::<f32>::new(width, height).unwrap();
  for y in 0..height {
    for x in 0..width {
      let dx = x as f32 - cx;
      let dy = y as f32 - cy;
      let v = (-(dx * dx + dy * dy) / (2.0 * sigma * sigma)).exp();
      grid.set(x, y, v);
    }
  }
  grid
}

#[test]
fn variant_descriptor_lengths_match_spec() {
  assert_eq!(HogVariant::Uoctti.descriptor_len(), 31);
  assert_eq!(HogVariant::DalalTriggs.descriptor_len(), 36);
}

#[test]
fn uoctti_descriptors_have_31_dims() {
  let image = gaussian_blob(64, 64, 32.0, 32.0, 6.0);
  let config = HogConfig::default().with_cell_size(8).with_variant(HogVariant::Uoctti);
  let mut hog = Hog::new(config).unwrap();
  hog.compute(&image).unwrap();
  assert!(!hog.descriptors().is_empty());
  for d in hog.descriptors() {
    assert_eq!(d.len(), 31);
  }
}

#[test]
fn dalal_triggs_descriptors_have_36_dims() {
  let image = gaussian_blob(64, 64, 32.0, 32.0, 6.0);
  let config = HogConfig::default().with_cell_size(8).with_variant(HogVariant::DalalTriggs);
  let mut hog = Hog::new(config).unwrap();
  hog.compute(&image).unwrap();
  for d in hog.descriptors() {
    assert_eq!(d.len(), 36);
  }
}

#[test]
fn grid_dimensions_match_cell_tiling() {
  let image = Grid::<f32>::new(64, 32).unwrap();
  let mut hog = Hog::new(HogConfig::default().with_cell_size(8)).unwrap();
  hog.compute(&image).unwrap();
  assert_eq!(hog.grid_dimensions(), (8, 4));
}

#[test]
fn zero_cell_size_is_rejected() {
  assert!(HogConfig::default().with_cell_size(0).validate().is_err());
}

#[test]
fn glyph_has_requested_dimensions() {
  let descriptor = vec![1.0f32; 9];
  let glyph = render_glyph(&descriptor, 16);
  assert_eq!(glyph.width(), 16);
  assert_eq!(glyph.height(), 16);
}

#[test]
fn flat_image_produces_zero_energy_descriptors() {
  let image = Grid::<f32>::new(32, 32).unwrap();
  let mut hog = Hog::new(HogConfig::default().with_cell_size(8)).unwrap();
  hog.compute(&image).unwrap();
  for d in hog.descriptors() {
    assert!(d.iter().all(|v| *v == 0.0));
  }
}
