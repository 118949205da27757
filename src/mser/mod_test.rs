use super::*;

fn make_image(width: usize, height: usize, values: &[u8]) -> Grid<u8> {
  let mut grid = Grid::<u8>::new(width, height).unwrap();
  for y in 0..height {
    for x in 0..width {
      grid.set(x, y, values[y * width + x]);
    }
  }
  grid
}

fn white_disc(size: usize, cx: f32, cy: f32, radius: f32) -> Grid<u8> {
  let mut values = vec![0u8; size * size];
  for y in 0..size {
    for x in 0..size {
      let dx = x as f32 - cx;
      let dy = y as f32 - cy;
      if dx * dx + dy * dy <= radius * radius {
        values[y * size + x] = 255;
      }
    }
  }
  make_image(size, size, &values)
}

#[test]
fn uniform_image_selects_no_regions() {
  let image = make_image(10, 10, &[42u8; 100]);
  let mut mser = MserDetector::new(MserConfig::default()).unwrap();
  mser.process(&image).unwrap();
  assert!(mser.regions().is_empty());
}

#[test]
fn regions_are_empty_before_process() {
  let mser = MserDetector::new(MserConfig::default()).unwrap();
  assert!(mser.regions().is_empty());
}

#[test]
fn white_disc_produces_region_near_expected_area() {
  let image = white_disc(100, 50.0, 50.0, 30.0);
  let mut mser = MserDetector::new(MserConfig::default()).unwrap();
  mser.process(&image).unwrap();

  assert!(!mser.regions().is_empty());
  let expected_area = std::f32::consts::PI * 30.0 * 30.0;
  let closest = mser
    .regions()
    .iter()
    .min_by(|a, b| {
      (a.area as f32 - expected_area)
        .abs()
        .partial_cmp(&(b.area as f32 - expected_area).abs())
        .unwrap()
    })
    .unwrap();
  assert!((closest.area as f32 - expected_area).abs() < expected_area * 0.1);
}

#[test]
fn ellipse_fit_centres_on_disc_middle() {
  let image = white_disc(100, 50.0, 50.0, 30.0);
  let mut mser = MserDetector::new(MserConfig::default()).unwrap();
  mser.process(&image).unwrap();
  assert!(!mser.regions().is_empty());

  let ellipses = mser.fit_ellipses().to_vec();
  let expected_area = std::f32::consts::PI * 30.0 * 30.0;
  let (best_idx, _) = mser
    .regions()
    .iter()
    .enumerate()
    .min_by(|(_, a), (_, b)| {
      (a.area as f32 - expected_area)
        .abs()
        .partial_cmp(&(b.area as f32 - expected_area).abs())
        .unwrap()
    })
    .unwrap();

  let ellipse = ellipses[best_idx];
  assert!((ellipse.mean_x - 50.0).abs() < 2.0);
  assert!((ellipse.mean_y - 50.0).abs() < 2.0);
}

#[test]
fn reprocessing_clears_prior_regions_and_ellipses() {
  let disc = white_disc(60, 30.0, 30.0, 15.0);
  let flat = make_image(60, 60, &[0u8; 3600]);
  let mut mser = MserDetector::new(MserConfig::default()).unwrap();
  mser.process(&disc).unwrap();
  assert!(!mser.regions().is_empty());
  mser.process(&flat).unwrap();
  assert!(mser.regions().is_empty());
  assert!(mser.fit_ellipses().is_empty());
}
