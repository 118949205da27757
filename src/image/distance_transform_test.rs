use super::*;

#[test]
fn one_d_zero_field_is_zero_everywhere() {
  let f = vec![0.0f32; 9];
  let (dist, _) = distance_transform_1d(&f, 1.0, 0.0);
  for d in dist {
    assert_eq!(d, 0.0);
  }
}

#[test]
fn one_d_single_seed_is_squared_distance() {
  let mut f = vec![1e9f32; 7];
  f[3] = 0.0;
  let (dist, arg) = distance_transform_1d(&f, 1.0, 0.0);
  for q in 0..7 {
    let expected = (q as f32 - 3.0) * (q as f32 - 3.0);
    assert!((dist[q] - expected).abs() < 1e-3);
    assert_eq!(arg[q], 3);
  }
}

#[test]
fn two_d_zero_field_is_zero_everywhere() {
  let mut f = Grid::<f32>::new(5, 5).unwrap();
  f.fill(0.0);
  let result = distance_transform_2d(&f, (1.0, 0.0), (1.0, 0.0), false).unwrap();
  for y in 0..5 {
    for x in 0..5 {
      assert_eq!(result.distance.get(x, y), 0.0);
    }
  }
}

#[test]
fn two_d_single_seed_matches_squared_euclidean_distance() {
  let mut f = Grid::<f32>::new(7, 7).unwrap();
  f.fill(1e9);
  f.set(3, 3, 0.0);

  let result = distance_transform_2d(&f, (1.0, 0.0), (1.0, 0.0), true).unwrap();
  for y in 0..7 {
    for x in 0..7 {
      let expected = ((x as f32 - 3.0).powi(2)) + ((y as f32 - 3.0).powi(2));
      assert!(
        (result.distance.get(x, y) - expected).abs() < 1e-2,
        "at ({x},{y}): got {}, expected {expected}",
        result.distance.get(x, y)
      );
    }
  }
  let argmin = result.argmin.unwrap();
  assert_eq!(argmin.get(0, 0), [3, 3]);
  assert_eq!(argmin.get(6, 6), [3, 3]);
}
