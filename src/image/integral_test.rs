use super::*;

fn ones(width: usize, height: usize) -> Grid<f32> {
  let mut g = Grid::<f32>::new(width, height).unwrap();
  g.fill(1.0);
  g
}

#[test]
fn integral_of_ones_equals_rectangle_area() {
  let src = ones(5, 5);
  let integral = integral_image(&src).unwrap();
  assert_eq!(integral.get(4, 4), 25.0);
  assert_eq!(integral.get(0, 0), 1.0);
  assert_eq!(integral.get(2, 0), 3.0);
}

fn rect_sum(integral: &Grid<f32>, x1: usize, y1: usize, x2: usize, y2: usize) -> f32 {
  let br = integral.get(x2, y2);
  let top = if y1 == 0 { 0.0 } else { integral.get(x2, y1 - 1) };
  let left = if x1 == 0 { 0.0 } else { integral.get(x1 - 1, y2) };
  let tl = if x1 == 0 || y1 == 0 {
    0.0
  } else {
    integral.get(x1 - 1, y1 - 1)
  };
  br - top - left + tl
}

#[test]
fn arbitrary_rectangle_sum_matches_source() {
  let mut src = Grid::<f32>::new(6, 6).unwrap();
  for y in 0..6 {
    for x in 0..6 {
      src.set(x, y, (x + y) as f32);
    }
  }
  let integral = integral_image(&src).unwrap();

  let (x1, y1, x2, y2) = (2usize, 1usize, 4usize, 3usize);
  let mut expected = 0.0f32;
  for y in y1..=y2 {
    for x in x1..=x2 {
      expected += src.get(x, y);
    }
  }
  assert_eq!(rect_sum(&integral, x1, y1, x2, y2), expected);
}

#[test]
fn integer_instantiation_sums_correctly() {
  let mut src = Grid::<i32>::new(3, 3).unwrap();
  for y in 0..3 {
    for x in 0..3 {
      src.set(x, y, 2);
    }
  }
  let integral = integral_image(&src).unwrap();
  assert_eq!(integral.get(2, 2), 18);
}
