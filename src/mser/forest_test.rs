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

#[test]
fn uniform_image_is_a_single_component() {
  let image = make_image(4, 4, &[7u8; 16]);
  let forest = ComponentForest::build(&image).unwrap();
  let root = find(&forest.parent, 0);
  for i in 1..forest.len() {
    assert_eq!(find(&forest.parent, i as u32), root);
  }
  assert_eq!(forest.area[root as usize], 16);
}

/// The pixel grid is always 4-connected as a whole, so the uncompressed
/// `parent` chain of every node converges to a single whole-image root by
/// the time `build` finishes, whatever the grey values are — `find` never
/// distinguishes a region from its background at the end of construction.
/// The region signal instead lives in `area`, which freezes the size a
/// node held at the moment it stopped being a root: a darker disc on a
/// brighter background is processed (and fully merges with itself) before
/// any background pixel touches it, so some node's `area` is left holding
/// exactly the disc's pixel count even after that node is later absorbed.
#[test]
fn dark_disc_forms_a_frozen_intermediate_node_before_merging_into_background() {
  #[rustfmt::skip]
  let values: Vec<u8> = vec![
    255, 255, 255, 255, 255,
    255, 0, 0, 0, 255,
    255, 0, 0, 0, 255,
    255, 0, 0, 0, 255,
    255, 255, 255, 255, 255,
  ];
  let image = make_image(5, 5, &values);
  let forest = ComponentForest::build(&image).unwrap();

  assert!(forest.area.contains(&9), "expected some node to have frozen the disc's own area");

  let root = find(&forest.parent, 0);
  for i in 1..forest.len() {
    assert_eq!(find(&forest.parent, i as u32), root);
  }
  assert_eq!(forest.area[root as usize], 25);
}

#[test]
fn ancestor_at_or_above_reaches_root_when_no_match() {
  let image = make_image(3, 3, &[1u8; 9]);
  let mut forest = ComponentForest::build(&image).unwrap();
  let ancestor = forest.ancestor_at_or_above(0, 250);
  assert!(forest.is_root(ancestor));
}

#[test]
fn children_of_reconstructs_reverse_adjacency() {
  let image = make_image(2, 2, &[1, 2, 3, 4]);
  let forest = ComponentForest::build(&image).unwrap();
  let children = forest.children_of();
  let total_children: usize = children.iter().map(|c| c.len()).sum();
  assert_eq!(total_children, forest.len() - 1);
}
