use narwhal::tree::{Tree, layout};
use narwhal::{Error, TreePoint};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn tree_layout_places_a_single_node_at_the_middle() {
    let tree = Tree::from_children(vec![vec![]]).unwrap();
    let pts = layout(&tree, 900.0, 1200.0).unwrap();
    assert_eq!(pts, vec![TreePoint { x: 450.0, y: 0.0 }]);
}

#[test]
fn tree_layout_spreads_two_leaves_over_the_breadth() {
    let tree = Tree::from_children(vec![vec![1, 2], vec![], vec![]]).unwrap();
    let pts = layout(&tree, 900.0, 1200.0).unwrap();
    assert!(approx(pts[0].x, 450.0));
    assert!(approx(pts[1].x, 225.0));
    assert!(approx(pts[2].x, 675.0));
    assert!(approx(pts[1].y, 1200.0));
}

#[test]
fn tree_layout_centers_parents_over_children() {
    // root -> a -> {a1, a2, a3}, root -> b
    let tree = Tree::from_children(vec![
        vec![1, 2],
        vec![3, 4, 5],
        vec![],
        vec![],
        vec![],
        vec![],
    ])
    .unwrap();
    let pts = layout(&tree, 100.0, 30.0).unwrap();
    assert!(approx(pts[1].x, pts[4].x), "a sits over its middle child");
    assert!(pts[2].x > pts[1].x, "b is placed right of a");
    assert!(approx(pts[2].x, pts[5].x), "a leaf sibling lines up with a's outer child");
    for (i, p) in pts.iter().enumerate() {
        assert!(p.x >= -1e-9 && p.x <= 100.0 + 1e-9, "node {i} out of range: {p:?}");
    }
    assert!(approx(pts[3].y, 30.0));
    assert!(approx(pts[1].y, 15.0));
}

#[test]
fn tree_layout_is_deterministic() {
    let children = vec![vec![1, 2, 3], vec![4, 5], vec![6], vec![], vec![], vec![], vec![]];
    let tree = Tree::from_children(children).unwrap();
    let a = layout(&tree, 900.0, 1200.0).unwrap();
    let b = layout(&tree, 900.0, 1200.0).unwrap();
    for (p, q) in a.iter().zip(&b) {
        assert_eq!(p.x.to_bits(), q.x.to_bits());
        assert_eq!(p.y.to_bits(), q.y.to_bits());
    }
}

#[test]
fn tree_from_children_rejects_malformed_input() {
    assert!(matches!(
        Tree::from_children(Vec::new()),
        Err(Error::MalformedTree { .. })
    ));
    // 1 and 2 point at each other but are unreachable from the root.
    assert!(matches!(
        Tree::from_children(vec![vec![], vec![2], vec![1]]),
        Err(Error::MalformedTree { .. })
    ));
    assert!(matches!(
        Tree::from_children(vec![vec![1], vec![0]]),
        Err(Error::MalformedTree { .. })
    ));
    assert!(matches!(
        Tree::from_children(vec![vec![1, 1], vec![]]),
        Err(Error::MalformedTree { .. })
    ));
    assert!(matches!(
        Tree::from_children(vec![vec![7]]),
        Err(Error::MalformedTree { .. })
    ));
}

#[test]
fn tree_layout_rejects_non_finite_size() {
    let tree = Tree::from_children(vec![vec![]]).unwrap();
    assert!(matches!(
        layout(&tree, f64::NAN, 1.0),
        Err(Error::InvalidOption { .. })
    ));
}
