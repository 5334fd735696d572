mod support;

use csgcarve::CSGOps;
use csgcarve::mesh::bsp::{BalancedSplittingStrategy, Bsp, NodeId};
use csgcarve::mesh::polygon::Polygon;
use nalgebra::Vector3;

use crate::support::{init_logging, make_polygon_3d, unit_cube};

fn triangle() -> Polygon<()> {
    make_polygon_3d(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])
}

#[test]
fn new_and_build() {
    let p = triangle();
    let bsp: Bsp<()> = Bsp::from_polygons(&[p.clone()]);
    let root = bsp.root();
    assert_eq!(root.plane.as_ref(), Some(&p.plane));
    assert_eq!(root.polygons.len(), 1);
    assert!(root.is_leaf());
    assert_eq!(bsp.node_count(), 1);
}

#[test]
fn empty_tree_passes_polygons_through() {
    let bsp: Bsp<()> = Bsp::new();
    assert!(bsp.root().plane.is_none());
    let input = vec![triangle()];
    assert_eq!(bsp.clip_polygons(&input), input);
    assert!(bsp.all_polygons().is_empty());
}

#[test]
fn invert() {
    let p = triangle();
    let mut bsp: Bsp<()> = Bsp::from_polygons(&[p.clone()]);
    bsp.invert();

    let root = bsp.root();
    assert_eq!(root.plane.as_ref().map(|pl| pl.normal()), Some(-Vector3::z()));
    assert_eq!(root.polygons[0].plane.normal(), -Vector3::z());
    assert!(root.polygons[0].vertices.iter().all(|v| v.normal == -Vector3::z()));

    bsp.invert();
    assert_eq!(bsp.all_polygons(), vec![p]);
}

#[test]
fn cube_tree_keeps_every_face() {
    init_logging();
    let cube = unit_cube([0.0, 0.0, 0.0]);
    let bsp = Bsp::from_polygons(&cube.polygons);
    // every face of a convex solid is behind all the others
    assert_eq!(bsp.polygon_count(), 6);
    assert_eq!(bsp.node_count(), 6);
    assert_eq!(bsp.depth(), 6);
    assert!(bsp.root().front.is_none());
    assert_eq!(bsp.all_polygons().len(), 6);
}

#[test]
fn clip_polygons_removes_inside_parts() {
    let cube = unit_cube([0.0, 0.0, 0.0]);
    let bsp = Bsp::from_polygons(&cube.polygons);

    let inside = make_polygon_3d(&[[-0.5, -0.5, 0.0], [0.5, -0.5, 0.0], [0.0, 0.5, 0.0]]);
    let outside = make_polygon_3d(&[[5.0, 5.0, 5.0], [6.0, 5.0, 5.0], [5.0, 6.0, 5.0]]);
    let spanning = make_polygon_3d(&[[0.0, 0.0, 0.0], [3.0, 0.0, 0.0], [3.0, 0.5, 0.0]]);

    assert!(bsp.clip_polygons(&[inside]).is_empty());
    assert_eq!(bsp.clip_polygons(&[outside.clone()]), vec![outside]);

    let kept = bsp.clip_polygons(&[spanning]);
    assert!(!kept.is_empty());
    for poly in &kept {
        assert!(poly.vertices.iter().all(|v| v.pos.x >= 1.0 - 1e-9));
    }
}

#[test]
fn clip_to_removes_polygons_inside_other_tree() {
    let a = unit_cube([0.0, 0.0, 0.0]);
    let far = unit_cube([10.0, 0.0, 0.0]);
    let inner = unit_cube([0.0, 0.0, 0.0]).scale(0.5, 0.5, 0.5);

    let tree_a = Bsp::from_polygons(&a.polygons);

    // disjoint solids clip nothing away
    let mut tree_far = Bsp::from_polygons(&far.polygons);
    tree_far.clip_to(&tree_a);
    assert_eq!(tree_far.polygon_count(), 6);

    // a solid nested inside the other disappears completely
    let mut tree_inner = Bsp::from_polygons(&inner.polygons);
    tree_inner.clip_to(&tree_a);
    assert_eq!(tree_inner.polygon_count(), 0);
    assert!(tree_inner.all_polygons().is_empty());
}

#[test]
fn all_polygons_is_node_then_front_then_back() {
    let below = make_polygon_3d(&[[0.0, 0.0, -1.0], [1.0, 0.0, -1.0], [0.0, 1.0, -1.0]]);
    let above = make_polygon_3d(&[[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [0.0, 1.0, 1.0]]);
    let root = triangle();
    let bsp = Bsp::from_polygons(&[root.clone(), below.clone(), above.clone()]);

    assert_eq!(bsp.node_count(), 3);
    assert!(bsp.node(NodeId::ROOT).is_some());
    assert_eq!(bsp.all_polygons(), vec![root, above, below]);
}

#[test]
fn balanced_strategy_builds_equivalent_tree() {
    let cube = unit_cube([0.0, 0.0, 0.0]);
    let bsp = Bsp::from_polygons_with(&cube.polygons, &BalancedSplittingStrategy::default());
    assert_eq!(bsp.polygon_count(), 6);
    let probe = make_polygon_3d(&[[-0.5, -0.5, 0.0], [0.5, -0.5, 0.0], [0.0, 0.5, 0.0]]);
    assert!(bsp.clip_polygons(&[probe]).is_empty());
}
