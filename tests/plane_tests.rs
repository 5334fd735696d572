mod support;

use csgcarve::{
    float_types::tolerance,
    mesh::{
        plane::{BACK, COPLANAR, FRONT, Plane, SPANNING},
        polygon::Polygon,
        vertex::Vertex,
    },
};
use nalgebra::{Point3, Vector3};

use crate::support::{approx_eq, make_polygon_3d};

#[test]
fn flip() {
    let mut plane = Plane::from_normal(Vector3::y(), 2.0).expect("non-zero normal");
    plane.flip();
    assert_eq!(plane.normal(), Vector3::new(0.0, -1.0, 0.0));
    assert_eq!(plane.offset(), -2.0);
    assert_eq!(plane.flipped().normal(), Vector3::y());
}

#[test]
fn collinear_points_have_no_plane() {
    let a = Point3::new(0.0, 0.0, 0.0);
    let b = Point3::new(1.0, 1.0, 1.0);
    let c = Point3::new(2.0, 2.0, 2.0);
    assert!(Plane::from_points(a, b, c).is_none());
    assert!(Plane::from_normal(Vector3::zeros(), 1.0).is_none());
}

#[test]
fn degeneracy_does_not_depend_on_scale() {
    let tiny = Plane::from_points(
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1e-9, 0.0, 0.0),
        Point3::new(0.0, 1e-9, 0.0),
    )
    .expect("tiny triangle still spans a plane");
    assert!(tiny.normal().dot(&Vector3::z()) > 0.999);

    // a long sliver whose apex sits 1e-12 off the base line
    let a = Point3::new(0.0, 0.0, 0.0);
    let b = Point3::new(1e6, 0.0, 0.0);
    let c = Point3::new(2e6, 1e-12, 0.0);
    assert!(Plane::from_points(a, b, c).is_none());

    let sliver = [a, b, c].map(|p| Vertex::new(p, Vector3::z()));
    assert!(Plane::from_vertices(&sliver).is_none());
}

#[test]
fn from_points_follows_right_hand_rule() {
    let plane = Plane::from_points(
        Point3::new(0.0, 0.0, 3.0),
        Point3::new(1.0, 0.0, 3.0),
        Point3::new(0.0, 1.0, 3.0),
    )
    .expect("triangle spans a plane");
    assert_eq!(plane.normal(), Vector3::z());
    assert!(approx_eq(plane.offset(), 3.0, 1e-12));
}

#[test]
fn from_vertices_skips_collinear_prefix() {
    // first three vertices are collinear, the loop is not
    let verts = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [1.0, 1.0, 0.0]]
        .map(|[x, y, z]| Vertex::new(Point3::new(x, y, z), Vector3::z()));
    let plane = Plane::from_vertices(&verts).expect("loop spans a plane");
    assert!(plane.normal().dot(&Vector3::z()) > 0.999);
    assert!(approx_eq(plane.offset(), 0.0, 1e-12));
}

#[test]
fn orient_point_uses_tolerance() {
    let plane = Plane::from_normal(Vector3::z(), 0.0).expect("non-zero normal");
    let eps = tolerance();
    assert_eq!(plane.orient_point(&Point3::new(0.0, 0.0, eps * 0.5)), COPLANAR);
    assert_eq!(plane.orient_point(&Point3::new(0.0, 0.0, eps * 2.0)), FRONT);
    assert_eq!(plane.orient_point(&Point3::new(0.0, 0.0, -eps * 2.0)), BACK);
}

#[test]
fn classify_spanning_polygon() {
    let plane = Plane::from_normal(Vector3::x(), 0.5).expect("non-zero normal");
    let poly = make_polygon_3d(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]]);
    assert_eq!(plane.classify_polygon(&poly), SPANNING);
}

#[test]
fn split_polygon() {
    // Define a plane that splits the XY plane at y=0
    let plane = Plane::from_normal(Vector3::new(0.0, 1.0, 0.0), 0.0).expect("non-zero normal");

    // A polygon that crosses y=0 line: a square from ( -1, -1 ) to (1, 1 )
    let poly: Polygon<()> = make_polygon_3d(&[
        [-1.0, -1.0, 0.0],
        [1.0, -1.0, 0.0],
        [1.0, 1.0, 0.0],
        [-1.0, 1.0, 0.0],
    ]);

    let (cf, cb, f, b) = plane.split_polygon(&poly);
    assert_eq!(cf.len(), 0);
    assert_eq!(cb.len(), 0);
    assert_eq!(f.len(), 1);
    assert_eq!(b.len(), 1);

    let eps = tolerance();
    assert_eq!(f[0].vertices.len(), 4);
    assert_eq!(b[0].vertices.len(), 4);
    assert!(f[0].vertices.iter().all(|v| v.pos.y >= -eps));
    assert!(b[0].vertices.iter().all(|v| v.pos.y <= eps));

    // fragments stay on the parent's plane
    assert_eq!(f[0].plane, poly.plane);
    assert_eq!(b[0].plane, poly.plane);
}

#[test]
fn split_interpolates_uv_and_normal() {
    let plane = Plane::from_normal(Vector3::x(), 0.5).expect("non-zero normal");
    let verts = vec![
        Vertex::with_uv(Point3::new(0.0, 0.0, 0.0), Vector3::z(), [0.0, 0.0].into()),
        Vertex::with_uv(Point3::new(1.0, 0.0, 0.0), Vector3::z(), [1.0, 0.0].into()),
        Vertex::with_uv(Point3::new(1.0, 1.0, 0.0), Vector3::z(), [1.0, 1.0].into()),
    ];
    let poly: Polygon<()> = Polygon::new(verts, None).expect("triangle spans a plane");
    let (_, _, front, back) = plane.split_polygon(&poly);
    assert_eq!(front.len(), 1);
    assert_eq!(back.len(), 1);

    let cut = back[0]
        .vertices
        .iter()
        .find(|v| approx_eq(v.pos.x, 0.5, 1e-12) && approx_eq(v.pos.y, 0.0, 1e-12))
        .expect("edge (0,0)-(1,0) is cut at x = 0.5");
    let uv = cut.uv.expect("both ends carry a uv");
    assert!(approx_eq(uv.x, 0.5, 1e-12));
    assert_eq!(cut.normal, Vector3::z());
}

#[test]
fn coplanar_routing_follows_polygon_plane() {
    let plane = Plane::from_normal(Vector3::z(), 0.0).expect("non-zero normal");
    let up = make_polygon_3d(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
    let mut down = up.clone();
    down.flip();

    let (cf, cb, _, _) = plane.split_polygon(&up);
    assert_eq!((cf.len(), cb.len()), (1, 0));
    let (cf, cb, _, _) = plane.split_polygon(&down);
    assert_eq!((cf.len(), cb.len()), (0, 1));
}

#[test]
fn split_keeps_metadata() {
    let plane = Plane::from_normal(Vector3::x(), 0.5).expect("non-zero normal");
    let verts = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]]
        .map(|[x, y, z]| Vertex::new(Point3::new(x, y, z), Vector3::z()))
        .to_vec();
    let poly = Polygon::new(verts, Some("rock")).expect("square spans a plane");
    let (_, _, front, back) = plane.split_polygon(&poly);
    assert_eq!(front[0].metadata(), Some(&"rock"));
    assert_eq!(back[0].metadata(), Some(&"rock"));
}
