//! Test support library
//! Provides various helper functions & utilities for tests.
#![allow(dead_code)]

use csgcarve::{
    CSGOps, Mesh,
    float_types::Real,
    mesh::{polygon::Polygon, vertex::Vertex},
};
use nalgebra::{Point3, Vector3};

/// Route `log` output through the test harness. Safe to call from every test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Returns the bounding box `[min_x, min_y, min_z, max_x, max_y, max_z]` of a mesh.
pub fn bounds(mesh: &Mesh<()>) -> [Real; 6] {
    let bb = mesh.bounding_box();
    [bb.mins.x, bb.mins.y, bb.mins.z, bb.maxs.x, bb.maxs.y, bb.maxs.z]
}

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Helper to make a simple Polygon in 3D with given vertices.
pub fn make_polygon_3d(points: &[[Real; 3]]) -> Polygon<()> {
    let verts = points
        .iter()
        .map(|p| Vertex::new(Point3::new(p[0], p[1], p[2]), Vector3::z()))
        .collect();
    Polygon::new(verts, None).expect("test polygon spans a plane")
}

/// Unit-radius axis-aligned cube (side 2) around `center`.
pub fn unit_cube(center: [Real; 3]) -> Mesh<()> {
    Mesh::cube(
        Point3::new(center[0], center[1], center[2]),
        Vector3::new(1.0, 1.0, 1.0),
        None,
    )
}

/// `true` if the winding of every polygon agrees with its plane normal.
pub fn winding_matches_planes(mesh: &Mesh<()>) -> bool {
    mesh.polygons.iter().all(|poly| {
        let area_normal = poly.area_normal();
        area_normal.norm() < 1e-12 || area_normal.dot(&poly.plane.normal) > 0.0
    })
}

/// Area of a triangle given by three 3D points.
pub fn triangle_area(a: Point3<Real>, b: Point3<Real>, c: Point3<Real>) -> Real {
    (b - a).cross(&(c - a)).norm() * 0.5
}

/// Sum of the polygon areas of a mesh.
pub fn surface_area(mesh: &Mesh<()>) -> Real {
    mesh.polygons
        .iter()
        .flat_map(|poly| poly.triangulate())
        .map(|[a, b, c]| triangle_area(a.pos, b.pos, c.pos))
        .sum()
}
