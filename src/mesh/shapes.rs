//! Parametric solids built directly as polygon lists (no BSP pass needed)

use crate::errors::CsgError;
use crate::float_types::{PI, Real, TAU};
use crate::mesh::Mesh;
use crate::mesh::polygon::Polygon;
use crate::mesh::vertex::Vertex;
use nalgebra::{Point3, Vector2, Vector3};
use std::fmt::Debug;

/// Cube faces as corner indices plus outward normal. Corner `i` sits at
/// `+x` when bit 1 is set, `+y` for bit 2 and `+z` for bit 4.
const CUBE_FACES: [([usize; 4], [Real; 3]); 6] = [
    ([0, 4, 6, 2], [-1.0, 0.0, 0.0]),
    ([1, 3, 7, 5], [1.0, 0.0, 0.0]),
    ([0, 1, 5, 4], [0.0, -1.0, 0.0]),
    ([2, 6, 7, 3], [0.0, 1.0, 0.0]),
    ([0, 2, 3, 1], [0.0, 0.0, -1.0]),
    ([4, 5, 7, 6], [0.0, 0.0, 1.0]),
];

/// Texture coordinate of cube corner `i` on the face with `normal`.
fn cube_uv(i: usize, normal: &Vector3<Real>) -> Vector2<Real> {
    let bit = |mask: usize, set: Real, unset: Real| if i & mask != 0 { set } else { unset };
    if normal.y != 0.0 {
        let v = if normal.y > 0.0 { bit(4, 0.0, 1.0) } else { bit(4, 1.0, 0.0) };
        Vector2::new(bit(1, 0.0, 1.0), v)
    } else if normal.x != 0.0 {
        let u = if normal.x > 0.0 { bit(4, 0.0, 1.0) } else { bit(4, 1.0, 0.0) };
        Vector2::new(u, bit(2, 0.0, 1.0))
    } else {
        let v = if normal.z > 0.0 { bit(2, 1.0, 0.0) } else { bit(2, 0.0, 1.0) };
        Vector2::new(bit(1, 0.0, 1.0), v)
    }
}

/// Turn vertex loops into polygons, dropping loops that span no plane.
pub(crate) fn collect_faces<S: Clone>(
    faces: impl IntoIterator<Item = Vec<Vertex>>,
    metadata: &Option<S>,
) -> Vec<Polygon<S>> {
    faces
        .into_iter()
        .filter_map(|face| match Polygon::new(face, metadata.clone()) {
            Ok(polygon) => Some(polygon),
            Err(err) => {
                log::debug!("dropping degenerate face: {err}");
                None
            },
        })
        .collect()
}

impl<S: Clone + Debug + Send + Sync> Mesh<S> {
    /// Axis-aligned box around `center`, extending `radius` along each axis
    /// in both directions.
    ///
    /// Every face carries its own vertices, normals and a full `[0, 1]²` UV
    /// square. Faces flattened by a zero radius component are dropped.
    ///
    /// ```
    /// # use csgcarve::Mesh;
    /// # use nalgebra::{Point3, Vector3};
    /// let cube: Mesh<()> = Mesh::cube(Point3::origin(), Vector3::new(1.0, 1.0, 1.0), None);
    /// assert_eq!(cube.polygons.len(), 6);
    /// assert!((cube.volume() - 8.0).abs() < 1e-9);
    /// ```
    pub fn cube(center: Point3<Real>, radius: Vector3<Real>, metadata: Option<S>) -> Mesh<S> {
        let faces = CUBE_FACES.iter().map(|(corners, [nx, ny, nz])| {
            let normal = Vector3::new(*nx, *ny, *nz);
            corners
                .iter()
                .map(|&i| {
                    let sign = |mask: usize| if i & mask != 0 { 1.0 } else { -1.0 };
                    let pos = center
                        + Vector3::new(
                            radius.x * sign(1),
                            radius.y * sign(2),
                            radius.z * sign(4),
                        );
                    Vertex::with_uv(pos, normal, cube_uv(i, &normal))
                })
                .collect()
        });

        let polygons = collect_faces(faces, &metadata);
        Mesh::from_polygons(&polygons, metadata)
    }

    /// Latitude/longitude sphere.
    ///
    /// `slices` runs around the Y axis (at least 3), `stacks` from pole to pole
    /// (at least 2). Band quads touching a pole collapse into triangles. Vertex
    /// normals are radial; `u` follows the longitude and `v` runs from 1 at the
    /// +Y pole to 0 at the -Y pole.
    pub fn sphere(
        center: Point3<Real>,
        radius: Real,
        slices: usize,
        stacks: usize,
        metadata: Option<S>,
    ) -> Mesh<S> {
        let slices = slices.max(3);
        let stacks = stacks.max(2);

        let vertex = |u: Real, v: Real| {
            let theta = u * TAU;
            let phi = v * PI;
            let dir = Vector3::new(theta.cos() * phi.sin(), phi.cos(), theta.sin() * phi.sin());
            Vertex::with_uv(center + dir * radius, dir, Vector2::new(u, 1.0 - v))
        };

        let mut faces = Vec::with_capacity(slices * stacks);
        for i in 0..slices {
            let (u0, u1) = (i as Real / slices as Real, (i + 1) as Real / slices as Real);
            for j in 0..stacks {
                let (v0, v1) = (j as Real / stacks as Real, (j + 1) as Real / stacks as Real);
                let mut face = vec![vertex(u0, v0)];
                if j > 0 {
                    face.push(vertex(u1, v0));
                }
                if j < stacks - 1 {
                    face.push(vertex(u1, v1));
                }
                face.push(vertex(u0, v1));
                faces.push(face);
            }
        }

        let polygons = collect_faces(faces, &metadata);
        Mesh::from_polygons(&polygons, metadata)
    }

    /// Cylinder from `start` to `end`, approximated by `slices` (at least 3)
    /// side quads and two triangle fans.
    ///
    /// Side `u` follows the circumference and `v` the axis; cap UVs are the
    /// planar projection of the unit disk onto `[0, 1]²`.
    ///
    /// ## Errors
    /// [`CsgError::DegenerateAxis`] if `start` and `end` coincide.
    pub fn cylinder(
        start: Point3<Real>,
        end: Point3<Real>,
        radius: Real,
        slices: usize,
        metadata: Option<S>,
    ) -> Result<Mesh<S>, CsgError> {
        let slices = slices.max(3);
        let ray = end - start;
        let length = ray.norm();
        if !length.is_finite() || length < Real::EPSILON {
            return Err(CsgError::DegenerateAxis {
                what: "cylinder axis",
                length,
            });
        }

        let axis_z = ray / length;
        let seed = if axis_z.y.abs() > 0.5 {
            Vector3::x()
        } else {
            Vector3::y()
        };
        let axis_x = seed.cross(&axis_z).normalize();
        let axis_y = axis_x.cross(&axis_z).normalize();

        let disk_uv = |angle: Real| Vector2::new(0.5 + 0.5 * angle.cos(), 0.5 + 0.5 * angle.sin());
        let start_center = Vertex::with_uv(start, -axis_z, Vector2::new(0.5, 0.5));
        let end_center = Vertex::with_uv(end, axis_z, Vector2::new(0.5, 0.5));

        // stack: 0 at start, 1 at end; blend: -1 start cap, 0 side, 1 end cap
        let point = |stack: Real, slice: Real, blend: Real| {
            let angle = slice * TAU;
            let out = axis_x * angle.cos() + axis_y * angle.sin();
            let pos = start + ray * stack + out * radius;
            let normal = out * (1.0 - blend.abs()) + axis_z * blend;
            let uv = if blend == 0.0 {
                Vector2::new(slice, stack)
            } else {
                disk_uv(angle)
            };
            Vertex::with_uv(pos, normal, uv)
        };

        let mut faces = Vec::with_capacity(slices * 3);
        for i in 0..slices {
            let t0 = i as Real / slices as Real;
            let t1 = (i + 1) as Real / slices as Real;
            faces.push(vec![start_center, point(0.0, t0, -1.0), point(0.0, t1, -1.0)]);
            faces.push(vec![
                point(0.0, t1, 0.0),
                point(0.0, t0, 0.0),
                point(1.0, t0, 0.0),
                point(1.0, t1, 0.0),
            ]);
            faces.push(vec![end_center, point(1.0, t1, 1.0), point(1.0, t0, 1.0)]);
        }

        let polygons = collect_faces(faces, &metadata);
        Ok(Mesh::from_polygons(&polygons, metadata))
    }
}
