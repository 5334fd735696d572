//! Prisms extruded along Y from a footprint in the XZ plane.

use crate::errors::CsgError;
use crate::float_types::Real;
use crate::mesh::Mesh;
use crate::mesh::ear_clip::{ear_clip, is_ccw};
use crate::mesh::shapes::collect_faces;
use crate::mesh::vertex::Vertex;
use nalgebra::{Point3, Vector2, Vector3};
use std::fmt::Debug;

/// Drop consecutive repeated points, including a closing point equal to the first.
fn dedup_outline(outline: &[[Real; 2]]) -> Vec<[Real; 2]> {
    let mut points: Vec<[Real; 2]> = Vec::with_capacity(outline.len());
    for &p in outline {
        if points.last() == Some(&p) {
            log::debug!("skipping repeated outline point {p:?}");
            continue;
        }
        points.push(p);
    }
    while points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    points
}

impl<S: Clone + Debug + Send + Sync> Mesh<S> {
    /// Extrude a closed `(x, z)` outline into a prism of `height`, centred on
    /// `y = 0` and then moved to `center`.
    ///
    /// The outline may be wound either way. Each edge becomes an outward-facing
    /// side quad whose `u` runs 0 to 1 along the edge and whose `v` is 1 at the
    /// top and 0 at the bottom. With `build_caps` the outline is ear-clipped
    /// into a roof facing +Y and a floor facing -Y; cap vertices carry no UV.
    ///
    /// ```
    /// # use csgcarve::Mesh;
    /// # use nalgebra::Point3;
    /// let square = [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]];
    /// let prism: Mesh<()> = Mesh::poly_box(2.0, &square, true, Point3::origin(), None)?;
    /// assert!((prism.volume() - 8.0).abs() < 1e-9);
    /// # Ok::<(), csgcarve::CsgError>(())
    /// ```
    ///
    /// ## Errors
    /// [`CsgError::TooFewPoints`] if fewer than 3 distinct consecutive points remain.
    pub fn poly_box(
        height: Real,
        outline: &[[Real; 2]],
        build_caps: bool,
        center: Point3<Real>,
        metadata: Option<S>,
    ) -> Result<Mesh<S>, CsgError> {
        let mut points = dedup_outline(outline);
        if points.len() < 3 {
            return Err(CsgError::TooFewPoints {
                count: points.len(),
            });
        }
        if !is_ccw(&points) {
            points.reverse();
        }

        let top = height / 2.0;
        let bottom = -height / 2.0;
        let at = |[x, z]: [Real; 2], y: Real| Point3::new(x, y, z) + center.coords;

        let mut faces = Vec::with_capacity(3 * points.len());
        for (i, &p1) in points.iter().enumerate() {
            let p0 = points[(i + 1) % points.len()];
            let (dx, dz) = (p0[0] - p1[0], p0[1] - p1[1]);
            let normal = Vector3::new(dz, 0.0, -dx);
            let len = normal.norm();
            if len < Real::EPSILON {
                log::debug!("skipping zero-length outline edge at {p1:?}");
                continue;
            }
            let normal = normal / len;
            faces.push(vec![
                Vertex::with_uv(at(p1, top), normal, Vector2::new(0.0, 1.0)),
                Vertex::with_uv(at(p0, top), normal, Vector2::new(1.0, 1.0)),
                Vertex::with_uv(at(p0, bottom), normal, Vector2::new(1.0, 0.0)),
                Vertex::with_uv(at(p1, bottom), normal, Vector2::new(0.0, 0.0)),
            ]);
        }

        if build_caps {
            // counter-clockwise in (x, z) faces -Y once lifted into 3D
            for [a, b, c] in ear_clip(&points) {
                let up = Vector3::y();
                faces.push(vec![
                    Vertex::new(at(points[a], bottom), -up),
                    Vertex::new(at(points[b], bottom), -up),
                    Vertex::new(at(points[c], bottom), -up),
                ]);
                faces.push(vec![
                    Vertex::new(at(points[c], top), up),
                    Vertex::new(at(points[b], top), up),
                    Vertex::new(at(points[a], top), up),
                ]);
            }
        }

        let polygons = collect_faces(faces, &metadata);
        Ok(Mesh::from_polygons(&polygons, metadata))
    }

    /// Straight cut of `line_width` from `(start_x, start_z)` to `(end_x, end_z)`,
    /// extruded to `height`.
    ///
    /// The footprint is a convex hexagon: the segment widened by `line_width / 2`
    /// to each side, with a pointed cap reaching `line_width / 2` past both ends.
    ///
    /// ```text
    ///        A+perp ------------------ B+perp
    ///       /                                \
    ///  A-cap     A ================= B     B+cap
    ///       \                                /
    ///        A-perp ------------------ B-perp
    /// ```
    ///
    /// ## Errors
    /// [`CsgError::DegenerateAxis`] for coincident end points or a non-positive width.
    #[allow(clippy::too_many_arguments)]
    pub fn cube1(
        start_x: Real,
        start_z: Real,
        end_x: Real,
        end_z: Real,
        height: Real,
        line_width: Real,
        build_caps: bool,
        center: Point3<Real>,
        metadata: Option<S>,
    ) -> Result<Mesh<S>, CsgError> {
        let a = Vector2::new(start_x, start_z);
        let b = Vector2::new(end_x, end_z);
        let length = (b - a).norm();
        if !length.is_finite() || length < Real::EPSILON {
            return Err(CsgError::DegenerateAxis {
                what: "cut segment",
                length,
            });
        }
        if line_width.is_nan() || line_width <= 0.0 {
            return Err(CsgError::DegenerateAxis {
                what: "line width",
                length: line_width,
            });
        }

        let dir = (b - a) / length;
        let cap = dir * (line_width / 2.0);
        let perp = Vector2::new(-dir.y, dir.x) * (line_width / 2.0);

        let outline = [b - perp, b + cap, b + perp, a + perp, a - cap, a - perp].map(|p| [p.x, p.y]);
        Self::poly_box(height, &outline, build_caps, center, metadata)
    }
}
