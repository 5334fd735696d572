//! Infinite planes in 3-space and polygon splitting.
//!
//! A [`Plane`] is stored in point-normal form: a unit normal **n** and an offset
//! *w* such that every point **p** on the plane satisfies `n · p == w`.
//!
//! ### Polygon Splitting
//!
//! [`Plane::split_polygon`] is a 3D Sutherland-Hodgman pass:
//!
//! 1. every vertex is classified as FRONT, BACK or COPLANAR against the
//!    [split tolerance](crate::float_types::tolerance),
//! 2. the polygon class is the bitwise OR of its vertex classes,
//! 3. for each spanning edge (vᵢ, vⱼ) the intersection parameter is
//!    ```text
//!    t = (w - n·vᵢ) / (n·(vⱼ - vᵢ))
//!    ```
//!    and the interpolated vertex closes both the front and the back fragment.

use crate::float_types::{Real, tolerance};
use crate::mesh::polygon::Polygon;
use crate::mesh::vertex::Vertex;
use nalgebra::{Point3, Vector3};

/// Classification of a polygon or point that lies in the plane
/// (i.e. within `±tolerance()` of the plane).
pub const COPLANAR: i8 = 0;

/// Classification of a polygon or point that lies strictly on the
/// *front* side of the plane (the side the normal points toward).
pub const FRONT: i8 = 1;

/// Classification of a polygon or point that lies strictly on the
/// *back* side of the plane (opposite the normal direction).
pub const BACK: i8 = 2;

/// A polygon or edge that straddles the plane, producing pieces
/// on both the front **and** the back.
pub const SPANNING: i8 = 3;

/// Result of [`Plane::split_polygon`]: `(coplanar_front, coplanar_back, front, back)`.
pub type SplitBuckets<S> = (Vec<Polygon<S>>, Vec<Polygon<S>>, Vec<Polygon<S>>, Vec<Polygon<S>>);

/// A plane in 3D space, `normal · p == w`.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    /// Unit normal vector of the plane
    pub normal: Vector3<Real>,
    /// Signed distance from the origin along `normal`
    pub w: Real,
}

impl Plane {
    /// Build a new `Plane` from a (not‑necessarily‑unit) normal **n**
    /// and signed offset *w* (in the sense `n̂ · p == w`).
    ///
    /// Returns `None` if `normal` is (close to) zero.
    pub fn from_normal(normal: Vector3<Real>, w: Real) -> Option<Self> {
        let len = normal.norm();
        if !len.is_finite() || len < Real::EPSILON {
            return None;
        }
        Some(Plane {
            normal: normal / len,
            w,
        })
    }

    /// Create a plane through three points.
    /// The normal direction follows the right-hand rule: `(b - a) × (c - a)`.
    ///
    /// Collinear or coincident points give `None` instead of a NaN normal. The
    /// test is relative to the edge lengths, so it holds at any scale.
    pub fn from_points(a: Point3<Real>, b: Point3<Real>, c: Point3<Real>) -> Option<Self> {
        let (ab, ac) = (b - a, c - a);
        let n = ab.cross(&ac);
        let len = n.norm();
        if !len.is_finite() || len <= Real::EPSILON * ab.norm() * ac.norm() {
            return None;
        }
        let normal = n / len;
        Some(Plane {
            normal,
            w: normal.dot(&a.coords),
        })
    }

    /// Plane of a vertex loop.
    ///
    /// Uses the first three vertices. If those happen to be collinear the normal
    /// is taken from Newell's method over the whole loop, which keeps the
    /// winding's orientation.
    pub fn from_vertices(vertices: &[Vertex]) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }
        if let Some(plane) = Self::from_points(vertices[0].pos, vertices[1].pos, vertices[2].pos) {
            return Some(plane);
        }

        let newell = vertices
            .iter()
            .zip(vertices.iter().cycle().skip(1))
            .fold(Vector3::zeros(), |acc, (curr, next)| {
                acc + curr.pos.coords.cross(&next.pos.coords)
            });
        let len = newell.norm();
        // twice the loop area against the squared extent of the loop
        let extent = vertices
            .iter()
            .map(|v| (v.pos - vertices[0].pos).norm())
            .fold(0.0, Real::max);
        if !len.is_finite() || len <= Real::EPSILON * extent * extent {
            return None;
        }
        let normal = newell / len;
        let centroid = vertices
            .iter()
            .fold(Vector3::zeros(), |acc, v| acc + v.pos.coords)
            / vertices.len() as Real;
        Some(Plane {
            normal,
            w: normal.dot(&centroid),
        })
    }

    /// Get the plane normal
    pub const fn normal(&self) -> Vector3<Real> {
        self.normal
    }

    /// Get the offset (distance from origin along the normal)
    pub const fn offset(&self) -> Real {
        self.w
    }

    /// Flip the plane (reverse normal and distance)
    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    /// Return a flipped copy of this plane
    pub fn flipped(&self) -> Self {
        Plane {
            normal: -self.normal,
            w: -self.w,
        }
    }

    /// Signed distance of `point` from the plane, positive on the front side.
    #[inline]
    pub fn signed_distance(&self, point: &Point3<Real>) -> Real {
        self.normal.dot(&point.coords) - self.w
    }

    /// Classify a point as [`FRONT`], [`BACK`] or [`COPLANAR`].
    #[inline]
    pub fn orient_point(&self, point: &Point3<Real>) -> i8 {
        let eps = tolerance();
        let t = self.signed_distance(point);
        if t < -eps {
            BACK
        } else if t > eps {
            FRONT
        } else {
            COPLANAR
        }
    }

    /// Classify a polygon with respect to the plane.
    /// Returns a bitmask of `COPLANAR`, `FRONT`, and `BACK`.
    pub fn classify_polygon<S: Clone>(&self, polygon: &Polygon<S>) -> i8 {
        polygon
            .vertices
            .iter()
            .fold(COPLANAR, |acc, v| acc | self.orient_point(&v.pos))
    }

    /// Splits a polygon by this plane, returning four buckets:
    /// `(coplanar_front, coplanar_back, front, back)`.
    ///
    /// Coplanar polygons go to `coplanar_front` when their own normal agrees with
    /// this plane's normal. Fragments of a spanning polygon keep the original's
    /// plane and metadata; fragments with fewer than 3 vertices are dropped.
    pub fn split_polygon<S: Clone>(&self, polygon: &Polygon<S>) -> SplitBuckets<S> {
        let mut coplanar_front = Vec::new();
        let mut coplanar_back = Vec::new();
        let mut front = Vec::new();
        let mut back = Vec::new();

        let types: Vec<i8> = polygon
            .vertices
            .iter()
            .map(|v| self.orient_point(&v.pos))
            .collect();
        let polygon_type = types.iter().fold(COPLANAR, |acc, &t| acc | t);

        match polygon_type {
            COPLANAR => {
                if self.normal.dot(&polygon.plane.normal) > 0.0 {
                    coplanar_front.push(polygon.clone());
                } else {
                    coplanar_back.push(polygon.clone());
                }
            },
            FRONT => front.push(polygon.clone()),
            BACK => back.push(polygon.clone()),
            _ => {
                let count = polygon.vertices.len();
                let mut split_front = Vec::<Vertex>::with_capacity(count + 1);
                let mut split_back = Vec::<Vertex>::with_capacity(count + 1);

                for i in 0..count {
                    // j is the vertex following i, wrapping around to close the loop
                    let j = (i + 1) % count;
                    let type_i = types[i];
                    let type_j = types[j];
                    let vertex_i = &polygon.vertices[i];
                    let vertex_j = &polygon.vertices[j];

                    if type_i != BACK {
                        split_front.push(*vertex_i);
                    }
                    if type_i != FRONT {
                        split_back.push(*vertex_i);
                    }

                    if (type_i | type_j) == SPANNING {
                        let denom = self.normal.dot(&(vertex_j.pos - vertex_i.pos));
                        // both ends sit strictly on opposite sides, so denom cannot vanish
                        let t = (self.w - self.normal.dot(&vertex_i.pos.coords)) / denom;
                        let vertex_new = vertex_i.interpolate(vertex_j, t);
                        split_front.push(vertex_new);
                        split_back.push(vertex_new);
                    }
                }

                if split_front.len() >= 3 {
                    front.push(Polygon::from_parts(
                        split_front,
                        polygon.plane.clone(),
                        polygon.metadata.clone(),
                    ));
                }
                if split_back.len() >= 3 {
                    back.push(Polygon::from_parts(
                        split_back,
                        polygon.plane.clone(),
                        polygon.metadata.clone(),
                    ));
                }
            },
        }

        (coplanar_front, coplanar_back, front, back)
    }
}
