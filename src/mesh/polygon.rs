//! Struct and functions for working with planar, convex `Polygon`s

use crate::errors::CsgError;
use crate::float_types::{Real, parry3d::bounding_volume::Aabb};
use crate::mesh::plane::Plane;
use crate::mesh::vertex::Vertex;
use nalgebra::{Point3, Vector3};
use std::sync::OnceLock;

/// A convex polygon, defined by a list of coplanar vertices.
/// - `S` is the generic metadata type, stored as `Option<S>`. It is the shared
///   tag carried along by every clone, flip and split fragment of the polygon.
#[derive(Debug, Clone)]
pub struct Polygon<S: Clone> {
    /// Vertices defining the Polygon's shape
    pub vertices: Vec<Vertex>,

    /// The plane on which this Polygon lies, used for splitting
    pub plane: Plane,

    /// Lazily‑computed axis‑aligned bounding box of the Polygon
    pub bounding_box: OnceLock<Aabb>,

    /// Generic metadata associated with the Polygon
    pub metadata: Option<S>,
}

impl<S: Clone + PartialEq> PartialEq for Polygon<S> {
    fn eq(&self, other: &Self) -> bool {
        self.vertices == other.vertices
            && self.plane == other.plane
            && self.metadata == other.metadata
    }
}

impl<S: Clone> Polygon<S> {
    /// Create a polygon from vertices, deriving its plane from the winding.
    ///
    /// ## Errors
    /// [`CsgError::TooFewPoints`] for fewer than 3 vertices and
    /// [`CsgError::DegeneratePlane`] if the vertices are collinear.
    pub fn new(vertices: Vec<Vertex>, metadata: Option<S>) -> Result<Self, CsgError> {
        if vertices.len() < 3 {
            return Err(CsgError::TooFewPoints {
                count: vertices.len(),
            });
        }
        let plane = Plane::from_vertices(&vertices).ok_or(CsgError::DegeneratePlane)?;
        Ok(Self::from_parts(vertices, plane, metadata))
    }

    /// Assemble a polygon from an already known plane.
    /// Used for split fragments, which must stay on their parent's plane.
    pub const fn from_parts(vertices: Vec<Vertex>, plane: Plane, metadata: Option<S>) -> Self {
        Polygon {
            vertices,
            plane,
            bounding_box: OnceLock::new(),
            metadata,
        }
    }

    /// Axis aligned bounding box of this Polygon (cached after first call)
    pub fn bounding_box(&self) -> Aabb {
        *self.bounding_box.get_or_init(|| {
            let mut mins = Point3::new(Real::MAX, Real::MAX, Real::MAX);
            let mut maxs = Point3::new(-Real::MAX, -Real::MAX, -Real::MAX);
            for v in &self.vertices {
                mins.x = mins.x.min(v.pos.x);
                mins.y = mins.y.min(v.pos.y);
                mins.z = mins.z.min(v.pos.z);
                maxs.x = maxs.x.max(v.pos.x);
                maxs.y = maxs.y.max(v.pos.y);
                maxs.z = maxs.z.max(v.pos.z);
            }
            Aabb::new(mins, maxs)
        })
    }

    /// Reverses winding order, flips vertices normals, and flips the plane normal
    pub fn flip(&mut self) {
        self.vertices.reverse();
        for v in &mut self.vertices {
            v.flip();
        }
        self.plane.flip();
    }

    /// Return an iterator over paired vertices each forming an edge of the polygon
    pub fn edges(&self) -> impl Iterator<Item = (&Vertex, &Vertex)> {
        self.vertices.iter().zip(self.vertices.iter().cycle().skip(1))
    }

    /// Fan-triangulate this polygon around its first vertex.
    ///
    /// Valid because polygons are convex; a polygon with `n` vertices yields
    /// `n - 2` triangles with the polygon's winding.
    pub fn triangulate(&self) -> Vec<[Vertex; 3]> {
        if self.vertices.len() < 3 {
            return Vec::new();
        }
        let pivot = self.vertices[0];
        self.vertices
            .windows(2)
            .skip(1)
            .map(|pair| [pivot, pair[0], pair[1]])
            .collect()
    }

    /// Assign the plane normal to every vertex.
    pub fn set_new_normal(&mut self) {
        let normal = self.plane.normal();
        for v in &mut self.vertices {
            v.normal = normal;
        }
    }

    /// Recompute the plane from the current vertex positions.
    ///
    /// ## Errors
    /// [`CsgError::DegeneratePlane`] if the vertices no longer span a plane.
    pub fn recompute_plane(&mut self) -> Result<(), CsgError> {
        self.plane = Plane::from_vertices(&self.vertices).ok_or(CsgError::DegeneratePlane)?;
        self.bounding_box = OnceLock::new();
        Ok(())
    }

    /// Newell normal of the vertex loop, scaled by twice the polygon area.
    pub fn area_normal(&self) -> Vector3<Real> {
        self.edges().fold(Vector3::zeros(), |acc, (curr, next)| {
            acc + curr.pos.coords.cross(&next.pos.coords)
        })
    }

    /// `true` if every vertex and the plane hold only finite numbers.
    pub fn is_finite(&self) -> bool {
        self.plane.w.is_finite()
            && self.plane.normal.iter().all(|c| c.is_finite())
            && self.vertices.iter().all(Vertex::is_finite)
    }

    /// Returns a reference to the metadata, if any.
    pub const fn metadata(&self) -> Option<&S> {
        self.metadata.as_ref()
    }

    /// Sets the metadata to the given value.
    pub fn set_metadata(&mut self, data: S) {
        self.metadata = Some(data);
    }
}
