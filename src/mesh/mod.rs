//! `Mesh` struct and implementations of the `CSGOps` trait for `Mesh`

use crate::errors::CsgError;
use crate::float_types::{
    Real,
    parry3d::bounding_volume::{Aabb, BoundingVolume},
    tolerance,
};
use crate::mesh::{
    bsp::{Bsp, FirstPolygonStrategy, SplittingPlaneStrategy},
    polygon::Polygon,
    vertex::Vertex,
};
use crate::traits::CSGOps;
use nalgebra::{Matrix4, Point3, Vector3};
use std::{fmt::Debug, sync::OnceLock};

pub mod bsp;
pub mod buffers;
pub mod ear_clip;
pub mod extrude;
pub mod plane;
pub mod polygon;
pub mod shapes;
pub mod vertex;

/// A closed solid described by its boundary polygons.
///
/// Inside and outside are only known through the winding of the polygons:
/// every polygon's plane normal points away from the solid.
#[derive(Clone, Debug)]
pub struct Mesh<S: Clone + Send + Sync + Debug> {
    /// 3D polygons for volumetric shapes
    pub polygons: Vec<Polygon<S>>,

    /// Lazily calculated AABB that spans `polygons`.
    pub bounding_box: OnceLock<Aabb>,

    /// Metadata
    pub metadata: Option<S>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BooleanOp {
    Union,
    Subtract,
    Intersect,
}

impl BooleanOp {
    const fn name(self) -> &'static str {
        match self {
            BooleanOp::Union => "union",
            BooleanOp::Subtract => "subtract",
            BooleanOp::Intersect => "intersect",
        }
    }
}

impl<S: Clone + Send + Sync + Debug> Mesh<S> {
    /// Build a Mesh from an existing polygon list
    pub fn from_polygons(polygons: &[Polygon<S>], metadata: Option<S>) -> Self {
        Mesh {
            polygons: polygons.to_vec(),
            bounding_box: OnceLock::new(),
            metadata,
        }
    }

    /// Helper to collect all vertices from the Mesh.
    pub fn vertices(&self) -> Vec<Vertex> {
        self.polygons
            .iter()
            .flat_map(|p| p.vertices.iter().copied())
            .collect()
    }

    /// Triangulate each polygon in the Mesh returning a Mesh containing triangles
    pub fn triangulate(&self) -> Mesh<S> {
        let triangles = self
            .polygons
            .iter()
            .flat_map(|poly| {
                poly.triangulate().into_iter().map(move |triangle| {
                    Polygon::from_parts(triangle.to_vec(), poly.plane.clone(), poly.metadata.clone())
                })
            })
            .collect::<Vec<_>>();

        Mesh::from_polygons(&triangles, self.metadata.clone())
    }

    /// Renormalize all polygons in this Mesh by assigning each polygon's
    /// plane normal to all of its vertices.
    pub fn renormalize(&mut self) {
        for poly in &mut self.polygons {
            poly.set_new_normal();
        }
    }

    /// Enclosed volume, by the divergence theorem over the fan triangles of every
    /// polygon. Positive for outward-facing solids.
    pub fn volume(&self) -> Real {
        self.polygons
            .iter()
            .flat_map(|poly| poly.triangulate())
            .map(|[a, b, c]| a.pos.coords.dot(&b.pos.coords.cross(&c.pos.coords)))
            .sum::<Real>()
            / 6.0
    }

    /// Re-centre the polygons around the origin, in place.
    ///
    /// Every vertex (and every polygon plane) is moved by minus the centre of the
    /// bounding box. Returns the centre that was removed, so the caller can move
    /// the owning object by the same amount. An empty mesh is left alone and
    /// yields the zero vector.
    pub fn centerize(&mut self) -> Vector3<Real> {
        if self.polygons.is_empty() {
            return Vector3::zeros();
        }

        let aabb = self.bounding_box();
        let center = (aabb.mins.coords + aabb.maxs.coords) * 0.5;

        for poly in &mut self.polygons {
            for vert in &mut poly.vertices {
                vert.pos -= center;
            }
            poly.plane.w -= poly.plane.normal.dot(&center);
            poly.bounding_box = OnceLock::new();
        }
        self.invalidate_bounding_box();

        center
    }

    /// Return a new Mesh representing union of the two Meshes, picking BSP
    /// splitting planes with `strategy`.
    pub fn union_with<SP: SplittingPlaneStrategy<S>>(
        &self,
        other: &Mesh<S>,
        strategy: &SP,
    ) -> Result<Mesh<S>, CsgError> {
        self.boolean(other, BooleanOp::Union, strategy)
    }

    /// Return a new Mesh representing `self` minus `other`, picking BSP
    /// splitting planes with `strategy`.
    pub fn subtract_with<SP: SplittingPlaneStrategy<S>>(
        &self,
        other: &Mesh<S>,
        strategy: &SP,
    ) -> Result<Mesh<S>, CsgError> {
        self.boolean(other, BooleanOp::Subtract, strategy)
    }

    /// Return a new Mesh representing the intersection of the two Meshes,
    /// picking BSP splitting planes with `strategy`.
    pub fn intersect_with<SP: SplittingPlaneStrategy<S>>(
        &self,
        other: &Mesh<S>,
        strategy: &SP,
    ) -> Result<Mesh<S>, CsgError> {
        self.boolean(other, BooleanOp::Intersect, strategy)
    }

    fn ensure_finite(&self, operation: &'static str) -> Result<(), CsgError> {
        let bad = self.polygons.iter().filter(|p| !p.is_finite()).count();
        if bad == 0 {
            return Ok(());
        }
        log::warn!(
            "{operation} rejected for polygons: {} ({bad} not finite)",
            self.polygons.len()
        );
        Err(CsgError::NonFiniteGeometry {
            operation,
            bad,
            polygons: self.polygons.len(),
        })
    }

    fn boolean<SP: SplittingPlaneStrategy<S>>(
        &self,
        other: &Mesh<S>,
        op: BooleanOp,
        strategy: &SP,
    ) -> Result<Mesh<S>, CsgError> {
        let operation = op.name();
        self.ensure_finite(operation)?;
        other.ensure_finite(operation)?;

        // an empty tree clips nothing, which would turn `empty - b` into `-b`
        if self.polygons.is_empty() || other.polygons.is_empty() {
            let polygons = match op {
                BooleanOp::Union if self.polygons.is_empty() => other.polygons.clone(),
                BooleanOp::Union | BooleanOp::Subtract => self.polygons.clone(),
                BooleanOp::Intersect => Vec::new(),
            };
            return Ok(Mesh {
                polygons,
                bounding_box: OnceLock::new(),
                metadata: self.metadata.clone(),
            });
        }

        let mut a = Bsp::from_polygons_with(&self.polygons, strategy);
        let mut b = Bsp::from_polygons_with(&other.polygons, strategy);

        match op {
            BooleanOp::Union => {
                a.clip_to(&b);
                b.clip_to(&a);
                b.invert();
                b.clip_to(&a);
                b.invert();
                a.build_with(&b.all_polygons(), strategy);
            },
            BooleanOp::Subtract => {
                a.invert();
                a.clip_to(&b);
                b.clip_to(&a);
                b.invert();
                b.clip_to(&a);
                b.invert();
                a.build_with(&b.all_polygons(), strategy);
                a.invert();
            },
            BooleanOp::Intersect => {
                a.invert();
                b.clip_to(&a);
                b.invert();
                a.clip_to(&b);
                b.clip_to(&a);
                a.build_with(&b.all_polygons(), strategy);
                a.invert();
            },
        }

        let polygons = a.all_polygons();
        if polygons.iter().any(|p| !p.is_finite()) {
            log::error!(
                "{operation} failed for polygons: {} and {}",
                self.polygons.len(),
                other.polygons.len()
            );
            return Err(CsgError::NumericalFailure {
                operation,
                left_polygons: self.polygons.len(),
                right_polygons: other.polygons.len(),
            });
        }

        log::debug!(
            "{operation}: {} and {} polygons -> {}",
            self.polygons.len(),
            other.polygons.len(),
            polygons.len()
        );

        Ok(Mesh {
            polygons,
            bounding_box: OnceLock::new(),
            metadata: self.metadata.clone(),
        })
    }

    /// `true` if the bounding boxes of the two meshes overlap (within the split
    /// tolerance). Disjoint operands leave `subtract` and `union` results
    /// geometrically unchanged.
    pub fn overlaps(&self, other: &Mesh<S>) -> bool {
        !self.polygons.is_empty()
            && !other.polygons.is_empty()
            && self
                .bounding_box()
                .loosened(tolerance())
                .intersects(&other.bounding_box())
    }
}

impl<S: Clone + Send + Sync + Debug> CSGOps for Mesh<S> {
    /// Returns a new empty Mesh
    fn new() -> Self {
        Mesh {
            polygons: Vec::new(),
            bounding_box: OnceLock::new(),
            metadata: None,
        }
    }

    /// Return a new Mesh representing union of the two Meshes.
    ///
    /// ```text
    /// let c = a.union(b);
    ///     +-------+            +-------+
    ///     |       |            |       |
    ///     |   a   |            |   c   |
    ///     |    +--+----+   =   |       +----+
    ///     +----+--+    |       +----+       |
    ///          |   b   |            |   c   |
    ///          |       |            |       |
    ///          +-------+            +-------+
    /// ```
    fn union(&self, other: &Mesh<S>) -> Result<Mesh<S>, CsgError> {
        self.union_with(other, &FirstPolygonStrategy)
    }

    /// Return a new Mesh representing difference of the two Meshes.
    ///
    /// ```text
    /// let c = a.subtract(b);
    ///     +-------+            +-------+
    ///     |       |            |       |
    ///     |   a   |            |   c   |
    ///     |    +--+----+   =   |    +--+
    ///     +----+--+    |       +----+
    ///          |   b   |
    ///          |       |
    ///          +-------+
    /// ```
    fn subtract(&self, other: &Mesh<S>) -> Result<Mesh<S>, CsgError> {
        self.subtract_with(other, &FirstPolygonStrategy)
    }

    /// Return a new Mesh representing intersection of the two Meshes.
    ///
    /// ```text
    /// let c = a.intersect(b);
    ///     +-------+
    ///     |       |
    ///     |   a   |
    ///     |    +--+----+   =   +--+
    ///     +----+--+    |       +--+
    ///          |   b   |
    ///          |       |
    ///          +-------+
    /// ```
    fn intersect(&self, other: &Mesh<S>) -> Result<Mesh<S>, CsgError> {
        self.intersect_with(other, &FirstPolygonStrategy)
    }

    /// Apply an arbitrary 3D transform (as a 4x4 matrix) to the mesh.
    ///
    /// Normals go through the inverse transpose. Mirroring transforms keep the
    /// solid outward-facing. Polygons collapsed by a singular matrix are dropped.
    fn transform(&self, mat: &Matrix4<Real>) -> Mesh<S> {
        let normal_mat = mat.try_inverse().map(|inv| inv.transpose());
        let mirrored = mat.fixed_view::<3, 3>(0, 0).clone_owned().determinant() < 0.0;

        let polygons = self
            .polygons
            .iter()
            .filter_map(|poly| {
                let mut poly = poly.clone();
                for vert in &mut poly.vertices {
                    vert.pos = mat.transform_point(&vert.pos);
                    if let Some(normal_mat) = normal_mat.as_ref() {
                        let n = normal_mat.transform_vector(&vert.normal);
                        let len = n.norm();
                        vert.normal = if len > Real::EPSILON { n / len } else { n };
                    }
                }
                // keep the cached plane consistent with the new vertex positions
                if poly.recompute_plane().is_err() {
                    log::debug!("transform collapsed a polygon, dropping it");
                    return None;
                }
                if mirrored {
                    poly.flip();
                    // flip() also negated the normals that were already correct
                    for vert in &mut poly.vertices {
                        vert.flip();
                    }
                }
                Some(poly)
            })
            .collect();

        Mesh {
            polygons,
            bounding_box: OnceLock::new(),
            metadata: self.metadata.clone(),
        }
    }

    /// Returns an [`Aabb`] spanning every vertex (cached).
    fn bounding_box(&self) -> Aabb {
        *self.bounding_box.get_or_init(|| {
            let mut mins = Point3::new(Real::MAX, Real::MAX, Real::MAX);
            let mut maxs = Point3::new(-Real::MAX, -Real::MAX, -Real::MAX);
            for poly in &self.polygons {
                let bb = poly.bounding_box();
                mins = mins.inf(&bb.mins);
                maxs = maxs.sup(&bb.maxs);
            }
            Aabb::new(mins, maxs)
        })
    }

    /// Invalidates object's cached bounding box.
    fn invalidate_bounding_box(&mut self) {
        self.bounding_box = OnceLock::new();
    }

    /// Invert this Mesh (flip inside vs. outside)
    fn inverse(&self) -> Mesh<S> {
        let mut mesh = self.clone();
        for p in &mut mesh.polygons {
            p.flip();
        }
        mesh
    }
}
