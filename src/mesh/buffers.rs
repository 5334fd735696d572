//! Conversion between `Mesh`es and flat, indexed triangle buffers.
//!
//! [`Mesh::to_mesh`] produces the buffer layout renderers and mesh colliders
//! expect: deduplicated vertices plus a triangle index list.
//! [`Mesh::from_mesh`] reads such buffers back. It reassembles the convex
//! polygons of fan-triangulated input, which makes the round trip through
//! buffers lossless for meshes this crate produced.

use crate::errors::CsgError;
use crate::float_types::{
    Real,
    parry3d::{bounding_volume::Aabb, shape::TriMesh},
    tolerance,
};
use crate::mesh::Mesh;
use crate::mesh::plane::Plane;
use crate::mesh::polygon::Polygon;
use crate::mesh::vertex::Vertex;
use hashbrown::HashMap;
use nalgebra::{Point3, Vector2, Vector3};
use std::fmt::Debug;

/// One vertex of an indexed triangle buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshVertex {
    pub pos: [f32; 3],
    pub normal: [f32; 3],
    pub uv: Option<[f32; 2]>,
}

impl MeshVertex {
    fn is_finite(&self) -> bool {
        self.pos.iter().chain(&self.normal).all(|c| c.is_finite())
            && self.uv.is_none_or(|uv| uv.iter().all(|c| c.is_finite()))
    }

    fn to_vertex(self) -> Vertex {
        let [x, y, z] = self.pos.map(|c| c as Real);
        let [nx, ny, nz] = self.normal.map(|c| c as Real);
        let pos = Point3::new(x, y, z);
        let normal = Vector3::new(nx, ny, nz);
        match self.uv {
            Some([u, v]) => Vertex::with_uv(pos, normal, Vector2::new(u as Real, v as Real)),
            None => Vertex::new(pos, normal),
        }
    }
}

/// Renderable triangle buffers.
///
/// `normals` is parallel to `positions`. `uvs` is empty when no vertex carries
/// a texture coordinate; otherwise it is parallel to `positions` as well, with
/// `[0.0, 0.0]` for vertices without one.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshBuffers {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
    pub bounds: Aabb,
}

impl MeshBuffers {
    /// Number of triangles described by `indices`
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertex records suitable for [`Mesh::from_mesh`].
    pub fn vertices(&self) -> Vec<MeshVertex> {
        let has_uvs = self.uvs.len() == self.positions.len();
        self.positions
            .iter()
            .zip(&self.normals)
            .enumerate()
            .map(|(i, (&pos, &normal))| MeshVertex {
                pos,
                normal,
                uv: has_uvs.then(|| self.uvs[i]),
            })
            .collect()
    }
}

/// Exact structural identity of a vertex, with `-0.0` folded into `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct VertexKey {
    pos: [u64; 3],
    normal: [u64; 3],
    uv: Option<[u64; 2]>,
}

impl VertexKey {
    fn of(v: &Vertex) -> Self {
        fn bits(x: Real) -> u64 {
            if x == 0.0 { 0 } else { u64::from(x.to_bits()) }
        }
        VertexKey {
            pos: [bits(v.pos.x), bits(v.pos.y), bits(v.pos.z)],
            normal: [bits(v.normal.x), bits(v.normal.y), bits(v.normal.z)],
            uv: v.uv.map(|uv| [bits(uv.x), bits(uv.y)]),
        }
    }
}

/// Assigns consecutive indices to structurally distinct vertices.
#[derive(Debug, Default)]
struct Indexer {
    unique: Vec<Vertex>,
    map: HashMap<VertexKey, u32>,
}

impl Indexer {
    fn add(&mut self, vertex: &Vertex) -> u32 {
        let next = self.unique.len() as u32;
        *self.map.entry(VertexKey::of(vertex)).or_insert_with(|| {
            self.unique.push(*vertex);
            next
        })
    }
}

/// Signed turn at `curr` of the path `prev -> curr -> next`, measured along `normal`.
fn turn(prev: &Vertex, curr: &Vertex, next: &Vertex, normal: &Vector3<Real>) -> Real {
    (curr.pos - prev.pos).cross(&(next.pos - curr.pos)).dot(normal)
}

/// Whether appending `candidate` to a fan run keeps it planar and convex.
fn extends_run(run: &[Vertex], candidate: &Vertex) -> bool {
    let Some(plane) = Plane::from_vertices(run) else {
        return false;
    };
    let eps = tolerance();
    if plane.signed_distance(&candidate.pos).abs() > eps {
        return false;
    }
    let n = run.len();
    let (first, second, last, before_last) = (&run[0], &run[1], &run[n - 1], &run[n - 2]);
    turn(before_last, last, candidate, &plane.normal) >= -eps
        && turn(last, candidate, first, &plane.normal) >= -eps
        && turn(candidate, first, second, &plane.normal) >= -eps
}

impl<S: Clone + Send + Sync + Debug> Mesh<S> {
    /// Rebuild a Mesh from an indexed triangle buffer.
    ///
    /// Triangles are read in order. A triangle `(f, s, t)` continues the current
    /// polygon when `f` is the polygon's first index and `s` its last one, which
    /// is exactly how [`Mesh::to_mesh`] fans polygons out; the polygon then gains
    /// vertex `t`. Any other triangle closes the current polygon and starts a new
    /// one. Continuation additionally requires `t` to keep the polygon planar and
    /// convex, so unrelated triangles that happen to share indices stay apart.
    ///
    /// Only meshes whose polygons were fanned with sequential indices regain
    /// their original polygons; any other triangle list still imports, one
    /// polygon per triangle run. See [`Mesh::from_triangles`] for arbitrary soups.
    ///
    /// ## Errors
    /// [`CsgError::InvalidIndexCount`] or [`CsgError::IndexOutOfRange`] for a
    /// malformed index list, [`CsgError::NonFiniteGeometry`] when a referenced
    /// vertex holds NaN or infinite components. Degenerate triangles are skipped.
    pub fn from_mesh(
        vertices: &[MeshVertex],
        indices: &[u32],
        metadata: Option<S>,
    ) -> Result<Mesh<S>, CsgError> {
        validate_indices(vertices.len(), indices)?;
        ensure_finite_buffers(vertices, indices, "from_mesh")?;

        let vertex_at = |index: u32| vertices[index as usize].to_vertex();
        let mut polygons = Vec::new();
        let mut run: Vec<Vertex> = Vec::new();
        // (first index, last index) of the fan being assembled
        let mut fan: Option<(u32, u32)> = None;

        for tri in indices.chunks_exact(3) {
            let (first, second, third) = (tri[0], tri[1], tri[2]);

            if let Some((start, end)) = fan {
                let candidate = vertex_at(third);
                if start == first && end == second && extends_run(&run, &candidate) {
                    run.push(candidate);
                    fan = Some((start, third));
                    continue;
                }
                push_polygon(&mut polygons, std::mem::take(&mut run), &metadata);
            }

            fan = Some((first, third));
            run.extend([vertex_at(first), vertex_at(second), vertex_at(third)]);
        }
        push_polygon(&mut polygons, run, &metadata);

        Ok(Mesh::from_polygons(&polygons, metadata))
    }

    /// Import an arbitrary indexed triangle soup, one polygon per triangle.
    ///
    /// ## Errors
    /// [`CsgError::InvalidIndexCount`] or [`CsgError::IndexOutOfRange`] for a
    /// malformed index list, [`CsgError::NonFiniteGeometry`] when a referenced
    /// vertex holds NaN or infinite components. Degenerate triangles are skipped.
    pub fn from_triangles(
        vertices: &[MeshVertex],
        indices: &[u32],
        metadata: Option<S>,
    ) -> Result<Mesh<S>, CsgError> {
        validate_indices(vertices.len(), indices)?;
        ensure_finite_buffers(vertices, indices, "from_triangles")?;

        let mut polygons = Vec::with_capacity(indices.len() / 3);
        for tri in indices.chunks_exact(3) {
            let corners = tri.iter().map(|&i| vertices[i as usize].to_vertex()).collect();
            push_polygon(&mut polygons, corners, &metadata);
        }
        Ok(Mesh::from_polygons(&polygons, metadata))
    }

    /// Fan-triangulate every polygon and merge identical vertices.
    fn indexed(&self) -> (Vec<Vertex>, Vec<u32>) {
        let mut indexer = Indexer::default();
        let mut indices = Vec::new();
        for poly in &self.polygons {
            let ids: Vec<u32> = poly.vertices.iter().map(|v| indexer.add(v)).collect();
            for pair in ids.windows(2).skip(1) {
                indices.extend([ids[0], pair[0], pair[1]]);
            }
        }
        (indexer.unique, indices)
    }

    /// Convert to renderable buffers.
    ///
    /// Each polygon is fanned around its first vertex; vertices equal in
    /// position, normal and uv are shared. Returns `None` when there is nothing
    /// to draw.
    pub fn to_mesh(&self) -> Option<MeshBuffers> {
        let (unique, indices) = self.indexed();
        if indices.is_empty() {
            return None;
        }

        let mut mins = Point3::new(Real::MAX, Real::MAX, Real::MAX);
        let mut maxs = Point3::new(-Real::MAX, -Real::MAX, -Real::MAX);
        for v in &unique {
            mins = mins.inf(&v.pos);
            maxs = maxs.sup(&v.pos);
        }

        let to_f32 = |v: &Vector3<Real>| [v.x as f32, v.y as f32, v.z as f32];
        let has_uvs = unique.iter().any(|v| v.uv.is_some());

        Some(MeshBuffers {
            positions: unique.iter().map(|v| to_f32(&v.pos.coords)).collect(),
            normals: unique.iter().map(|v| to_f32(&v.normal)).collect(),
            uvs: if has_uvs {
                unique
                    .iter()
                    .map(|v| v.uv.map_or([0.0, 0.0], |uv| [uv.x as f32, uv.y as f32]))
                    .collect()
            } else {
                Vec::new()
            },
            indices,
            bounds: Aabb::new(mins, maxs),
        })
    }

    /// Convert the polygons in this Mesh to a Parry `TriMesh` for collision
    /// queries. Returns `None` for an empty mesh or if Parry rejects the
    /// triangles.
    pub fn to_trimesh(&self) -> Option<TriMesh> {
        let (unique, indices) = self.indexed();
        if indices.is_empty() {
            return None;
        }
        let points = unique.iter().map(|v| v.pos).collect();
        let triangles = indices
            .chunks_exact(3)
            .map(|tri| [tri[0], tri[1], tri[2]])
            .collect();
        TriMesh::new(points, triangles).ok()
    }
}

fn validate_indices(vertex_count: usize, indices: &[u32]) -> Result<(), CsgError> {
    if indices.len() % 3 != 0 {
        return Err(CsgError::InvalidIndexCount {
            count: indices.len(),
        });
    }
    match indices.iter().find(|&&i| i as usize >= vertex_count) {
        Some(&index) => Err(CsgError::IndexOutOfRange {
            index: index as usize,
            len: vertex_count,
        }),
        None => Ok(()),
    }
}

/// Expects `indices` to have passed [`validate_indices`].
fn ensure_finite_buffers(
    vertices: &[MeshVertex],
    indices: &[u32],
    operation: &'static str,
) -> Result<(), CsgError> {
    let bad = indices
        .chunks_exact(3)
        .filter(|tri| tri.iter().any(|&i| !vertices[i as usize].is_finite()))
        .count();
    if bad == 0 {
        return Ok(());
    }
    let triangles = indices.len() / 3;
    log::warn!("{operation} rejected for triangles: {triangles} ({bad} not finite)");
    Err(CsgError::NonFiniteGeometry {
        operation,
        bad,
        polygons: triangles,
    })
}

fn push_polygon<S: Clone>(polygons: &mut Vec<Polygon<S>>, run: Vec<Vertex>, metadata: &Option<S>) {
    if run.is_empty() {
        return;
    }
    match Polygon::new(run, metadata.clone()) {
        Ok(polygon) => polygons.push(polygon),
        Err(err) => log::debug!("skipping imported polygon: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::CSGOps;

    fn vertex(x: f32, y: f32, z: f32) -> MeshVertex {
        MeshVertex {
            pos: [x, y, z],
            normal: [0.0, 0.0, 1.0],
            uv: None,
        }
    }

    #[test]
    fn negative_zero_is_merged() {
        let mut indexer = Indexer::default();
        let a = Vertex::new(Point3::new(0.0, 1.0, 0.0), Vector3::z());
        let b = Vertex::new(Point3::new(-0.0, 1.0, 0.0), Vector3::z());
        assert_eq!(indexer.add(&a), indexer.add(&b));
        assert_eq!(indexer.unique.len(), 1);
    }

    #[test]
    fn fan_is_reassembled_into_one_polygon() {
        let vertices = [
            vertex(0.0, 0.0, 0.0),
            vertex(2.0, 0.0, 0.0),
            vertex(3.0, 1.0, 0.0),
            vertex(2.0, 2.0, 0.0),
            vertex(0.0, 2.0, 0.0),
        ];
        let indices = [0, 1, 2, 0, 2, 3, 0, 3, 4];
        let mesh: Mesh<()> = Mesh::from_mesh(&vertices, &indices, None).expect("valid buffers");
        assert_eq!(mesh.polygons.len(), 1);
        assert_eq!(mesh.polygons[0].vertices.len(), 5);
    }

    #[test]
    fn non_planar_continuation_starts_new_polygon() {
        let vertices = [
            vertex(0.0, 0.0, 0.0),
            vertex(1.0, 0.0, 0.0),
            vertex(1.0, 1.0, 0.0),
            vertex(0.0, 1.0, 1.0),
        ];
        let indices = [0, 1, 2, 0, 2, 3];
        let mesh: Mesh<()> = Mesh::from_mesh(&vertices, &indices, None).expect("valid buffers");
        assert_eq!(mesh.polygons.len(), 2);
    }

    #[test]
    fn malformed_indices_are_rejected() {
        let vertices = [vertex(0.0, 0.0, 0.0), vertex(1.0, 0.0, 0.0), vertex(0.0, 1.0, 0.0)];
        assert_eq!(
            Mesh::<()>::from_mesh(&vertices, &[0, 1], None).unwrap_err(),
            CsgError::InvalidIndexCount { count: 2 }
        );
        assert_eq!(
            Mesh::<()>::from_mesh(&vertices, &[0, 1, 7], None).unwrap_err(),
            CsgError::IndexOutOfRange { index: 7, len: 3 }
        );
    }

    #[test]
    fn empty_mesh_exports_nothing() {
        let mesh: Mesh<()> = Mesh::new();
        assert!(mesh.to_mesh().is_none());
        assert!(mesh.to_trimesh().is_none());
    }
}
