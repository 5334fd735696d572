//! **Constructive Solid Geometry (CSG)** on polygon meshes, built around Boolean
//! operations (*union*, *subtract*, *intersect*) on sets of convex polygons stored
//! in [BSP](mesh::bsp) trees.
//!
//! Besides the boolean core the crate carries the pieces needed to carve solids
//! out of each other in an interactive setting:
//! - parametric solids ([`Mesh::cube`], [`Mesh::sphere`], [`Mesh::cylinder`]),
//! - prisms extruded from flat x/z outlines ([`Mesh::poly_box`], [`Mesh::cube1`]),
//! - conversion to and from indexed triangle buffers ([`Mesh::from_mesh`], [`Mesh::to_mesh`]).
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64
//!
//! # Example
//! ```
//! use csgcarve::{CSGOps, Mesh};
//! use nalgebra::{Point3, Vector3};
//!
//! let block: Mesh<()> = Mesh::cube(Point3::origin(), Vector3::new(2.0, 1.0, 2.0), None);
//! let cut: Mesh<()> = Mesh::cube1(-3.0, 0.0, 3.0, 0.0, 4.0, 1.0, true, Point3::origin(), None)?;
//!
//! let carved = block.subtract(&cut)?;
//! let buffers = carved.to_mesh().expect("carved block is not empty");
//! assert_eq!(buffers.indices.len() % 3, 0);
//! # Ok::<(), csgcarve::CsgError>(())
//! ```

#![forbid(unsafe_code)]
#![deny(unused)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod errors;
pub mod float_types;
pub mod mesh;
pub mod traits;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use errors::CsgError;
pub use mesh::Mesh;
pub use mesh::buffers::{MeshBuffers, MeshVertex};
pub use mesh::polygon::Polygon;
pub use mesh::vertex::Vertex;
pub use traits::CSGOps;
