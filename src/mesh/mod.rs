//! Core mesh data structures.
//!
//! This module provides the half-edge mesh representation of polygon meshes
//! and the directed-loop cursor that strands are traced with.
//!
//! # Overview
//!
//! The primary type is [`HalfEdgeMesh`]. Faces may have any number of
//! corners. Besides the usual vertex, half-edge and face arenas the mesh keeps
//! an arena of undirected [`Edge`]s, since twist labels live on edges.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`HalfEdgeId`] - Identifies a half-edge ([`LoopId`] when it has a face)
//! - [`FaceId`] - Identifies a face
//! - [`EdgeId`] - Identifies an undirected edge
//!
//! These indices are generic over the underlying integer type ([`MeshIndex`] trait),
//! allowing you to choose `u16`, `u32`, or `u64` based on mesh size.
//!
//! # Construction
//!
//! ```
//! use knotwork::mesh::{HalfEdgeMesh, build_from_polygons};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let faces: Vec<[usize; 3]> = vec![[0, 1, 2]];
//!
//! let mesh: HalfEdgeMesh = build_from_polygons(&vertices, &faces).unwrap();
//! assert_eq!(mesh.num_edges(), 3);
//! ```

mod builder;
mod directed;
mod halfedge;
mod index;
pub mod shapes;

pub use builder::{build_from_polygons, to_face_vertex};
pub use directed::DirectedLoop;
pub use halfedge::{
    Edge, Face, FaceHalfEdgeIter, HalfEdge, HalfEdgeMesh, Vertex, VertexHalfEdgeIter,
};
pub use index::{EdgeId, FaceId, HalfEdgeId, LoopId, MeshIndex, VertexId};
