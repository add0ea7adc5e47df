//! # Knotwork
//!
//! Celtic knot and weave strands over polygon meshes.
//!
//! Every edge of a [`HalfEdgeMesh`](mesh::HalfEdgeMesh) gets a
//! [`Twist`](algo::twist::Twist) label saying whether strands cross over it,
//! pass straight by it, or ignore it. Following the labels from face to face
//! partitions the mesh's loops into closed strands, which can then be
//! grouped into braids or turned into 3D polylines.
//!
//! ## Features
//!
//! - **Polygon half-edge mesh**: faces of any degree, typed indices, an edge
//!   arena for per-edge labels
//! - **Remeshing**: edge subdivision and the medial mesh
//! - **Labelings**: plain (random), heuristic twill and closed-form medial
//!   twill
//! - **Strand tracing**: a builder protocol with an analyzer for strand and
//!   braid membership
//! - **File formats**: PLY in, PLY and OBJ out
//!
//! ## Quick Start
//!
//! ```
//! use knotwork::prelude::*;
//! use knotwork::algo::remesh::RemeshType;
//! use knotwork::algo::weave::WeaveType;
//! use knotwork::mesh::shapes;
//!
//! let cube: HalfEdgeMesh = shapes::cube().unwrap();
//!
//! let options = WeaveOptions::new(WeaveType::Twill)
//!     .with_remesh(RemeshType::EdgeSubdivide)
//!     .with_seed(42);
//! let woven = weave(&cube, &options).unwrap();
//!
//! let analyzer = woven.analyze().unwrap();
//! println!("{} strands in {} braids", analyzer.num_strands(), analyzer.num_braids());
//! ```
//!
//! ## Custom Strand Builders
//!
//! ```
//! use knotwork::prelude::*;
//! use knotwork::algo::strand::{trace_strands, StrandStep};
//! use knotwork::mesh::shapes;
//!
//! // Count the steps of the longest strand
//! #[derive(Default)]
//! struct Longest {
//!     current: usize,
//!     best: usize,
//! }
//!
//! impl StrandBuilder for Longest {
//!     fn start_strand(&mut self) {
//!         self.current = 0;
//!     }
//!     fn add_loop(&mut self, _step: &StrandStep) {
//!         self.current += 1;
//!     }
//!     fn end_strand(&mut self) {
//!         self.best = self.best.max(self.current);
//!     }
//! }
//!
//! let tet: HalfEdgeMesh = shapes::tetrahedron().unwrap();
//! let twists = EdgeTwists::uniform(&tet, Twist::ClockwiseOver);
//! let mut longest = Longest::default();
//! trace_strands(&tet, &twists, &mut longest).unwrap();
//! assert!(longest.best > 0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use knotwork::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::strand::{StrandAnalyzer, StrandBuilder};
    pub use crate::algo::twist::{EdgeTwists, Twist};
    pub use crate::algo::weave::{weave, WeaveOptions};
    pub use crate::error::{Result, WeaveError};
    pub use crate::mesh::{
        build_from_polygons, to_face_vertex, DirectedLoop, EdgeId, Face, FaceId, HalfEdge,
        HalfEdgeId, HalfEdgeMesh, LoopId, MeshIndex, Vertex, VertexId,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;
