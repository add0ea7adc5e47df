//! Topology-rewriting remesh transforms.
//!
//! Both transforms build a brand-new mesh from the input's connectivity and
//! leave the input untouched. Vertex positions of the result are either
//! original positions or edge midpoints.
//!
//! # Edge Subdivide
//!
//! Inserts a vertex at the midpoint of every edge. Each k-gon becomes a
//! 2k-gon; nothing is triangulated. Weaving the result doubles the number of
//! crossings along every original edge.
//!
//! # Medial
//!
//! Connects the edge midpoints of each face into a smaller copy of the face
//! (a *face-medial* polygon) and fills the gap around each original vertex
//! with one triangle per face corner. The face-medial polygons come first in
//! the result, which lets [`medial_twists`](crate::algo::twist::medial_twists)
//! produce a twill pattern in closed form.
//!
//! # Example
//!
//! ```
//! use knotwork::algo::remesh::{edge_subdivide, medial};
//! use knotwork::mesh::{shapes, HalfEdgeMesh};
//!
//! let cube: HalfEdgeMesh = shapes::cube().unwrap();
//!
//! let subdivided = edge_subdivide(&cube).unwrap();
//! assert_eq!(subdivided.num_vertices(), 8 + 12);
//!
//! let medial = medial(&cube).unwrap();
//! assert_eq!(medial.medial_faces(), 6);
//! assert_eq!(medial.mesh().num_faces(), 6 + 24);
//! ```

mod edge_subdivide;
mod medial;

pub use edge_subdivide::edge_subdivide;
pub use medial::{medial, MedialMesh};

use crate::error::Result;
use crate::mesh::{HalfEdgeMesh, MeshIndex};

/// Which remesh transform to apply before weaving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemeshType {
    /// Weave the mesh as given.
    #[default]
    None,
    /// Insert a vertex at every edge midpoint.
    EdgeSubdivide,
    /// Replace the mesh by its medial mesh.
    Medial,
}

impl RemeshType {
    /// Apply this transform, returning a fresh mesh.
    ///
    /// `None` returns a copy of the input. Use [`medial`] directly to keep
    /// the face-medial bookkeeping.
    pub fn apply<I: MeshIndex>(self, mesh: &HalfEdgeMesh<I>) -> Result<HalfEdgeMesh<I>> {
        match self {
            RemeshType::None => Ok(mesh.clone()),
            RemeshType::EdgeSubdivide => edge_subdivide(mesh),
            RemeshType::Medial => medial(mesh).map(MedialMesh::into_mesh),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::shapes;

    #[test]
    fn test_apply_dispatch() {
        let tet: HalfEdgeMesh = shapes::tetrahedron().unwrap();

        let same = RemeshType::None.apply(&tet).unwrap();
        assert_eq!(same.num_edges(), tet.num_edges());

        let sub = RemeshType::EdgeSubdivide.apply(&tet).unwrap();
        assert_eq!(sub.num_vertices(), 10);

        let med = RemeshType::Medial.apply(&tet).unwrap();
        assert_eq!(med.num_faces(), 16);

        assert_eq!(RemeshType::default(), RemeshType::None);
    }
}
