//! Medial remeshing.

use nalgebra::Point3;

use crate::error::Result;
use crate::mesh::{build_from_polygons, FaceId, HalfEdgeMesh, MeshIndex};

/// A mesh produced by [`medial`], with its face-medial polygons in front.
///
/// Faces `0..medial_faces()` are the face-medial polygons, one per face of
/// the source mesh. The remaining faces are corner triangles.
#[derive(Debug, Clone)]
pub struct MedialMesh<I: MeshIndex = u32> {
    mesh: HalfEdgeMesh<I>,
    medial_faces: usize,
}

impl<I: MeshIndex> MedialMesh<I> {
    /// The remeshed mesh.
    pub fn mesh(&self) -> &HalfEdgeMesh<I> {
        &self.mesh
    }

    /// Number of leading face-medial polygons.
    pub fn medial_faces(&self) -> usize {
        self.medial_faces
    }

    /// Whether `f` is a face-medial polygon rather than a corner triangle.
    pub fn is_medial_face(&self, f: FaceId<I>) -> bool {
        f.is_valid() && f.index() < self.medial_faces
    }

    /// Drop the bookkeeping and keep the mesh.
    pub fn into_mesh(self) -> HalfEdgeMesh<I> {
        self.mesh
    }
}

/// Build the medial mesh of `mesh`.
///
/// Vertices `0..E` are the edge midpoints in edge-id order. Original
/// vertices shared by at least two faces follow, in vertex order. Faces
/// `0..F` connect each face's edge midpoints in loop order. Then every face
/// corner at a retained vertex contributes the triangle
/// `(vertex, outgoing midpoint, incoming midpoint)`, faces in id order and
/// corners in loop order. All faces keep the source orientation.
///
/// Corners at vertices used by a single face are dropped, which opens the
/// medial mesh there.
pub fn medial<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> Result<MedialMesh<I>> {
    let num_edges = mesh.num_edges();
    let face_counts = mesh.vertex_face_counts();

    let mut vertices: Vec<Point3<f64>> = mesh.edge_ids().map(|e| mesh.edge_midpoint(e)).collect();

    // Retained original vertices, renumbered after the midpoints
    let mut retained = vec![None; mesh.num_vertices()];
    for v in mesh.vertex_ids() {
        if face_counts[v.index()] >= 2 {
            retained[v.index()] = Some(vertices.len());
            vertices.push(*mesh.position(v));
        }
    }

    let mut faces: Vec<Vec<usize>> = mesh
        .face_ids()
        .map(|f| mesh.face_halfedges(f).map(|l| mesh.edge_of(l).index()).collect())
        .collect();
    let medial_faces = faces.len();

    for f in mesh.face_ids() {
        for l in mesh.face_halfedges(f) {
            if let Some(corner) = retained[mesh.origin(l).index()] {
                let outgoing = mesh.edge_of(l).index();
                let incoming = mesh.edge_of(mesh.prev(l)).index();
                faces.push(vec![corner, outgoing, incoming]);
            }
        }
    }

    let result = build_from_polygons(&vertices, &faces)?;

    log::debug!(
        "medial remesh: {} edges -> {} vertices, {} faces ({} face-medial)",
        num_edges,
        result.num_vertices(),
        result.num_faces(),
        medial_faces
    );

    Ok(MedialMesh {
        mesh: result,
        medial_faces,
    })
}
