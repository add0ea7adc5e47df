//! Mesh construction utilities.
//!
//! Builds half-edge meshes from face-vertex lists of arbitrary polygons, as
//! found in mesh file formats, and converts them back.
//!
//! Element ids are deterministic: loops are numbered face by face in corner
//! order, then boundary half-edges follow in the order of the loops they
//! pair with. Edge ids follow the lowest-numbered loop on each edge.

use std::collections::HashMap;

use nalgebra::Point3;

use super::halfedge::{Edge, Face, HalfEdge, HalfEdgeMesh};
use super::index::{EdgeId, FaceId, HalfEdgeId, MeshIndex, VertexId};
use crate::error::{Result, WeaveError};

/// Build a half-edge mesh from vertices and polygon faces.
///
/// # Arguments
/// * `vertices` - List of vertex positions
/// * `faces` - List of faces, each a cycle of at least three vertex indices
///
/// # Returns
/// A half-edge mesh, or an error if the input is invalid. Two faces that
/// traverse the same directed edge are rejected as non-manifold.
///
/// # Example
/// ```
/// use knotwork::mesh::{build_from_polygons, HalfEdgeMesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let faces: Vec<Vec<usize>> = vec![vec![0, 1, 2, 3]];
///
/// let mesh: HalfEdgeMesh = build_from_polygons(&vertices, &faces).unwrap();
/// assert_eq!(mesh.num_faces(), 1);
/// assert_eq!(mesh.num_edges(), 4);
/// ```
pub fn build_from_polygons<I: MeshIndex, F: AsRef<[usize]>>(
    vertices: &[Point3<f64>],
    faces: &[F],
) -> Result<HalfEdgeMesh<I>> {
    if faces.is_empty() {
        return Err(WeaveError::EmptyMesh);
    }

    let mut num_loops = 0;
    for (fi, face) in faces.iter().enumerate() {
        let face = face.as_ref();
        if face.len() < 3 {
            return Err(WeaveError::DegenerateFace { face: fi });
        }
        for (k, &vi) in face.iter().enumerate() {
            if vi >= vertices.len() {
                return Err(WeaveError::InvalidVertexIndex { face: fi, vertex: vi });
            }
            if face[..k].contains(&vi) {
                return Err(WeaveError::DegenerateFace { face: fi });
            }
        }
        num_loops += face.len();
    }

    let mut mesh = HalfEdgeMesh::with_capacity(vertices.len(), 2 * num_loops, faces.len());

    let vertex_ids: Vec<VertexId<I>> = vertices
        .iter()
        .map(|&pos| mesh.add_vertex(pos))
        .collect();

    // Map from directed edge (v0, v1) to its loop
    let mut edge_map: HashMap<(usize, usize), HalfEdgeId<I>> = HashMap::with_capacity(num_loops);

    // First pass: create the loop cycle of every face
    for (fi, face) in faces.iter().enumerate() {
        let face = face.as_ref();
        let n = face.len();
        let base = mesh.num_halfedges();
        let face_id = FaceId::<I>::new(fi);

        mesh.faces.push(Face {
            halfedge: HalfEdgeId::new(base),
        });

        for k in 0..n {
            let v0 = face[k];
            let v1 = face[(k + 1) % n];
            let id = HalfEdgeId::<I>::new(base + k);

            mesh.halfedges.push(HalfEdge {
                origin: vertex_ids[v0],
                next: HalfEdgeId::new(base + (k + 1) % n),
                prev: HalfEdgeId::new(base + (k + n - 1) % n),
                face: face_id,
                ..HalfEdge::new()
            });
            mesh.vertex_mut(vertex_ids[v0]).halfedge = id;

            if edge_map.insert((v0, v1), id).is_some() {
                return Err(WeaveError::NonManifoldEdge { v0, v1 });
            }
        }
    }

    // Second pass: pair loops in id order so edge ids are reproducible
    for i in 0..num_loops {
        let he = HalfEdgeId::<I>::new(i);
        if mesh.twin(he).is_valid() {
            continue;
        }

        let v0 = mesh.origin(he).index();
        let v1 = mesh.origin(mesh.next(he)).index();
        let edge_id = EdgeId::<I>::new(mesh.edges.len());
        mesh.edges.push(Edge { halfedge: he });

        let twin = match edge_map.get(&(v1, v0)) {
            Some(&twin) => twin,
            None => {
                // Boundary edge - create boundary half-edge
                let boundary_he = HalfEdgeId::<I>::new(mesh.num_halfedges());
                mesh.halfedges.push(HalfEdge {
                    origin: vertex_ids[v1],
                    ..HalfEdge::new()
                });
                boundary_he
            }
        };

        {
            let h = mesh.halfedge_mut(he);
            h.twin = twin;
            h.edge = edge_id;
        }
        {
            let t = mesh.halfedge_mut(twin);
            t.twin = he;
            t.edge = edge_id;
        }
    }

    // Third pass: link boundary half-edges into cycles
    link_boundary_loops(&mut mesh);

    // Fourth pass: ensure boundary vertices point to boundary half-edges
    fix_boundary_vertex_halfedges(&mut mesh);

    log::debug!(
        "built mesh: {} vertices, {} edges, {} faces",
        mesh.num_vertices(),
        mesh.num_edges(),
        mesh.num_faces()
    );

    Ok(mesh)
}

/// Link boundary half-edges into cycles.
fn link_boundary_loops<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>) {
    let boundary_hes: Vec<HalfEdgeId<I>> = mesh
        .halfedge_ids()
        .filter(|&he| mesh.is_boundary_halfedge(he))
        .collect();

    let mut outgoing: HashMap<usize, HalfEdgeId<I>> = HashMap::new();
    for &he in &boundary_hes {
        outgoing.insert(mesh.origin(he).index(), he);
    }

    for &he in &boundary_hes {
        // The next boundary half-edge starts where this one ends
        let dest = mesh.dest(he).index();
        if let Some(&next_he) = outgoing.get(&dest) {
            mesh.halfedge_mut(he).next = next_he;
            mesh.halfedge_mut(next_he).prev = he;
        }
    }
}

/// Ensure boundary vertices point to a boundary half-edge.
fn fix_boundary_vertex_halfedges<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>) {
    for vid in mesh.vertex_ids().collect::<Vec<_>>() {
        let start_he = mesh.vertex(vid).halfedge;
        if !start_he.is_valid() {
            continue;
        }

        let mut he = start_he;
        loop {
            if mesh.is_boundary_halfedge(he) {
                mesh.vertex_mut(vid).halfedge = he;
                break;
            }
            he = mesh.next(mesh.twin(he));
            if he == start_he || !he.is_valid() {
                break;
            }
        }
    }
}

/// Convert a half-edge mesh back to a face-vertex representation.
///
/// Returns (vertices, faces) with each face in loop order.
pub fn to_face_vertex<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
) -> (Vec<Point3<f64>>, Vec<Vec<usize>>) {
    let vertices: Vec<Point3<f64>> = mesh.vertex_ids().map(|v| *mesh.position(v)).collect();

    let faces: Vec<Vec<usize>> = mesh
        .face_ids()
        .map(|f| mesh.face_vertices(f).map(|v| v.index()).collect())
        .collect();

    (vertices, faces)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_quad() -> (Vec<Point3<f64>>, Vec<[usize; 4]>) {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        (vertices, vec![[0, 1, 2, 3]])
    }

    fn quad_and_triangle() -> (Vec<Point3<f64>>, Vec<Vec<usize>>) {
        // A quad and a triangle sharing the edge (1, 2)
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(2.0, 0.5, 0.0),
        ];
        (vertices, vec![vec![0, 1, 2, 3], vec![1, 4, 2]])
    }

    #[test]
    fn test_single_quad() {
        let (vertices, faces) = single_quad();
        let mesh: HalfEdgeMesh<u32> = build_from_polygons(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_faces(), 1);
        // 4 loops + 4 boundary half-edges
        assert_eq!(mesh.num_halfedges(), 8);
        assert_eq!(mesh.num_edges(), 4);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_mixed_polygons() {
        let (vertices, faces) = quad_and_triangle();
        let mesh: HalfEdgeMesh<u32> = build_from_polygons(&vertices, &faces).unwrap();

        // 7 loops + 5 boundary half-edges
        assert_eq!(mesh.num_halfedges(), 12);
        assert_eq!(mesh.num_edges(), 6);
        assert!(mesh.is_valid());

        let interior: Vec<_> = mesh
            .edge_ids()
            .filter(|&e| !mesh.is_boundary_edge(e))
            .collect();
        assert_eq!(interior.len(), 1);
        let [a, b] = mesh.edge_vertices(interior[0]);
        assert_eq!((a.index(), b.index()), (1, 2));
    }

    #[test]
    fn test_edge_ids_follow_loop_order() {
        let (vertices, faces) = quad_and_triangle();
        let mesh: HalfEdgeMesh<u32> = build_from_polygons(&vertices, &faces).unwrap();

        // Edges are created by the first loop that reaches them.
        for (i, e) in mesh.edge_ids().enumerate().take(4) {
            assert_eq!(mesh.edge(e).halfedge.index(), i);
        }
        // The triangle's loop on (2, 1) pairs with loop 1; its other two
        // loops open edges 4 and 5.
        assert_eq!(mesh.edge_of(HalfEdgeId::new(6)).index(), 1);
        assert_eq!(mesh.edge_of(HalfEdgeId::new(4)).index(), 4);
        assert_eq!(mesh.edge_of(HalfEdgeId::new(5)).index(), 5);
    }

    #[test]
    fn test_roundtrip() {
        let (vertices, faces) = quad_and_triangle();
        let mesh: HalfEdgeMesh<u32> = build_from_polygons(&vertices, &faces).unwrap();

        let (out_verts, out_faces) = to_face_vertex(&mesh);
        assert_eq!(out_faces, faces);
        for (v_in, v_out) in vertices.iter().zip(out_verts.iter()) {
            assert!((v_in - v_out).norm() < 1e-10);
        }
    }

    #[test]
    fn test_invalid_vertex_index() {
        let vertices = vec![Point3::new(0.0, 0.0, 0.0)];
        let faces: Vec<[usize; 3]> = vec![[0, 1, 2]];

        let result: Result<HalfEdgeMesh<u32>> = build_from_polygons(&vertices, &faces);
        assert!(matches!(
            result,
            Err(WeaveError::InvalidVertexIndex { face: 0, vertex: 1 })
        ));
    }

    #[test]
    fn test_degenerate_faces() {
        let (vertices, _) = single_quad();

        let repeated: Vec<[usize; 4]> = vec![[0, 1, 0, 3]];
        let result: Result<HalfEdgeMesh<u32>> = build_from_polygons(&vertices, &repeated);
        assert!(matches!(result, Err(WeaveError::DegenerateFace { face: 0 })));

        let too_small: Vec<Vec<usize>> = vec![vec![0, 1]];
        let result: Result<HalfEdgeMesh<u32>> = build_from_polygons(&vertices, &too_small);
        assert!(matches!(result, Err(WeaveError::DegenerateFace { face: 0 })));
    }

    #[test]
    fn test_empty_and_non_manifold() {
        let (vertices, _) = single_quad();

        let empty: Vec<[usize; 3]> = Vec::new();
        let result: Result<HalfEdgeMesh<u32>> = build_from_polygons(&vertices, &empty);
        assert!(matches!(result, Err(WeaveError::EmptyMesh)));

        // Both triangles traverse 0 -> 1
        let flipped: Vec<[usize; 3]> = vec![[0, 1, 2], [0, 1, 3]];
        let result: Result<HalfEdgeMesh<u32>> = build_from_polygons(&vertices, &flipped);
        assert!(matches!(
            result,
            Err(WeaveError::NonManifoldEdge { v0: 0, v1: 1 })
        ));
    }

    #[test]
    fn test_small_index_type() {
        let (vertices, faces) = quad_and_triangle();
        let mesh: HalfEdgeMesh<u16> = build_from_polygons(&vertices, &faces).unwrap();
        assert!(mesh.is_valid());
        assert_eq!(mesh.num_loops(), 7);
    }
}
