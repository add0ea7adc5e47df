//! Edge-midpoint subdivision without triangulation.

use nalgebra::Point3;

use crate::error::Result;
use crate::mesh::{build_from_polygons, HalfEdgeMesh, MeshIndex};

/// Insert a vertex at the midpoint of every edge.
///
/// The result keeps the original vertices under their original ids,
/// followed by one midpoint per edge in edge-id order. Every k-gon becomes a
/// 2k-gon alternating original corners and edge midpoints, so the result has
/// `V + E` vertices and the same number of faces.
pub fn edge_subdivide<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> Result<HalfEdgeMesh<I>> {
    let num_vertices = mesh.num_vertices();

    let mut vertices: Vec<Point3<f64>> = Vec::with_capacity(num_vertices + mesh.num_edges());
    vertices.extend(mesh.vertex_ids().map(|v| *mesh.position(v)));
    vertices.extend(mesh.edge_ids().map(|e| mesh.edge_midpoint(e)));

    let faces: Vec<Vec<usize>> = mesh
        .face_ids()
        .map(|f| {
            mesh.face_halfedges(f)
                .flat_map(|l| [mesh.origin(l).index(), num_vertices + mesh.edge_of(l).index()])
                .collect()
        })
        .collect();

    let result = build_from_polygons(&vertices, &faces)?;

    log::debug!(
        "edge subdivide: {} -> {} vertices, {} faces",
        num_vertices,
        result.num_vertices(),
        result.num_faces()
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{shapes, FaceId, VertexId};

    #[test]
    fn test_single_quad_becomes_octagon() {
        let quad: HalfEdgeMesh = shapes::quad_grid(1, 1).unwrap();
        let result = edge_subdivide(&quad).unwrap();

        assert_eq!(result.num_vertices(), 4 + 4);
        assert_eq!(result.num_faces(), 1);
        assert_eq!(result.face_degree(FaceId::new(0)), 8);
        assert_eq!(result.num_edges(), 8);
        assert!(result.is_valid());
    }

    #[test]
    fn test_original_vertices_keep_their_ids() {
        let cube: HalfEdgeMesh = shapes::cube().unwrap();
        let result = edge_subdivide(&cube).unwrap();

        for v in cube.vertex_ids() {
            assert_eq!(result.position(v), cube.position(v));
        }
        for e in cube.edge_ids() {
            let m = VertexId::new(cube.num_vertices() + e.index());
            assert!((result.position(m) - cube.edge_midpoint(e)).norm() < 1e-12);
        }
    }

    #[test]
    fn test_closed_mesh_stays_closed() {
        let tet: HalfEdgeMesh = shapes::tetrahedron().unwrap();
        let result = edge_subdivide(&tet).unwrap();

        assert_eq!(result.num_vertices(), 4 + 6);
        assert_eq!(result.num_edges(), 12);
        assert!(result.face_ids().all(|f| result.face_degree(f) == 6));
        assert!(result.edge_ids().all(|e| !result.is_boundary_edge(e)));
    }
}
