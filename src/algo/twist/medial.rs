//! Closed-form twill on medial meshes.

use super::{EdgeTwists, Twist};
use crate::algo::remesh::MedialMesh;
use crate::mesh::MeshIndex;

/// Label a medial mesh as an exact twill.
///
/// Edges of the face-medial polygons get `CounterClockwiseOver`, the other
/// interior edges `ClockwiseOver`, boundary edges `Ignore`.
pub fn medial_twists<I: MeshIndex>(medial: &MedialMesh<I>) -> EdgeTwists {
    let mesh = medial.mesh();
    let twists = mesh
        .edge_ids()
        .map(|e| {
            if mesh.is_boundary_edge(e) {
                Twist::Ignore
            } else if mesh
                .edge_loops(e)
                .any(|l| medial.is_medial_face(mesh.face_of(l)))
            {
                Twist::CounterClockwiseOver
            } else {
                Twist::ClockwiseOver
            }
        })
        .collect();

    EdgeTwists::from_labels(twists)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::remesh::medial;
    use crate::mesh::{shapes, HalfEdgeMesh};

    #[test]
    fn test_cube_labels() {
        let cube: HalfEdgeMesh = shapes::cube().unwrap();
        let medial = medial(&cube).unwrap();
        let twists = medial_twists(&medial);
        let mesh = medial.mesh();

        // 24 medial polygon edges, 24 spokes
        assert_eq!(twists.count(Twist::CounterClockwiseOver), 24);
        assert_eq!(twists.count(Twist::ClockwiseOver), 24);

        for e in mesh.edge_ids() {
            let on_polygon = mesh
                .edge_loops(e)
                .any(|l| mesh.face_of(l).index() < medial.medial_faces());
            let expected = if on_polygon {
                Twist::CounterClockwiseOver
            } else {
                Twist::ClockwiseOver
            };
            assert_eq!(twists[e], expected);
        }
    }

    #[test]
    fn test_open_grid_boundary() {
        let grid: HalfEdgeMesh = shapes::quad_grid(2, 2).unwrap();
        let medial = medial(&grid).unwrap();
        let twists = medial_twists(&medial);
        let mesh = medial.mesh();

        for e in mesh.edge_ids() {
            assert_eq!(twists[e] == Twist::Ignore, mesh.is_boundary_edge(e));
        }
        assert!(EdgeTwists::from_vec(mesh, twists.as_slice().to_vec()).is_ok());
    }
}
