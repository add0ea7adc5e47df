//! Directed loops and the two transitions strands are made of.
//!
//! A [`DirectedLoop`] is a loop together with a travel direction. Strands
//! alternate between two moves:
//!
//! - [`next_face_loop`](HalfEdgeMesh::next_face_loop): move to the next
//!   crossable loop around the same face.
//! - [`next_edge_loop`](HalfEdgeMesh::next_edge_loop): cross the loop's edge
//!   into the neighboring face.
//!
//! Both are pure functions of the mesh and the cursor.

use super::halfedge::HalfEdgeMesh;
use super::index::{HalfEdgeId, MeshIndex, VertexId};
use crate::error::{Result, WeaveError};

/// A loop plus a direction of travel around its face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DirectedLoop<I: MeshIndex = u32> {
    /// The loop.
    pub halfedge: HalfEdgeId<I>,
    /// `true` when travelling along `next`, `false` along `prev`.
    pub forward: bool,
}

impl<I: MeshIndex> DirectedLoop<I> {
    /// Create a directed loop.
    #[inline]
    pub fn new(halfedge: HalfEdgeId<I>, forward: bool) -> Self {
        Self { halfedge, forward }
    }

    /// Travel along `next`.
    #[inline]
    pub fn forward(halfedge: HalfEdgeId<I>) -> Self {
        Self::new(halfedge, true)
    }

    /// Travel along `prev`.
    #[inline]
    pub fn backward(halfedge: HalfEdgeId<I>) -> Self {
        Self::new(halfedge, false)
    }

    /// The same loop travelled the other way.
    #[inline]
    pub fn reversed(self) -> Self {
        Self::new(self.halfedge, !self.forward)
    }
}

impl<I: MeshIndex> HalfEdgeMesh<I> {
    /// Check if a loop lies on a boundary edge, so strands cannot cross it.
    #[inline]
    pub fn is_ignorable_loop(&self, l: HalfEdgeId<I>) -> bool {
        self.link_loops(l).next().is_none()
    }

    /// The vertex a directed loop turns around when crossing its edge.
    #[inline]
    pub fn pivot_vertex(&self, d: DirectedLoop<I>) -> VertexId<I> {
        if d.forward {
            self.origin(d.halfedge)
        } else {
            self.dest(d.halfedge)
        }
    }

    /// Step around the face of `d`, skipping ignorable loops.
    ///
    /// The direction is kept. Fails with [`WeaveError::IsolatedFace`] if the
    /// walk comes back to where it started without finding a crossable
    /// loop, which happens when every edge of the face is a boundary edge.
    pub fn next_face_loop(&self, d: DirectedLoop<I>) -> Result<DirectedLoop<I>> {
        let start = d.halfedge;
        let step = |h| if d.forward { self.next(h) } else { self.prev(h) };

        let mut current = step(start);
        loop {
            if !self.is_ignorable_loop(current) {
                return Ok(DirectedLoop::new(current, d.forward));
            }
            if current == start {
                return Err(WeaveError::IsolatedFace {
                    face: self.face_of(start).index(),
                });
            }
            current = step(current);
        }
    }

    /// Cross the edge of `d` into the neighboring face.
    ///
    /// Forward cursors take the first entry of the radial list, backward ones
    /// the last. The new direction is forward iff the new loop starts at the
    /// pivot vertex, so a strand keeps turning around the same vertex.
    pub fn next_edge_loop(&self, d: DirectedLoop<I>) -> Result<DirectedLoop<I>> {
        let l = d.halfedge;
        let mut links = self.link_loops(l);
        let crossed = if d.forward {
            links.next()
        } else {
            links.next_back()
        };

        let crossed = crossed.ok_or(WeaveError::BoundaryCrossing { halfedge: l.index() })?;
        if crossed == l {
            return Err(WeaveError::SelfReferencingRadial { halfedge: l.index() });
        }

        let forward = self.origin(crossed) == self.pivot_vertex(d);
        Ok(DirectedLoop::new(crossed, forward))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::shapes;
    use crate::mesh::FaceId;

    #[test]
    fn test_reversed() {
        let d: DirectedLoop = DirectedLoop::forward(HalfEdgeId::new(4));
        assert_eq!(d.reversed(), DirectedLoop::backward(HalfEdgeId::new(4)));
        assert_eq!(d.reversed().reversed(), d);
    }

    #[test]
    fn test_face_step_on_closed_mesh() {
        let mesh: HalfEdgeMesh = shapes::tetrahedron().unwrap();
        for l in mesh.loop_ids() {
            let fwd = mesh.next_face_loop(DirectedLoop::forward(l)).unwrap();
            assert_eq!(fwd, DirectedLoop::forward(mesh.next(l)));

            let bwd = mesh.next_face_loop(DirectedLoop::backward(l)).unwrap();
            assert_eq!(bwd, DirectedLoop::backward(mesh.prev(l)));
        }
    }

    #[test]
    fn test_edge_step_flips_direction() {
        let mesh: HalfEdgeMesh = shapes::cube().unwrap();
        for l in mesh.loop_ids() {
            let crossed = mesh.next_edge_loop(DirectedLoop::forward(l)).unwrap();
            assert_eq!(crossed, DirectedLoop::backward(mesh.twin(l)));

            let crossed = mesh.next_edge_loop(DirectedLoop::backward(l)).unwrap();
            assert_eq!(crossed, DirectedLoop::forward(mesh.twin(l)));
        }
    }

    #[test]
    fn test_edge_step_keeps_pivot() {
        let mesh: HalfEdgeMesh = shapes::cube().unwrap();
        for l in mesh.loop_ids() {
            for d in [DirectedLoop::forward(l), DirectedLoop::backward(l)] {
                let crossed = mesh.next_edge_loop(d).unwrap();
                assert_eq!(mesh.pivot_vertex(crossed), mesh.pivot_vertex(d));
            }
        }
    }

    #[test]
    fn test_face_step_skips_boundary_loops() {
        // Two quads sharing the edge (1, 4); only one loop per face is crossable.
        let mesh: HalfEdgeMesh = shapes::quad_grid(2, 1).unwrap();
        let f = FaceId::new(0);
        let crossable: Vec<_> = mesh
            .face_halfedges(f)
            .filter(|&l| !mesh.is_ignorable_loop(l))
            .collect();
        assert_eq!(crossable.len(), 1);

        for l in mesh.face_halfedges(f) {
            let d = mesh.next_face_loop(DirectedLoop::forward(l)).unwrap();
            assert_eq!(d.halfedge, crossable[0]);
            assert!(d.forward);
        }
    }

    #[test]
    fn test_isolated_face_faults() {
        let mesh: HalfEdgeMesh = shapes::quad_grid(1, 1).unwrap();
        let l = mesh.face(FaceId::new(0)).halfedge;

        let err = mesh.next_face_loop(DirectedLoop::forward(l)).unwrap_err();
        assert!(matches!(err, WeaveError::IsolatedFace { face: 0 }));

        let err = mesh.next_edge_loop(DirectedLoop::backward(l)).unwrap_err();
        assert!(matches!(err, WeaveError::BoundaryCrossing { .. }));
        assert!(err.is_fault());
    }

    #[test]
    fn test_self_referencing_radial() {
        let mut mesh: HalfEdgeMesh = shapes::tetrahedron().unwrap();
        let l = HalfEdgeId::new(0);
        mesh.halfedge_mut(l).twin = l;

        let err = mesh.next_edge_loop(DirectedLoop::forward(l)).unwrap_err();
        assert!(matches!(err, WeaveError::SelfReferencingRadial { halfedge: 0 }));
    }
}
