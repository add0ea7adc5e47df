//! The strand tracer.

use nalgebra::Vector3;

use super::{StrandBuilder, StrandFrame, StrandStep};
use crate::algo::twist::EdgeTwists;
use crate::error::{Result, WeaveError};
use crate::mesh::{DirectedLoop, HalfEdgeMesh, LoopId, MeshIndex};

/// Trace every strand of `mesh` under `twists`, reporting to `builder`.
///
/// Faces are scanned in id order and their loops in cycle order. Each
/// crossable loop starts a forward strand unless an earlier strand already
/// travelled it forward, then a backward strand on the same condition.
///
/// Returns the number of strands. One pass consumes every directed interior
/// loop exactly once; a loop reached twice means the mesh is malformed and
/// is reported as [`WeaveError::LoopRevisited`]. On error the builder has
/// seen a partial pass and should be discarded.
pub fn trace_strands<I, B>(
    mesh: &HalfEdgeMesh<I>,
    twists: &EdgeTwists,
    builder: &mut B,
) -> Result<usize>
where
    I: MeshIndex,
    B: StrandBuilder<I> + ?Sized,
{
    if twists.len() != mesh.num_edges() {
        return Err(WeaveError::TwistCountMismatch {
            expected: mesh.num_edges(),
            actual: twists.len(),
        });
    }

    let mut tracer = Tracer {
        mesh,
        twists,
        visited: vec![false; 2 * mesh.num_halfedges()],
    };

    let mut strands = 0;
    for f in mesh.face_ids() {
        for l in mesh.face_halfedges(f) {
            if mesh.is_ignorable_loop(l) {
                continue;
            }
            for start in [DirectedLoop::forward(l), DirectedLoop::backward(l)] {
                if !tracer.is_visited(start) {
                    tracer.trace(start, builder)?;
                    strands += 1;
                }
            }
        }
    }

    log::debug!(
        "traced {} strands over {} loops",
        strands,
        mesh.num_loops()
    );

    Ok(strands)
}

struct Tracer<'a, I: MeshIndex> {
    mesh: &'a HalfEdgeMesh<I>,
    twists: &'a EdgeTwists,
    /// One flag per directed loop.
    visited: Vec<bool>,
}

impl<'a, I: MeshIndex> Tracer<'a, I> {
    #[inline]
    fn slot(d: DirectedLoop<I>) -> usize {
        2 * d.halfedge.index() + usize::from(d.forward)
    }

    #[inline]
    fn is_visited(&self, d: DirectedLoop<I>) -> bool {
        self.visited[Self::slot(d)]
    }

    /// Mark `d` consumed, returning `false` if it already was.
    #[inline]
    fn consume(&mut self, d: DirectedLoop<I>) -> bool {
        !std::mem::replace(&mut self.visited[Self::slot(d)], true)
    }

    fn trace<B: StrandBuilder<I> + ?Sized>(
        &mut self,
        start: DirectedLoop<I>,
        builder: &mut B,
    ) -> Result<()> {
        builder.start_strand();

        let mut current = start;
        loop {
            if !self.consume(current) {
                if current == start {
                    break;
                }
                return Err(revisited(current));
            }

            let landed = self.mesh.next_face_loop(current)?;
            if !self.consume(landed.reversed()) {
                return Err(revisited(landed.reversed()));
            }

            let edge = self.mesh.edge_of(landed.halfedge);
            let twist = self.twists.get(edge);
            let next = if twist.is_crossing() {
                self.mesh.next_edge_loop(landed)?
            } else {
                landed
            };

            let step = StrandStep {
                prev_loop: landed.halfedge,
                current_loop: next.halfedge,
                edge,
                twist,
                forward: next.forward,
                frame: self.frame(landed.halfedge, next),
            };
            builder.add_loop(&step);

            current = next;
        }

        builder.end_strand();
        Ok(())
    }

    fn frame(&self, prev_loop: LoopId<I>, current: DirectedLoop<I>) -> StrandFrame {
        let mesh = self.mesh;
        let l = current.halfedge;

        let corner = mesh.corner_normal(l);
        let normal = (corner + mesh.corner_normal(prev_loop))
            .try_normalize(1e-12)
            .unwrap_or(corner);

        let along = mesh
            .halfedge_vector(l)
            .try_normalize(1e-12)
            .unwrap_or_else(Vector3::zeros);
        let binormal = normal
            .cross(&along)
            .try_normalize(1e-12)
            .unwrap_or_else(Vector3::zeros);
        let tangent = if current.forward { along } else { -along };

        StrandFrame {
            midpoint: mesh.edge_midpoint(mesh.edge_of(l)),
            normal,
            tangent,
            binormal,
        }
    }
}

fn revisited<I: MeshIndex>(d: DirectedLoop<I>) -> WeaveError {
    WeaveError::LoopRevisited {
        halfedge: d.halfedge.index(),
        forward: d.forward,
    }
}
