//! Edge twist labelings.
//!
//! A twist decides what a strand does where it meets an edge: cross over the
//! neighboring strand in one of two handednesses, pass straight through, or
//! nothing at all on a boundary edge.
//!
//! Three labelings are provided:
//!
//! - [`plain_twists`]: independent per-edge coin flips between a crossing and
//!   a straight pass-through. With probability 1 every strand alternates
//!   over/under.
//! - [`twill_twists`]: a greedy heuristic aiming at a twill, where every
//!   strand goes over two and under two with neighbors offset by one.
//! - [`medial_twists`]: the exact twill of a mesh made by
//!   [`medial`](crate::algo::remesh::medial).
//!
//! Every labeling is total and puts `Ignore` on exactly the boundary edges.

mod medial;
mod plain;
mod twill;

pub use medial::medial_twists;
pub use plain::plain_twists;
pub use twill::{twill_twists, twill_twists_with_progress};

use std::ops::Index;

use crate::error::{Result, WeaveError};
use crate::mesh::{EdgeId, HalfEdgeMesh, MeshIndex};

/// The crossing type of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Twist {
    /// The strand travelling forward passes over.
    ClockwiseOver,
    /// The strand passes straight through without crossing.
    Straight,
    /// The strand travelling backward passes over.
    CounterClockwiseOver,
    /// A boundary edge; strands never reach it.
    Ignore,
}

impl Twist {
    /// Whether strands cross each other at this edge.
    #[inline]
    pub fn is_crossing(self) -> bool {
        matches!(self, Twist::ClockwiseOver | Twist::CounterClockwiseOver)
    }

    /// The opposite crossing handedness. Non-crossings map to themselves.
    pub fn flipped(self) -> Self {
        match self {
            Twist::ClockwiseOver => Twist::CounterClockwiseOver,
            Twist::CounterClockwiseOver => Twist::ClockwiseOver,
            other => other,
        }
    }

    /// `+1.0` if a strand travelling in `forward` direction passes over,
    /// `-1.0` if it passes under, `0.0` when there is no crossing.
    pub fn height_sign(self, forward: bool) -> f64 {
        match (self, forward) {
            (Twist::ClockwiseOver, true) | (Twist::CounterClockwiseOver, false) => 1.0,
            (Twist::ClockwiseOver, false) | (Twist::CounterClockwiseOver, true) => -1.0,
            _ => 0.0,
        }
    }

    /// `1.0` for straight pass-throughs, which are inset into the face, and
    /// `0.0` otherwise.
    pub fn lateral_sign(self) -> f64 {
        if self == Twist::Straight {
            1.0
        } else {
            0.0
        }
    }
}

/// A twist per edge, indexed by [`EdgeId`].
///
/// Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeTwists {
    twists: Vec<Twist>,
}

impl EdgeTwists {
    /// Wrap a twist table after checking it against `mesh`.
    ///
    /// The table must have one entry per edge, and `Ignore` is only allowed
    /// on boundary edges.
    pub fn from_vec<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, twists: Vec<Twist>) -> Result<Self> {
        if twists.len() != mesh.num_edges() {
            return Err(WeaveError::TwistCountMismatch {
                expected: mesh.num_edges(),
                actual: twists.len(),
            });
        }
        for e in mesh.edge_ids() {
            if twists[e.index()] == Twist::Ignore && !mesh.is_boundary_edge(e) {
                return Err(WeaveError::MisplacedIgnore { edge: e.index() });
            }
        }
        Ok(Self { twists })
    }

    /// Put `twist` on every interior edge and `Ignore` on boundary edges.
    pub fn uniform<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, twist: Twist) -> Self {
        let twists = mesh
            .edge_ids()
            .map(|e| if mesh.is_boundary_edge(e) { Twist::Ignore } else { twist })
            .collect();
        Self { twists }
    }

    /// Build from labels the caller has already made consistent.
    pub(crate) fn from_labels(twists: Vec<Twist>) -> Self {
        Self { twists }
    }

    /// Twist of an edge.
    #[inline]
    pub fn get<I: MeshIndex>(&self, e: EdgeId<I>) -> Twist {
        self.twists[e.index()]
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.twists.len()
    }

    /// Whether the table is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.twists.is_empty()
    }

    /// The twists in edge-id order.
    pub fn as_slice(&self) -> &[Twist] {
        &self.twists
    }

    /// Iterate over the twists in edge-id order.
    pub fn iter(&self) -> impl Iterator<Item = Twist> + '_ {
        self.twists.iter().copied()
    }

    /// How many edges carry `twist`.
    pub fn count(&self, twist: Twist) -> usize {
        self.twists.iter().filter(|&&t| t == twist).count()
    }
}

impl<I: MeshIndex> Index<EdgeId<I>> for EdgeTwists {
    type Output = Twist;

    fn index(&self, e: EdgeId<I>) -> &Twist {
        &self.twists[e.index()]
    }
}
