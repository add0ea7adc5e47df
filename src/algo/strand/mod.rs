//! Strand tracing and analysis.
//!
//! A strand is a closed curve that runs through the mesh from edge to edge.
//! Inside a face it turns from one crossable edge to the next; at an edge it
//! either crosses into the neighboring face (crossing twists) or bounces
//! back into the same face (straight twists). Together the strands of a mesh
//! visit every directed interior loop exactly once.
//!
//! [`trace_strands`] walks all strands and reports them to a
//! [`StrandBuilder`]. Builders turn the steps into geometry or, like
//! [`StrandAnalyzer`], into bookkeeping.
//!
//! # Example
//!
//! ```
//! use knotwork::algo::strand::{trace_strands, StrandEvent};
//! use knotwork::algo::twist::{EdgeTwists, Twist};
//! use knotwork::mesh::{shapes, HalfEdgeMesh};
//!
//! let mesh: HalfEdgeMesh = shapes::tetrahedron().unwrap();
//! let twists = EdgeTwists::uniform(&mesh, Twist::ClockwiseOver);
//!
//! let mut events: Vec<StrandEvent> = Vec::new();
//! let strands = trace_strands(&mesh, &twists, &mut events).unwrap();
//!
//! let parts = events.iter().filter(|e| matches!(e, StrandEvent::Part(_))).count();
//! assert_eq!(parts, 12);
//! assert!(strands > 0);
//! ```

mod analyze;
mod trace;

pub use analyze::{analyze_strands, StrandAnalyzer, StrandPart};
pub use trace::trace_strands;

use nalgebra::{Point3, Vector3};

use crate::algo::twist::Twist;
use crate::mesh::{EdgeId, LoopId, MeshIndex};

/// Local frame of a strand where it meets an edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrandFrame {
    /// Midpoint of the edge.
    pub midpoint: Point3<f64>,
    /// Average of the surface normals on both sides of the step.
    pub normal: Vector3<f64>,
    /// Direction of travel along the edge.
    pub tangent: Vector3<f64>,
    /// In-surface direction across the edge, pointing into the current
    /// loop's face.
    pub binormal: Vector3<f64>,
}

/// One step of a strand: arriving at an edge and leaving it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrandStep<I: MeshIndex = u32> {
    /// The loop the strand arrived on.
    pub prev_loop: LoopId<I>,
    /// The loop the strand continues from. Equal to `prev_loop` at straight
    /// edges, the loop across the edge otherwise.
    pub current_loop: LoopId<I>,
    /// The edge both loops lie on.
    pub edge: EdgeId<I>,
    /// Twist of `edge`.
    pub twist: Twist,
    /// Direction of travel after the step.
    pub forward: bool,
    /// Geometric frame at the edge.
    pub frame: StrandFrame,
}

impl<I: MeshIndex> StrandStep<I> {
    /// `+1.0` when the strand passes over here, `-1.0` under, `0.0` when it
    /// does not cross.
    #[inline]
    pub fn height_sign(&self) -> f64 {
        self.twist.height_sign(self.forward)
    }

    /// `1.0` at straight pass-throughs, `0.0` at crossings.
    #[inline]
    pub fn lateral_sign(&self) -> f64 {
        self.twist.lateral_sign()
    }

    /// The normal offset for this step: `up` where the strand passes over,
    /// `down` where it passes under, zero elsewhere.
    ///
    /// Both offsets are signed and applied as given, so `down` is normally
    /// negative.
    #[inline]
    pub fn weave_offset(&self, up: f64, down: f64) -> f64 {
        let sign = self.height_sign();
        if sign > 0.0 {
            up
        } else if sign < 0.0 {
            down
        } else {
            0.0
        }
    }

    /// The frame midpoint shifted along the normal by
    /// [`weave_offset`](Self::weave_offset) and pulled `inset` into the face
    /// at straight edges.
    pub fn offset_point(&self, up: f64, down: f64, inset: f64) -> Point3<f64> {
        self.frame.midpoint
            + self.frame.normal * self.weave_offset(up, down)
            + self.frame.binormal * (inset * self.lateral_sign())
    }
}

/// Receiver of traced strands.
///
/// For every strand the tracer calls `start_strand`, then `add_loop` once
/// per step, then `end_strand`.
pub trait StrandBuilder<I: MeshIndex = u32> {
    /// A new strand begins.
    fn start_strand(&mut self);

    /// The current strand takes one step.
    fn add_loop(&mut self, step: &StrandStep<I>);

    /// The current strand is closed.
    fn end_strand(&mut self);
}

impl<I: MeshIndex, B: StrandBuilder<I> + ?Sized> StrandBuilder<I> for &mut B {
    fn start_strand(&mut self) {
        (**self).start_strand();
    }

    fn add_loop(&mut self, step: &StrandStep<I>) {
        (**self).add_loop(step);
    }

    fn end_strand(&mut self) {
        (**self).end_strand();
    }
}

/// Drive two builders from one pass.
impl<I: MeshIndex, A: StrandBuilder<I>, B: StrandBuilder<I>> StrandBuilder<I> for (A, B) {
    fn start_strand(&mut self) {
        self.0.start_strand();
        self.1.start_strand();
    }

    fn add_loop(&mut self, step: &StrandStep<I>) {
        self.0.add_loop(step);
        self.1.add_loop(step);
    }

    fn end_strand(&mut self) {
        self.0.end_strand();
        self.1.end_strand();
    }
}

/// A recorded builder call.
#[derive(Debug, Clone, PartialEq)]
pub enum StrandEvent<I: MeshIndex = u32> {
    /// `start_strand`
    Start,
    /// `add_loop`
    Part(StrandStep<I>),
    /// `end_strand`
    End,
}

impl<I: MeshIndex> StrandBuilder<I> for Vec<StrandEvent<I>> {
    fn start_strand(&mut self) {
        self.push(StrandEvent::Start);
    }

    fn add_loop(&mut self, step: &StrandStep<I>) {
        self.push(StrandEvent::Part(*step));
    }

    fn end_strand(&mut self) {
        self.push(StrandEvent::End);
    }
}
