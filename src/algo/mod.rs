//! Weave algorithms.
//!
//! - **Remeshing**: edge-subdivide and medial transforms that prepare a mesh
//!   for weaving
//! - **Twists**: plain, twill and closed-form medial twill edge labelings
//! - **Strands**: the strand tracer, its builder protocol and the strand and
//!   braid analyzer
//! - **Weave**: the configured pipeline tying the three together

pub mod progress;
pub mod remesh;
pub mod strand;
pub mod twist;
pub mod weave;

pub use progress::Progress;
