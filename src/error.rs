//! Error types for knotwork.
//!
//! All fallible operations return [`Result`], whose error type is
//! [`WeaveError`]. The variants fall into three groups:
//!
//! - construction and I/O errors raised while building or loading a mesh,
//! - configuration errors, rejected before any traversal starts,
//! - fatal faults: broken traversal invariants. These mean either a malformed
//!   (non-manifold) input mesh or a defect in the engine. They are never
//!   retried; see [`WeaveError::is_fault`].

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`WeaveError`].
pub type Result<T> = std::result::Result<T, WeaveError>;

/// Errors that can occur while building, weaving or tracing a mesh.
#[derive(Error, Debug)]
pub enum WeaveError {
    /// The mesh has no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face has fewer than three corners or repeats a vertex.
    #[error("face {face} is degenerate")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// Two faces traverse the same directed edge, so the edge is either
    /// shared by more than two faces or the faces disagree on orientation.
    #[error("edge ({v0}, {v1}) is non-manifold or inconsistently oriented")]
    NonManifoldEdge {
        /// First vertex of the edge.
        v0: usize,
        /// Second vertex of the edge.
        v1: usize,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error saving to file.
    #[error("failed to save {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },

    /// The closed-form twill labeling was requested for a mesh that was not
    /// produced by the medial remesh.
    #[error("closed-form twill labeling requires the medial remesh")]
    NotMedialMesh,

    /// A twist table does not match the mesh it is used with.
    #[error("twist table has {actual} entries but the mesh has {expected} edges")]
    TwistCountMismatch {
        /// Number of edges in the mesh.
        expected: usize,
        /// Number of twists supplied.
        actual: usize,
    },

    /// An interior edge was labeled `Ignore`.
    #[error("edge {edge} is interior but labeled Ignore")]
    MisplacedIgnore {
        /// The edge index.
        edge: usize,
    },

    /// A face-ward step found no interior loop in the face.
    #[error("face {face} has no interior loop to step to")]
    IsolatedFace {
        /// The face index.
        face: usize,
    },

    /// An edge-ward step was taken from a loop on a boundary edge.
    #[error("loop {halfedge} lies on a boundary edge and cannot be crossed")]
    BoundaryCrossing {
        /// The half-edge index.
        halfedge: usize,
    },

    /// A loop lists itself among the loops sharing its edge.
    #[error("radial list of loop {halfedge} references the loop itself")]
    SelfReferencingRadial {
        /// The half-edge index.
        halfedge: usize,
    },

    /// The tracer reached a directed loop that an earlier step already
    /// consumed.
    #[error("directed loop {halfedge} ({}) visited twice", direction_name(.forward))]
    LoopRevisited {
        /// The half-edge index.
        halfedge: usize,
        /// Direction of the revisited pair.
        forward: bool,
    },

    /// The twill solver ran out of frontier before coloring a reachable edge.
    #[error("twill coloring did not reach edge {edge}")]
    TwillIncomplete {
        /// The uncolored edge index.
        edge: usize,
    },
}

fn direction_name(forward: &bool) -> &'static str {
    if *forward {
        "forward"
    } else {
        "backward"
    }
}

impl WeaveError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        WeaveError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Whether this error is a broken traversal invariant rather than bad
    /// input or configuration.
    pub fn is_fault(&self) -> bool {
        matches!(
            self,
            WeaveError::IsolatedFace { .. }
                | WeaveError::BoundaryCrossing { .. }
                | WeaveError::SelfReferencingRadial { .. }
                | WeaveError::LoopRevisited { .. }
                | WeaveError::TwillIncomplete { .. }
        )
    }
}
