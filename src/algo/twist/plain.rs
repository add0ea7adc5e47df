//! Plain weave labeling.

use rand::Rng;

use super::{EdgeTwists, Twist};
use crate::error::{Result, WeaveError};
use crate::mesh::{HalfEdgeMesh, MeshIndex};

/// Label each interior edge `ClockwiseOver` with probability `probability`,
/// `Straight` otherwise.
///
/// Edges are drawn in edge-id order and boundary edges get `Ignore` without
/// consuming a draw, so the same mesh, probability and generator state always
/// give the same table.
///
/// # Errors
///
/// [`WeaveError::InvalidParameter`] if `probability` is NaN or outside
/// `[0, 1]`.
pub fn plain_twists<I: MeshIndex, R: Rng + ?Sized>(
    mesh: &HalfEdgeMesh<I>,
    probability: f64,
    rng: &mut R,
) -> Result<EdgeTwists> {
    if !(0.0..=1.0).contains(&probability) {
        return Err(WeaveError::invalid_param(
            "probability",
            probability,
            "must be in [0, 1]",
        ));
    }

    let twists: Vec<Twist> = mesh
        .edge_ids()
        .map(|e| {
            if mesh.is_boundary_edge(e) {
                Twist::Ignore
            } else if rng.gen_bool(probability) {
                Twist::ClockwiseOver
            } else {
                Twist::Straight
            }
        })
        .collect();

    log::debug!(
        "plain weave: {} crossings, {} straight, {} ignored",
        twists.iter().filter(|&&t| t == Twist::ClockwiseOver).count(),
        twists.iter().filter(|&&t| t == Twist::Straight).count(),
        twists.iter().filter(|&&t| t == Twist::Ignore).count()
    );

    Ok(EdgeTwists::from_labels(twists))
}
