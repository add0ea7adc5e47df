//! The configured weave pipeline.
//!
//! [`weave`] validates a [`WeaveOptions`], applies the requested remesh and
//! labels every edge of the result. The random generator is seeded once per
//! call from [`WeaveOptions::seed`], so the same options on the same mesh
//! always give the same weave.
//!
//! # Example
//!
//! ```
//! use knotwork::algo::remesh::RemeshType;
//! use knotwork::algo::weave::{weave, WeaveOptions, WeaveType};
//! use knotwork::mesh::{shapes, HalfEdgeMesh};
//!
//! let cube: HalfEdgeMesh = shapes::cube().unwrap();
//! let options = WeaveOptions::new(WeaveType::MedialTwill)
//!     .with_remesh(RemeshType::Medial)
//!     .with_seed(7);
//!
//! let result = weave(&cube, &options).unwrap();
//! let analyzer = result.analyze().unwrap();
//! assert!(analyzer.num_strands() > 0);
//! ```

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::algo::remesh::{medial, RemeshType};
use crate::algo::strand::{analyze_strands, trace_strands, StrandAnalyzer, StrandBuilder};
use crate::algo::twist::{medial_twists, plain_twists, twill_twists_with_progress, EdgeTwists};
use crate::algo::Progress;
use crate::error::{Result, WeaveError};
use crate::mesh::{HalfEdgeMesh, MeshIndex};

/// Which labeling to weave with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeaveType {
    /// Random crossings and straight pass-throughs.
    #[default]
    Plain,
    /// Heuristic twill.
    Twill,
    /// Exact twill; requires the medial remesh.
    MedialTwill,
}

/// Options for [`weave`].
#[derive(Debug, Clone)]
pub struct WeaveOptions {
    /// Labeling strategy.
    pub weave_type: WeaveType,

    /// Chance that a plain-weave edge crosses rather than passes straight
    /// (default: 1.0). Ignored by the twill labelings.
    pub probability: f64,

    /// Remesh applied before labeling (default: none).
    pub remesh: RemeshType,

    /// Seed for the random generator (default: 0).
    pub seed: u64,
}

impl Default for WeaveOptions {
    fn default() -> Self {
        Self {
            weave_type: WeaveType::Plain,
            probability: 1.0,
            remesh: RemeshType::None,
            seed: 0,
        }
    }
}

impl WeaveOptions {
    /// Create options for the given labeling with default settings.
    pub fn new(weave_type: WeaveType) -> Self {
        Self {
            weave_type,
            ..Self::default()
        }
    }

    /// Set the plain-weave crossing probability.
    pub fn with_probability(mut self, probability: f64) -> Self {
        self.probability = probability;
        self
    }

    /// Set the remesh applied before labeling.
    pub fn with_remesh(mut self, remesh: RemeshType) -> Self {
        self.remesh = remesh;
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check the options before any work is done.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.probability) {
            return Err(WeaveError::invalid_param(
                "probability",
                self.probability,
                "must be in [0, 1]",
            ));
        }
        if self.weave_type == WeaveType::MedialTwill && self.remesh != RemeshType::Medial {
            return Err(WeaveError::NotMedialMesh);
        }
        Ok(())
    }
}

/// A labeled mesh, ready to trace.
#[derive(Debug, Clone)]
pub struct Weave<I: MeshIndex = u32> {
    /// The woven mesh, after remeshing.
    pub mesh: HalfEdgeMesh<I>,
    /// One twist per edge of `mesh`.
    pub twists: EdgeTwists,
}

impl<I: MeshIndex> Weave<I> {
    /// Trace all strands into `builder`, returning the strand count.
    pub fn trace<B: StrandBuilder<I> + ?Sized>(&self, builder: &mut B) -> Result<usize> {
        trace_strands(&self.mesh, &self.twists, builder)
    }

    /// Trace all strands into a fresh analyzer.
    pub fn analyze(&self) -> Result<StrandAnalyzer<I>> {
        analyze_strands(&self.mesh, &self.twists)
    }
}

/// Remesh and label `mesh` as configured by `options`.
///
/// # Errors
///
/// Configuration errors are reported before the mesh is touched. The twill
/// labeling may fail with [`WeaveError::TwillIncomplete`].
pub fn weave<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, options: &WeaveOptions) -> Result<Weave<I>> {
    weave_with_progress(mesh, options, &Progress::none())
}

/// Weave with progress reporting from the twill labeling.
pub fn weave_with_progress<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    options: &WeaveOptions,
    progress: &Progress,
) -> Result<Weave<I>> {
    options.validate()?;
    let mut rng = StdRng::seed_from_u64(options.seed);

    let result = match options.weave_type {
        WeaveType::MedialTwill => {
            let medial = medial(mesh)?;
            let twists = medial_twists(&medial);
            Weave {
                mesh: medial.into_mesh(),
                twists,
            }
        }
        WeaveType::Plain => {
            let mesh = options.remesh.apply(mesh)?;
            let twists = plain_twists(&mesh, options.probability, &mut rng)?;
            Weave { mesh, twists }
        }
        WeaveType::Twill => {
            let mesh = options.remesh.apply(mesh)?;
            let twists = twill_twists_with_progress(&mesh, &mut rng, progress)?;
            Weave { mesh, twists }
        }
    };

    log::debug!(
        "{:?} weave over {:?} remesh: {} edges labeled",
        options.weave_type,
        options.remesh,
        result.twists.len()
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::strand::StrandEvent;
    use crate::algo::twist::Twist;
    use crate::mesh::shapes;

    #[test]
    fn test_defaults() {
        let options = WeaveOptions::default();
        assert_eq!(options.weave_type, WeaveType::Plain);
        assert_eq!(options.probability, 1.0);
        assert_eq!(options.remesh, RemeshType::None);
        assert_eq!(options.seed, 0);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_configuration_errors() {
        let tet: HalfEdgeMesh = shapes::tetrahedron().unwrap();

        let bad_p = WeaveOptions::default().with_probability(2.0);
        assert!(matches!(
            weave(&tet, &bad_p),
            Err(WeaveError::InvalidParameter { .. })
        ));

        let nan_p = WeaveOptions::default().with_probability(f64::NAN);
        assert!(nan_p.validate().is_err());

        for remesh in [RemeshType::None, RemeshType::EdgeSubdivide] {
            let options = WeaveOptions::new(WeaveType::MedialTwill).with_remesh(remesh);
            assert!(matches!(weave(&tet, &options), Err(WeaveError::NotMedialMesh)));
        }
    }

    #[test]
    fn test_plain_is_reproducible() {
        let torus: HalfEdgeMesh = shapes::quad_torus(8, 5).unwrap();
        let options = WeaveOptions::default().with_probability(0.5).with_seed(1234);

        let a = weave(&torus, &options).unwrap();
        let b = weave(&torus, &options).unwrap();
        assert_eq!(a.twists, b.twists);
    }

    #[test]
    fn test_remesh_then_weave() {
        let tet: HalfEdgeMesh = shapes::tetrahedron().unwrap();
        let options = WeaveOptions::new(WeaveType::Twill).with_remesh(RemeshType::EdgeSubdivide);

        let result = weave(&tet, &options).unwrap();
        assert_eq!(result.mesh.num_vertices(), 10);
        assert_eq!(result.twists.len(), result.mesh.num_edges());
        assert!(result.twists.iter().all(Twist::is_crossing));

        let analyzer = result.analyze().unwrap();
        let parts: usize = analyzer.strand_sizes().iter().sum();
        assert_eq!(parts, result.mesh.num_loops());
    }

    #[test]
    fn test_medial_twill() {
        let cube: HalfEdgeMesh = shapes::cube().unwrap();
        let options = WeaveOptions::new(WeaveType::MedialTwill).with_remesh(RemeshType::Medial);

        let result = weave(&cube, &options).unwrap();
        assert_eq!(result.mesh.num_faces(), 30);
        assert_eq!(result.twists.count(Twist::CounterClockwiseOver), 24);

        let mut events: Vec<StrandEvent> = Vec::new();
        let strands = result.trace(&mut events).unwrap();
        assert!(strands > 0);
    }

    #[test]
    fn test_twill_on_medial_mesh_uses_heuristic() {
        let cube: HalfEdgeMesh = shapes::cube().unwrap();
        let options = WeaveOptions::new(WeaveType::Twill)
            .with_remesh(RemeshType::Medial)
            .with_seed(3);

        let result = weave(&cube, &options).unwrap();
        assert_eq!(result.mesh.num_edges(), 48);
        assert!(result.twists.iter().all(Twist::is_crossing));
    }
}
