//! Strand membership and braid coloring.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::{trace_strands, StrandBuilder, StrandStep};
use crate::algo::twist::EdgeTwists;
use crate::error::Result;
use crate::mesh::{EdgeId, HalfEdgeMesh, LoopId, MeshIndex};

/// Identifies one step of one strand independently of the strand.
///
/// The pair holds the loops on both sides of the step in ascending order. At
/// straight edges both entries are the same loop. Every step of a pass has
/// a distinct key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StrandPart<I: MeshIndex = u32> {
    /// Direction of travel after the step.
    pub forward: bool,
    /// The two loops, smaller id first.
    pub loops: (LoopId<I>, LoopId<I>),
}

impl<I: MeshIndex> StrandPart<I> {
    /// Key of a traced step.
    pub fn from_step(step: &StrandStep<I>) -> Self {
        let (a, b) = (step.prev_loop, step.current_loop);
        Self {
            forward: step.forward,
            loops: if a <= b { (a, b) } else { (b, a) },
        }
    }
}

/// Records which strand every step belongs to and colors strands into
/// braids.
///
/// Strands are numbered in the order the tracer starts them. Two strands
/// *cross* when they meet at a crossing edge. Braids are a greedy coloring
/// of that crossing graph: each strand, in index order, takes the smallest
/// braid id not used by a lower-indexed strand it crosses.
#[derive(Debug, Clone)]
pub struct StrandAnalyzer<I: MeshIndex = u32> {
    parts: HashMap<StrandPart<I>, usize>,
    positions: HashMap<StrandPart<I>, usize>,
    sizes: Vec<usize>,
    crossings: BTreeMap<EdgeId<I>, Vec<usize>>,
    current: Option<usize>,
}

impl<I: MeshIndex> Default for StrandAnalyzer<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> StrandAnalyzer<I> {
    /// Create an empty analyzer.
    pub fn new() -> Self {
        Self {
            parts: HashMap::new(),
            positions: HashMap::new(),
            sizes: Vec::new(),
            crossings: BTreeMap::new(),
            current: None,
        }
    }

    /// Strand index of every recorded part.
    pub fn strands(&self) -> &HashMap<StrandPart<I>, usize> {
        &self.parts
    }

    /// Number of parts of each strand, by strand index.
    pub fn strand_sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Number of strands recorded.
    pub fn num_strands(&self) -> usize {
        self.sizes.len()
    }

    /// Braid id of every recorded part.
    pub fn braids(&self) -> HashMap<StrandPart<I>, usize> {
        let strand_braids = self.strand_braids();
        self.parts
            .iter()
            .map(|(&part, &strand)| (part, strand_braids[strand]))
            .collect()
    }

    /// Braid id of each strand, by strand index.
    pub fn strand_braids(&self) -> Vec<usize> {
        let n = self.sizes.len();
        let mut neighbors: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); n];
        for strands in self.crossings.values() {
            for &a in strands {
                for &b in strands {
                    if a != b {
                        neighbors[a].insert(b);
                    }
                }
            }
        }

        let mut braids: Vec<usize> = Vec::with_capacity(n);
        for (strand, adjacent) in neighbors.iter().enumerate() {
            let taken: BTreeSet<usize> = adjacent
                .iter()
                .filter(|&&other| other < strand)
                .map(|&other| braids[other])
                .collect();
            let braid = (0..).find(|b| !taken.contains(b)).unwrap_or(0);
            braids.push(braid);
        }
        braids
    }

    /// Number of distinct braids.
    pub fn num_braids(&self) -> usize {
        self.strand_braids().into_iter().max().map_or(0, |m| m + 1)
    }

    /// Position of a part within its strand, starting at 0.
    pub fn part_position(&self, part: &StrandPart<I>) -> Option<usize> {
        self.positions.get(part).copied()
    }

    /// Position of a part as a fraction of its strand's length, in `[0, 1)`.
    pub fn part_parameter(&self, part: &StrandPart<I>) -> Option<f64> {
        let strand = *self.parts.get(part)?;
        let position = self.part_position(part)?;
        Some(position as f64 / self.sizes[strand] as f64)
    }

    /// Strands crossing at `edge`, once per pass through it.
    pub fn crossing_strands(&self, edge: EdgeId<I>) -> &[usize] {
        self.crossings.get(&edge).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl<I: MeshIndex> StrandBuilder<I> for StrandAnalyzer<I> {
    fn start_strand(&mut self) {
        self.current = Some(self.sizes.len());
        self.sizes.push(0);
    }

    fn add_loop(&mut self, step: &StrandStep<I>) {
        debug_assert!(self.current.is_some(), "add_loop called outside a strand");
        let Some(strand) = self.current else {
            return;
        };

        let part = StrandPart::from_step(step);
        self.parts.insert(part, strand);
        self.positions.insert(part, self.sizes[strand]);
        self.sizes[strand] += 1;

        if step.twist.is_crossing() {
            self.crossings.entry(step.edge).or_default().push(strand);
        }
    }

    fn end_strand(&mut self) {
        self.current = None;
    }
}

/// Trace `mesh` under `twists` into a fresh analyzer.
pub fn analyze_strands<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    twists: &EdgeTwists,
) -> Result<StrandAnalyzer<I>> {
    let mut analyzer = StrandAnalyzer::new();
    trace_strands(mesh, twists, &mut analyzer)?;
    log::debug!(
        "{} strands in {} braids",
        analyzer.num_strands(),
        analyzer.num_braids()
    );
    Ok(analyzer)
}
