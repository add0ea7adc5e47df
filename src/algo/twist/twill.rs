//! Heuristic twill labeling.
//!
//! The solver grows a coloring outward from a random seed vertex, one edge
//! at a time. Each uncolored edge on the frontier collects votes from the
//! labels already placed along the strands, faces and vertex fans around it,
//! and the best-supported edge is colored next.
//!
//! The search is greedy and has no convergence guarantee on arbitrary
//! topologies. Every step scans the whole frontier and recomputes the votes
//! invalidated by the previous step, so the total work is superlinear in the
//! edge count.

use std::collections::BTreeSet;

use rand::Rng;

use super::{EdgeTwists, Twist};
use crate::algo::Progress;
use crate::error::{Result, WeaveError};
use crate::mesh::{DirectedLoop, EdgeId, HalfEdgeId, HalfEdgeMesh, MeshIndex};

/// Votes for labeling an edge `(ClockwiseOver, CounterClockwiseOver)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Votes {
    cw: u32,
    ccw: u32,
}

impl Votes {
    fn score(self) -> u32 {
        self.cw.max(self.ccw)
    }

    fn label(self) -> Twist {
        if self.cw >= self.ccw {
            Twist::ClockwiseOver
        } else {
            Twist::CounterClockwiseOver
        }
    }

    fn add(&mut self, other: Votes) {
        self.cw += other.cw;
        self.ccw += other.ccw;
    }
}

/// Label a mesh with a heuristic twill pattern.
///
/// Interior edges receive `ClockwiseOver` or `CounterClockwiseOver`,
/// boundary edges `Ignore`. The result depends only on the mesh and the
/// generator state.
///
/// # Errors
///
/// [`WeaveError::TwillIncomplete`] if a connected component could not be
/// fully colored. Traversal faults from malformed meshes are passed through.
pub fn twill_twists<I: MeshIndex, R: Rng + ?Sized>(
    mesh: &HalfEdgeMesh<I>,
    rng: &mut R,
) -> Result<EdgeTwists> {
    twill_twists_with_progress(mesh, rng, &Progress::none())
}

/// Twill labeling with progress reporting.
///
/// Reports the number of colored interior edges after every step.
pub fn twill_twists_with_progress<I: MeshIndex, R: Rng + ?Sized>(
    mesh: &HalfEdgeMesh<I>,
    rng: &mut R,
    progress: &Progress,
) -> Result<EdgeTwists> {
    let mut solver = TwillSolver::new(mesh);
    let total = solver.num_interior;

    for component in solver.components() {
        solver.color_component(&component, rng, progress, total)?;
    }

    // Boundary edges no frontier ever reached
    let labels = solver
        .labels
        .into_iter()
        .map(|label| label.unwrap_or(Twist::Ignore))
        .collect();

    progress.report(total, total, "Coloring twill edges");
    Ok(EdgeTwists::from_labels(labels))
}

/// Edges connected through shared vertices, with their vertices.
struct Component<I: MeshIndex> {
    edges: Vec<EdgeId<I>>,
    vertices: Vec<usize>,
}

struct TwillSolver<'a, I: MeshIndex> {
    mesh: &'a HalfEdgeMesh<I>,
    vertex_edges: Vec<Vec<EdgeId<I>>>,
    boundary: Vec<bool>,
    labels: Vec<Option<Twist>>,
    votes: Vec<Option<Votes>>,
    num_interior: usize,
    num_colored: usize,
}

impl<'a, I: MeshIndex> TwillSolver<'a, I> {
    fn new(mesh: &'a HalfEdgeMesh<I>) -> Self {
        let boundary: Vec<bool> = mesh.edge_ids().map(|e| mesh.is_boundary_edge(e)).collect();
        let num_interior = boundary.iter().filter(|&&b| !b).count();
        Self {
            mesh,
            vertex_edges: mesh.vertex_edge_table(),
            boundary,
            labels: vec![None; mesh.num_edges()],
            votes: vec![None; mesh.num_edges()],
            num_interior,
            num_colored: 0,
        }
    }

    #[inline]
    fn is_boundary(&self, e: EdgeId<I>) -> bool {
        self.boundary[e.index()]
    }

    /// Edges sharing a vertex with `e`, `e` included.
    fn neighbors(&self, e: EdgeId<I>) -> impl Iterator<Item = EdgeId<I>> + '_ {
        self.mesh
            .edge_vertices(e)
            .into_iter()
            .flat_map(move |v| self.vertex_edges[v.index()].iter().copied())
    }

    /// Connected components of interior edges, in order of their lowest edge.
    fn components(&self) -> Vec<Component<I>> {
        let mut seen = vec![false; self.mesh.num_edges()];
        let mut components = Vec::new();

        for start in self.mesh.edge_ids() {
            if seen[start.index()] || self.is_boundary(start) {
                continue;
            }

            let mut edges = Vec::new();
            let mut vertices = BTreeSet::new();
            let mut stack = vec![start];
            seen[start.index()] = true;

            while let Some(e) = stack.pop() {
                edges.push(e);
                for v in self.mesh.edge_vertices(e) {
                    vertices.insert(v.index());
                    for &n in &self.vertex_edges[v.index()] {
                        if !seen[n.index()] && !self.is_boundary(n) {
                            seen[n.index()] = true;
                            stack.push(n);
                        }
                    }
                }
            }

            edges.sort();
            components.push(Component {
                edges,
                vertices: vertices.into_iter().collect(),
            });
        }

        components
    }

    fn color_component<R: Rng + ?Sized>(
        &mut self,
        component: &Component<I>,
        rng: &mut R,
        progress: &Progress,
        total: usize,
    ) -> Result<()> {
        let mut frontier: BTreeSet<EdgeId<I>> = BTreeSet::new();

        // Seed: every interior edge around a random vertex
        let seed = component.vertices[rng.gen_range(0..component.vertices.len())];
        let seed_edges: Vec<EdgeId<I>> = self.vertex_edges[seed]
            .iter()
            .copied()
            .filter(|&e| !self.is_boundary(e))
            .collect();
        log::debug!(
            "twill component: {} edges, seeded at vertex {} with {} edges",
            component.edges.len(),
            seed,
            seed_edges.len()
        );
        for e in seed_edges {
            self.assign(e, Twist::ClockwiseOver, &mut frontier);
            progress.report(self.num_colored, total, "Coloring twill edges");
        }

        loop {
            // Boundary edges never cross; drop them as soon as they show up.
            let boundary: Vec<EdgeId<I>> = frontier
                .iter()
                .copied()
                .filter(|&e| self.is_boundary(e))
                .collect();
            for e in boundary {
                frontier.remove(&e);
                self.labels[e.index()] = Some(Twist::Ignore);
            }

            if frontier.is_empty() {
                break;
            }

            let mut best_score = 0;
            let mut candidates: Vec<(EdgeId<I>, Votes)> = Vec::new();
            for &e in &frontier {
                if self.labels[e.index()].is_some() {
                    continue;
                }
                let votes = match self.votes[e.index()] {
                    Some(votes) => votes,
                    None => {
                        let votes = self.compute_votes(e)?;
                        self.votes[e.index()] = Some(votes);
                        votes
                    }
                };

                let score = votes.score();
                if candidates.is_empty() || score > best_score {
                    best_score = score;
                    candidates.clear();
                }
                if score == best_score {
                    candidates.push((e, votes));
                }
            }

            if candidates.is_empty() {
                break;
            }
            let (e, votes) = candidates[rng.gen_range(0..candidates.len())];
            self.assign(e, votes.label(), &mut frontier);
            self.invalidate_around(e);
            progress.report(self.num_colored, total, "Coloring twill edges");
        }

        match component
            .edges
            .iter()
            .find(|e| self.labels[e.index()].is_none())
        {
            Some(e) => Err(WeaveError::TwillIncomplete { edge: e.index() }),
            None => Ok(()),
        }
    }

    /// Label `e`, take it off the frontier and push its uncolored neighbors.
    ///
    /// The frontier only ever holds uncolored edges.
    fn assign(&mut self, e: EdgeId<I>, twist: Twist, frontier: &mut BTreeSet<EdgeId<I>>) {
        frontier.remove(&e);
        if self.labels[e.index()].is_some() {
            return;
        }
        self.labels[e.index()] = Some(twist);
        self.num_colored += 1;

        let fresh: Vec<EdgeId<I>> = self
            .neighbors(e)
            .filter(|n| self.labels[n.index()].is_none())
            .collect();
        frontier.extend(fresh);
    }

    /// Drop cached votes of every edge within two vertex-hops of `e`.
    fn invalidate_around(&mut self, e: EdgeId<I>) {
        let near: Vec<EdgeId<I>> = self.neighbors(e).collect();
        let far: Vec<EdgeId<I>> = near.iter().flat_map(|&n| self.neighbors(n)).collect();
        for n in far {
            self.votes[n.index()] = None;
        }
    }

    /// Collect votes for `e` from the four strand directions leaving it.
    fn compute_votes(&self, e: EdgeId<I>) -> Result<Votes> {
        let mut votes = Votes::default();
        for l in self.mesh.edge_loops(e) {
            for forward in [true, false] {
                let d = DirectedLoop::new(l, forward);
                votes.add(self.edge_rule(e, d)?);
                votes.add(self.face_rule(e, d)?);
                votes.add(self.vertex_rule(e, d));
            }
        }
        Ok(votes)
    }

    /// Two crossings further along the strand the label should flip.
    fn edge_rule(&self, e: EdgeId<I>, d: DirectedLoop<I>) -> Result<Votes> {
        let crossed = self.mesh.next_edge_loop(d)?;
        let first = self.mesh.next_face_loop(crossed)?;
        let crossed = self.mesh.next_edge_loop(first)?;
        let second = self.mesh.next_face_loop(crossed)?;
        Ok(self.vote(e, self.mesh.edge_of(second.halfedge), false))
    }

    /// Two steps around the face the label should flip.
    fn face_rule(&self, e: EdgeId<I>, d: DirectedLoop<I>) -> Result<Votes> {
        let first = self.mesh.next_face_loop(d)?;
        let second = self.mesh.next_face_loop(first)?;
        Ok(self.vote(e, self.mesh.edge_of(second.halfedge), false))
    }

    /// Two spokes around the pivot vertex the label should repeat.
    fn vertex_rule(&self, e: EdgeId<I>, d: DirectedLoop<I>) -> Votes {
        let mesh = self.mesh;
        let outgoing = if d.forward {
            d.halfedge
        } else {
            mesh.twin(d.halfedge)
        };

        let rotate = |h: HalfEdgeId<I>| {
            let t = mesh.twin(h);
            if t.is_valid() {
                mesh.next(t)
            } else {
                HalfEdgeId::invalid()
            }
        };
        let target = rotate(rotate(outgoing));
        if !target.is_valid() {
            return Votes::default();
        }
        self.vote(e, mesh.edge_of(target), true)
    }

    fn vote(&self, e: EdgeId<I>, target: EdgeId<I>, same: bool) -> Votes {
        if target == e || !target.is_valid() || self.is_boundary(target) {
            return Votes::default();
        }
        let preferred = match self.labels[target.index()] {
            None => return Votes { cw: 1, ccw: 1 },
            Some(label) if label.is_crossing() => {
                if same {
                    label
                } else {
                    label.flipped()
                }
            }
            Some(_) => return Votes::default(),
        };
        match preferred {
            Twist::ClockwiseOver => Votes { cw: 1, ccw: 0 },
            _ => Votes { cw: 0, ccw: 1 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{build_from_polygons, shapes, to_face_vertex};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn assert_total(mesh: &HalfEdgeMesh, twists: &EdgeTwists) {
        assert_eq!(twists.len(), mesh.num_edges());
        for e in mesh.edge_ids() {
            if mesh.is_boundary_edge(e) {
                assert_eq!(twists[e], Twist::Ignore);
            } else {
                assert!(twists[e].is_crossing(), "edge {} is {:?}", e, twists[e]);
            }
        }
    }

    #[test]
    fn test_closed_meshes_are_fully_colored() {
        for mesh in [
            shapes::tetrahedron().unwrap(),
            shapes::cube().unwrap(),
            shapes::quad_torus(8, 4).unwrap(),
        ] {
            let twists = twill_twists(&mesh, &mut StdRng::seed_from_u64(3)).unwrap();
            assert_total(&mesh, &twists);
        }
    }

    #[test]
    fn test_open_grid() {
        let grid: HalfEdgeMesh = shapes::quad_grid(4, 3).unwrap();
        let twists = twill_twists(&grid, &mut StdRng::seed_from_u64(11)).unwrap();
        assert_total(&grid, &twists);
    }

    #[test]
    fn test_isolated_quad_is_all_ignore() {
        let quad: HalfEdgeMesh = shapes::quad_grid(1, 1).unwrap();
        let twists = twill_twists(&quad, &mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(twists.count(Twist::Ignore), 4);
    }

    #[test]
    fn test_deterministic_per_seed() {
        let torus: HalfEdgeMesh = shapes::quad_torus(10, 5).unwrap();
        let a = twill_twists(&torus, &mut StdRng::seed_from_u64(99)).unwrap();
        let b = twill_twists(&torus, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_seed_vertex_edges_are_clockwise() {
        let tet: HalfEdgeMesh = shapes::tetrahedron().unwrap();
        let twists = twill_twists(&tet, &mut StdRng::seed_from_u64(5)).unwrap();
        // Some vertex has all three of its edges clockwise.
        let table = tet.vertex_edge_table();
        assert!(table
            .iter()
            .any(|edges| edges.iter().all(|&e| twists[e] == Twist::ClockwiseOver)));
    }

    #[test]
    fn test_progress_counts_every_edge() {
        let cube: HalfEdgeMesh = shapes::cube().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let progress = Progress::new(move |current, total, _| {
            assert!(current <= total);
            counter.fetch_add(1, Ordering::SeqCst);
        });

        twill_twists_with_progress(&cube, &mut StdRng::seed_from_u64(1), &progress).unwrap();
        // One report per colored edge plus the final one
        assert_eq!(calls.load(Ordering::SeqCst), 12 + 1);
    }

    #[test]
    fn test_every_step_colors_one_edge() {
        let cube: HalfEdgeMesh = shapes::cube().unwrap();
        let reports = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&reports);
        let progress = Progress::new(move |current, _, _| {
            sink.lock().unwrap().push(current);
        });

        for seed in 0..8 {
            reports.lock().unwrap().clear();
            twill_twists_with_progress(&cube, &mut StdRng::seed_from_u64(seed), &progress)
                .unwrap();
            let seen = reports.lock().unwrap().clone();
            let mut expected: Vec<usize> = (1..=12).collect();
            expected.push(12);
            assert_eq!(seen, expected, "seed {}", seed);
        }
    }

    #[test]
    fn test_frontier_holds_only_uncolored_edges() {
        let cube: HalfEdgeMesh = shapes::cube().unwrap();
        let mut solver = TwillSolver::new(&cube);
        let mut frontier = BTreeSet::new();

        let seeds = solver.vertex_edges[0].clone();
        for &e in &seeds {
            solver.assign(e, Twist::ClockwiseOver, &mut frontier);
        }
        assert_eq!(solver.num_colored, seeds.len());
        assert!(!frontier.is_empty());
        for e in &frontier {
            assert!(solver.labels[e.index()].is_none(), "{} is colored", e);
        }

        // Coloring a frontier edge takes it off the frontier
        let e = *frontier.iter().next().unwrap();
        solver.assign(e, Twist::CounterClockwiseOver, &mut frontier);
        assert!(!frontier.contains(&e));
        assert!(frontier.iter().all(|n| solver.labels[n.index()].is_none()));
    }

    #[test]
    fn test_unreached_edge_is_incomplete() {
        // Two disjoint tetrahedra, but the component only lists the
        // first one's vertices, so growth never reaches the second.
        let first: HalfEdgeMesh = shapes::tetrahedron().unwrap();
        let (mut vertices, mut faces) = to_face_vertex(&first);
        let offset = vertices.len();
        let shifted: Vec<_> = vertices
            .iter()
            .map(|p| p + nalgebra::Vector3::new(5.0, 0.0, 0.0))
            .collect();
        vertices.extend(shifted);
        let copies: Vec<Vec<usize>> = faces
            .iter()
            .map(|f| f.iter().map(|v| v + offset).collect())
            .collect();
        faces.extend(copies);
        let mesh: HalfEdgeMesh = build_from_polygons(&vertices, &faces).unwrap();

        let mut solver = TwillSolver::new(&mesh);
        let components = solver.components();
        assert_eq!(components.len(), 2);

        let partial = Component {
            edges: mesh.edge_ids().collect(),
            vertices: components[0].vertices.clone(),
        };
        let first_missing = components[1].edges[0];
        let err = solver
            .color_component(&partial, &mut StdRng::seed_from_u64(2), &Progress::none(), 12)
            .unwrap_err();
        assert!(matches!(
            err,
            WeaveError::TwillIncomplete { edge } if edge == first_missing.index()
        ));
        assert!(err.is_fault());
    }

    #[test]
    fn test_votes_prefer_alternation() {
        let votes = Votes { cw: 2, ccw: 5 };
        assert_eq!(votes.score(), 5);
        assert_eq!(votes.label(), Twist::CounterClockwiseOver);
        assert_eq!(Votes { cw: 3, ccw: 3 }.label(), Twist::ClockwiseOver);
    }
}
