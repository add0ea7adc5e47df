//! Half-edge mesh data structure for polygon meshes.
//!
//! # Structure
//!
//! - Each face is a cycle of **loops**. A loop is a half-edge with a valid
//!   face, and it runs from its origin vertex to the origin of its `next`.
//! - Each loop knows its **twin** (the half-edge running the other way
//!   along the same edge), its `next`/`prev` in the face cycle, its face and
//!   its undirected **edge**.
//! - Each edge stores one representative half-edge. The edge's radial list
//!   holds its loops in a stable order: the representative first, then the
//!   twin.
//!
//! # Boundary Handling
//!
//! An edge used by a single face gets a boundary half-edge as the loop's
//! twin. Boundary half-edges have an invalid face and are linked into
//! boundary cycles through `next`/`prev`. They are never loops, so a loop on
//! a boundary edge has an empty link list. The weave algorithms call such
//! loops *ignorable*.

use nalgebra::{Point3, Vector3};

use super::index::{EdgeId, FaceId, HalfEdgeId, MeshIndex, VertexId};

/// A vertex in the half-edge mesh.
#[derive(Debug, Clone)]
pub struct Vertex<I: MeshIndex = u32> {
    /// The 3D position of this vertex.
    pub position: Point3<f64>,

    /// One outgoing half-edge from this vertex.
    /// For boundary vertices, this is a boundary half-edge.
    pub halfedge: HalfEdgeId<I>,
}

impl<I: MeshIndex> Vertex<I> {
    /// Create a new, unconnected vertex at the given position.
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            halfedge: HalfEdgeId::invalid(),
        }
    }
}

/// A half-edge in the mesh.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge<I: MeshIndex = u32> {
    /// The vertex this half-edge originates from.
    pub origin: VertexId<I>,

    /// The opposite half-edge along the same edge.
    pub twin: HalfEdgeId<I>,

    /// The next half-edge around the face (or boundary cycle).
    pub next: HalfEdgeId<I>,

    /// The previous half-edge around the face (or boundary cycle).
    pub prev: HalfEdgeId<I>,

    /// The face this half-edge belongs to; invalid on the boundary.
    pub face: FaceId<I>,

    /// The undirected edge this half-edge lies on.
    pub edge: EdgeId<I>,
}

impl<I: MeshIndex> HalfEdge<I> {
    /// Create a new unlinked half-edge.
    pub fn new() -> Self {
        Self {
            origin: VertexId::invalid(),
            twin: HalfEdgeId::invalid(),
            next: HalfEdgeId::invalid(),
            prev: HalfEdgeId::invalid(),
            face: FaceId::invalid(),
            edge: EdgeId::invalid(),
        }
    }

    /// Check if this half-edge lies outside every face.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        !self.face.is_valid()
    }
}

impl<I: MeshIndex> Default for HalfEdge<I> {
    fn default() -> Self {
        Self::new()
    }
}

/// A face in the half-edge mesh.
#[derive(Debug, Clone, Copy)]
pub struct Face<I: MeshIndex = u32> {
    /// One loop of this face.
    pub halfedge: HalfEdgeId<I>,
}

/// An undirected edge.
#[derive(Debug, Clone, Copy)]
pub struct Edge<I: MeshIndex = u32> {
    /// The representative half-edge. It is always a loop, so it heads the
    /// radial list.
    pub halfedge: HalfEdgeId<I>,
}

/// A half-edge mesh of arbitrary polygons.
///
/// Vertices, half-edges, faces and edges live in parallel arenas and refer to
/// each other by id.
#[derive(Debug, Clone)]
pub struct HalfEdgeMesh<I: MeshIndex = u32> {
    pub(crate) vertices: Vec<Vertex<I>>,
    pub(crate) halfedges: Vec<HalfEdge<I>>,
    pub(crate) faces: Vec<Face<I>>,
    pub(crate) edges: Vec<Edge<I>>,
}

impl<I: MeshIndex> Default for HalfEdgeMesh<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> HalfEdgeMesh<I> {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            halfedges: Vec::new(),
            faces: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Create an empty mesh with room for the given element counts.
    pub fn with_capacity(num_vertices: usize, num_halfedges: usize, num_faces: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(num_vertices),
            halfedges: Vec::with_capacity(num_halfedges),
            faces: Vec::with_capacity(num_faces),
            edges: Vec::with_capacity(num_halfedges / 2 + 1),
        }
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of half-edges, boundary half-edges included.
    #[inline]
    pub fn num_halfedges(&self) -> usize {
        self.halfedges.len()
    }

    /// Get the number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Get the number of undirected edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Get the number of loops (half-edges that belong to a face).
    pub fn num_loops(&self) -> usize {
        self.halfedges.iter().filter(|he| !he.is_boundary()).count()
    }

    /// Get a vertex by ID.
    #[inline]
    pub fn vertex(&self, id: VertexId<I>) -> &Vertex<I> {
        &self.vertices[id.index()]
    }

    /// Get a half-edge by ID.
    #[inline]
    pub fn halfedge(&self, id: HalfEdgeId<I>) -> &HalfEdge<I> {
        &self.halfedges[id.index()]
    }

    /// Get a face by ID.
    #[inline]
    pub fn face(&self, id: FaceId<I>) -> &Face<I> {
        &self.faces[id.index()]
    }

    /// Get an edge by ID.
    #[inline]
    pub fn edge(&self, id: EdgeId<I>) -> &Edge<I> {
        &self.edges[id.index()]
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId<I>) -> &Point3<f64> {
        &self.vertex(v).position
    }

    #[inline]
    pub(crate) fn vertex_mut(&mut self, id: VertexId<I>) -> &mut Vertex<I> {
        &mut self.vertices[id.index()]
    }

    #[inline]
    pub(crate) fn halfedge_mut(&mut self, id: HalfEdgeId<I>) -> &mut HalfEdge<I> {
        &mut self.halfedges[id.index()]
    }

    // ==================== Topology Queries ====================

    /// Get the twin half-edge.
    #[inline]
    pub fn twin(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).twin
    }

    /// Get the next half-edge around the face.
    #[inline]
    pub fn next(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).next
    }

    /// Get the previous half-edge around the face.
    #[inline]
    pub fn prev(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).prev
    }

    /// Get the origin vertex of a half-edge.
    #[inline]
    pub fn origin(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.halfedge(he).origin
    }

    /// Get the destination vertex of a half-edge.
    #[inline]
    pub fn dest(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.origin(self.twin(he))
    }

    /// Get the face of a half-edge.
    #[inline]
    pub fn face_of(&self, he: HalfEdgeId<I>) -> FaceId<I> {
        self.halfedge(he).face
    }

    /// Get the edge a half-edge lies on.
    #[inline]
    pub fn edge_of(&self, he: HalfEdgeId<I>) -> EdgeId<I> {
        self.halfedge(he).edge
    }

    /// Check if a half-edge is a boundary half-edge (not a loop).
    #[inline]
    pub fn is_boundary_halfedge(&self, he: HalfEdgeId<I>) -> bool {
        self.halfedge(he).is_boundary()
    }

    /// The two endpoint vertices of an edge.
    pub fn edge_vertices(&self, e: EdgeId<I>) -> [VertexId<I>; 2] {
        let he = self.edge(e).halfedge;
        [self.origin(he), self.dest(he)]
    }

    /// The radial list of an edge: its loops, representative first.
    pub fn edge_loops(
        &self,
        e: EdgeId<I>,
    ) -> impl DoubleEndedIterator<Item = HalfEdgeId<I>> + '_ {
        let he = self.edge(e).halfedge;
        [he, self.twin(he)]
            .into_iter()
            .filter(move |&h| h.is_valid() && !self.is_boundary_halfedge(h))
    }

    /// The loops on the far side of `l`'s edge.
    ///
    /// Empty when the edge is a boundary edge. This is read from the twin
    /// link without excluding `l`, so a corrupted self-linked loop shows up
    /// in its own list.
    pub fn link_loops(
        &self,
        l: HalfEdgeId<I>,
    ) -> impl DoubleEndedIterator<Item = HalfEdgeId<I>> + '_ {
        let twin = self.twin(l);
        std::iter::once(twin).filter(move |&h| h.is_valid() && !self.is_boundary_halfedge(h))
    }

    /// Check if an edge has fewer than two loops.
    pub fn is_boundary_edge(&self, e: EdgeId<I>) -> bool {
        self.edge_loops(e).nth(1).is_none()
    }

    /// Check if a vertex lies on the boundary or is isolated.
    pub fn is_boundary_vertex(&self, v: VertexId<I>) -> bool {
        if !self.vertex(v).halfedge.is_valid() {
            return true;
        }
        self.vertex_halfedges(v)
            .any(|he| self.is_boundary_halfedge(he))
    }

    // ==================== Iteration ====================

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all half-edge IDs.
    pub fn halfedge_ids(&self) -> impl Iterator<Item = HalfEdgeId<I>> + '_ {
        (0..self.halfedges.len()).map(HalfEdgeId::new)
    }

    /// Iterate over all loop IDs (half-edges with a face).
    pub fn loop_ids(&self) -> impl Iterator<Item = HalfEdgeId<I>> + '_ {
        self.halfedge_ids()
            .filter(move |&he| !self.is_boundary_halfedge(he))
    }

    /// Iterate over all face IDs.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        (0..self.faces.len()).map(FaceId::new)
    }

    /// Iterate over all edge IDs.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId<I>> + '_ {
        (0..self.edges.len()).map(EdgeId::new)
    }

    /// Iterate over outgoing half-edges around a vertex.
    pub fn vertex_halfedges(&self, v: VertexId<I>) -> VertexHalfEdgeIter<'_, I> {
        VertexHalfEdgeIter::new(self, v)
    }

    /// Iterate over the loop cycle of a face.
    pub fn face_halfedges(&self, f: FaceId<I>) -> FaceHalfEdgeIter<'_, I> {
        FaceHalfEdgeIter::new(self, f)
    }

    /// Iterate over the vertices of a face in cycle order.
    pub fn face_vertices(&self, f: FaceId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.face_halfedges(f).map(|he| self.origin(he))
    }

    /// Number of corners of a face.
    pub fn face_degree(&self, f: FaceId<I>) -> usize {
        self.face_halfedges(f).count()
    }

    /// For each vertex, the number of face corners it appears in.
    pub fn vertex_face_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.num_vertices()];
        for l in self.loop_ids() {
            counts[self.origin(l).index()] += 1;
        }
        counts
    }

    /// For each vertex, the edges incident to it, in edge id order.
    pub fn vertex_edge_table(&self) -> Vec<Vec<EdgeId<I>>> {
        let mut table = vec![Vec::new(); self.num_vertices()];
        for e in self.edge_ids() {
            let [a, b] = self.edge_vertices(e);
            table[a.index()].push(e);
            if b != a {
                table[b.index()].push(e);
            }
        }
        table
    }

    // ==================== Geometry ====================

    /// Compute the unit normal of a face with Newell's method.
    ///
    /// Returns the zero vector for a degenerate face.
    pub fn face_normal(&self, f: FaceId<I>) -> Vector3<f64> {
        let mut normal = Vector3::zeros();
        for he in self.face_halfedges(f) {
            let p = self.position(self.origin(he));
            let q = self.position(self.dest(he));
            normal.x += (p.y - q.y) * (p.z + q.z);
            normal.y += (p.z - q.z) * (p.x + q.x);
            normal.z += (p.x - q.x) * (p.y + q.y);
        }
        normal.try_normalize(1e-12).unwrap_or_else(Vector3::zeros)
    }

    /// Compute the normal at the corner where loop `l` starts.
    ///
    /// Falls back to the face normal when the corner is collinear.
    pub fn corner_normal(&self, l: HalfEdgeId<I>) -> Vector3<f64> {
        let p = self.position(self.origin(l));
        let to_next = self.position(self.dest(l)) - p;
        let to_prev = self.position(self.origin(self.prev(l))) - p;
        to_next
            .cross(&to_prev)
            .try_normalize(1e-12)
            .unwrap_or_else(|| self.face_normal(self.face_of(l)))
    }

    /// Compute the centroid of a face's corners.
    pub fn face_centroid(&self, f: FaceId<I>) -> Point3<f64> {
        let mut sum = Vector3::zeros();
        let mut n = 0usize;
        for v in self.face_vertices(f) {
            sum += self.position(v).coords;
            n += 1;
        }
        Point3::from(sum / n.max(1) as f64)
    }

    /// Compute the edge vector of a half-edge (from origin to destination).
    pub fn halfedge_vector(&self, he: HalfEdgeId<I>) -> Vector3<f64> {
        self.position(self.dest(he)) - self.position(self.origin(he))
    }

    /// Compute the midpoint of an edge.
    pub fn edge_midpoint(&self, e: EdgeId<I>) -> Point3<f64> {
        let [a, b] = self.edge_vertices(e);
        Point3::from((self.position(a).coords + self.position(b).coords) * 0.5)
    }

    // ==================== Construction ====================

    /// Add a new vertex and return its ID.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> VertexId<I> {
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(Vertex::new(position));
        id
    }

    // ==================== Validation ====================

    /// Check if the connectivity is consistent.
    pub fn is_valid(&self) -> bool {
        for (i, v) in self.vertices.iter().enumerate() {
            if v.halfedge.is_valid() && self.origin(v.halfedge).index() != i {
                return false;
            }
        }

        for (i, he) in self.halfedges.iter().enumerate() {
            let id = HalfEdgeId::<I>::new(i);
            if !he.twin.is_valid() || self.twin(he.twin) != id {
                return false;
            }
            if !he.edge.is_valid() || self.edge_of(he.twin) != he.edge {
                return false;
            }
            if he.next.is_valid() && self.prev(he.next) != id {
                return false;
            }
            if he.prev.is_valid() && self.next(he.prev) != id {
                return false;
            }
            if !he.is_boundary() && !he.next.is_valid() {
                return false;
            }
        }

        for f in &self.faces {
            if !f.halfedge.is_valid() || self.is_boundary_halfedge(f.halfedge) {
                return false;
            }
        }

        for (i, e) in self.edges.iter().enumerate() {
            if self.is_boundary_halfedge(e.halfedge) || self.edge_of(e.halfedge).index() != i {
                return false;
            }
        }

        true
    }
}

/// Iterator over outgoing half-edges around a vertex.
pub struct VertexHalfEdgeIter<'a, I: MeshIndex = u32> {
    mesh: &'a HalfEdgeMesh<I>,
    start: HalfEdgeId<I>,
    current: HalfEdgeId<I>,
    done: bool,
}

impl<'a, I: MeshIndex> VertexHalfEdgeIter<'a, I> {
    fn new(mesh: &'a HalfEdgeMesh<I>, v: VertexId<I>) -> Self {
        let start = mesh.vertex(v).halfedge;
        Self {
            mesh,
            start,
            current: start,
            done: !start.is_valid(),
        }
    }
}

impl<'a, I: MeshIndex> Iterator for VertexHalfEdgeIter<'a, I> {
    type Item = HalfEdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;

        // twin(he) ends at the pivot, so the half-edge after it starts there.
        self.current = self.mesh.next(self.mesh.twin(self.current));

        if self.current == self.start || !self.current.is_valid() {
            self.done = true;
        }

        Some(result)
    }
}

/// Iterator over the half-edges of a face cycle.
pub struct FaceHalfEdgeIter<'a, I: MeshIndex = u32> {
    mesh: &'a HalfEdgeMesh<I>,
    start: HalfEdgeId<I>,
    current: HalfEdgeId<I>,
    done: bool,
}

impl<'a, I: MeshIndex> FaceHalfEdgeIter<'a, I> {
    fn new(mesh: &'a HalfEdgeMesh<I>, f: FaceId<I>) -> Self {
        let start = mesh.face(f).halfedge;
        Self {
            mesh,
            start,
            current: start,
            done: !start.is_valid(),
        }
    }
}

impl<'a, I: MeshIndex> Iterator for FaceHalfEdgeIter<'a, I> {
    type Item = HalfEdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;
        self.current = self.mesh.next(self.current);

        if self.current == self.start {
            self.done = true;
        }

        Some(result)
    }
}
