use common::error::Error;
use common::types::{Cost, DirectedEdge, Edge};

/// Weighted directed graph stored as one adjacency list per vertex.
///
/// - `adjacency[u]` -> outgoing edges of `u`, in insertion order
///
/// The vertex count is fixed at construction. Parallel edges are allowed.
/// Edges are never removed one at a time; a vertex's whole list is swapped
/// out through [`Graph::replace_edges`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    adjacency: Vec<Vec<Edge>>,
}

impl Graph {
    /// Creates a graph with `vertex_count` vertices and no edges.
    pub fn new(vertex_count: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); vertex_count],
        }
    }

    /// Creates a graph from a list of `(from, to, weight)` edges, kept in the given order.
    ///
    /// # Errors
    /// Returns `Error::OutOfRange` for the first edge touching a vertex `>= vertex_count`.
    pub fn from_edges(vertex_count: usize, edges: &[DirectedEdge]) -> Result<Self, Error> {
        let mut graph = Self::new(vertex_count);
        for &(from, to, weight) in edges {
            graph.add_edge(from, to, weight)?;
        }
        Ok(graph)
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Total number of edges across all vertices.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    fn check_vertex(&self, vertex: usize) -> Result<(), Error> {
        if vertex >= self.vertex_count() {
            return Err(Error::OutOfRange {
                vertex,
                vertex_count: self.vertex_count(),
            });
        }
        Ok(())
    }

    /// Appends `from -> to` with `weight` to the end of `from`'s list.
    ///
    /// # Errors
    /// Returns `Error::OutOfRange` if either endpoint is not a vertex of the graph.
    pub fn add_edge(&mut self, from: usize, to: usize, weight: Cost) -> Result<(), Error> {
        self.check_vertex(from)?;
        self.check_vertex(to)?;
        self.adjacency[from].push(Edge::new(to, weight));
        Ok(())
    }

    /// Outgoing edges of `vertex` in insertion order.
    pub fn edges_of(&self, vertex: usize) -> Result<&[Edge], Error> {
        self.adjacency
            .get(vertex)
            .map(Vec::as_slice)
            .ok_or(Error::OutOfRange {
                vertex,
                vertex_count: self.vertex_count(),
            })
    }

    /// Substitutes the entire outgoing list of `vertex`, returning the old one.
    ///
    /// # Errors
    /// Returns `Error::OutOfRange` if `vertex` or any new edge target is out of range.
    /// The graph is left untouched on error.
    pub fn replace_edges(&mut self, vertex: usize, edges: Vec<Edge>) -> Result<Vec<Edge>, Error> {
        self.check_vertex(vertex)?;
        for edge in &edges {
            self.check_vertex(edge.to)?;
        }
        Ok(std::mem::replace(&mut self.adjacency[vertex], edges))
    }

    /// Position and weight of the lightest `from -> to` edge (first among equals).
    pub fn lightest_edge(&self, from: usize, to: usize) -> Result<Option<(usize, Cost)>, Error> {
        let lightest = self
            .edges_of(from)?
            .iter()
            .enumerate()
            .filter(|(_, e)| e.to == to)
            .min_by_key(|(_, e)| e.weight)
            .map(|(idx, e)| (idx, e.weight));
        Ok(lightest)
    }

    /// Iterates over every edge as `(from, to, weight)`.
    pub fn edges(&self) -> impl Iterator<Item = DirectedEdge> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(from, list)| list.iter().map(move |e| (from, e.to, e.weight)))
    }
}
