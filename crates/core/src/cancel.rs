use super::graph::Graph;
use super::solver::{QueueDiscipline, SpfaDetector};
use super::traits::NegativeCycleFinder;
use common::{
    error::Error,
    types::{Cost, NegativeCycle},
};
use log::debug;

/// Upper bound on cancellations before `reduce_cycles` gives up.
pub const DEFAULT_MAX_CANCELLATIONS: usize = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverOptions {
    pub max_cancellations: usize,
    pub queue_discipline: QueueDiscipline,
}

impl Default for SolverOptions {
    fn default() -> Self {
        SolverOptions {
            max_cancellations: DEFAULT_MAX_CANCELLATIONS,
            queue_discipline: QueueDiscipline::default(),
        }
    }
}

/// Minimum-cost circulation by repeated negative-cycle cancellation.
///
/// Owns its graph for the whole solve. Each cancellation removes one unit
/// of capacity along a negative cycle and installs the reverse (residual)
/// edges; once no negative cycle remains the circulation is optimal.
pub struct CycleCancellingSolver<F = SpfaDetector> {
    graph: Graph,
    finder: F,
    max_cancellations: usize,
}

impl CycleCancellingSolver<SpfaDetector> {
    /// Creates an empty solver over `vertex_count` vertices with default options.
    pub fn new(vertex_count: usize) -> Self {
        Self::with_options(vertex_count, SolverOptions::default())
    }

    pub fn with_options(vertex_count: usize, options: SolverOptions) -> Self {
        Self::with_finder(
            Graph::new(vertex_count),
            SpfaDetector::new(options.queue_discipline),
            options.max_cancellations,
        )
    }
}

impl<F> CycleCancellingSolver<F>
where
    F: NegativeCycleFinder,
{
    pub fn with_finder(graph: Graph, finder: F, max_cancellations: usize) -> Self {
        CycleCancellingSolver {
            graph,
            finder,
            max_cancellations,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn add_edge(&mut self, from: usize, to: usize, weight: Cost) -> Result<(), Error> {
        self.graph.add_edge(from, to, weight)
    }

    /// Runs one detection pass without touching the graph.
    pub fn has_negative_cycle(&self) -> Result<bool, Error> {
        Ok(self.finder.find_negative_cycle(&self.graph)?.is_some())
    }

    /// Pushes one unit around `cycle`.
    ///
    /// For every pair `(v1, v2)` the lightest `v1 -> v2` edge of weight `w` is
    /// dropped from `v1`'s list (others keep their order) and `v2 -> v1` with
    /// weight `-w` is appended. Every edge is checked before anything changes.
    ///
    /// # Errors
    /// Returns `Error::EmptyCycle` if `cycle` has no edges, and
    /// `Error::MalformedCycle` if some pair has no edge in the graph.
    pub fn cancel_cycle(&mut self, cycle: &NegativeCycle) -> Result<(), Error> {
        if cycle.is_empty() {
            return Err(Error::EmptyCycle);
        }
        let head = cycle.vertices[0];
        let malformed = || Error::MalformedCycle { vertex: head };

        for (v1, v2) in cycle.edges() {
            self.graph.lightest_edge(v1, v2)?.ok_or_else(malformed)?;
        }

        for (v1, v2) in cycle.edges() {
            let (idx, weight) = self.graph.lightest_edge(v1, v2)?.ok_or_else(malformed)?;
            let reverse = weight.checked_neg().ok_or(Error::CostOverflow)?;

            let mut kept = self.graph.edges_of(v1)?.to_vec();
            kept.remove(idx);
            // Replace before appending so a self-loop keeps its reverse edge.
            self.graph.replace_edges(v1, kept)?;
            self.graph.add_edge(v2, v1, reverse)?;
        }

        debug!(
            "cancelled cycle {:?} of weight {}",
            cycle.vertices, cycle.weight
        );
        Ok(())
    }

    /// Detects and cancels a single negative cycle, returning it.
    pub fn cancel_next(&mut self) -> Result<Option<NegativeCycle>, Error> {
        let Some(cycle) = self.finder.find_negative_cycle(&self.graph)? else {
            return Ok(None);
        };
        self.cancel_cycle(&cycle)?;
        Ok(Some(cycle))
    }

    /// Cancels negative cycles until none remains; returns how many were cancelled.
    ///
    /// # Errors
    /// Returns `Error::NoConvergence` once more than `max_cancellations`
    /// cycles would be needed.
    pub fn reduce_cycles(&mut self) -> Result<usize, Error> {
        let mut cancellations = 0usize;

        while let Some(cycle) = self.finder.find_negative_cycle(&self.graph)? {
            if cancellations >= self.max_cancellations {
                return Err(Error::NoConvergence { cancellations });
            }
            self.cancel_cycle(&cycle)?;
            cancellations += 1;
        }

        debug!(
            "graph of {} vertices cycle-free after {} cancellations",
            self.graph.vertex_count(),
            cancellations
        );
        Ok(cancellations)
    }

    /// Sum of all strictly positive edge weights.
    ///
    /// # Errors
    /// Returns `Error::CostOverflow` if the sum does not fit in a `Cost`.
    pub fn get_cost(&self) -> Result<Cost, Error> {
        self.graph
            .edges()
            .map(|(_, _, weight)| weight)
            .filter(|&weight| weight > 0)
            .try_fold(0 as Cost, |total, weight| total.checked_add(weight))
            .ok_or(Error::CostOverflow)
    }
}
