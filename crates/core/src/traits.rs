use super::graph::Graph;
use common::{error::Error, types::NegativeCycle};

/// Trait for detectors capable of finding negative-weight cycles.
pub trait NegativeCycleFinder {
    /// Searches the whole graph for some negative-weight cycle.
    ///
    /// Returns `Ok(Some(cycle))` if a negative cycle is found,
    /// `Ok(None)` if none exists, or `Err(e)` on failure.
    fn find_negative_cycle(&self, graph: &Graph) -> Result<Option<NegativeCycle>, Error>;
}
