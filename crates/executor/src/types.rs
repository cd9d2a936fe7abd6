use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;

use super::error::Error;
use common::error::Error as SolverError;
use common::types::{Cost, CostMatrix};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Whitespace-separated integers: `T`, then `N` and `N*N` costs per case.
    Text(String),
    /// One headerless record per case: `N, c00, c01, ...`.
    Csv(String),
    Sim,
}

/// One assignment instance, numbered in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub index: usize,
    pub matrix: CostMatrix,
}

/// Result of solving one case; errors are per case, not per run.
#[derive(Debug)]
pub struct CaseOutcome {
    pub index: usize,
    pub result: Result<Cost, SolverError>,
}

/// Every pipeline task reports how many items it handled.
pub type TaskHandle = JoinHandle<Result<usize, Error>>;

/// A trait defining the contract for any source that feeds test cases
/// into the solving pipeline.
///
/// The trait bounds (`Send`, `Sync`, `'static`) let the implementation run
/// on the multi-threaded Tokio runtime.
#[async_trait::async_trait]
pub trait CaseStreamer: Send + Sync + 'static {
    /// Sends every case in order and returns how many were sent.
    async fn run_stream(self, sender: Sender<TestCase>) -> Result<usize, Error>;
}
