use async_trait::async_trait;
use log::{error, info};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tokio::sync::mpsc::Sender;

use super::config::SimulatorConfig;
use super::error::Error;
use super::types::{CaseStreamer, TestCase};
use common::types::{Cost, CostMatrix};

/// Produces random assignment instances for simulation purposes.
///
/// Generates `cases` square matrices of side `size` with costs drawn
/// uniformly from `[0, max_cost]`, and sends them over a Tokio bounded
/// channel. A fixed `seed` makes the run reproducible.
pub struct SimulatorStreamer {
    config: SimulatorConfig,
}

impl SimulatorStreamer {
    pub fn new(config: SimulatorConfig) -> Self {
        SimulatorStreamer { config }
    }

    fn rng(&self) -> SmallRng {
        match self.config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        }
    }

    /// Draws one `size x size` matrix with cells in `[0, max_cost]`.
    pub fn generate_case<R: Rng>(
        rng: &mut R,
        index: usize,
        size: usize,
        max_cost: Cost,
    ) -> Result<TestCase, Error> {
        let upper = max_cost.max(0);
        let cells: Vec<Cost> = (0..size * size)
            .map(|_| rng.random_range(0..=upper))
            .collect();

        Ok(TestCase {
            index,
            matrix: CostMatrix::new(size, cells)?,
        })
    }
}

#[async_trait]
impl CaseStreamer for SimulatorStreamer {
    /// Runs the simulation asynchronously.
    ///
    /// Backpressure is handled naturally via awaiting on `sender.send()`.
    /// Exits early if the receiver is dropped.
    async fn run_stream(self, sender: Sender<TestCase>) -> Result<usize, Error> {
        let mut rng = self.rng();
        let SimulatorConfig {
            cases,
            size,
            max_cost,
            ..
        } = self.config;

        info!(
            "Simulator: generating {} cases of size {} with costs up to {}.",
            cases, size, max_cost
        );

        for index in 0..cases {
            let case = Self::generate_case(&mut rng, index, size, max_cost)?;
            if sender.send(case).await.is_err() {
                error!("Simulator shutting down: solver receiver dropped.");
                return Err(Error::ChannelSendFailed);
            }
        }

        Ok(cases)
    }
}
