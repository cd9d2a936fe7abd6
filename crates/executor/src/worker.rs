use log::{debug, error, info};
use tokio::sync::mpsc::{Receiver, Sender};

use super::error::Error;
use super::types::{CaseOutcome, TestCase};
use cycle_cancel_core::{Objective, SolverOptions, solve_assignment};

/// Consumes test cases, solves each one and forwards the outcome.
pub struct CaseSolver {
    receiver: Receiver<TestCase>,
    sender: Sender<CaseOutcome>,
    options: SolverOptions,
    objective: Objective,
}

impl CaseSolver {
    pub fn new(
        receiver: Receiver<TestCase>,
        sender: Sender<CaseOutcome>,
        options: SolverOptions,
        objective: Objective,
    ) -> Self {
        CaseSolver {
            receiver,
            sender,
            options,
            objective,
        }
    }

    /// Solves cases until the producer closes its channel.
    ///
    /// Each solve runs on the blocking pool. A failed solve is forwarded as
    /// an outcome; only channel and task failures end the loop early.
    pub async fn solve_cases(mut self) -> Result<usize, Error> {
        info!("Solver ready ({:?}, {:?}).", self.objective, self.options);

        let mut solved = 0usize;
        while let Some(case) = self.receiver.recv().await {
            let TestCase { index, matrix } = case;
            let (options, objective) = (self.options, self.objective);

            let result =
                tokio::task::spawn_blocking(move || solve_assignment(&matrix, objective, options))
                    .await?;

            match &result {
                Ok(cost) => debug!("Case {} solved with cost {}.", index, cost),
                Err(e) => error!("Case {} failed: {}", index, e),
            }

            if self.sender.send(CaseOutcome { index, result }).await.is_err() {
                error!("Solver shutting down: writer receiver dropped.");
                return Err(Error::ChannelSendFailed);
            }
            solved += 1;
        }

        info!("Input exhausted, solver finished after {} cases.", solved);
        Ok(solved)
    }
}
