use log::{info, warn};
use std::io::Write;
use tokio::sync::mpsc::Receiver;

use super::error::Error;
use super::types::CaseOutcome;

/// One output line per case: the optimal cost, or `error: <message>`.
pub fn format_outcome(outcome: &CaseOutcome) -> String {
    match &outcome.result {
        Ok(cost) => cost.to_string(),
        Err(e) => format!("error: {}", e),
    }
}

/// Async consumer that writes solved cases to the output sink.
pub struct Writer<W> {
    out: W,
    receiver: Receiver<CaseOutcome>,
}

impl<W> Writer<W>
where
    W: Write + Send + 'static,
{
    pub fn new(out: W, receiver: Receiver<CaseOutcome>) -> Self {
        Self { out, receiver }
    }

    /// Run the writer asynchronously.
    ///
    /// Writes outcomes as they arrive and flushes once the solver closes
    /// its channel. Returns the number of lines written.
    pub async fn write_outcomes(mut self) -> Result<usize, Error> {
        info!("Writer ready.");

        let mut written = 0usize;
        while let Some(outcome) = self.receiver.recv().await {
            if outcome.index != written {
                warn!(
                    "Outcome {} arrived at output line {}.",
                    outcome.index, written
                );
            }
            writeln!(self.out, "{}", format_outcome(&outcome))?;
            written += 1;
        }

        self.out.flush()?;
        info!("Receiver closed, writer finished after {} lines.", written);
        Ok(written)
    }

    /// Spawns the Writer task onto the Tokio runtime.
    pub fn spawn_task(self) -> tokio::task::JoinHandle<Result<usize, Error>> {
        tokio::spawn(self.write_outcomes())
    }
}
