use log::info;
use tokio::sync::mpsc::Sender;

use super::types::{CaseStreamer, TaskHandle, TestCase};

pub struct Producer<S: CaseStreamer> {
    streamer: S,
}

impl<S> Producer<S>
where
    S: CaseStreamer,
{
    pub fn new(streamer: S) -> Self {
        Producer { streamer }
    }

    pub fn spawn(self, sender: Sender<TestCase>) -> TaskHandle {
        info!("Producer ready.");
        tokio::spawn(async move { self.streamer.run_stream(sender).await })
    }
}
