use thiserror::Error;

use common::error::Error as SolverError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Channel sender failed: Receiver has been dropped.")]
    ChannelSendFailed,

    #[error("Graph processing error: {0}")]
    GraphError(#[from] SolverError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Invalid value '{token}' at {location}.")]
    Parse { location: String, token: String },

    #[error("Input ended while reading {expected}.")]
    UnexpectedEof { expected: String },

    #[error("Configuration error: {0}")]
    ConfigLoadError(String),

    #[error("{0}")]
    Usage(String),

    #[error("Pipeline task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}
