//! Error type shared by every worker-facing helper.

use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// The message channel failed before a reply arrived (connection refused,
    /// non-2xx status, unreadable body).
    #[error("transport error: {0}")]
    Transport(String),

    #[error("worker did not reply within {}ms", timeout.as_millis())]
    WorkerUnavailable { timeout: Duration },

    /// The worker replied, but flagged the operation as failed.
    #[error("worker error: {0}")]
    Worker(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("expected at most one match in table '{table}', got {matches}")]
    Ambiguous { table: String, matches: usize },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}
