//! Error types for the poller

use thiserror::Error;

/// Result type alias for poller operations
pub type Result<T> = std::result::Result<T, PollerError>;

/// Errors raised when a poller cannot be started
///
/// Failures of the status fetches themselves are never returned here: they
/// are retried and, once the error budget is exhausted, reported through
/// the listener and the [`PollOutcome`](crate::PollOutcome).
#[derive(Debug, Error)]
pub enum PollerError {
    /// The configuration violates one of its constraints
    #[error("Invalid poller configuration: {0}")]
    InvalidConfig(String),

    /// `start` was called outside of a tokio runtime
    #[error("No tokio runtime available to drive the poller")]
    NoRuntime,
}
