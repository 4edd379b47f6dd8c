/// Error taxonomy for the monitoring core
///
/// Only tick-level source failures, bus shutdown and terminal failures leave the
/// core as errors. Per-subject failures are absorbed by the collector and
/// user-action failures are shown in the error overlay.

use thiserror::Error;

/// Failure reported by a data source (OS process table, Docker daemon)
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("data source unavailable: {0}")]
    Unavailable(String),

    #[error("subject not found: {0}")]
    NotFound(String),

    #[error("docker error: {0}")]
    Docker(#[from] bollard::errors::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure while delivering a signal to a process
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignalError {
    #[error("process {0} not found")]
    NotFound(u32),

    #[error("signal {0} is not a valid signal number")]
    InvalidSignal(i32),

    #[error("signal {0} is not supported on this platform")]
    Unsupported(i32),

    #[error("failed to send signal {signal} to process {pid}")]
    Failed { pid: u32, signal: i32 },
}

/// Error terminating a supervised task
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("canceled by user")]
    CanceledByUser,

    #[error("collection failed: {0}")]
    Source(#[from] SourceError),

    #[error("operation cancelled")]
    Cancelled,

    #[error("metric bus closed")]
    BusClosed,

    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    #[error("task failed: {0}")]
    Task(String),
}

impl MonitorError {
    /// Quit key or external cancellation; neither is reported as a failure
    pub fn is_clean_exit(&self) -> bool {
        matches!(self, MonitorError::CanceledByUser | MonitorError::Cancelled)
    }
}

pub type MonitorResult<T> = Result<T, MonitorError>;
