use thiserror::Error;
use tokio::task::JoinError;

use crate::runtime::{SendError, SystemCreationError};
use crate::unit::Reply;

/// A fan-out round failed. Carries the first failure observed; replies that
/// had already arrived are discarded.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("request to unit {index} failed: {source}")]
    Send {
        index: usize,
        #[source]
        source: SendError,
    },
    #[error("unit {index} answered with unexpected {reply}")]
    UnexpectedReply { index: usize, reply: Reply },
    #[error("dispatch task did not complete: {0}")]
    Task(#[from] JoinError),
}

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum InvalidConfigurationError {
    #[error("partitioned computation needs at least one worker")]
    NoWorkers,
}

#[derive(Debug, Error)]
pub enum ComputeError {
    #[error(transparent)]
    InvalidConfiguration(#[from] InvalidConfigurationError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error("sum of squares over {processed} elements overflows i64")]
    Overflow { processed: usize },
}

/// A phase-level failure, named after the phase it happened in.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("handshake failed: {0}")]
    Handshake(#[from] SystemCreationError),
    #[error("messaging phase failed: {0}")]
    Messaging(#[source] DispatchError),
    #[error("compute phase failed: {0}")]
    Compute(#[from] ComputeError),
}

impl BenchError {
    pub fn phase(&self) -> &'static str {
        match self {
            BenchError::Handshake(_) => "handshake",
            BenchError::Messaging(_) => "messaging",
            BenchError::Compute(_) => "compute",
        }
    }
}
