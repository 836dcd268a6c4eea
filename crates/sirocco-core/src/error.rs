//! Error types for sirocco-core.

use thiserror::Error;

/// Error type for sirocco-core operations.
///
/// Nothing in the per-sample path returns errors; these only surface at
/// configuration time or on the non-realtime side of the worker queue.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid parameter spec '{symbol}': min must be below max")]
    InvalidParameterSpec { symbol: &'static str },

    #[error("worker queue is full")]
    WorkerQueueFull,

    #[error("worker queue disconnected")]
    WorkerQueueClosed,
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, Error>;
