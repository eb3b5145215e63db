//! Module lifecycle error types.

use thiserror::Error;

use crate::net::listener::ListenerError;

/// Errors surfaced synchronously by start.
#[derive(Debug, Error)]
pub enum StartError {
    /// Start was called before initialize.
    #[error("module has not been initialized")]
    NotInitialized,

    /// Start was called while the module is running, or after it stopped.
    #[error("module was already started")]
    AlreadyStarted,

    /// The inbound transport could not be constructed. Fatal to process
    /// startup by contract: the module is left stopped and must not be
    /// retried.
    #[error("failed to construct inbound transport: {0}")]
    Transport(#[from] ListenerError),
}

/// Terminal serve failure, delivered at most once on the error channel
/// returned by start.
#[derive(Debug, Error)]
#[error("serving failed: {0}")]
pub struct ServeError(#[from] pub std::io::Error);

/// Errors surfaced by stop. The dispatcher reference is cleared regardless.
#[derive(Debug, Error)]
pub enum StopError {
    /// The serve task panicked or was aborted during shutdown.
    #[error("serve task failed during shutdown: {0}")]
    Join(#[from] tokio::task::JoinError),
}
