//! Lifecycle state and shutdown coordination.

use tokio::sync::broadcast;

/// Lifecycle state of an RPC module.
///
/// Owned exclusively by the lifecycle controller and mutated only under its
/// lock, in response to explicit calls:
/// `Created → Initialized → Running → Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Constructed; configuration resolved.
    Created,
    /// Initialize completed; ready to start.
    Initialized,
    /// Serve loop entered; dispatcher reference held.
    Running,
    /// Stopped, or startup aborted. Terminal.
    Stopped,
}

/// Coordinator for graceful shutdown of the serve loop.
///
/// Provides a broadcast channel the serve task subscribes to.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
