//! Handler registration surface.

use std::sync::Arc;

use dashmap::DashMap;

use crate::dispatcher::handler::{handler_fn, Handler, HandlerError, RpcRequest};

/// The narrow registration capability handed to the module's registration
/// callback.
///
/// Handlers attach here before the dispatcher begins serving. The callback
/// receives only this handle, never the dispatcher itself.
#[derive(Clone, Default)]
pub struct ServiceRegistry {
    handlers: Arc<DashMap<String, Handler>>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a procedure handler. Registering a name twice replaces the
    /// previous handler.
    pub fn register<F, Fut>(&self, procedure: impl Into<String>, f: F)
    where
        F: Fn(RpcRequest) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<serde_json::Value, HandlerError>>
            + Send
            + 'static,
    {
        let procedure = procedure.into();
        if self
            .handlers
            .insert(procedure.clone(), handler_fn(f))
            .is_some()
        {
            tracing::warn!(procedure = %procedure, "Replacing existing procedure handler");
        }
    }

    /// Look up a handler by procedure name.
    pub(crate) fn get(&self, procedure: &str) -> Option<Handler> {
        self.handlers.get(procedure).map(|h| h.value().clone())
    }

    /// Number of registered procedures.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("procedures", &self.handlers.len())
            .finish()
    }
}
