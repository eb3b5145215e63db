//! Procedure handlers and request types.

use std::future::Future;
use std::sync::Arc;

use axum::http::StatusCode;
use futures_util::future::BoxFuture;
use serde_json::Value;
use thiserror::Error;

/// An inbound RPC request as seen by a procedure handler.
#[derive(Debug, Clone)]
pub struct RpcRequest {
    /// Procedure name the caller addressed.
    pub procedure: String,

    /// Correlation ID assigned by the inbound middleware.
    pub request_id: String,

    /// JSON request body. An empty request body arrives as `Value::Null`.
    pub body: Value,
}

/// Errors a procedure handler may return.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The request body was malformed for this procedure.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The handler failed internally.
    #[error("handler failed: {0}")]
    Failed(String),
}

impl HandlerError {
    /// HTTP status this error maps to on the inbound.
    pub fn status(&self) -> StatusCode {
        match self {
            HandlerError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            HandlerError::Failed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Boxed asynchronous procedure handler.
pub type Handler =
    Arc<dyn Fn(RpcRequest) -> BoxFuture<'static, Result<Value, HandlerError>> + Send + Sync>;

/// Wrap an async closure as a [`Handler`].
pub fn handler_fn<F, Fut>(f: F) -> Handler
where
    F: Fn(RpcRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, HandlerError>> + Send + 'static,
{
    Arc::new(move |req| Box::pin(f(req)))
}
