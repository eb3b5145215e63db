//! Request dispatch over the HTTP inbound.
//!
//! # Responsibilities
//! - Build the axum Router with the middleware stack
//! - Route `POST /rpc/{procedure}` to registered handlers
//! - Map unknown procedures and handler failures to JSON error envelopes
//! - Serve until the shutdown future resolves
//! - Record per-request traffic metrics

use std::future::Future;
use std::time::{Duration, Instant};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header::HeaderName, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::dispatcher::handler::RpcRequest;
use crate::dispatcher::registry::ServiceRegistry;
use crate::observability::metrics::TrafficReporter;

/// Upper bound on a single dispatch, body read included.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Response header carrying the identity this service presents to peers.
const SERVICE_HEADER: &str = "x-rpc-service";

/// Routes inbound RPC requests to registered procedure handlers.
///
/// Handlers must be attached (via [`ServiceRegistry`]) before [`serve`] is
/// called; the dispatcher itself never exposes a registration surface.
///
/// [`serve`]: Dispatcher::serve
pub struct Dispatcher {
    service_name: String,
    registry: ServiceRegistry,
    reporter: TrafficReporter,
}

/// State injected into the dispatch handler.
#[derive(Clone)]
struct DispatchState {
    registry: ServiceRegistry,
    reporter: TrafficReporter,
}

impl Dispatcher {
    /// Create a dispatcher presenting `service_name` to peers.
    pub fn new(
        service_name: impl Into<String>,
        registry: ServiceRegistry,
        reporter: TrafficReporter,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            registry,
            reporter,
        }
    }

    /// Build the axum router with all middleware layers.
    fn build_router(&self) -> Router {
        let state = DispatchState {
            registry: self.registry.clone(),
            reporter: self.reporter.clone(),
        };

        let service_header = HeaderValue::from_str(&self.service_name)
            .unwrap_or_else(|_| HeaderValue::from_static("rpc"));

        Router::new()
            .route("/rpc/{procedure}", post(dispatch))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TraceLayer::new_for_http())
                    .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
                    .layer(SetResponseHeaderLayer::if_not_present(
                        HeaderName::from_static(SERVICE_HEADER),
                        service_header,
                    )),
            )
    }

    /// Serve requests on `listener` until `shutdown` resolves.
    ///
    /// Long-running; the caller decides where it executes. In-flight requests
    /// drain before this returns.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), std::io::Error> {
        let app = self.build_router();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
    }
}

/// Main dispatch handler: look up the procedure, run its handler, envelope
/// the outcome.
async fn dispatch(
    State(state): State<DispatchState>,
    Path(procedure): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let start = Instant::now();
    let request_id = headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let Some(handler) = state.registry.get(&procedure) else {
        tracing::warn!(request_id = %request_id, procedure = %procedure, "Unknown procedure");
        state
            .reporter
            .record_request(&procedure, StatusCode::NOT_FOUND.as_u16(), start);
        return error_response(StatusCode::NOT_FOUND, &procedure, "unknown procedure");
    };

    let body = if body.is_empty() {
        Value::Null
    } else {
        match serde_json::from_slice(&body) {
            Ok(v) => v,
            Err(e) => {
                state
                    .reporter
                    .record_request(&procedure, StatusCode::BAD_REQUEST.as_u16(), start);
                return error_response(
                    StatusCode::BAD_REQUEST,
                    &procedure,
                    &format!("invalid JSON body: {e}"),
                );
            }
        }
    };

    tracing::debug!(request_id = %request_id, procedure = %procedure, "Dispatching request");

    let request = RpcRequest {
        procedure: procedure.clone(),
        request_id: request_id.clone(),
        body,
    };

    match handler(request).await {
        Ok(value) => {
            state
                .reporter
                .record_request(&procedure, StatusCode::OK.as_u16(), start);
            (StatusCode::OK, Json(value)).into_response()
        }
        Err(err) => {
            let status = err.status();
            tracing::error!(
                request_id = %request_id,
                procedure = %procedure,
                error = %err,
                "Handler error"
            );
            state.reporter.record_request(&procedure, status.as_u16(), start);
            error_response(status, &procedure, &err.to_string())
        }
    }
}

fn error_response(status: StatusCode, procedure: &str, message: &str) -> Response {
    (
        status,
        Json(json!({ "procedure": procedure, "error": message })),
    )
        .into_response()
}
