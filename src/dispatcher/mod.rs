//! Request dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! POST /rpc/{procedure}
//!     → middleware (request id, trace, timeout, service header)
//!     → dispatcher.rs (procedure lookup)
//!     → handler.rs (registered handler, boxed async fn)
//!     → JSON response envelope
//!
//! Registration:
//!     registration callback → registry.rs (ServiceRegistry) → handler map
//! ```
//!
//! # Design Decisions
//! - Handlers attach through the narrow ServiceRegistry capability, never the
//!   dispatcher itself
//! - Registration happens strictly before serving begins; no request is
//!   dispatched until the callback has returned
//! - Unknown procedures and handler failures map to JSON error envelopes

pub mod dispatcher;
pub mod handler;
pub mod registry;

pub use dispatcher::Dispatcher;
pub use handler::{HandlerError, RpcRequest};
pub use registry::ServiceRegistry;
