//! Module lifecycle subsystem.
//!
//! # Data Flow
//! ```text
//! Construction (rpc.rs):
//!     resolve config → retain registration callback → Created
//!
//! Start:
//!     bind listener → build dispatcher → invoke registration callback
//!     → spawn serve task → emit readiness → return (ready, serve_error)
//!
//! Stop:
//!     trigger shutdown broadcast → await serve task → reference cleared
//! ```
//!
//! # Design Decisions
//! - One mutex serializes lifecycle transitions; IsRunning reads an atomic
//!   mirror written only under that lock
//! - Double start is rejected with an explicit error, never left undefined
//! - Transport construction failure aborts startup synchronously; serve
//!   failures arrive once on the asynchronous error channel

pub mod contract;
pub mod error;
pub mod host;
pub mod lifecycle;
pub mod rpc;

pub use contract::{Module, RPC_MODULE_KIND};
pub use error::{ServeError, StartError, StopError};
pub use host::HostInfo;
pub use lifecycle::LifecycleState;
pub use rpc::{ModuleCreateInfo, RegisterFn, RpcModule, Started, DEFAULT_MODULE_NAME};
