//! Pluggable RPC Serving Module
//!
//! A lifecycle-managed RPC serving unit for embedding in a larger host
//! process, built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//! supervisor ──RpcModule::new()──▶ config resolver
//!                                  (seeds → options → external overrides)
//!            ──initialize()─────▶ extension point, no transport work
//!            ──start()──────────▶ bind listener → build dispatcher
//!                                 → registration callback (ServiceRegistry)
//!                                 → serve task (async) → readiness signal
//!                                 ◀─ (ready, serve_error) channels
//!            ──stop()───────────▶ graceful shutdown, serve task reaped
//!            ──is_running()────▶ atomic state mirror
//! ```
//!
//! The registration callback runs strictly before the dispatcher accepts any
//! request; the readiness signal fires once the serve loop has been entered.

// Core subsystems
pub mod config;
pub mod dispatcher;
pub mod module;
pub mod net;

// Cross-cutting concerns
pub mod observability;

pub use config::{ConfigError, ConfigFragment, ConfigSource, FileSource, RpcConfig, StaticSource};
pub use dispatcher::{HandlerError, RpcRequest, ServiceRegistry};
pub use module::{
    HostInfo, Module, ModuleCreateInfo, RegisterFn, RpcModule, ServeError, StartError, Started,
    StopError, RPC_MODULE_KIND,
};
