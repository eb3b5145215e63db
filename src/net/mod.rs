//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! bind spec (":0", "host:port")
//!     → listener.rs (parse, bind, log)
//!     → TcpListener handed to the dispatcher serve loop
//! ```
//!
//! # Design Decisions
//! - An empty host in the bind spec means all interfaces
//! - Address-in-use is distinguished from other bind failures; both are fatal
//!   to module startup

pub mod listener;

pub use listener::ListenerError;
