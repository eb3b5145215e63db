//! Inbound listener construction.
//!
//! # Responsibilities
//! - Parse the configured bind spec
//! - Bind the TCP listener that feeds the dispatcher
//! - Surface address-in-use distinctly from other bind failures

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// The bind spec could not be parsed as `host:port`.
    #[error("invalid bind address `{addr}`: {reason}")]
    InvalidAddress { addr: String, reason: String },

    /// The listen address is already bound by another process.
    #[error("listen address `{addr}` already in use")]
    AddrInUse {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Any other bind failure.
    #[error("failed to bind `{addr}`: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

/// Parse a `host:port` bind spec. An empty host means all interfaces.
pub fn parse_bind_addr(bind: &str) -> Result<SocketAddr, ListenerError> {
    let normalized = if bind.starts_with(':') {
        format!("0.0.0.0{bind}")
    } else {
        bind.to_string()
    };

    normalized
        .parse()
        .map_err(|e: std::net::AddrParseError| ListenerError::InvalidAddress {
            addr: bind.to_string(),
            reason: e.to_string(),
        })
}

/// Bind the inbound listener. Returns the listener and its local address
/// (useful with port `0` binds).
pub async fn bind(bind_spec: &str) -> Result<(TcpListener, SocketAddr), ListenerError> {
    let addr = parse_bind_addr(bind_spec)?;

    let listener = TcpListener::bind(addr).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::AddrInUse {
            ListenerError::AddrInUse {
                addr: bind_spec.to_string(),
                source: e,
            }
        } else {
            ListenerError::Bind {
                addr: bind_spec.to_string(),
                source: e,
            }
        }
    })?;

    let local_addr = listener.local_addr().map_err(|e| ListenerError::Bind {
        addr: bind_spec.to_string(),
        source: e,
    })?;

    tracing::debug!(address = %local_addr, "Listener bound");

    Ok((listener, local_addr))
}
