//! Configuration resolution subsystem.
//!
//! # Data Flow
//! ```text
//! seeds (host identity, ":0")
//!     → options.rs (programmatic options, applied in supplied order, may fail)
//!     → source.rs (external override fragment, keyed by modules.<name>)
//!     → RpcConfig (validated non-empty, immutable)
//! ```
//!
//! # Design Decisions
//! - Configuration is resolved once at construction and immutable thereafter;
//!   no hot reload
//! - An override fragment replaces resolved fields outright; options never win
//!   over an override
//! - The override source is an explicit dependency of the resolver, not
//!   ambient global state

pub mod options;
pub mod resolver;
pub mod schema;
pub mod source;

pub use options::ModuleOption;
pub use resolver::resolve;
pub use schema::{ConfigFragment, RpcConfig};
pub use source::{ConfigSource, FileSource, StaticSource};

use thiserror::Error;

/// Error type for configuration resolution.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A programmatic option rejected its input.
    #[error("option `{option}` failed: {reason}")]
    Option {
        option: &'static str,
        reason: String,
    },

    /// Failed to read the external override source.
    #[error("failed to read config source: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse the external override source.
    #[error("failed to parse config source: {0}")]
    Parse(#[from] toml::de::Error),

    /// Resolution produced an empty required field.
    #[error("resolved configuration has empty `{field}`")]
    EmptyField { field: &'static str },
}
