//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Default bind address: all interfaces, any available port.
pub const DEFAULT_BIND: &str = ":0";

/// Effective configuration for one RPC module instance.
///
/// Resolved once at construction time and immutable thereafter; changing the
/// bind address or advertise name requires rebuilding the module.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RpcConfig {
    /// Listen address as `host:port`. An empty host means all interfaces;
    /// port `0` means any available port.
    pub bind: String,

    /// Identity this service presents to peers, independent of the actual
    /// bind address.
    pub advertise_name: String,
}

impl RpcConfig {
    /// Seed configuration before options and overrides apply.
    pub fn seed(host_name: &str) -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            advertise_name: host_name.to_string(),
        }
    }
}

/// Override fragment consumed from an external configuration source, keyed by
/// `modules.<module-name>`.
///
/// A field present in a discovered fragment replaces the resolved value
/// outright; options never win over an override.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfigFragment {
    /// Listen address override.
    pub bind: Option<String>,

    /// Advertise name override.
    pub advertise_name: Option<String>,
}

impl ConfigFragment {
    /// Replace resolved fields with the fragment's values.
    pub(crate) fn apply_to(self, cfg: &mut RpcConfig) {
        if let Some(bind) = self.bind {
            cfg.bind = bind;
        }
        if let Some(name) = self.advertise_name {
            cfg.advertise_name = name;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_values() {
        let cfg = RpcConfig::seed("my-host");
        assert_eq!(cfg.bind, ":0");
        assert_eq!(cfg.advertise_name, "my-host");
    }

    #[test]
    fn test_partial_fragment_deserialization() {
        let fragment: ConfigFragment = toml::from_str("bind = \":4040\"").unwrap();
        assert_eq!(fragment.bind.as_deref(), Some(":4040"));
        assert!(fragment.advertise_name.is_none());
    }

    #[test]
    fn test_fragment_replaces_only_present_fields() {
        let mut cfg = RpcConfig::seed("my-host");
        let fragment = ConfigFragment {
            bind: Some(":4040".to_string()),
            advertise_name: None,
        };
        fragment.apply_to(&mut cfg);
        assert_eq!(cfg.bind, ":4040");
        assert_eq!(cfg.advertise_name, "my-host");
    }
}
