//! Layered configuration resolution.
//!
//! Precedence, lowest to highest: built-in seeds, programmatic options in
//! supplied order, external override fragment.

use crate::config::options::ModuleOption;
use crate::config::schema::RpcConfig;
use crate::config::source::ConfigSource;
use crate::config::ConfigError;

/// Resolve the effective configuration for one module instance.
///
/// Seeds the advertise name from the host identity and the bind address from
/// [`DEFAULT_BIND`](crate::config::schema::DEFAULT_BIND), applies each option
/// in order (the first failure aborts resolution), then consults the override
/// source for a fragment keyed by the module name. Fragment fields supersede
/// whatever the options produced.
///
/// Resolution is deterministic: identical inputs yield identical output.
pub fn resolve(
    host_name: &str,
    module_name: &str,
    options: Vec<ModuleOption>,
    source: Option<&dyn ConfigSource>,
) -> Result<RpcConfig, ConfigError> {
    let mut cfg = RpcConfig::seed(host_name);

    for opt in options {
        let option = opt.name();
        if let Err(err) = opt.apply(&mut cfg) {
            tracing::error!(option, error = %err, "Unable to apply option");
            return Err(err);
        }
    }

    if let Some(source) = source {
        if let Some(fragment) = source.module_fragment(module_name)? {
            tracing::debug!(module = module_name, "Applying external override fragment");
            fragment.apply_to(&mut cfg);
        }
    }

    validate(&cfg)?;
    Ok(cfg)
}

/// Non-empty invariant: resolution never yields an empty bind address or
/// advertise name.
fn validate(cfg: &RpcConfig) -> Result<(), ConfigError> {
    if cfg.bind.is_empty() {
        return Err(ConfigError::EmptyField { field: "bind" });
    }
    if cfg.advertise_name.is_empty() {
        return Err(ConfigError::EmptyField {
            field: "advertise_name",
        });
    }
    Ok(())
}
