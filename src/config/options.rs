//! Programmatic configuration options.
//!
//! Options are supplied by the module's creator at construction time and
//! applied to the pending configuration in order. An option may fail, which
//! aborts resolution with that option's error.

use crate::config::schema::RpcConfig;
use crate::config::ConfigError;

type ApplyFn = Box<dyn FnOnce(&mut RpcConfig) -> Result<(), ConfigError> + Send>;

/// A fallible programmatic mutation of the pending configuration.
pub struct ModuleOption {
    name: &'static str,
    apply: ApplyFn,
}

impl ModuleOption {
    /// Wrap a closure as a named option.
    pub fn new<F>(name: &'static str, f: F) -> Self
    where
        F: FnOnce(&mut RpcConfig) -> Result<(), ConfigError> + Send + 'static,
    {
        Self {
            name,
            apply: Box::new(f),
        }
    }

    /// Name used in option-failure diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn apply(self, cfg: &mut RpcConfig) -> Result<(), ConfigError> {
        (self.apply)(cfg)
    }
}

impl std::fmt::Debug for ModuleOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleOption")
            .field("name", &self.name)
            .finish()
    }
}

/// Set the listen address.
pub fn bind(addr: impl Into<String>) -> ModuleOption {
    let addr = addr.into();
    ModuleOption::new("bind", move |cfg| {
        if addr.is_empty() {
            return Err(ConfigError::Option {
                option: "bind",
                reason: "address must not be empty".to_string(),
            });
        }
        cfg.bind = addr;
        Ok(())
    })
}

/// Set the identity presented to peers.
pub fn advertise_name(name: impl Into<String>) -> ModuleOption {
    let name = name.into();
    ModuleOption::new("advertise_name", move |cfg| {
        if name.is_empty() {
            return Err(ConfigError::Option {
                option: "advertise_name",
                reason: "name must not be empty".to_string(),
            });
        }
        cfg.advertise_name = name;
        Ok(())
    })
}
