//! External configuration override sources.
//!
//! A source supplies per-module override fragments keyed by
//! `modules.<module-name>`. It is passed into the resolver as an explicit
//! dependency; there is no process-global configuration state.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::config::schema::ConfigFragment;
use crate::config::ConfigError;

/// Supplies override fragments for module configuration.
pub trait ConfigSource: Send + Sync {
    /// Fetch the fragment for `modules.<module>`, if one is present.
    fn module_fragment(&self, module: &str) -> Result<Option<ConfigFragment>, ConfigError>;
}

/// TOML file shape consumed by [`FileSource`].
#[derive(Debug, Default, Deserialize)]
struct SourceFile {
    #[serde(default)]
    modules: HashMap<String, ConfigFragment>,
}

/// Override source backed by a TOML file with `[modules.<name>]` tables.
///
/// The file is read and parsed once at load time; the module lifetime never
/// re-reads it (configuration is not hot-reloadable).
#[derive(Debug)]
pub struct FileSource {
    modules: HashMap<String, ConfigFragment>,
}

impl FileSource {
    /// Load and parse an override file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let file: SourceFile = toml::from_str(&content)?;
        Ok(Self {
            modules: file.modules,
        })
    }
}

impl ConfigSource for FileSource {
    fn module_fragment(&self, module: &str) -> Result<Option<ConfigFragment>, ConfigError> {
        Ok(self.modules.get(module).cloned())
    }
}

/// In-memory override source for tests and embedding hosts.
#[derive(Debug, Default)]
pub struct StaticSource {
    modules: HashMap<String, ConfigFragment>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fragment for `modules.<module>`.
    pub fn with_fragment(mut self, module: impl Into<String>, fragment: ConfigFragment) -> Self {
        self.modules.insert(module.into(), fragment);
        self
    }
}

impl ConfigSource for StaticSource {
    fn module_fragment(&self, module: &str) -> Result<Option<ConfigFragment>, ConfigError> {
        Ok(self.modules.get(module).cloned())
    }
}
