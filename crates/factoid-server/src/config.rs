//! Runtime server configuration.
//!
//! Layered, lowest priority first: built-in defaults, the optional TOML file,
//! then `FACTOID_*` environment variables.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use serde::Deserialize;

/// Value of `store_path` that selects an in-memory database.
pub const IN_MEMORY: &str = ":memory:";

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                String,
  pub port:                u16,
  pub store_path:          PathBuf,
  /// Shared secret for mutating routes; empty disables the check.
  pub auth_secret:         String,
  pub shutdown_grace_secs: u64,
  pub metrics_enabled:     bool,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                "0.0.0.0".to_string(),
      port:                8080,
      store_path:          PathBuf::from(IN_MEMORY),
      auth_secret:         String::new(),
      shutdown_grace_secs: 3,
      metrics_enabled:     true,
    }
  }
}

impl ServerConfig {
  /// Read `path` (if it exists) and the environment.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("FACTOID"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn shutdown_grace(&self) -> Duration { Duration::from_secs(self.shutdown_grace_secs) }

  pub fn is_in_memory(&self) -> bool { self.store_path.as_os_str() == IN_MEMORY }

  /// `store_path` with a leading `~/` expanded to the user's home directory.
  pub fn resolved_store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }
}

fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
