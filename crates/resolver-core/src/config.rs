//! Configuration management.
//!
//! Loads configuration from ${RESOLVER_HOME}/config.toml with defaults for
//! anything missing.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::state::DEFAULT_DELAY_MS;

/// Settings for the interactive demo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoConfig {
    /// Simulated latency of the fake computation (milliseconds).
    pub latency_ms: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self { latency_ms: 800 }
    }
}

impl DemoConfig {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Grace period before the loading indicator appears (milliseconds).
    /// Zero or negative shows it immediately.
    pub delay_ms: i64,
    pub demo: DemoConfig,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_DELAY_MS,
            demo: DemoConfig::default(),
        }
    }
}

pub mod paths {
    //! Path resolution for the config directory.
    //!
    //! RESOLVER_HOME resolution order:
    //! 1. RESOLVER_HOME environment variable (if set)
    //! 2. ~/.config/resolver (default)

    use std::env;
    use std::path::PathBuf;

    use anyhow::{Context, Result};

    /// Returns the resolver home directory.
    ///
    /// # Errors
    /// Returns an error if `RESOLVER_HOME` is unset and the home directory
    /// cannot be determined.
    pub fn resolver_home() -> Result<PathBuf> {
        if let Ok(home) = env::var("RESOLVER_HOME") {
            return Ok(PathBuf::from(home));
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("resolver"))
            .context("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    ///
    /// # Errors
    /// Returns an error if the resolver home cannot be determined.
    pub fn config_path() -> Result<PathBuf> {
        Ok(resolver_home()?.join("config.toml"))
    }
}

impl ResolverConfig {
    /// Loads configuration from the default path.
    ///
    /// # Errors
    /// Returns an error if the path cannot be resolved or the file is invalid.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path()?)
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if the file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    /// Delay in the form props expect.
    pub fn delay(&self) -> Option<i64> {
        Some(self.delay_ms)
    }

    /// Renders the config as TOML.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
