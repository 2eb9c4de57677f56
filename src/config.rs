//! Connector configuration
//!
//! Loaded from an optional TOML file; missing keys fall back to defaults.
//! Command line flags override individual values after loading.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// How much work a script call is expected to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallClass {
    /// One object read or written
    Single,
    /// One item of a batch
    Batch,
    /// A read over the whole database
    FullScan,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    pub single_secs: u64,
    pub batch_secs: u64,
    pub full_scan_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            single_secs: 30,
            batch_secs: 60,
            full_scan_secs: 300,
        }
    }
}

impl Timeouts {
    pub fn for_class(&self, class: CallClass) -> Duration {
        let secs = match class {
            CallClass::Single => self.single_secs,
            CallClass::Batch => self.batch_secs,
            CallClass::FullScan => self.full_scan_secs,
        };
        Duration::from_secs(secs.max(1))
    }
}

/// Guard against destructive operations on a real database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyConfig {
    pub enabled: bool,
    /// Case-insensitive substring the open document's name must contain
    pub database_marker: String,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            database_marker: "test".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Application name scripts are addressed to
    pub application: String,
    /// Path or name of the osascript binary
    pub osascript: String,
    /// Re-read updated tasks and report fields that did not stick
    pub verify_writes: bool,
    pub timeouts: Timeouts,
    pub safety: SafetyConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            application: "OmniFocus".to_string(),
            osascript: "osascript".to_string(),
            verify_writes: false,
            timeouts: Timeouts::default(),
            safety: SafetyConfig::default(),
        }
    }
}

impl Config {
    /// Load from `path`, or use defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.application.trim().is_empty() {
            anyhow::bail!("application must not be empty");
        }
        if self.osascript.trim().is_empty() {
            anyhow::bail!("osascript must not be empty");
        }
        if self.safety.enabled && self.safety.database_marker.trim().is_empty() {
            anyhow::bail!("safety.database_marker must not be empty when safety is enabled");
        }
        Ok(())
    }
}
