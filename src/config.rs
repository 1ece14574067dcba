//! Project configuration loaded from `spec/specflow.toml`.
//!
//! Every field has a default, so a project without the file (or with a
//! partial one) works out of the box. Relative paths resolve against the
//! project root.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::fs::locking::LockPolicy;

pub const CONFIG_FILE: &str = "spec/specflow.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub lock: LockConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// The work-unit JSON document.
    pub work_units: PathBuf,
    /// Directory searched recursively for `*.feature` files.
    pub features: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            work_units: PathBuf::from("spec/work-units.json"),
            features: PathBuf::from("spec/features"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    pub attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for LockConfig {
    fn default() -> Self {
        let policy = LockPolicy::default();
        Self {
            attempts: policy.attempts,
            initial_backoff_ms: policy.initial_backoff.as_millis() as u64,
            max_backoff_ms: policy.max_backoff.as_millis() as u64,
        }
    }
}

impl LockConfig {
    pub fn policy(&self) -> LockPolicy {
        LockPolicy {
            attempts: self.attempts.max(1),
            initial_backoff: Duration::from_millis(self.initial_backoff_ms),
            max_backoff: Duration::from_millis(self.max_backoff_ms.max(self.initial_backoff_ms)),
        }
    }
}

impl Config {
    /// Load `spec/specflow.toml` under `project_root`, or defaults if absent.
    pub fn load(project_root: &Path) -> Result<Self> {
        let path = project_root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::debug!(config = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn work_units_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.paths.work_units)
    }

    pub fn features_dir(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.paths.features)
    }
}
