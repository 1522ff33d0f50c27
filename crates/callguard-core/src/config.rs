use crate::retry::RetryPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Dispatch parameters (optional `[dispatch]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Timeout for a single HTTP exchange, in seconds.
    pub timeout_secs: u64,
    /// Limit on establishing the TCP/TLS connection, in seconds.
    pub connect_timeout_secs: u64,
    /// Maximum number of attempts per call (including the first).
    pub max_attempts: u32,
    /// Wait in seconds after a 202/503 before trying again.
    pub busy_delay_secs: u64,
    /// Optional cap on a server's `Retry-After`, in seconds. Unset trusts the server.
    pub max_retry_after_secs: Option<u64>,
    /// Worker threads running delayed retries.
    pub scheduler_threads: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 15,
            max_attempts: 5,
            busy_delay_secs: 5,
            max_retry_after_secs: None,
            scheduler_threads: 2,
        }
    }
}

impl DispatchConfig {
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            timeout: Duration::from_secs(self.timeout_secs),
            busy_delay: Duration::from_secs(self.busy_delay_secs),
            max_retry_after: self.max_retry_after_secs.map(Duration::from_secs),
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Global configuration loaded from `~/.config/callguard/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallguardConfig {
    /// Base URL prepended to relative paths given on the command line.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Optional dispatch section; if missing, built-in defaults are used.
    #[serde(default)]
    pub dispatch: Option<DispatchConfig>,
}

impl CallguardConfig {
    /// Effective dispatch settings.
    pub fn dispatch(&self) -> DispatchConfig {
        self.dispatch.clone().unwrap_or_default()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("callguard")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<CallguardConfig> {
    load_or_init_at(&config_path()?)
}

pub fn load_or_init_at(path: &Path) -> Result<CallguardConfig> {
    if !path.exists() {
        let default_cfg = CallguardConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("read config: {}", path.display()))?;
    let cfg: CallguardConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}
