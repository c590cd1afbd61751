use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::retry::RetryPolicy;

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per request (including the first).
    pub max_attempts: u32,
    /// Fixed delay in seconds before retrying a refused connection.
    pub delay_secs: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            delay_secs: 5.0,
        }
    }
}

/// Global configuration loaded from `~/.config/wbm/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WbmConfig {
    /// Archive service root.
    pub base_url: String,
    /// Pause after every content download, in seconds.
    pub interval_secs: u64,
    /// TCP connect timeout per request, in seconds. Unset leaves curl's default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_timeout_secs: Option<u64>,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetryConfig>,
}

impl Default for WbmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://web.archive.org".to_string(),
            interval_secs: 5,
            connect_timeout_secs: None,
            user_agent: format!("wbm/{}", env!("CARGO_PKG_VERSION")),
            retry: None,
        }
    }
}

impl WbmConfig {
    /// Retry policy from the `[retry]` section, or the default. Fails when
    /// `delay_secs` is not representable as a duration (huge or infinite).
    pub fn retry_policy(&self) -> Result<RetryPolicy> {
        match &self.retry {
            Some(r) => Ok(RetryPolicy {
                max_attempts: r.max_attempts.max(1),
                delay: Duration::try_from_secs_f64(r.delay_secs.max(0.0)).with_context(|| {
                    format!("invalid [retry] delay_secs = {} in config", r.delay_secs)
                })?,
            }),
            None => Ok(RetryPolicy::default()),
        }
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("wbm")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<WbmConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = WbmConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: WbmConfig = toml::from_str(&data)?;
    Ok(cfg)
}
