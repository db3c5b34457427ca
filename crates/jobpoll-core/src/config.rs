use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::engine::PollPolicy;

/// Client configuration, fixed at construction time. Polling frequency and
/// retry limits live here (not on the call sites) so the rate at which the
/// status endpoint gets hit stays controlled in one place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the job server (the client polls `<base_url>/status`).
    pub base_url: String,
    /// Initial polling interval in seconds (e.g. 0.5 = 500ms).
    pub initial_interval_secs: f64,
    /// Multiplicative backoff factor applied after each transient failure.
    pub backoff_factor: f64,
    /// Upper bound on the backoff interval in seconds.
    pub max_interval_secs: u64,
    /// Maximum number of retries before giving up with a soft `pending`;
    /// absent = poll forever.
    #[serde(default)]
    pub max_retries: Option<u32>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            initial_interval_secs: 1.0,
            backoff_factor: 2.0,
            max_interval_secs: 30,
            max_retries: None,
        }
    }
}

impl ClientConfig {
    /// Converts the file-level settings into the engine's policy. The
    /// pending-jitter bounds are not part of the config surface and keep
    /// their built-in defaults.
    pub fn to_policy(&self) -> PollPolicy {
        PollPolicy {
            initial: Duration::from_secs_f64(self.initial_interval_secs.max(0.0)),
            factor: self.backoff_factor,
            max: Duration::from_secs(self.max_interval_secs),
            max_retries: self.max_retries,
            ..PollPolicy::default()
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("jobpoll")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ClientConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ClientConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: ClientConfig = toml::from_str(&data)?;
    Ok(cfg)
}
