use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Invalid knobs caught before a job is constructed. Fatal: no network or
/// filesystem work starts when one of these is returned.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("thread count must be at least 1")]
    InvalidConcurrency,
    #[error("extension filter contains an empty entry")]
    EmptyFilterEntry,
}

/// Global configuration loaded from `~/.config/hfdl/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HfdlConfig {
    /// Default number of parallel download threads.
    pub default_threads: usize,
    /// Base URL of the dataset repository host.
    pub base_url: String,
    /// Hard per-transfer timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HfdlConfig {
    fn default() -> Self {
        Self {
            default_threads: 8,
            base_url: "https://huggingface.co".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Rejects a worker pool size of zero.
pub fn validate_threads(threads: usize) -> Result<(), ConfigError> {
    if threads == 0 {
        return Err(ConfigError::InvalidConcurrency);
    }
    Ok(())
}

/// Rejects a filter list with empty entries (e.g. from `--filter "png,,json"`).
pub fn validate_filter(extensions: &[String]) -> Result<(), ConfigError> {
    if extensions.iter().any(|e| e.trim().is_empty()) {
        return Err(ConfigError::EmptyFilterEntry);
    }
    Ok(())
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("hfdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<HfdlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = HfdlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: HfdlConfig = toml::from_str(&data)?;
    Ok(cfg)
}
