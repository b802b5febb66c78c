use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::fetcher::FetchOptions;

/// Global configuration loaded from `~/.config/hostgrab/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostgrabConfig {
    /// Per-request bound in seconds (connection setup through last body byte).
    pub timeout_secs: f64,
    /// Directory receiving one file per hostname; relative paths resolve against the CWD.
    pub output_dir: PathBuf,
    /// Optional separate bound on connection setup, in seconds.
    #[serde(default)]
    pub connect_timeout_secs: Option<f64>,
    /// Optional cap on transfers in flight at once (None = every URL at once).
    #[serde(default)]
    pub max_concurrent: Option<usize>,
    /// Follow 3xx redirects. Off by default: the 3xx response itself is the result.
    #[serde(default)]
    pub follow_redirects: bool,
    /// Redirect hop limit when `follow_redirects` is on.
    #[serde(default = "default_max_redirections")]
    pub max_redirections: u32,
}

fn default_max_redirections() -> u32 {
    10
}

impl Default for HostgrabConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10.0,
            output_dir: PathBuf::from("results"),
            connect_timeout_secs: None,
            max_concurrent: None,
            follow_redirects: false,
            max_redirections: default_max_redirections(),
        }
    }
}

impl HostgrabConfig {
    /// Transfer options derived from this config.
    pub fn fetch_options(&self) -> Result<FetchOptions> {
        let timeout = Duration::try_from_secs_f64(self.timeout_secs)
            .with_context(|| format!("invalid timeout_secs {}", self.timeout_secs))?;
        if timeout.is_zero() {
            anyhow::bail!("timeout_secs must be greater than zero");
        }
        let connect_timeout = self
            .connect_timeout_secs
            .map(|s| {
                Duration::try_from_secs_f64(s)
                    .with_context(|| format!("invalid connect_timeout_secs {}", s))
            })
            .transpose()?;
        if self.max_concurrent == Some(0) {
            anyhow::bail!("max_concurrent must be at least 1");
        }
        Ok(FetchOptions {
            timeout,
            connect_timeout,
            follow_redirects: self.follow_redirects,
            max_redirections: self.max_redirections,
            max_concurrent: self.max_concurrent,
        })
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("hostgrab")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<HostgrabConfig> {
    load_or_init_at(&config_path()?)
}

/// Load the config at `path`, creating it with defaults if absent.
///
/// A file that exists but cannot be read or parsed is an error. Failing to
/// write the default file is not: the defaults are still returned.
pub fn load_or_init_at(path: &Path) -> Result<HostgrabConfig> {
    if !path.exists() {
        let default_cfg = HostgrabConfig::default();
        match write_default(path, &default_cfg) {
            Ok(()) => tracing::debug!("created default config at {}", path.display()),
            Err(e) => tracing::warn!("could not create default config: {:#}", e),
        }
        return Ok(default_cfg);
    }
    load_from_path(path)
}

fn write_default(path: &Path, cfg: &HostgrabConfig) -> Result<()> {
    let toml = toml::to_string_pretty(cfg)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, toml).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Load configuration from an explicit file.
pub fn load_from_path(path: &Path) -> Result<HostgrabConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: HostgrabConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
