//! Optional config file with monitoring defaults.
//!
//! Looked up at `/etc/rsync-watch.toml`, then
//! `~/.config/rsync-watch/config.toml`. Command-line flags override
//! anything set here.
//!
//! ```toml
//! host_name = "wnas"
//!
//! [nsca]
//! remote_host = "monitor.example.com"
//! port = 5667
//! config = "/etc/send_nsca.cfg"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub host_name: Option<String>,
    #[serde(default)]
    pub nsca: NscaConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NscaConfig {
    pub remote_host: Option<String>,
    pub port: Option<u16>,
    pub config: Option<PathBuf>,
}

/// Candidate config file locations, in priority order.
fn config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/rsync-watch.toml")];
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".config").join("rsync-watch").join("config.toml"));
    }
    paths
}

impl Config {
    /// Load the first config file that exists, or defaults when none does.
    pub fn load() -> Result<Self> {
        for path in config_paths() {
            if path.exists() {
                let content = fs::read_to_string(&path)
                    .with_context(|| format!("Could not read {}", path.display()))?;
                return content
                    .parse()
                    .with_context(|| format!("Invalid config file {}", path.display()));
            }
        }
        Ok(Self::default())
    }
}

impl std::str::FromStr for Config {
    type Err = toml::de::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        toml::from_str(s)
    }
}
