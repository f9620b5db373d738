use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::system::aggregate::DEFAULT_IGNORED_USERS;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub snapshot: SnapshotConfig,
    pub output: OutputConfig,
    pub host: HostConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    pub cpu_cutoff: f64,
    pub mem_cutoff: f64,
    pub ignored_users: Vec<String>,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        SnapshotConfig {
            cpu_cutoff: 0.5,
            mem_cutoff: 0.0,
            ignored_users: DEFAULT_IGNORED_USERS.iter().map(|u| u.to_string()).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// File path, or `-` for stdout.
    pub destination: String,
    pub delimiter: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            destination: "-".to_string(),
            delimiter: "\t".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub hostname: Option<String>,
    /// Keep only the first DNS label, e.g. `c1-7.cluster.local` -> `c1-7`.
    pub short_hostname: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        HostConfig {
            hostname: None,
            short_hostname: true,
        }
    }
}

impl HostConfig {
    /// The configured name if any, else `detected`, shortened when asked.
    pub fn resolve(&self, detected: Option<String>) -> Option<String> {
        let name = self.hostname.clone().or(detected)?;
        if self.short_hostname {
            name.split('.').next().map(str::to_string)
        } else {
            Some(name)
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("procsnap").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(path = %path.display(), error = %err, "invalid config; using defaults");
            Config::default()
        }),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "unreadable config; using defaults");
            Config::default()
        }
    }
}
