//! CLI configuration management.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/remotefm/config.toml`
//! - Windows: `%APPDATA%/remotefm/config.toml`

use std::path::{Path, PathBuf};

use remotefm_view::SortOrder;
use serde::{Deserialize, Serialize};

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the file manager CGI.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Directory listed when `ls` gets no argument.
    #[serde(default = "default_start_path")]
    pub start_path: String,

    /// Order of listed entries.
    #[serde(default)]
    pub sort: SortOrder,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Tracing filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Where `get` writes files.
    #[serde(default = "default_download_dir")]
    pub download_dir: String,
}

fn default_endpoint() -> String {
    "http://localhost/cgi-bin/filemanager".into()
}

fn default_start_path() -> String {
    "/".into()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_log_filter() -> String {
    "info".into()
}

fn default_download_dir() -> String {
    ".".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            start_path: default_start_path(),
            sort: SortOrder::default(),
            request_timeout_secs: default_request_timeout(),
            log_filter: default_log_filter(),
            download_dir: default_download_dir(),
        }
    }
}

impl Config {
    /// Loads configuration from disk, or creates a default if not found.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&config_path()?)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }
}

/// Returns the platform-specific configuration file path.
fn config_path() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        Ok(PathBuf::from(home)
            .join(".config")
            .join("remotefm")
            .join("config.toml"))
    }

    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        Ok(PathBuf::from(appdata).join("remotefm").join("config.toml"))
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    {
        Ok(PathBuf::from("/tmp/remotefm/config.toml"))
    }
}
