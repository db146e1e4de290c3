//! Configuration management for the explorer

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{ExplorerError, Result};

pub const DEFAULT_CONFIG_FILE: &str = "explorer.toml";

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub daemon: DaemonConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Where and how to reach the ledger daemon.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DaemonConfig {
    #[serde(default = "default_daemon_url")]
    pub url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    #[serde(default = "default_overview_blocks")]
    pub overview_blocks: u64,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            url: default_daemon_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            static_dir: default_static_dir(),
            overview_blocks: default_overview_blocks(),
        }
    }
}

impl DaemonConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Points the daemon URL at `localhost:<port>`.
    pub fn with_local_port(mut self, port: u16) -> Self {
        self.url = format!("http://localhost:{}", port);
        self
    }
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.daemon.url.trim();
        if url.is_empty() {
            return Err(ExplorerError::Config("daemon.url must be set".to_string()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ExplorerError::Config(format!(
                "daemon.url must be an http(s) URL, got {:?}",
                url
            )));
        }
        if self.daemon.timeout_secs == 0 {
            return Err(ExplorerError::Config(
                "daemon.timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Loads `path`, or `explorer.toml` in the working directory when no path is
/// given. A missing default file yields the built-in defaults; a missing
/// explicit file is an error.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let (path, explicit) = match path {
        Some(p) => (p, true),
        None => (Path::new(DEFAULT_CONFIG_FILE), false),
    };

    let config_str = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if !explicit && e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => {
            return Err(ExplorerError::Config(format!(
                "failed to read {}: {}",
                path.display(),
                e
            )))
        }
    };

    if config_str.trim().is_empty() {
        return Ok(Config::default());
    }
    Config::from_toml(&config_str)
}

fn default_daemon_url() -> String {
    "http://localhost:9980".to_string()
}

fn default_user_agent() -> String {
    "Sia-Agent".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_port() -> u16 {
    9983
}

fn default_static_dir() -> String {
    "./client/src/".to_string()
}

fn default_overview_blocks() -> u64 {
    10
}
