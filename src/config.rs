//! Configuration module for hostboard.
//!
//! Loads configuration from environment variables with sensible defaults.

use std::env;
use std::path::PathBuf;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP port for the web server (default: 5000)
    pub http_port: u16,
    /// Path to the JSON host registry
    pub hosts_file: PathBuf,
    /// Path to the status file written by the health checker
    pub state_file: PathBuf,
    /// Directory of static UI assets, served for non-API paths when set
    pub ui_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: 5000,
            hosts_file: PathBuf::from("/opt/hospital-dashboard/config/hosts.json"),
            state_file: PathBuf::from("/opt/hospital-monitor/last_state.txt"),
            ui_dir: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `HOSTBOARD_HTTP_PORT`: HTTP port (default: 5000)
    /// - `HOSTBOARD_HOSTS_FILE`: host registry path
    /// - `HOSTBOARD_STATE_FILE`: health checker status file path
    /// - `HOSTBOARD_UI_DIR`: static UI directory (default: unset)
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(port_str) = lookup("HOSTBOARD_HTTP_PORT") {
            match port_str.parse() {
                Ok(port) => cfg.http_port = port,
                Err(_) => tracing::warn!("Ignoring invalid HOSTBOARD_HTTP_PORT: {}", port_str),
            }
        }

        if let Some(path) = lookup("HOSTBOARD_HOSTS_FILE").filter(|p| !p.is_empty()) {
            cfg.hosts_file = PathBuf::from(path);
        }

        if let Some(path) = lookup("HOSTBOARD_STATE_FILE").filter(|p| !p.is_empty()) {
            cfg.state_file = PathBuf::from(path);
        }

        if let Some(dir) = lookup("HOSTBOARD_UI_DIR").filter(|d| !d.is_empty()) {
            cfg.ui_dir = Some(PathBuf::from(dir));
        }

        cfg
    }
}
