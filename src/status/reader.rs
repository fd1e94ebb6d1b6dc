//! Reader for the health checker's `ip:status` state file.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use crate::registry::RegistryError;

/// Reads the status file produced by the external health checker.
#[derive(Debug, Clone)]
pub struct StatusReader {
    path: PathBuf,
}

impl StatusReader {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Build the current `ip -> status` map. A missing file yields an empty map.
    pub fn read(&self) -> Result<HashMap<String, String>, RegistryError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(parse_status_lines(&content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("Status file {} not found", self.path.display());
                Ok(HashMap::new())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Parse `ip:status` lines, splitting on the first colon.
///
/// Lines without a colon are skipped and later lines override earlier ones.
pub fn parse_status_lines(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .filter_map(|line| line.trim().split_once(':'))
        .map(|(ip, status)| (ip.trim().to_string(), status.trim().to_string()))
        .collect()
}
