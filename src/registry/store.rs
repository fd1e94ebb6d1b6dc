//! JSON file store for the host registry.

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::models::HostRecord;

/// Registry error types.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed registry document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    DuplicateKey(String),
    #[error("{0}")]
    NotFound(String),
}

#[derive(Deserialize)]
struct RegistryDocument {
    #[serde(default)]
    hosts: Vec<HostRecord>,
}

#[derive(Serialize)]
struct RegistryDocumentRef<'a> {
    hosts: &'a [HostRecord],
}

/// Whole-document store backed by a single JSON file.
///
/// Every `load` reads the full file and every `save` replaces it. Nothing is
/// cached between calls.
#[derive(Debug, Clone)]
pub struct RegistryStore {
    path: PathBuf,
}

impl RegistryStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the backing document currently exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read all host records in stored order.
    ///
    /// A missing file is an empty registry, not an error.
    pub fn load(&self) -> Result<Vec<HostRecord>, RegistryError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let doc: RegistryDocument = serde_json::from_str(&content)?;
        Ok(doc.hosts)
    }

    /// Replace the document with `records`, creating parent directories first.
    ///
    /// The new content is written to a sibling temp file and renamed into
    /// place, so readers never observe a half-written document.
    pub fn save(&self, records: &[HostRecord]) -> Result<(), RegistryError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut json = serde_json::to_string_pretty(&RegistryDocumentRef { hosts: records })?;
        json.push('\n');

        let tmp = self.temp_path();
        fs::write(&tmp, json)?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        tracing::debug!("Saved {} hosts to {}", records.len(), self.path.display());
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("hosts.json"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
