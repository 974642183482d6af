#[cfg(test)]
#[path = "file_test.rs"]
mod tests;

use std::collections::BTreeMap;
use std::fs;
use std::path;

use anyhow::Result;

use crate::domain::models::Storage;
use crate::domain::models::StorageKey;

/// Storage persisted as a flat JSON object. Every write is flushed to disk
/// straight away so a crash never loses a login.
pub struct FileStorage {
    path: path::PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStorage {
    pub fn open(path: path::PathBuf) -> Result<FileStorage> {
        let mut entries = BTreeMap::new();
        if path.exists() {
            let payload = fs::read_to_string(&path)?;
            if !payload.trim().is_empty() {
                // A damaged file is treated like an empty one, the next write
                // replaces it.
                match serde_json::from_str(&payload) {
                    Ok(parsed) => entries = parsed,
                    Err(err) => {
                        tracing::warn!(error = ?err, path = ?path, "storage file is corrupt, starting empty");
                    }
                }
            }
        }

        return Ok(FileStorage { path, entries });
    }

    pub fn path(&self) -> &path::Path {
        return &self.path;
    }

    /// Drops every entry and rewrites the file, whatever it held before.
    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        return self.flush();
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let payload = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, payload)?;

        tracing::debug!(path = ?self.path, keys = self.entries.len(), "storage flushed");
        return Ok(());
    }
}

impl Storage for FileStorage {
    fn get(&self, key: StorageKey) -> Option<String> {
        return self.entries.get(&key.to_string()).cloned();
    }

    fn set(&mut self, key: StorageKey, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        return self.flush();
    }

    fn remove(&mut self, key: StorageKey) -> Result<()> {
        if self.entries.remove(&key.to_string()).is_none() {
            return Ok(());
        }

        return self.flush();
    }
}
