use std::collections::HashMap;

use anyhow::bail;
use anyhow::Result;

use crate::domain::models::Storage;
use crate::domain::models::StorageKey;

/// Storage that lives as long as the process. Writes to any key in `failing`
/// error out, which stands in for a full or read-only disk.
#[derive(Default)]
pub struct MemoryStorage {
    entries: HashMap<StorageKey, String>,
    failing: Vec<StorageKey>,
}

impl MemoryStorage {
    /// From now on, writes to `keys` fail. Entries already stored are kept.
    pub fn fail_on(&mut self, keys: &[StorageKey]) {
        self.failing = keys.to_vec();
    }

    fn check_writable(&self, key: StorageKey) -> Result<()> {
        if self.failing.contains(&key) {
            bail!(format!("storage refused to write {key}"));
        }

        return Ok(());
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: StorageKey) -> Option<String> {
        return self.entries.get(&key).cloned();
    }

    fn set(&mut self, key: StorageKey, value: &str) -> Result<()> {
        self.check_writable(key)?;
        self.entries.insert(key, value.to_string());
        return Ok(());
    }

    fn remove(&mut self, key: StorageKey) -> Result<()> {
        self.check_writable(key)?;
        self.entries.remove(&key);
        return Ok(());
    }
}
