use anyhow::Result;
use strum::EnumIter;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum StorageKey {
    Username,
    AccessToken,
    Theme,
}

/// String key-value storage that outlives the process, the equivalent of a
/// browser's local storage.
pub trait Storage {
    fn get(&self, key: StorageKey) -> Option<String>;

    fn set(&mut self, key: StorageKey, value: &str) -> Result<()>;

    /// Removing a missing key is not an error.
    fn remove(&mut self, key: StorageKey) -> Result<()>;
}

pub type StorageBox = Box<dyn Storage + Send + Sync>;
