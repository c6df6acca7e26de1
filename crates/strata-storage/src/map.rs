use std::collections::BTreeMap;

use strata_types::Key;

use crate::tier::{StorageBackend, StorageInfo};

/// Per-key-prefix registry of backing tiers.
///
/// Backends register under a key prefix; lookup finds the registration
/// with the longest prefix of the queried key, so a backend registered at
/// the root serves the whole tree unless a deeper registration shadows it.
#[derive(Debug, Default)]
pub struct StorageMap {
    map: BTreeMap<Key, StorageInfo>,
}

impl StorageMap {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered prefixes.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Register a cache-tier backend under its own key prefix.
    pub fn add_cache(&mut self, storage: StorageBackend) {
        let key = storage.key().clone();
        self.map.entry(key).or_default().cache = Some(storage);
    }

    /// Register a remote-tier backend under its own key prefix.
    pub fn add_remote(&mut self, storage: StorageBackend) {
        let key = storage.key().clone();
        self.map.entry(key).or_default().remote = Some(storage);
    }

    /// Register a data-tier backend under its own key prefix.
    pub fn add_data(&mut self, storage: StorageBackend) {
        let key = storage.key().clone();
        self.map.entry(key).or_default().data = Some(storage);
    }

    /// The registration covering `key`: the longest registered prefix.
    pub fn get(&self, key: &Key) -> Option<&StorageInfo> {
        for prefix in key.prefixes_desc() {
            if let Some(info) = self.map.get(&prefix) {
                return Some(info);
            }
        }
        None
    }

    /// The registration at exactly `prefix`, ignoring ancestors.
    pub fn get_exact(&self, prefix: &Key) -> Option<&StorageInfo> {
        self.map.get(prefix)
    }
}
