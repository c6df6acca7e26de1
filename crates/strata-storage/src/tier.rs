//! The tier model: named backing-store roles and the backends that fill
//! them.
//!
//! A [`StorageBackend`] answers one question for an index entry: where are
//! its bytes? `get` returns `None` when this backend has nothing to say for
//! the entry -- a missing hash, a key outside the registered prefix, or any
//! other malformed registration. Callers skip to the next tier on `None`;
//! nothing here is an error.

use std::fmt;
use std::sync::Arc;

use strata_types::{DataIndexEntry, Key};

use crate::fs::Filesystem;
use crate::odb::ObjectDb;

/// A named backing-store role, in fixed probe priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Local cache: cheapest, probed first.
    Cache,
    /// Remote object store.
    Remote,
    /// The dataset's original source location: authoritative, probed last.
    Data,
}

impl Tier {
    /// Probe order: cache, then remote, then data.
    pub const PRIORITY: [Tier; 3] = [Tier::Cache, Tier::Remote, Tier::Data];

    /// The tier's configuration name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Cache => "cache",
            Tier::Remote => "remote",
            Tier::Data => "data",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A physical location: the filesystem holding the bytes and the
/// protocol-native path on it.
pub type Location = (Arc<dyn Filesystem>, String);

/// A backend that resolves entries through a content-addressed object
/// database: the entry's hash is the address.
#[derive(Clone)]
pub struct ObjectStorage {
    /// The key prefix this backend is registered under.
    pub key: Key,
    /// The backing object database.
    pub odb: Arc<ObjectDb>,
}

impl ObjectStorage {
    /// Create an object-database backend registered at `key`.
    pub fn new(key: Key, odb: Arc<ObjectDb>) -> Self {
        Self { key, odb }
    }

    fn get(&self, entry: &DataIndexEntry) -> Option<Location> {
        let hash_info = entry.hash_info.as_ref()?;
        Some((self.odb.fs(), self.odb.address(&hash_info.value)))
    }
}

impl fmt::Debug for ObjectStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectStorage")
            .field("key", &self.key)
            .field("odb", &self.odb)
            .finish()
    }
}

/// A backend that resolves entries to plain files under a path prefix:
/// the entry's key, relative to the registered key, is the address.
#[derive(Clone)]
pub struct FileStorage {
    /// The key prefix this backend is registered under.
    pub key: Key,
    /// The filesystem holding the files.
    pub fs: Arc<dyn Filesystem>,
    /// Path prefix on `fs` that mirrors the registered key.
    pub prefix: String,
}

impl FileStorage {
    /// Create a plain-file backend registered at `key`, mapping to `prefix`
    /// on `fs`.
    pub fn new(key: Key, fs: Arc<dyn Filesystem>, prefix: impl Into<String>) -> Self {
        Self {
            key,
            fs,
            prefix: prefix.into(),
        }
    }

    fn get(&self, entry: &DataIndexEntry) -> Option<Location> {
        let rel = entry.key.relative_to(&self.key)?;
        let path = if rel.is_root() {
            self.prefix.clone()
        } else {
            format!("{}/{}", self.prefix.trim_end_matches('/'), rel)
        };
        Some((Arc::clone(&self.fs), path))
    }
}

impl fmt::Debug for FileStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileStorage")
            .field("key", &self.key)
            .field("protocol", &self.fs.protocol())
            .field("prefix", &self.prefix)
            .finish()
    }
}

/// The closed set of backend variants behind one `get(entry)` capability.
#[derive(Clone, Debug)]
pub enum StorageBackend {
    /// Content-addressed object database.
    Object(ObjectStorage),
    /// Plain files under a path prefix.
    File(FileStorage),
}

impl StorageBackend {
    /// Shorthand for an object-database backend.
    pub fn object(key: Key, odb: Arc<ObjectDb>) -> Self {
        Self::Object(ObjectStorage::new(key, odb))
    }

    /// Shorthand for a plain-file backend.
    pub fn file(key: Key, fs: Arc<dyn Filesystem>, prefix: impl Into<String>) -> Self {
        Self::File(FileStorage::new(key, fs, prefix))
    }

    /// The key prefix this backend is registered under.
    pub fn key(&self) -> &Key {
        match self {
            StorageBackend::Object(s) => &s.key,
            StorageBackend::File(s) => &s.key,
        }
    }

    /// Where this backend holds the entry's bytes, if it can serve the
    /// entry at all. `None` means "try the next tier".
    pub fn get(&self, entry: &DataIndexEntry) -> Option<Location> {
        match self {
            StorageBackend::Object(s) => s.get(entry),
            StorageBackend::File(s) => s.get(entry),
        }
    }

    /// The object-database variant, when this backend is one.
    pub fn as_object(&self) -> Option<&ObjectStorage> {
        match self {
            StorageBackend::Object(s) => Some(s),
            StorageBackend::File(_) => None,
        }
    }
}

/// The backends registered for one key prefix, at most one per tier.
#[derive(Clone, Debug, Default)]
pub struct StorageInfo {
    /// Original data source.
    pub data: Option<StorageBackend>,
    /// Local cache.
    pub cache: Option<StorageBackend>,
    /// Remote object store.
    pub remote: Option<StorageBackend>,
}

impl StorageInfo {
    /// The backend filling `tier`, if registered.
    pub fn by_tier(&self, tier: Tier) -> Option<&StorageBackend> {
        match tier {
            Tier::Cache => self.cache.as_ref(),
            Tier::Remote => self.remote.as_ref(),
            Tier::Data => self.data.as_ref(),
        }
    }
}
