use serde::{Deserialize, Serialize};

use crate::hash::HashInfo;
use crate::key::Key;
use crate::meta::Meta;

/// The value associated with a key in a data index.
///
/// Entries are created and mutated by the index engine during scans; the
/// resolver only reads them, and the reconciler rewrites `hash_info` and
/// `meta` for specific keys.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataIndexEntry {
    /// The entry's own key, kept on the entry for convenience.
    pub key: Key,
    /// On-disk metadata, when known.
    pub meta: Option<Meta>,
    /// Content hash, when computed.
    pub hash_info: Option<HashInfo>,
}

impl DataIndexEntry {
    /// A bare entry with no metadata or hash.
    pub fn new(key: Key) -> Self {
        Self {
            key,
            meta: None,
            hash_info: None,
        }
    }

    /// Attach metadata.
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Attach a content hash.
    pub fn with_hash_info(mut self, hash_info: HashInfo) -> Self {
        self.hash_info = Some(hash_info);
        self
    }

    /// Returns `true` if the entry's metadata marks it as a directory.
    pub fn is_dir(&self) -> bool {
        self.meta.as_ref().is_some_and(|m| m.isdir)
    }

    /// The md5 digest, when the entry's hash uses that algorithm.
    pub fn md5(&self) -> Option<&str> {
        self.hash_info
            .as_ref()
            .filter(|h| h.is_md5())
            .map(|h| h.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_entry_is_not_a_directory() {
        let entry = DataIndexEntry::new(Key::from(["foo"]));
        assert!(!entry.is_dir());
        assert_eq!(entry.md5(), None);
    }

    #[test]
    fn directory_meta_marks_entry() {
        let entry = DataIndexEntry::new(Key::from(["data"])).with_meta(Meta::directory());
        assert!(entry.is_dir());
    }

    #[test]
    fn md5_requires_md5_algorithm() {
        let md5 = DataIndexEntry::new(Key::from(["a"]))
            .with_hash_info(HashInfo::new("md5", "d3b07384d113edec49eaa6238ad5ff00"));
        assert_eq!(md5.md5(), Some("d3b07384d113edec49eaa6238ad5ff00"));

        let sha = DataIndexEntry::new(Key::from(["b"]))
            .with_hash_info(HashInfo::new("sha256", "abc"));
        assert_eq!(sha.md5(), None);
    }

    #[test]
    fn serde_roundtrip() {
        let entry = DataIndexEntry::new(Key::from(["data", "bar"]))
            .with_meta(Meta::file(4))
            .with_hash_info(HashInfo::new("md5", "abc"));
        let json = serde_json::to_string(&entry).unwrap();
        let parsed: DataIndexEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, parsed);
    }
}
