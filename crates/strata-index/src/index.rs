//! The core index structure: an ordered `Key -> Entry` map with tree
//! queries and buffered writes.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::time::SystemTime;

use strata_storage::StorageMap;
use strata_types::{DataIndexEntry, Key};

use crate::error::{IndexError, IndexResult};

/// What kind of node a key addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    /// A file-bearing entry.
    File,
    /// A directory: an entry flagged `isdir`, or an implicit prefix node.
    Directory,
}

/// A descriptor for one node of the logical tree, as returned by
/// [`DataIndex::info`] and [`DataIndex::ls`].
#[derive(Clone, Debug)]
pub struct EntryInfo {
    /// Display name. Defaults to the key rendered as a relative path;
    /// the filesystem façade rewrites it to the queried path.
    pub name: String,
    /// The node's key.
    pub key: Key,
    /// File or directory.
    pub kind: EntryKind,
    /// Size in bytes, when metadata records one.
    pub size: Option<u64>,
    /// Last modification time, when metadata records one.
    pub mtime: Option<SystemTime>,
    /// md5 digest, when the entry's hash uses that algorithm.
    pub md5: Option<String>,
    /// The underlying entry. `None` for implicit directories.
    pub entry: Option<DataIndexEntry>,
}

impl EntryInfo {
    /// Returns `true` if the node is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    fn from_entry(entry: &DataIndexEntry, isdir: bool) -> Self {
        let meta = entry.meta.as_ref();
        Self {
            name: entry.key.to_string(),
            key: entry.key.clone(),
            kind: if isdir {
                EntryKind::Directory
            } else {
                EntryKind::File
            },
            size: if isdir { None } else { meta.and_then(|m| m.size) },
            mtime: meta.and_then(|m| m.mtime),
            md5: entry.md5().map(str::to_string),
            entry: Some(entry.clone()),
        }
    }

    fn implicit_dir(key: Key) -> Self {
        Self {
            name: key.to_string(),
            key,
            kind: EntryKind::Directory,
            size: None,
            mtime: None,
            md5: None,
            entry: None,
        }
    }
}

/// The data index: entries keyed by path components, plus the storage map
/// naming the backing tiers for each subtree.
///
/// Reads see writes immediately; [`DataIndex::insert`] additionally stages
/// the key as pending until [`DataIndex::commit`] persists the batch.
/// Direct in-memory mutation through [`DataIndex::get_mut`] bypasses the
/// write buffer -- the reconciler uses it for carry-forward, where
/// persistence is the caller's responsibility.
pub struct DataIndex {
    entries: BTreeMap<Key, DataIndexEntry>,
    storage_map: StorageMap,
    pending: Vec<Key>,
    commits: u64,
}

impl DataIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            storage_map: StorageMap::new(),
            pending: Vec::new(),
            commits: 0,
        }
    }

    /// Build an index from entries, keyed by each entry's own key. The
    /// entries are considered already persisted (nothing pending).
    pub fn from_entries(entries: impl IntoIterator<Item = DataIndexEntry>) -> Self {
        let mut index = Self::new();
        for entry in entries {
            index.entries.insert(entry.key.clone(), entry);
        }
        index
    }

    /// The storage registry for this index.
    pub fn storage_map(&self) -> &StorageMap {
        &self.storage_map
    }

    /// Mutable access to the storage registry, for tier registration.
    pub fn storage_map_mut(&mut self) -> &mut StorageMap {
        &mut self.storage_map
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the index has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get an entry by key.
    pub fn get(&self, key: &Key) -> Option<&DataIndexEntry> {
        self.entries.get(key)
    }

    /// Mutable access to an entry, bypassing the write buffer.
    pub fn get_mut(&mut self, key: &Key) -> Option<&mut DataIndexEntry> {
        self.entries.get_mut(key)
    }

    /// Write an entry under its own key and stage it as pending.
    pub fn insert(&mut self, entry: DataIndexEntry) {
        let key = entry.key.clone();
        self.entries.insert(key.clone(), entry);
        self.pending.push(key);
    }

    /// Iterate all `(key, entry)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&Key, &DataIndexEntry)> {
        self.entries.iter()
    }

    /// All keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.entries.keys()
    }

    /// Number of writes staged since the last commit.
    pub fn pending_writes(&self) -> usize {
        self.pending.len()
    }

    /// Number of commits issued over this index's lifetime.
    pub fn commits(&self) -> u64 {
        self.commits
    }

    /// Persist all pending writes as one batch.
    pub fn commit(&mut self) -> IndexResult<()> {
        let flushed = self.pending.len();
        self.pending.clear();
        self.commits += 1;
        tracing::debug!(flushed, "committed index writes");
        Ok(())
    }

    /// Returns `true` if any stored key is a strict descendant of `key`.
    fn has_children(&self, key: &Key) -> bool {
        self.entries
            .range((Bound::Excluded(key), Bound::Unbounded))
            .next()
            .is_some_and(|(k, _)| k.starts_with(key))
    }

    fn entry_is_dir(&self, entry: &DataIndexEntry) -> bool {
        entry.is_dir()
            || entry
                .hash_info
                .as_ref()
                .is_some_and(|h| h.is_dir_digest())
            || self.has_children(&entry.key)
    }

    /// Describe the node at `key`.
    ///
    /// The root and proper prefixes of stored keys are reported as
    /// directories even without an explicit entry. Fails with
    /// [`IndexError::KeyNotFound`] for keys outside the tree.
    pub fn info(&self, key: &Key) -> IndexResult<EntryInfo> {
        if let Some(entry) = self.entries.get(key) {
            return Ok(EntryInfo::from_entry(entry, self.entry_is_dir(entry)));
        }
        if key.is_root() || self.has_children(key) {
            return Ok(EntryInfo::implicit_dir(key.clone()));
        }
        Err(IndexError::KeyNotFound(key.clone()))
    }

    /// List the direct children of the directory at `key`.
    ///
    /// Children are explicit entries one level down plus implicit
    /// directories synthesized from deeper keys. Fails with
    /// [`IndexError::NotADirectory`] when `key` addresses a file and
    /// [`IndexError::KeyNotFound`] when it addresses nothing.
    pub fn ls(&self, key: &Key) -> IndexResult<Vec<EntryInfo>> {
        let info = self.info(key)?;
        if info.kind != EntryKind::Directory {
            return Err(IndexError::NotADirectory(key.clone()));
        }

        let mut children: BTreeMap<String, EntryInfo> = BTreeMap::new();
        for (k, entry) in self.entries.range((Bound::Excluded(key), Bound::Unbounded)) {
            if !k.starts_with(key) {
                break;
            }
            let name = k.parts()[key.len()].clone();
            if k.len() == key.len() + 1 {
                children.insert(name, EntryInfo::from_entry(entry, self.entry_is_dir(entry)));
            } else {
                children
                    .entry(name.clone())
                    .or_insert_with(|| EntryInfo::implicit_dir(key.child(name)));
            }
        }
        Ok(children.into_values().collect())
    }
}

impl Default for DataIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DataIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataIndex")
            .field("entries", &self.entries.len())
            .field("pending", &self.pending.len())
            .field("commits", &self.commits)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_types::{HashInfo, Meta};

    fn sample_index() -> DataIndex {
        DataIndex::from_entries([
            DataIndexEntry::new(Key::from(["foo"]))
                .with_meta(Meta::file(4))
                .with_hash_info(HashInfo::new("md5", "d3b07384d113edec49eaa6238ad5ff00")),
            DataIndexEntry::new(Key::from(["data"])).with_meta(Meta::directory()),
            DataIndexEntry::new(Key::from(["data", "bar"])).with_meta(Meta::file(4)),
            DataIndexEntry::new(Key::from(["data", "baz"])).with_meta(Meta::file(4)),
        ])
    }

    #[test]
    fn info_on_file_entry() {
        let index = sample_index();
        let info = index.info(&Key::from(["foo"])).unwrap();
        assert_eq!(info.kind, EntryKind::File);
        assert_eq!(info.size, Some(4));
        assert_eq!(info.md5.as_deref(), Some("d3b07384d113edec49eaa6238ad5ff00"));
        assert!(info.entry.is_some());
    }

    #[test]
    fn info_on_directory_entry() {
        let index = sample_index();
        let info = index.info(&Key::from(["data"])).unwrap();
        assert_eq!(info.kind, EntryKind::Directory);
        assert_eq!(info.size, None);
    }

    #[test]
    fn info_on_root_is_an_implicit_directory() {
        let index = sample_index();
        let info = index.info(&Key::root()).unwrap();
        assert_eq!(info.kind, EntryKind::Directory);
        assert!(info.entry.is_none());
    }

    #[test]
    fn info_synthesizes_prefix_directories() {
        let index = DataIndex::from_entries([DataIndexEntry::new(Key::from([
            "deep", "nested", "file",
        ]))]);
        let info = index.info(&Key::from(["deep"])).unwrap();
        assert_eq!(info.kind, EntryKind::Directory);
        let info = index.info(&Key::from(["deep", "nested"])).unwrap();
        assert_eq!(info.kind, EntryKind::Directory);
    }

    #[test]
    fn info_on_missing_key_errors() {
        let index = sample_index();
        assert!(matches!(
            index.info(&Key::from(["missing"])),
            Err(IndexError::KeyNotFound(_))
        ));
    }

    #[test]
    fn dir_digest_marks_directory() {
        let index = DataIndex::from_entries([DataIndexEntry::new(Key::from(["tree"]))
            .with_hash_info(HashInfo::new("md5", "1f69c66028c35037e8bf67e5bc4ceb6a.dir"))]);
        let info = index.info(&Key::from(["tree"])).unwrap();
        assert_eq!(info.kind, EntryKind::Directory);
    }

    #[test]
    fn ls_root_lists_top_level() {
        let index = sample_index();
        let children = index.ls(&Key::root()).unwrap();
        let names: Vec<&str> = children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["data", "foo"]);
    }

    #[test]
    fn ls_directory_lists_children() {
        let index = sample_index();
        let children = index.ls(&Key::from(["data"])).unwrap();
        let names: Vec<&str> = children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["data/bar", "data/baz"]);
        assert!(children.iter().all(|c| c.kind == EntryKind::File));
    }

    #[test]
    fn ls_includes_implicit_directories() {
        let index = DataIndex::from_entries([
            DataIndexEntry::new(Key::from(["top", "sub", "file"])),
            DataIndexEntry::new(Key::from(["top", "plain"])),
        ]);
        let children = index.ls(&Key::from(["top"])).unwrap();
        assert_eq!(children.len(), 2);
        let sub = children.iter().find(|c| c.key.last() == Some("sub")).unwrap();
        assert_eq!(sub.kind, EntryKind::Directory);
        assert!(sub.entry.is_none());
    }

    #[test]
    fn ls_on_file_is_not_a_directory() {
        let index = sample_index();
        assert!(matches!(
            index.ls(&Key::from(["foo"])),
            Err(IndexError::NotADirectory(_))
        ));
    }

    #[test]
    fn ls_on_missing_key_errors() {
        let index = sample_index();
        assert!(matches!(
            index.ls(&Key::from(["missing"])),
            Err(IndexError::KeyNotFound(_))
        ));
    }

    #[test]
    fn insert_stages_pending_until_commit() {
        let mut index = DataIndex::new();
        assert_eq!(index.pending_writes(), 0);

        index.insert(DataIndexEntry::new(Key::from(["a"])));
        index.insert(DataIndexEntry::new(Key::from(["b"])));
        assert_eq!(index.pending_writes(), 2);
        assert_eq!(index.len(), 2);
        assert_eq!(index.commits(), 0);

        index.commit().unwrap();
        assert_eq!(index.pending_writes(), 0);
        assert_eq!(index.commits(), 1);
    }

    #[test]
    fn get_mut_bypasses_write_buffer() {
        let mut index = sample_index();
        index
            .get_mut(&Key::from(["foo"]))
            .unwrap()
            .hash_info = Some(HashInfo::new("sha256", "abc"));
        assert_eq!(index.pending_writes(), 0);
        assert_eq!(
            index.get(&Key::from(["foo"])).unwrap().hash_info,
            Some(HashInfo::new("sha256", "abc"))
        );
    }

    #[test]
    fn from_entries_has_nothing_pending() {
        let index = sample_index();
        assert_eq!(index.pending_writes(), 0);
        assert_eq!(index.commits(), 0);
    }
}
