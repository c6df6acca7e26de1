//! The virtual filesystem façade: tiered resolution, cache
//! materialization, and transfers.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use strata_index::{DataIndex, EntryInfo, IndexError};
use strata_storage::{transfer, Filesystem, ProgressCallback, StorageBackend, Tier};

use crate::error::{FsError, FsResult};
use crate::path::PathMapper;

/// The outcome of resolving a logical path to physical bytes.
#[derive(Clone)]
pub struct Resolved {
    /// The tier that won the probe.
    pub tier: Tier,
    /// The backend that served the entry.
    pub storage: StorageBackend,
    /// The cache-tier backend covering the entry, for materialization.
    pub cache: Option<StorageBackend>,
    /// The filesystem holding the bytes.
    pub fs: Arc<dyn Filesystem>,
    /// The protocol-native path on `fs`.
    pub fs_path: String,
}

impl std::fmt::Debug for Resolved {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolved")
            .field("tier", &self.tier)
            .field("protocol", &self.fs.protocol())
            .field("fs_path", &self.fs_path)
            .finish()
    }
}

/// Filesystem-style access to the entries of a [`DataIndex`].
///
/// Paths are logical: a single separator, an explicit root marker, resolved
/// against the index tree rather than any physical disk. Reads go through
/// the tiered resolver; which physical store serves a path can change
/// between calls as tiers fill or empty.
pub struct DataFileSystem {
    index: DataIndex,
    path: PathMapper,
}

impl DataFileSystem {
    /// Wrap an index in a filesystem surface.
    pub fn new(index: DataIndex) -> Self {
        Self {
            index,
            path: PathMapper::new(),
        }
    }

    /// The underlying index.
    pub fn index(&self) -> &DataIndex {
        &self.index
    }

    /// Mutable access to the underlying index.
    pub fn index_mut(&mut self) -> &mut DataIndex {
        &mut self.index
    }

    /// Unwrap back into the index.
    pub fn into_index(self) -> DataIndex {
        self.index
    }

    /// Describe the node at `path`. The returned descriptor's `name` is
    /// always the queried path string.
    pub fn info(&self, path: &str) -> FsResult<EntryInfo> {
        let key = self.path.key(path);
        let mut info = self.index.info(&key).map_err(|err| index_err(err, path))?;
        info.name = path.to_string();
        Ok(info)
    }

    /// Returns `true` if `path` addresses a node of the tree.
    pub fn exists(&self, path: &str) -> bool {
        self.info(path).is_ok()
    }

    /// Returns `true` if `path` addresses a directory.
    pub fn is_dir(&self, path: &str) -> bool {
        self.info(path).map(|info| info.is_dir()).unwrap_or(false)
    }

    /// List the directory at `path` with full descriptors. Child names are
    /// path-joined with the queried path.
    pub fn ls(&self, path: &str) -> FsResult<Vec<EntryInfo>> {
        let key = self.path.key(path);
        let mut children = self.index.ls(&key).map_err(|err| index_err(err, path))?;
        for child in &mut children {
            let name = child.key.last().unwrap_or_default().to_string();
            child.name = self.path.join(path, &name);
        }
        Ok(children)
    }

    /// List the directory at `path` as bare child paths.
    pub fn ls_names(&self, path: &str) -> FsResult<Vec<String>> {
        Ok(self.ls(path)?.into_iter().map(|child| child.name).collect())
    }

    /// Resolve `path` to the first tier that actually has its bytes.
    ///
    /// Tiers are probed strictly in cache -> remote -> data order; a tier
    /// that cannot serve the entry, or whose file does not exist, is
    /// skipped. Directories fail with [`FsError::IsADirectory`]; paths no
    /// tier can serve fail with [`FsError::NotFound`].
    pub fn resolve(&self, path: &str) -> FsResult<Resolved> {
        let info = self.info(path)?;
        if info.is_dir() {
            return Err(FsError::IsADirectory(path.to_string()));
        }
        let entry = match info.entry {
            Some(entry) => entry,
            None => return Err(FsError::NotFound(path.to_string())),
        };
        let Some(storage_info) = self.index.storage_map().get(&entry.key) else {
            return Err(FsError::NotFound(path.to_string()));
        };

        for tier in Tier::PRIORITY {
            let Some(storage) = storage_info.by_tier(tier) else {
                continue;
            };
            let Some((fs, fs_path)) = storage.get(&entry) else {
                tracing::debug!(%tier, key = %entry.key, "tier cannot serve entry");
                continue;
            };
            if fs.exists(&fs_path) {
                tracing::debug!(%tier, %fs_path, "resolved");
                return Ok(Resolved {
                    tier,
                    storage: storage.clone(),
                    cache: storage_info.by_tier(Tier::Cache).cloned(),
                    fs,
                    fs_path,
                });
            }
        }
        Err(FsError::NotFound(path.to_string()))
    }

    /// Copy resolved bytes into the cache tier's object database and
    /// return the rewritten location.
    ///
    /// A source already on a local on-disk filesystem is returned
    /// unchanged, as is a cache tier with no object database to upload
    /// into.
    pub fn materialize(
        &self,
        cache: &StorageBackend,
        fs: Arc<dyn Filesystem>,
        fs_path: String,
    ) -> FsResult<(Arc<dyn Filesystem>, String)> {
        if fs.is_local() {
            return Ok((fs, fs_path));
        }
        let Some(object) = cache.as_object() else {
            return Ok((fs, fs_path));
        };
        let (oid, address) = object.odb.upload(&fs_path, &fs)?;
        tracing::debug!(%oid, "materialized remote file into cache");
        Ok((object.odb.fs(), address))
    }

    fn maybe_materialize(
        &self,
        resolved: &Resolved,
        cache: bool,
    ) -> FsResult<(Arc<dyn Filesystem>, String)> {
        match (&resolved.cache, cache && resolved.tier == Tier::Remote) {
            (Some(cache_storage), true) => self.materialize(
                cache_storage,
                Arc::clone(&resolved.fs),
                resolved.fs_path.clone(),
            ),
            _ => Ok((Arc::clone(&resolved.fs), resolved.fs_path.clone())),
        }
    }

    /// Open `path` for binary read.
    ///
    /// With `cache` set, bytes served by the remote tier are first
    /// materialized into the cache tier and opened from there.
    pub fn open(&self, path: &str, cache: bool) -> FsResult<Box<dyn Read + Send>> {
        let resolved = self.resolve(path)?;
        let (fs, fs_path) = self.maybe_materialize(&resolved, cache)?;
        Ok(fs.open(&fs_path)?)
    }

    /// Read the full contents of `path`.
    pub fn cat(&self, path: &str) -> FsResult<Vec<u8>> {
        let mut reader = self.open(path, false)?;
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        Ok(buf)
    }

    /// Transfer `rpath` to the local destination `lpath`.
    ///
    /// A directory path only creates the destination directory. When the
    /// winning backend is a content-addressed store on a local filesystem
    /// with link strategies configured, the transfer first attempts those
    /// strategies; any OS failure there silently falls back to streamed
    /// copying.
    pub fn get_file(
        &self,
        rpath: &str,
        lpath: &Path,
        cache: bool,
        progress: &dyn ProgressCallback,
    ) -> FsResult<()> {
        let resolved = match self.resolve(rpath) {
            Ok(resolved) => resolved,
            Err(FsError::IsADirectory(_)) => {
                std::fs::create_dir_all(lpath)?;
                return Ok(());
            }
            Err(err) => return Err(err),
        };
        let (fs, fs_path) = self.maybe_materialize(&resolved, cache)?;

        if let Some(object) = resolved.storage.as_object() {
            if fs.is_local() && !object.odb.cache_types().is_empty() {
                match transfer(
                    Path::new(&fs_path),
                    lpath,
                    object.odb.cache_types(),
                    progress,
                ) {
                    Ok(()) => return Ok(()),
                    Err(err) => {
                        tracing::debug!(error = %err, "link transfer failed, streaming instead");
                    }
                }
            }
        }
        fs.get_file(&fs_path, lpath, progress)?;
        Ok(())
    }

    /// The md5 digest recorded for `path`.
    ///
    /// Fails with [`FsError::NotSupported`] when the entry's metadata does
    /// not carry one; this filesystem's descriptors are not guaranteed to.
    pub fn checksum(&self, path: &str) -> FsResult<String> {
        let info = self.info(path)?;
        info.md5
            .ok_or_else(|| FsError::NotSupported(format!("no md5 digest for {path:?}")))
    }
}

fn index_err(err: IndexError, path: &str) -> FsError {
    match err {
        IndexError::KeyNotFound(_) => FsError::NotFound(path.to_string()),
        IndexError::NotADirectory(_) => FsError::NotADirectory(path.to_string()),
        IndexError::Storage(err) => FsError::Storage(err),
        IndexError::Io(err) => FsError::Io(err),
    }
}
