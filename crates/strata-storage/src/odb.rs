use std::sync::Arc;

use crate::error::{StorageError, StorageResult};
use crate::fs::Filesystem;
use crate::transfer::LinkType;

/// A content-addressed file database over a [`Filesystem`] root.
///
/// Objects are addressed by the BLAKE3 hex digest of their content and laid
/// out as `root/<oid[..2]>/<oid[2..]>`. Writes are idempotent: the same
/// content always lands at the same address.
pub struct ObjectDb {
    fs: Arc<dyn Filesystem>,
    root: String,
    cache_types: Vec<LinkType>,
}

impl ObjectDb {
    /// Create an object database rooted at `root` on `fs`, with no link
    /// preferences configured.
    pub fn new(fs: Arc<dyn Filesystem>, root: impl Into<String>) -> Self {
        Self {
            fs,
            root: root.into(),
            cache_types: Vec::new(),
        }
    }

    /// Configure the ordered link-strategy preferences for local transfers
    /// out of this database.
    pub fn with_cache_types(mut self, cache_types: Vec<LinkType>) -> Self {
        self.cache_types = cache_types;
        self
    }

    /// The filesystem this database stores objects on.
    pub fn fs(&self) -> Arc<dyn Filesystem> {
        Arc::clone(&self.fs)
    }

    /// The configured link-strategy preferences, in priority order.
    pub fn cache_types(&self) -> &[LinkType] {
        &self.cache_types
    }

    /// The physical path for an object id.
    pub fn address(&self, oid: &str) -> String {
        if oid.len() < 3 {
            return format!("{}/{}", self.root.trim_end_matches('/'), oid);
        }
        format!(
            "{}/{}/{}",
            self.root.trim_end_matches('/'),
            &oid[..2],
            &oid[2..]
        )
    }

    /// Returns `true` if an object with this id exists.
    pub fn exists(&self, oid: &str) -> bool {
        self.fs.exists(&self.address(oid))
    }

    /// Store `data`, returning its `(oid, address)`. A no-op when the
    /// object is already present.
    pub fn add_bytes(&self, data: &[u8]) -> StorageResult<(String, String)> {
        let oid = hex::encode(blake3::hash(data).as_bytes());
        let address = self.address(&oid);
        if !self.fs.exists(&address) {
            self.fs.pipe_file(&address, data)?;
            tracing::debug!(%oid, "stored object");
        }
        Ok((oid, address))
    }

    /// Read an object's content by id.
    pub fn read(&self, oid: &str) -> StorageResult<Vec<u8>> {
        if oid.is_empty() {
            return Err(StorageError::InvalidOid(oid.to_string()));
        }
        Ok(self.fs.cat_file(&self.address(oid))?)
    }

    /// Content-addressed upload: read `path` from `from` and store the
    /// bytes here, returning `(oid, address)`.
    pub fn upload(
        &self,
        path: &str,
        from: &Arc<dyn Filesystem>,
    ) -> StorageResult<(String, String)> {
        let data = from.cat_file(path)?;
        self.add_bytes(&data)
    }
}

impl std::fmt::Debug for ObjectDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectDb")
            .field("protocol", &self.fs.protocol())
            .field("root", &self.root)
            .field("cache_types", &self.cache_types)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryFileSystem;

    fn memory_odb() -> ObjectDb {
        ObjectDb::new(Arc::new(MemoryFileSystem::new()), "odb")
    }

    #[test]
    fn address_splits_oid() {
        let odb = memory_odb();
        assert_eq!(odb.address("abcdef"), "odb/ab/cdef");
    }

    #[test]
    fn add_bytes_then_read_back() {
        let odb = memory_odb();
        let (oid, address) = odb.add_bytes(b"content").unwrap();
        assert_eq!(oid.len(), 64);
        assert_eq!(address, odb.address(&oid));
        assert!(odb.exists(&oid));
        assert_eq!(odb.read(&oid).unwrap(), b"content");
    }

    #[test]
    fn add_is_idempotent() {
        let odb = memory_odb();
        let (oid1, _) = odb.add_bytes(b"same").unwrap();
        let (oid2, _) = odb.add_bytes(b"same").unwrap();
        assert_eq!(oid1, oid2);
    }

    #[test]
    fn different_content_different_oid() {
        let odb = memory_odb();
        let (oid1, _) = odb.add_bytes(b"aaa").unwrap();
        let (oid2, _) = odb.add_bytes(b"bbb").unwrap();
        assert_ne!(oid1, oid2);
    }

    #[test]
    fn read_missing_object_errors() {
        let odb = memory_odb();
        let oid = hex::encode(blake3::hash(b"never stored").as_bytes());
        assert!(odb.read(&oid).is_err());
        assert!(matches!(
            odb.read(""),
            Err(StorageError::InvalidOid(_))
        ));
    }

    #[test]
    fn upload_from_another_filesystem() {
        let remote: Arc<dyn Filesystem> = Arc::new(MemoryFileSystem::new());
        remote.pipe_file("remote/file", b"remote bytes").unwrap();

        let odb = memory_odb();
        let (oid, _) = odb.upload("remote/file", &remote).unwrap();
        assert_eq!(odb.read(&oid).unwrap(), b"remote bytes");
    }

    #[test]
    fn upload_to_local_disk() {
        let dir = tempfile::tempdir().unwrap();
        let remote: Arc<dyn Filesystem> = Arc::new(MemoryFileSystem::new());
        remote.pipe_file("f", b"bytes").unwrap();

        let odb = ObjectDb::new(
            Arc::new(crate::local::LocalFileSystem::new()),
            dir.path().to_string_lossy().into_owned(),
        );
        let (oid, address) = odb.upload("f", &remote).unwrap();
        assert!(odb.fs().is_local());
        assert_eq!(std::fs::read(&address).unwrap(), b"bytes");
        assert!(odb.exists(&oid));
    }

    #[test]
    fn cache_types_configuration() {
        let odb = memory_odb().with_cache_types(vec![LinkType::Hardlink, LinkType::Copy]);
        assert_eq!(odb.cache_types(), &[LinkType::Hardlink, LinkType::Copy]);
    }
}
