use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use strata_storage::{Filesystem, MemoryFileSystem};
use strata_types::HashInfo;

use crate::error::{CacheError, CacheResult};

/// The serialized shape. Field order matches the canonical sorted-key
/// encoding.
#[derive(Serialize, Deserialize)]
struct Payload {
    checksum: String,
    hash_info: HashInfo,
}

/// A checksum plus content hash, serializable for transient handoff.
///
/// `path`, `fs`, and `oid` locate where a record was written or read; they
/// never appear in the serialized bytes.
#[derive(Clone)]
pub struct CacheObject {
    /// Externally computed checksum, e.g. a cloud etag.
    pub checksum: String,
    /// The content hash being handed across the boundary.
    pub hash_info: HashInfo,
    /// Location of the serialized record, once written or loaded.
    pub path: Option<String>,
    /// Filesystem holding the serialized record.
    pub fs: Option<Arc<dyn Filesystem>>,
    /// Correlation tag assigned by the database layer that loaded this
    /// record.
    pub oid: Option<String>,
}

impl CacheObject {
    /// Create an unserialized record.
    pub fn new(checksum: impl Into<String>, hash_info: HashInfo) -> Self {
        Self {
            checksum: checksum.into(),
            hash_info,
            path: None,
            fs: None,
            oid: None,
        }
    }

    /// The canonical encoding: JSON with sorted keys, UTF-8.
    pub fn as_bytes(&self) -> CacheResult<Vec<u8>> {
        let payload = Payload {
            checksum: self.checksum.clone(),
            hash_info: self.hash_info.clone(),
        };
        serde_json::to_vec(&payload).map_err(|err| CacheError::Format(err.to_string()))
    }

    /// Write the canonical encoding to a fresh throwaway in-memory
    /// location and record it on the object.
    ///
    /// Each call gets its own store, scoped to this record; concurrent
    /// serializations cannot interfere.
    pub fn serialize(&mut self) -> CacheResult<()> {
        let fs: Arc<dyn Filesystem> = Arc::new(MemoryFileSystem::new());
        let path = format!("memory://{}", Uuid::now_v7());
        fs.pipe_file(&path, &self.as_bytes()?)?;
        tracing::debug!(%path, "serialized cache record");
        self.fs = Some(fs);
        self.path = Some(path);
        Ok(())
    }

    /// Decode a record from its canonical bytes.
    pub fn from_bytes(bytes: &[u8]) -> CacheResult<Self> {
        let payload: Payload = serde_json::from_slice(bytes)
            .map_err(|err| CacheError::Format(err.to_string()))?;
        Ok(Self::new(payload.checksum, payload.hash_info))
    }

    /// Read and decode a record from `path` on `fs`, recording the
    /// location on the result.
    pub fn load(path: &str, fs: Arc<dyn Filesystem>) -> CacheResult<Self> {
        let bytes = fs.cat_file(path)?;
        let mut object = Self::from_bytes(&bytes)?;
        object.path = Some(path.to_string());
        object.fs = Some(fs);
        Ok(object)
    }
}

impl std::fmt::Debug for CacheObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheObject")
            .field("checksum", &self.checksum)
            .field("hash_info", &self.hash_info)
            .field("path", &self.path)
            .field("oid", &self.oid)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> CacheObject {
        CacheObject::new("c1", HashInfo::new("md5", "d3b07384d113edec49eaa6238ad5ff00"))
    }

    #[test]
    fn canonical_bytes_have_sorted_keys() {
        let bytes = record().as_bytes().unwrap();
        assert_eq!(
            bytes,
            br#"{"checksum":"c1","hash_info":{"name":"md5","value":"d3b07384d113edec49eaa6238ad5ff00"}}"#
        );
    }

    #[test]
    fn serialize_then_load_roundtrip() {
        let mut record = record();
        record.serialize().unwrap();

        let path = record.path.clone().unwrap();
        let fs = record.fs.clone().unwrap();
        let loaded = CacheObject::load(&path, fs).unwrap();

        assert_eq!(loaded.checksum, "c1");
        assert_eq!(loaded.hash_info, record.hash_info);
        assert_eq!(loaded.path.as_deref(), Some(path.as_str()));
        assert!(loaded.oid.is_none());
    }

    #[test]
    fn serialize_uses_a_fresh_store_per_record() {
        let mut a = record();
        let mut b = record();
        a.serialize().unwrap();
        b.serialize().unwrap();

        // Distinct paths, and neither store can see the other's record.
        assert_ne!(a.path, b.path);
        let a_fs = a.fs.unwrap();
        assert!(!a_fs.exists(b.path.as_deref().unwrap()));
    }

    #[test]
    fn from_bytes_rejects_invalid_json() {
        assert!(matches!(
            CacheObject::from_bytes(b"not json"),
            Err(CacheError::Format(_))
        ));
    }

    #[test]
    fn from_bytes_rejects_wrong_shape() {
        assert!(matches!(
            CacheObject::from_bytes(br#"{"unexpected": true}"#),
            Err(CacheError::Format(_))
        ));
    }

    #[test]
    fn load_from_missing_path_is_an_io_error() {
        let fs: Arc<dyn Filesystem> = Arc::new(MemoryFileSystem::new());
        assert!(matches!(
            CacheObject::load("memory://gone", fs),
            Err(CacheError::Io(_))
        ));
    }

    #[test]
    fn bytes_roundtrip_preserves_fields() {
        let original = record();
        let decoded = CacheObject::from_bytes(&original.as_bytes().unwrap()).unwrap();
        assert_eq!(decoded.checksum, original.checksum);
        assert_eq!(decoded.hash_info, original.hash_info);
    }
}
