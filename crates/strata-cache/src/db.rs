use strata_storage::ObjectDb;

use crate::error::CacheResult;
use crate::object::CacheObject;

/// Cache-record access over an object database.
///
/// Records stored here are addressed like any other object; `get` stamps
/// the queried oid onto the loaded record as its correlation tag.
pub struct CacheDb {
    odb: ObjectDb,
}

impl CacheDb {
    /// Wrap an object database for cache-record storage.
    pub fn new(odb: ObjectDb) -> Self {
        Self { odb }
    }

    /// The underlying object database.
    pub fn odb(&self) -> &ObjectDb {
        &self.odb
    }

    /// Store a record's canonical encoding, returning its oid.
    pub fn add(&self, record: &CacheObject) -> CacheResult<String> {
        let (oid, _) = self.odb.add_bytes(&record.as_bytes()?)?;
        Ok(oid)
    }

    /// Load the record stored under `oid` and stamp the oid on it.
    pub fn get(&self, oid: &str) -> CacheResult<CacheObject> {
        let address = self.odb.address(oid);
        let mut record = CacheObject::load(&address, self.odb.fs())?;
        record.oid = Some(oid.to_string());
        Ok(record)
    }
}

impl std::fmt::Debug for CacheDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheDb").field("odb", &self.odb).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use strata_storage::MemoryFileSystem;
    use strata_types::HashInfo;

    use crate::error::CacheError;

    fn cache_db() -> CacheDb {
        CacheDb::new(ObjectDb::new(Arc::new(MemoryFileSystem::new()), "odb"))
    }

    #[test]
    fn add_then_get_stamps_the_oid() {
        let db = cache_db();
        let record = CacheObject::new("etag-1", HashInfo::new("md5", "abc"));

        let oid = db.add(&record).unwrap();
        let loaded = db.get(&oid).unwrap();

        assert_eq!(loaded.checksum, "etag-1");
        assert_eq!(loaded.hash_info, HashInfo::new("md5", "abc"));
        assert_eq!(loaded.oid.as_deref(), Some(oid.as_str()));
        assert_eq!(loaded.path.as_deref(), Some(db.odb().address(&oid).as_str()));
    }

    #[test]
    fn oid_is_not_part_of_the_payload() {
        let db = cache_db();
        let record = CacheObject::new("etag-1", HashInfo::new("md5", "abc"));
        let oid = db.add(&record).unwrap();

        let raw = db.odb().read(&oid).unwrap();
        let text = String::from_utf8(raw).unwrap();
        assert!(!text.contains(&oid));
        assert!(!text.contains("oid"));
    }

    #[test]
    fn get_missing_record_errors() {
        let db = cache_db();
        assert!(matches!(
            db.get("ffffffffffffffff"),
            Err(CacheError::Io(_))
        ));
    }

    #[test]
    fn get_corrupt_record_is_a_format_error() {
        let db = cache_db();
        // Write garbage directly at an object address.
        let (oid, _) = db.odb().add_bytes(b"not a record").unwrap();
        assert!(matches!(db.get(&oid), Err(CacheError::Format(_))));
    }
}
