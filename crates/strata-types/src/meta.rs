use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// Metadata describing what a filesystem reported for a physical file.
///
/// This is the raw probe result; [`Meta`] is the index-side record derived
/// from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileInfo {
    /// Size in bytes. Zero for directories on filesystems that report none.
    pub size: u64,
    /// Last modification time, when the filesystem tracks one.
    pub mtime: Option<SystemTime>,
    /// Whether the path is a directory.
    pub is_dir: bool,
}

/// On-disk metadata recorded for an index entry.
///
/// An entry with `isdir == true` never carries file content and is excluded
/// from hash carry-forward and metadata refresh.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    /// Whether the entry is a directory.
    pub isdir: bool,
    /// Size in bytes.
    pub size: Option<u64>,
    /// Last modification time.
    pub mtime: Option<SystemTime>,
    /// Object version, for versioned cloud protocols.
    pub version_id: Option<String>,
    /// Entity tag, for cloud protocols that report one.
    pub etag: Option<String>,
}

impl Meta {
    /// Metadata for a directory entry.
    pub fn directory() -> Self {
        Self {
            isdir: true,
            ..Self::default()
        }
    }

    /// Metadata for a plain file of known size.
    pub fn file(size: u64) -> Self {
        Self {
            size: Some(size),
            ..Self::default()
        }
    }

    /// Convert a filesystem probe result into index metadata.
    ///
    /// `_protocol` tags where the probe came from; it is reserved for
    /// protocols whose probes carry version/etag fields. Local and
    /// in-memory filesystems report none.
    pub fn from_file_info(info: &FileInfo, _protocol: &str) -> Self {
        Self {
            isdir: info.is_dir,
            size: Some(info.size),
            mtime: info.mtime,
            version_id: None,
            etag: None,
        }
    }
}
