use std::collections::HashMap;
use std::io::{self, Cursor, Read};
use std::sync::RwLock;

use strata_types::FileInfo;

use crate::fs::Filesystem;

/// In-memory, HashMap-backed filesystem.
///
/// Serves two roles: a non-local stand-in for remote stores in tests, and
/// the per-call ephemeral store behind transient cache-record handoff. Each
/// instance owns its own table; nothing is shared between instances, so
/// concurrent callers can each scope one to a single operation.
///
/// Paths are opaque keys. A path that is a `/`-prefix of stored keys is
/// reported as a directory.
pub struct MemoryFileSystem {
    files: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryFileSystem {
    /// Create a new empty in-memory filesystem.
    pub fn new() -> Self {
        Self {
            files: RwLock::new(HashMap::new()),
        }
    }

    /// Number of files currently stored.
    pub fn len(&self) -> usize {
        self.files.read().expect("lock poisoned").len()
    }

    /// Returns `true` if no files are stored.
    pub fn is_empty(&self) -> bool {
        self.files.read().expect("lock poisoned").is_empty()
    }
}

impl Default for MemoryFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for MemoryFileSystem {
    fn protocol(&self) -> &'static str {
        "memory"
    }

    fn exists(&self, path: &str) -> bool {
        let files = self.files.read().expect("lock poisoned");
        files.contains_key(path) || has_dir_prefix(&files, path)
    }

    fn info(&self, path: &str) -> io::Result<FileInfo> {
        let files = self.files.read().expect("lock poisoned");
        if let Some(data) = files.get(path) {
            return Ok(FileInfo {
                size: data.len() as u64,
                mtime: None,
                is_dir: false,
            });
        }
        if has_dir_prefix(&files, path) {
            return Ok(FileInfo {
                size: 0,
                mtime: None,
                is_dir: true,
            });
        }
        Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("no such file: {path}"),
        ))
    }

    fn open(&self, path: &str) -> io::Result<Box<dyn Read + Send>> {
        let files = self.files.read().expect("lock poisoned");
        match files.get(path) {
            Some(data) => Ok(Box::new(Cursor::new(data.clone()))),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {path}"),
            )),
        }
    }

    fn pipe_file(&self, path: &str, data: &[u8]) -> io::Result<()> {
        self.files
            .write()
            .expect("lock poisoned")
            .insert(path.to_string(), data.to_vec());
        Ok(())
    }

    fn ls(&self, path: &str) -> io::Result<Vec<String>> {
        let files = self.files.read().expect("lock poisoned");
        let prefix = format!("{}/", path.trim_end_matches('/'));
        let mut names: Vec<String> = files
            .keys()
            .filter(|k| k.starts_with(&prefix))
            .cloned()
            .collect();
        names.sort();
        if names.is_empty() && !files.contains_key(path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such directory: {path}"),
            ));
        }
        Ok(names)
    }
}

fn has_dir_prefix(files: &HashMap<String, Vec<u8>>, path: &str) -> bool {
    let prefix = format!("{}/", path.trim_end_matches('/'));
    files.keys().any(|k| k.starts_with(&prefix))
}

impl std::fmt::Debug for MemoryFileSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryFileSystem")
            .field("file_count", &self.len())
            .finish()
    }
}
