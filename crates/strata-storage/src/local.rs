use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

use strata_types::FileInfo;

use crate::fs::Filesystem;

/// The local on-disk filesystem. Paths are native absolute or relative
/// OS paths rendered as strings.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    /// Create a handle to the local filesystem.
    pub fn new() -> Self {
        Self
    }
}

impl Filesystem for LocalFileSystem {
    fn protocol(&self) -> &'static str {
        "local"
    }

    fn is_local(&self) -> bool {
        true
    }

    fn exists(&self, path: &str) -> bool {
        Path::new(path).exists()
    }

    fn info(&self, path: &str) -> io::Result<FileInfo> {
        let meta = fs::metadata(path)?;
        Ok(FileInfo {
            size: meta.len(),
            mtime: meta.modified().ok(),
            is_dir: meta.is_dir(),
        })
    }

    fn open(&self, path: &str) -> io::Result<Box<dyn Read + Send>> {
        Ok(Box::new(File::open(path)?))
    }

    fn pipe_file(&self, path: &str, data: &[u8]) -> io::Result<()> {
        if let Some(parent) = Path::new(path).parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, data)
    }

    fn ls(&self, path: &str) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for dirent in fs::read_dir(path)? {
            names.push(dirent?.path().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }
}
