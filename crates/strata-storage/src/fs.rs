//! The uniform filesystem contract consumed by the resolver and the
//! reconciler.
//!
//! Implementations are synchronous; every method is a potential blocking
//! point. Paths are protocol-native strings (`/abs/path` for local disks,
//! opaque keys for in-memory stores). Transfers to the local machine take a
//! [`std::path::Path`] destination.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use strata_types::FileInfo;

/// Byte-level progress reporting for transfers.
///
/// All methods default to no-ops; [`NoProgress`] is the canonical "don't
/// care" implementation.
pub trait ProgressCallback: Send + Sync {
    /// Total size of the transfer, when known up front.
    fn set_size(&self, _bytes: u64) {}

    /// Bytes moved since the last call.
    fn advance(&self, _bytes: u64) {}
}

/// A [`ProgressCallback`] that ignores all events.
pub struct NoProgress;

impl ProgressCallback for NoProgress {}

/// Uniform access to a physical backing store.
pub trait Filesystem: Send + Sync {
    /// Protocol tag, e.g. `"local"` or `"memory"`.
    fn protocol(&self) -> &'static str;

    /// Returns `true` if paths on this filesystem are local on-disk paths.
    fn is_local(&self) -> bool {
        false
    }

    /// Returns `true` if a file or directory exists at `path`.
    fn exists(&self, path: &str) -> bool;

    /// Stat `path`. Fails with [`io::ErrorKind::NotFound`] if absent.
    fn info(&self, path: &str) -> io::Result<FileInfo>;

    /// Open `path` for binary read.
    fn open(&self, path: &str) -> io::Result<Box<dyn Read + Send>>;

    /// Read the full contents of `path`.
    fn cat_file(&self, path: &str) -> io::Result<Vec<u8>> {
        let mut reader = self.open(path)?;
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        Ok(buf)
    }

    /// Write `data` to `path`, creating parents as needed and replacing any
    /// existing file.
    fn pipe_file(&self, path: &str, data: &[u8]) -> io::Result<()>;

    /// Stream the file at `path` to a local destination.
    fn get_file(
        &self,
        path: &str,
        dest: &Path,
        progress: &dyn ProgressCallback,
    ) -> io::Result<()> {
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }
        if let Ok(info) = self.info(path) {
            progress.set_size(info.size);
        }
        let reader = self.open(path)?;
        let out = File::create(dest)?;
        copy_stream(reader, out, progress)?;
        Ok(())
    }

    /// List the immediate children of `path` as protocol-native paths.
    fn ls(&self, path: &str) -> io::Result<Vec<String>>;
}

/// Copy `reader` to `writer` in chunks, reporting progress per chunk.
pub(crate) fn copy_stream(
    mut reader: impl Read,
    mut writer: impl Write,
    progress: &dyn ProgressCallback,
) -> io::Result<u64> {
    let mut buf = [0u8; 64 * 1024];
    let mut total = 0u64;
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        writer.write_all(&buf[..n])?;
        total += n as u64;
        progress.advance(n as u64);
    }
    writer.flush()?;
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::atomic::{AtomicU64, Ordering};

    struct CountingProgress {
        bytes: AtomicU64,
    }

    impl ProgressCallback for CountingProgress {
        fn advance(&self, bytes: u64) {
            self.bytes.fetch_add(bytes, Ordering::Relaxed);
        }
    }

    #[test]
    fn copy_stream_moves_all_bytes_and_reports() {
        let data = vec![7u8; 200_000];
        let progress = CountingProgress {
            bytes: AtomicU64::new(0),
        };
        let mut out = Vec::new();
        let copied = copy_stream(Cursor::new(data.clone()), &mut out, &progress).unwrap();
        assert_eq!(copied, 200_000);
        assert_eq!(out, data);
        assert_eq!(progress.bytes.load(Ordering::Relaxed), 200_000);
    }

    #[test]
    fn copy_stream_empty_input() {
        let progress = NoProgress;
        let mut out = Vec::new();
        let copied = copy_stream(Cursor::new(Vec::new()), &mut out, &progress).unwrap();
        assert_eq!(copied, 0);
        assert!(out.is_empty());
    }
}
