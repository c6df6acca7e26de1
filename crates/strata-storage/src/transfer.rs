//! Optimized local-to-local transfer via filesystem links.
//!
//! Given an ordered list of link strategies, [`transfer`] tries each in
//! turn and reports the last OS error if none succeeds. Callers treat this
//! as a best-effort fast path and fall back to streamed copying on error.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::fs::ProgressCallback;

/// A strategy for placing a local file at a destination without streaming.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkType {
    /// Copy-on-write clone. Not expressible through std; always reported
    /// as unsupported so the next strategy runs.
    Reflink,
    /// Hard link to the same inode.
    Hardlink,
    /// Symbolic link to the source path.
    Symlink,
    /// Plain byte copy.
    Copy,
}

impl LinkType {
    /// The strategy's configuration name.
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkType::Reflink => "reflink",
            LinkType::Hardlink => "hardlink",
            LinkType::Symlink => "symlink",
            LinkType::Copy => "copy",
        }
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Place the file at `from` at `to` using the first strategy in `links`
/// that the OS accepts.
///
/// Parent directories of `to` are created. On success the file size is
/// reported to `progress` in one step. Fails with the last strategy's OS
/// error when every strategy fails, or with [`io::ErrorKind::InvalidInput`]
/// when `links` is empty.
pub fn transfer(
    from: &Path,
    to: &Path,
    links: &[LinkType],
    progress: &dyn ProgressCallback,
) -> io::Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut last_err = io::Error::new(
        io::ErrorKind::InvalidInput,
        "no link strategies configured",
    );
    for link in links {
        match try_link(from, to, *link) {
            Ok(()) => {
                let size = fs::metadata(from).map(|m| m.len()).unwrap_or(0);
                progress.set_size(size);
                progress.advance(size);
                return Ok(());
            }
            Err(err) => {
                tracing::debug!(strategy = %link, error = %err, "link strategy failed");
                last_err = err;
            }
        }
    }
    Err(last_err)
}

fn try_link(from: &Path, to: &Path, link: LinkType) -> io::Result<()> {
    match link {
        LinkType::Reflink => Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "reflink is not supported on this platform",
        )),
        LinkType::Hardlink => fs::hard_link(from, to),
        LinkType::Symlink => symlink_file(from, to),
        LinkType::Copy => fs::copy(from, to).map(|_| ()),
    }
}

#[cfg(unix)]
fn symlink_file(from: &Path, to: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(from, to)
}

#[cfg(windows)]
fn symlink_file(from: &Path, to: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(from, to)
}

#[cfg(not(any(unix, windows)))]
fn symlink_file(_from: &Path, _to: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symlinks are not supported on this platform",
    ))
}
