//! A virtual filesystem over a Strata data index.
//!
//! [`DataFileSystem`] exposes a filesystem-style surface (`info`, `ls`,
//! `open`, `get_file`, `checksum`) over logical paths. Behind each read is
//! the tiered resolver: the entry's backing tiers are probed in fixed
//! cache -> remote -> data order and the first tier that actually has the
//! bytes wins. Callers can opt in to materialization, which copies bytes
//! served by the remote tier into the local cache and rewrites the
//! resolution to point there.
//!
//! Local-to-local transfers out of a content-addressed store use the
//! store's configured link strategies (hardlink before copy, say) as a
//! best-effort fast path, falling back to streamed copying.

pub mod error;
pub mod fs;
pub mod path;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{FsError, FsResult};
pub use fs::{DataFileSystem, Resolved};
pub use path::PathMapper;
