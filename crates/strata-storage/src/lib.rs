//! Storage backends for Strata.
//!
//! This crate supplies everything between the logical index and physical
//! bytes:
//!
//! - [`Filesystem`] -- the uniform contract (`exists`/`info`/`open`/
//!   `get_file`/`ls`) the resolver probes against, with [`LocalFileSystem`]
//!   and [`MemoryFileSystem`] implementations.
//! - [`ObjectDb`] -- a content-addressed file database over any
//!   [`Filesystem`], carrying the configured link-strategy preferences.
//! - [`transfer`] -- optimized local-to-local transfer using an ordered
//!   list of [`LinkType`] strategies.
//! - The tier model: [`Tier`], [`StorageBackend`] (a closed set of backend
//!   variants behind one `get(entry)` capability), [`StorageInfo`], and the
//!   prefix-keyed [`StorageMap`] registry.
//!
//! The storage map is built and owned by collaborators; the resolver in
//! `strata-fs` only reads it.

pub mod error;
pub mod fs;
pub mod local;
pub mod map;
pub mod memory;
pub mod odb;
pub mod tier;
pub mod transfer;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{StorageError, StorageResult};
pub use fs::{Filesystem, NoProgress, ProgressCallback};
pub use local::LocalFileSystem;
pub use map::StorageMap;
pub use memory::MemoryFileSystem;
pub use odb::ObjectDb;
pub use tier::{FileStorage, Location, ObjectStorage, StorageBackend, StorageInfo, Tier};
pub use transfer::{transfer, LinkType};
