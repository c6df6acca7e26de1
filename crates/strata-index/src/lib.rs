//! The versioned data index for Strata.
//!
//! A [`DataIndex`] is an ordered map from [`Key`](strata_types::Key) to
//! [`DataIndexEntry`](strata_types::DataIndexEntry), together with the
//! [`StorageMap`](strata_storage::StorageMap) that says which backing tiers
//! cover which subtrees. It answers `info`/`ls` queries over the logical
//! tree (synthesizing implicit directories for key prefixes) and buffers
//! writes until `commit()`.
//!
//! Two index snapshots can be compared with [`diff`], producing per-key
//! change records. The reconciler builds on that:
//!
//! - [`update`] carries expensive content hashes forward from an old
//!   snapshot for entries whose metadata did not change.
//! - [`update_meta`] refreshes entry metadata from storage-backed files,
//!   collecting every lookup before the first write so a failed probe
//!   leaves the index untouched.

pub mod diff;
pub mod error;
pub mod index;
pub mod reconcile;

// Re-export primary types at crate root for ergonomic imports.
pub use diff::{diff, Change, ChangeKind, DiffOpts};
pub use error::{IndexError, IndexResult};
pub use index::{DataIndex, EntryInfo, EntryKind};
pub use reconcile::{update, update_meta, update_meta_with};
