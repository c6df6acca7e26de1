//! Snapshot reconciliation: hash carry-forward and storage-backed metadata
//! refresh.

use std::io;

use strata_storage::Tier;
use strata_types::{Key, Meta};

use crate::diff::{diff, ChangeKind, DiffOpts};
use crate::error::IndexResult;
use crate::index::DataIndex;

/// Carry content hashes forward from `old` into `new` for entries whose
/// metadata is identical across the two snapshots.
///
/// Content hashing is expensive; when an entry's metadata is provably the
/// same, its previously computed hash is still valid. This mutates entries
/// in memory only -- persisting `new` remains the caller's responsibility.
pub fn update(new: &mut DataIndex, old: &DataIndex) {
    let changes = diff(
        old,
        new,
        &DiffOpts {
            with_unchanged: true,
            meta_only: true,
        },
    );

    let mut carried = 0usize;
    for change in changes {
        if change.kind != ChangeKind::Unchanged {
            continue;
        }
        let Some(old_entry) = change.old else {
            continue;
        };
        if let Some(entry) = new.get_mut(&change.key) {
            entry.hash_info = old_entry.hash_info;
            carried += 1;
        }
    }
    tracing::debug!(carried, "carried hash info across snapshots");
}

/// Refresh entry metadata from the cache tier's backing files and commit.
///
/// See [`update_meta_with`] for the full contract.
pub fn update_meta(index: &mut DataIndex) -> IndexResult<()> {
    update_meta_with(index, &[Tier::Cache])
}

/// Refresh entry metadata from the named storage tiers and commit.
///
/// Every non-directory entry is looked up in the storage map; for each
/// requested tier that can serve it, the backing file is probed and its
/// stats converted to [`Meta`]. A missing backing file skips that entry;
/// any other probe error aborts the whole call.
///
/// All lookups complete before the first index write, so reads issued
/// during enumeration never observe this call's own mutations, and a
/// failed probe leaves the index completely untouched. The buffered
/// updates are then applied and persisted with a single commit.
pub fn update_meta_with(index: &mut DataIndex, storages: &[Tier]) -> IndexResult<()> {
    let mut updates: Vec<(Key, Meta)> = Vec::new();

    for (key, entry) in index.iter() {
        if entry.is_dir() {
            continue;
        }
        let Some(storage_info) = index.storage_map().get(key) else {
            continue;
        };

        for tier in storages {
            let Some(storage) = storage_info.by_tier(*tier) else {
                continue;
            };
            let Some((fs, fs_path)) = storage.get(entry) else {
                continue;
            };
            let info = match fs.info(&fs_path) {
                Ok(info) => info,
                Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
                Err(err) => return Err(err.into()),
            };
            updates.push((key.clone(), Meta::from_file_info(&info, fs.protocol())));
        }
    }

    let refreshed = updates.len();
    for (key, meta) in updates {
        if let Some(mut entry) = index.get(&key).cloned() {
            entry.meta = Some(meta);
            index.insert(entry);
        }
    }
    index.commit()?;
    tracing::debug!(refreshed, "refreshed entry metadata from storage");
    Ok(())
}
