//! Snapshot diffing: per-key change records between two indexes.

use std::collections::BTreeSet;

use strata_types::{DataIndexEntry, Key};

use crate::index::DataIndex;

/// How a key changed between two snapshots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeKind {
    /// Present in both snapshots with equal content.
    Unchanged,
    /// Present only in the new snapshot.
    Added,
    /// Present only in the old snapshot.
    Removed,
    /// Present in both snapshots with different content.
    Modified,
}

/// One key's change record.
#[derive(Clone, Debug)]
pub struct Change {
    /// The key the record describes.
    pub key: Key,
    /// The old snapshot's entry, if present there.
    pub old: Option<DataIndexEntry>,
    /// The new snapshot's entry, if present there.
    pub new: Option<DataIndexEntry>,
    /// The classification.
    pub kind: ChangeKind,
}

/// Options controlling [`diff`].
#[derive(Clone, Copy, Debug, Default)]
pub struct DiffOpts {
    /// Include unchanged keys in the result.
    pub with_unchanged: bool,
    /// Compare metadata only, ignoring content hashes.
    pub meta_only: bool,
}

fn classify(
    old: Option<&DataIndexEntry>,
    new: Option<&DataIndexEntry>,
    meta_only: bool,
) -> ChangeKind {
    match (old, new) {
        (None, None) => ChangeKind::Unchanged,
        (Some(_), None) => ChangeKind::Removed,
        (None, Some(_)) => ChangeKind::Added,
        (Some(old), Some(new)) => {
            if !meta_only {
                if let (Some(old_hash), Some(new_hash)) = (&old.hash_info, &new.hash_info) {
                    if old_hash != new_hash {
                        return ChangeKind::Modified;
                    }
                }
            }
            if old.meta != new.meta {
                ChangeKind::Modified
            } else {
                ChangeKind::Unchanged
            }
        }
    }
}

/// Compare two snapshots of the same logical tree.
///
/// Every key present in either snapshot yields one record; unchanged keys
/// are dropped unless `opts.with_unchanged` is set. Records come out in
/// key order.
pub fn diff(old: &DataIndex, new: &DataIndex, opts: &DiffOpts) -> Vec<Change> {
    let keys: BTreeSet<&Key> = old.keys().chain(new.keys()).collect();

    let mut changes = Vec::new();
    for key in keys {
        let old_entry = old.get(key);
        let new_entry = new.get(key);
        let kind = classify(old_entry, new_entry, opts.meta_only);
        if kind == ChangeKind::Unchanged && !opts.with_unchanged {
            continue;
        }
        changes.push(Change {
            key: key.clone(),
            old: old_entry.cloned(),
            new: new_entry.cloned(),
            kind,
        });
    }
    changes
}
