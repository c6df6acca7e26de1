use std::fmt;

use serde::{Deserialize, Serialize};

/// Path separator used by the logical tree.
pub const SEPARATOR: char = '/';

/// Root marker for absolute logical paths.
pub const ROOT_MARKER: &str = "/";

/// An ordered sequence of path components addressing a node in the index
/// tree. The empty sequence is the tree root.
///
/// Keys are unique within an index and form a strict prefix hierarchy:
/// directories are keys that are proper prefixes of other keys.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Key(Vec<String>);

impl Key {
    /// The root key (empty component sequence).
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Build a key from pre-split components.
    pub fn new(parts: Vec<String>) -> Self {
        Self(parts)
    }

    /// Decompose a path string into a key, relative to the root marker.
    ///
    /// Leading/trailing separators, repeated separators, and `.` components
    /// are normalized away. The root marker itself (and the empty string)
    /// map to the root key.
    pub fn from_path(path: &str) -> Self {
        let parts: Vec<String> = path
            .split(SEPARATOR)
            .filter(|part| !part.is_empty() && *part != ".")
            .map(str::to_string)
            .collect();
        Self(parts)
    }

    /// Returns `true` if this is the root key.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the key has no components (the root key).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The component sequence.
    pub fn parts(&self) -> &[String] {
        &self.0
    }

    /// The final component, if any.
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// The parent key. Returns `None` for the root.
    pub fn parent(&self) -> Option<Key> {
        if self.0.is_empty() {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    /// Append a single component.
    pub fn child(&self, name: impl Into<String>) -> Key {
        let mut parts = self.0.clone();
        parts.push(name.into());
        Self(parts)
    }

    /// Append all components of `other`.
    pub fn join(&self, other: &Key) -> Key {
        let mut parts = self.0.clone();
        parts.extend(other.0.iter().cloned());
        Self(parts)
    }

    /// Returns `true` if `prefix` is a (non-strict) prefix of this key.
    pub fn starts_with(&self, prefix: &Key) -> bool {
        self.0.len() >= prefix.0.len() && self.0[..prefix.0.len()] == prefix.0[..]
    }

    /// The remainder of this key after stripping `prefix`.
    ///
    /// Returns `None` if `prefix` is not a prefix of this key.
    pub fn relative_to(&self, prefix: &Key) -> Option<Key> {
        if !self.starts_with(prefix) {
            return None;
        }
        Some(Self(self.0[prefix.0.len()..].to_vec()))
    }

    /// All prefixes of this key from longest (the key itself) to shortest
    /// (the root), inclusive.
    pub fn prefixes_desc(&self) -> impl Iterator<Item = Key> + '_ {
        (0..=self.0.len())
            .rev()
            .map(move |n| Self(self.0[..n].to_vec()))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}

impl From<&[&str]> for Key {
    fn from(parts: &[&str]) -> Self {
        Self(parts.iter().map(|p| p.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Key {
    fn from(parts: [&str; N]) -> Self {
        Self(parts.iter().map(|p| p.to_string()).collect())
    }
}

impl FromIterator<String> for Key {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn root_marker_maps_to_root_key() {
        assert!(Key::from_path("/").is_root());
        assert!(Key::from_path("").is_root());
        assert!(Key::from_path(".").is_root());
    }

    #[test]
    fn from_path_decomposes_components() {
        assert_eq!(Key::from_path("/data/bar"), Key::from(["data", "bar"]));
        assert_eq!(Key::from_path("data/bar"), Key::from(["data", "bar"]));
        assert_eq!(Key::from_path("foo"), Key::from(["foo"]));
    }

    #[test]
    fn from_path_normalizes_separators() {
        assert_eq!(Key::from_path("//data///bar/"), Key::from(["data", "bar"]));
        assert_eq!(Key::from_path("./data/./bar"), Key::from(["data", "bar"]));
    }

    #[test]
    fn parent_and_child() {
        let key = Key::from(["a", "b", "c"]);
        assert_eq!(key.parent(), Some(Key::from(["a", "b"])));
        assert_eq!(Key::root().parent(), None);
        assert_eq!(Key::from(["a"]).child("b"), Key::from(["a", "b"]));
    }

    #[test]
    fn starts_with_and_relative_to() {
        let key = Key::from(["data", "sub", "file"]);
        assert!(key.starts_with(&Key::root()));
        assert!(key.starts_with(&Key::from(["data"])));
        assert!(key.starts_with(&key));
        assert!(!key.starts_with(&Key::from(["other"])));

        assert_eq!(
            key.relative_to(&Key::from(["data"])),
            Some(Key::from(["sub", "file"]))
        );
        assert_eq!(key.relative_to(&key), Some(Key::root()));
        assert_eq!(key.relative_to(&Key::from(["other"])), None);
    }

    #[test]
    fn prefixes_desc_walks_to_root() {
        let key = Key::from(["a", "b"]);
        let prefixes: Vec<Key> = key.prefixes_desc().collect();
        assert_eq!(
            prefixes,
            vec![Key::from(["a", "b"]), Key::from(["a"]), Key::root()]
        );
    }

    #[test]
    fn display_joins_components() {
        assert_eq!(Key::from(["data", "bar"]).to_string(), "data/bar");
        assert_eq!(Key::root().to_string(), "");
    }

    #[test]
    fn ordering_groups_descendants_before_siblings() {
        // Descendants of a key sort immediately after it, before any
        // lexicographically greater sibling.
        let parent = Key::from(["data"]);
        let descendant = Key::from(["data", "bar"]);
        let sibling = Key::from(["data2"]);
        assert!(parent < descendant);
        assert!(descendant < sibling);
    }

    proptest! {
        #[test]
        fn display_from_path_roundtrip(parts in prop::collection::vec("[a-zA-Z0-9_.-]{1,12}", 0..6)) {
            // Components never contain the separator, so rendering a key as
            // a path and re-parsing it must be the identity.
            let parts: Vec<String> = parts.into_iter().filter(|p| p != ".").collect();
            let key = Key::new(parts);
            let reparsed = Key::from_path(&key.to_string());
            prop_assert_eq!(key, reparsed);
        }
    }
}
