use strata_types::{key, Key};

/// Maps logical path strings to index keys and back.
///
/// Paths use a single separator and an explicit root marker; they are
/// resolved relative to the root before decomposition. Constructed once at
/// façade initialization.
#[derive(Clone, Copy, Debug, Default)]
pub struct PathMapper;

impl PathMapper {
    /// Create a mapper rooted at the root marker.
    pub fn new() -> Self {
        Self
    }

    /// The root marker.
    pub fn root_marker(&self) -> &'static str {
        key::ROOT_MARKER
    }

    /// Decompose a path into its key. The root marker (and equivalents)
    /// map to the root key.
    pub fn key(&self, path: &str) -> Key {
        Key::from_path(path)
    }

    /// Join a child name onto a base path, preserving the base's
    /// absolute/relative form.
    pub fn join(&self, base: &str, name: &str) -> String {
        if base.is_empty() || base == key::ROOT_MARKER {
            format!("{}{name}", key::ROOT_MARKER)
        } else {
            format!("{}/{name}", base.trim_end_matches(key::SEPARATOR))
        }
    }
}
