use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A content hash: algorithm name plus digest.
///
/// The digest is an opaque string computed by an external hasher; this type
/// only carries it around. Directory trees conventionally use digests with
/// a `.dir` suffix.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HashInfo {
    /// Algorithm name, e.g. `md5` or `sha256`.
    pub name: String,
    /// Hex digest as produced by the algorithm.
    pub value: String,
}

impl HashInfo {
    /// Create a hash info from an algorithm name and digest.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Parse the `name:value` rendering produced by [`fmt::Display`].
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        match s.split_once(':') {
            Some((name, value)) if !name.is_empty() && !value.is_empty() => {
                Ok(Self::new(name, value))
            }
            _ => Err(TypeError::InvalidHashInfo(s.to_string())),
        }
    }

    /// Returns `true` if this is an md5 digest.
    pub fn is_md5(&self) -> bool {
        self.name == "md5"
    }

    /// Returns `true` if the digest denotes a directory tree.
    pub fn is_dir_digest(&self) -> bool {
        self.value.ends_with(".dir")
    }
}

impl fmt::Display for HashInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.value)
    }
}
