//! The fingerprint of one compiler invocation.

use std::fmt;
use std::str::FromStr;

use kiln_common::ContentHash;

use crate::error::CacheError;

/// 128-bit fingerprint naming one cache partition.
///
/// Rendered as 32 lowercase hex characters, which is also the partition's
/// directory name under the cache root.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HashKey(ContentHash);

impl HashKey {
    /// Wraps a finished digest as a key.
    pub fn new(digest: ContentHash) -> Self {
        Self(digest)
    }

    /// Returns the underlying digest.
    pub fn digest(&self) -> ContentHash {
        self.0
    }
}

impl fmt::Display for HashKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Debug for HashKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HashKey({})", self.0)
    }
}

impl FromStr for HashKey {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<ContentHash>()
            .map(Self)
            .map_err(|e| CacheError::InvalidKey(e.input))
    }
}
