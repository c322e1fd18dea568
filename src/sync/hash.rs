//! Content hashing for change detection.
//!
//! This module provides SHA256 fingerprints of file content and the
//! in-memory store that remembers, per file, the fingerprint of the last
//! content that was successfully published.
//!
//! The store is volatile: a new process starts empty, so every file is
//! published once per process before hashing can skip it.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// SHA256 fingerprint of file content, as lower-case hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentDigest(String);

impl ContentDigest {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the SHA256 fingerprint of raw content.
///
/// Deterministic: the same bytes always produce the same digest.
#[must_use]
pub fn content_digest(bytes: &[u8]) -> ContentDigest {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    ContentDigest(format!("{:x}", hasher.finalize()))
}

/// Check if content has changed since it was last recorded.
///
/// Returns `true` if:
/// - There is no stored digest (never published)
/// - The current digest differs from the stored digest
#[must_use]
pub fn has_changed(current: &ContentDigest, stored: Option<&ContentDigest>) -> bool {
    stored.is_none_or(|d| d != current)
}

/// Last successfully published digest per file.
#[derive(Debug, Default)]
pub struct FingerprintStore {
    digests: HashMap<PathBuf, ContentDigest>,
}

impl FingerprintStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether a file with this digest needs publishing.
    #[must_use]
    pub fn should_publish(&self, path: &Path, digest: &ContentDigest, force: bool) -> bool {
        force || has_changed(digest, self.digests.get(path))
    }

    /// Remember a digest after a confirmed publish, replacing any earlier one.
    pub fn record(&mut self, path: impl Into<PathBuf>, digest: ContentDigest) {
        self.digests.insert(path.into(), digest);
    }

    #[must_use]
    pub fn get(&self, path: &Path) -> Option<&ContentDigest> {
        self.digests.get(path)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.digests.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }
}
