//! Read-through cache of extracted fragment bodies.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use sha2::{Digest, Sha256};

/// Identity of a fragment file's content.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ContentDigest(String);

impl ContentDigest {
    /// SHA-256 of `content`, hex-encoded.
    #[must_use]
    pub fn of(content: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content);
        Self(hex::encode(hasher.finalize()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Cache of extracted fragment bodies keyed by resolved path.
///
/// Implementations must never return an entry whose digest differs from the
/// one requested.
pub trait FragmentCache: Send + Sync {
    /// Body cached for `path` when its content has `digest`.
    fn get(&self, path: &Path, digest: &ContentDigest) -> Option<String>;

    /// Store the body extracted from `path` whose content has `digest`.
    fn set(&self, path: &Path, digest: ContentDigest, body: &str);
}

/// Cache that stores nothing.
#[derive(Debug, Default)]
pub struct NullFragmentCache;

impl FragmentCache for NullFragmentCache {
    fn get(&self, _path: &Path, _digest: &ContentDigest) -> Option<String> {
        None
    }

    fn set(&self, _path: &Path, _digest: ContentDigest, _body: &str) {}
}

/// In-memory cache for the lifetime of one run.
#[derive(Debug, Default)]
pub struct MemoryFragmentCache {
    entries: RwLock<HashMap<PathBuf, (ContentDigest, String)>>,
}

impl MemoryFragmentCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached bodies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().map_or(0, |entries| entries.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FragmentCache for MemoryFragmentCache {
    fn get(&self, path: &Path, digest: &ContentDigest) -> Option<String> {
        let entries = self.entries.read().ok()?;
        entries
            .get(path)
            .filter(|(cached, _)| cached == digest)
            .map(|(_, body)| body.clone())
    }

    fn set(&self, path: &Path, digest: ContentDigest, body: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(path.to_path_buf(), (digest, body.to_owned()));
        }
    }
}
