//! Record identity for deduplication.
//!
//! Posts carrying an identifier are keyed by it. Posts without one get a
//! fallback key hashed from their position and content, which is a heuristic
//! rather than a true identity.

use sha2::{Digest, Sha256};
use std::collections::HashSet;

/// Number of leading text characters folded into the fallback key.
pub const FALLBACK_TEXT_PREFIX: usize = 80;

/// Deduplication key for one post.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DedupKey {
    /// Stable post identifier.
    Id(String),
    /// SHA-256 (hex) of offset, in-page index, date, text length and prefix.
    Fallback(String),
}

impl DedupKey {
    /// Build the key for a cleaned post.
    pub fn for_post(offset: u32, index: usize, post_id: &str, date: &str, text: &str) -> Self {
        if !post_id.is_empty() {
            return DedupKey::Id(post_id.to_string());
        }

        let prefix: String = text.chars().take(FALLBACK_TEXT_PREFIX).collect();
        let mut hasher = Sha256::new();
        hasher.update(format!("{offset}:{index}").as_bytes());
        hasher.update(b"\n");
        hasher.update(date.as_bytes());
        hasher.update(b"\n");
        hasher.update(text.chars().count().to_string().as_bytes());
        hasher.update(b"\n");
        hasher.update(prefix.as_bytes());
        DedupKey::Fallback(hex::encode(hasher.finalize()))
    }
}

/// Keys already accepted during a run.
#[derive(Debug, Default)]
pub struct SeenKeys {
    keys: HashSet<DedupKey>,
}

impl SeenKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key; returns `false` if it was already present.
    pub fn insert(&mut self, key: DedupKey) -> bool {
        self.keys.insert(key)
    }
}
