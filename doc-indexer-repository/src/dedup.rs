//! Content-hash deduplication for documents within one indexing call.

use std::collections::HashSet;

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of a serialized document.
///
/// Used as the document `_id`, so re-indexing an identical body overwrites
/// the same document instead of creating a new one.
///
/// # Example
///
/// ```
/// use doc_indexer_repository::content_hash;
///
/// let id = content_hash(b"\"example document\"");
/// assert_eq!(id.len(), 64);
/// ```
pub fn content_hash(body: &[u8]) -> String {
    hex::encode(Sha256::digest(body))
}

/// Tracks which document bodies have been admitted during one call.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<String>,
    redundant_skipped: usize,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a serialized document.
    ///
    /// Returns its id the first time a body is seen and `None` for every
    /// repeat, which is counted as redundant.
    pub fn admit(&mut self, body: &[u8]) -> Option<String> {
        let id = content_hash(body);
        if self.seen.contains(&id) {
            self.redundant_skipped += 1;
            return None;
        }
        self.seen.insert(id.clone());
        Some(id)
    }

    /// Number of repeated bodies rejected so far.
    pub fn redundant_skipped(&self) -> usize {
        self.redundant_skipped
    }

    /// Number of distinct bodies admitted so far.
    pub fn unique(&self) -> usize {
        self.seen.len()
    }
}
