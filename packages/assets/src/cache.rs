use crate::hash::ContentHash;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Content hash -> uploaded URL, for the lifetime of the owning pipeline.
///
/// Entries are never evicted. Writes are idempotent: the same bytes always
/// map to the same URL, so two racing uploads of one asset are harmless.
#[derive(Debug, Default)]
pub struct AssetCache {
    entries: Mutex<HashMap<String, String>>,
}

impl AssetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, hash: &ContentHash) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(hash.as_str())
            .cloned()
    }

    pub fn insert(&self, hash: &ContentHash, url: String) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(hash.as_str().to_string(), url);
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
