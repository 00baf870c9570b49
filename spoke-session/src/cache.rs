//! Local draft cache
//!
//! Holds the single in-progress record in client-durable storage so editing
//! survives connectivity loss. Cache writes are best-effort everywhere: a
//! cache failure must never fail a save.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// The cached in-progress draft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedDraft {
    pub subject_name: String,
    /// Full mapping, clamped; fractional values are preserved here
    pub ratings: BTreeMap<String, f64>,
    pub saved_at: DateTime<Utc>,
}

/// Client-durable storage for the in-progress draft
pub trait LocalCache: Send + Sync {
    /// Persist the draft; callers treat failure as non-fatal
    fn store(&self, draft: &CachedDraft) -> std::io::Result<()>;
    /// Load the cached draft, if one exists and parses
    fn load(&self) -> Option<CachedDraft>;
    /// Drop the cached draft
    fn clear(&self);
}

/// JSON file cache under the root data folder
pub struct FileCache {
    path: PathBuf,
}

impl FileCache {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Cache at the standard location under `root_folder`
    pub fn in_root_folder(root_folder: &Path) -> Self {
        Self::new(spoke_common::config::cache_path(root_folder))
    }
}

impl LocalCache for FileCache {
    fn store(&self, draft: &CachedDraft) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(draft)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(&self.path, json)
    }

    fn load(&self) -> Option<CachedDraft> {
        let text = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&text) {
            Ok(draft) => Some(draft),
            Err(e) => {
                // A corrupt cache is treated as no cache
                debug!("Ignoring unreadable draft cache {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn clear(&self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// In-memory cache for tests and ephemeral sessions
#[derive(Default)]
pub struct MemoryCache {
    slot: Mutex<Option<CachedDraft>>,
}

impl LocalCache for MemoryCache {
    fn store(&self, draft: &CachedDraft) -> std::io::Result<()> {
        *self.slot.lock().unwrap() = Some(draft.clone());
        Ok(())
    }

    fn load(&self) -> Option<CachedDraft> {
        self.slot.lock().unwrap().clone()
    }

    fn clear(&self) {
        *self.slot.lock().unwrap() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> CachedDraft {
        let mut ratings = BTreeMap::new();
        ratings.insert("vision".to_string(), 4.0);
        ratings.insert("empathy".to_string(), 2.5);
        CachedDraft {
            subject_name: "Jane Doe".to_string(),
            ratings,
            saved_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_file_cache_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path().join("nested").join("draft.json"));

        assert!(cache.load().is_none());
        cache.store(&draft()).unwrap();

        let loaded = cache.load().unwrap();
        assert_eq!(loaded.subject_name, "Jane Doe");
        // Fractional values survive the round trip
        assert_eq!(loaded.ratings.get("empathy").copied(), Some(2.5));

        cache.clear();
        assert!(cache.load().is_none());
        // Clearing an empty cache is fine
        cache.clear();
    }

    #[test]
    fn test_corrupt_cache_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("draft.json");
        std::fs::write(&path, "{not json").unwrap();

        let cache = FileCache::new(path);
        assert!(cache.load().is_none());
    }

    #[test]
    fn test_memory_cache() {
        let cache = MemoryCache::default();
        assert!(cache.load().is_none());
        cache.store(&draft()).unwrap();
        assert!(cache.load().is_some());
        cache.clear();
        assert!(cache.load().is_none());
    }
}
