//! In-memory map backend.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use memoscope_core::{Backend, BackendError, CacheKey};

/// Statistics about backend usage.
///
/// Counters are observability only; they never influence caching behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of lookups that found an entry.
    pub hits: u64,
    /// Number of lookups that found nothing.
    pub misses: u64,
    /// Number of stores.
    pub stores: u64,
}

impl CacheStats {
    /// Total number of lookups.
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    /// Calculate the hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.lookups();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// A process-local map backend.
///
/// Entries live for the lifetime of the backend instance; there is no
/// eviction and no expiry. Safe to share across threads, so one instance can
/// be bound in several contexts at once to act as a shared cache.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<CacheKey, Vec<u8>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    stores: AtomicU64,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        match self.entries.read() {
            Ok(entries) => entries.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// Whether the backend holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the usage counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            stores: self.stores.load(Ordering::Relaxed),
        }
    }
}

impl Backend for MemoryBackend {
    fn get(&self, key: &CacheKey) -> Result<Option<Vec<u8>>, BackendError> {
        let entries = self.entries.read().map_err(|_| BackendError::Unavailable {
            reason: "entry map lock poisoned".to_string(),
        })?;
        match entries.get(key) {
            Some(value) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Ok(Some(value.clone()))
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
        }
    }

    fn set(&self, key: &CacheKey, value: &[u8]) -> Result<(), BackendError> {
        let mut entries = self.entries.write().map_err(|_| BackendError::Unavailable {
            reason: "entry map lock poisoned".to_string(),
        })?;
        entries.insert(key.clone(), value.to_vec());
        self.stores.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
