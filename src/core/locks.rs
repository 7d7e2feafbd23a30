//! Per-band exclusive write locks (§5, §9 "Global state").
//!
//! Keyed by normalized band name; entries are plain `Arc<Mutex<()>>` so they
//! can be cloned out of the map and locked without holding the map's own
//! shard lock across the critical section. Stale entries (no outstanding
//! `Arc` clones) are swept on `gc()`.

use dashmap::DashMap;
use std::sync::{Arc, Mutex};

pub struct BandLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl BandLocks {
    pub fn new() -> Self {
        BandLocks {
            locks: DashMap::new(),
        }
    }

    pub fn normalize(band_name: &str) -> String {
        band_name.trim().to_string()
    }

    /// Returns the lock for a band, creating it if this is the first writer.
    pub fn lock_for(&self, band_name: &str) -> Arc<Mutex<()>> {
        let key = Self::normalize(band_name);
        self.locks
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Removes entries with no other outstanding references.
    pub fn gc(&self) {
        self.locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    }
}

impl Default for BandLocks {
    fn default() -> Self {
        Self::new()
    }
}
