//! Memoization of settlement results.
//!
//! Results are stored per work-record id together with a hash of the full
//! [`SettlementInput`]. A lookup whose input hash differs from the stored one
//! is stale and is recomputed. Entries never expire on time. The cache holds
//! at most its capacity; inserting past it evicts the oldest record first.
//! The cache is never a source of truth: dropping it only costs recomputation.

use std::collections::{HashMap, VecDeque};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::SettlementResult;

use super::settlement::{SettlementInput, settle_input};

#[derive(Debug, Clone)]
struct CacheEntry {
    input_hash: u64,
    result: SettlementResult,
}

/// Entries held by a cache built with [`SettlementCache::new`].
pub const DEFAULT_CACHE_CAPACITY: usize = 10_000;

/// Hit and miss counters for a [`SettlementCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that had to compute.
    pub misses: u64,
    /// Entries currently held.
    pub entries: usize,
    /// Entries dropped to stay within capacity.
    #[serde(default)]
    pub evictions: u64,
}

/// Process-local settlement memo keyed by work-record id.
#[derive(Debug)]
pub struct SettlementCache {
    entries: HashMap<String, CacheEntry>,
    // Record ids in insertion order, oldest first.
    order: VecDeque<String>,
    capacity: usize,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl Default for SettlementCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

/// Structural hash of a settlement input.
pub fn input_hash(input: &SettlementInput) -> u64 {
    let mut hasher = DefaultHasher::new();
    input.hash(&mut hasher);
    hasher.finish()
}

impl SettlementCache {
    /// Creates an empty cache holding up to [`DEFAULT_CACHE_CAPACITY`] entries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty cache holding up to `capacity` entries. A capacity of
    /// zero stores nothing.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Maximum number of entries held.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the cached result for `input`, computing and storing it when
    /// absent or stale.
    pub fn settle(&mut self, input: &SettlementInput) -> SettlementResult {
        let record_id = &input.record.id;
        let hash = input_hash(input);

        if let Some(entry) = self.entries.get(record_id) {
            if entry.input_hash == hash {
                self.hits += 1;
                debug!(record_id = %record_id, "Settlement cache hit");
                return entry.result.clone();
            }
        }

        self.misses += 1;
        let result = settle_input(input);
        debug!(record_id = %record_id, "Settlement cache miss");
        self.store(
            record_id,
            CacheEntry {
                input_hash: hash,
                result: result.clone(),
            },
        );
        result
    }

    fn store(&mut self, record_id: &str, entry: CacheEntry) {
        if self.capacity == 0 {
            return;
        }
        // A stale entry is replaced in place and keeps its position.
        if let Some(existing) = self.entries.get_mut(record_id) {
            *existing = entry;
            return;
        }
        while self.entries.len() >= self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
            self.evictions += 1;
            debug!(record_id = %oldest, "Settlement cache eviction");
        }
        self.order.push_back(record_id.to_string());
        self.entries.insert(record_id.to_string(), entry);
    }

    /// Settles every input in order through the cache.
    pub fn settle_batch(&mut self, inputs: &[SettlementInput]) -> Vec<SettlementResult> {
        inputs.iter().map(|input| self.settle(input)).collect()
    }

    /// The stored result for a record, regardless of staleness.
    pub fn get(&self, record_id: &str) -> Option<&SettlementResult> {
        self.entries.get(record_id).map(|entry| &entry.result)
    }

    /// True when there is no entry for `record_id` or it was computed from a
    /// different input.
    pub fn is_stale(&self, record_id: &str, input_hash: u64) -> bool {
        self.entries
            .get(record_id)
            .is_none_or(|entry| entry.input_hash != input_hash)
    }

    /// Drops the entry for a record. Returns whether one existed.
    pub fn invalidate(&mut self, record_id: &str) -> bool {
        let removed = self.entries.remove(record_id).is_some();
        if removed {
            self.order.retain(|id| id != record_id);
        }
        removed
    }

    /// Drops every entry and resets the counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.hits = 0;
        self.misses = 0;
        self.evictions = 0;
    }

    /// Number of entries held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entries are held.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.entries.len(),
            evictions: self.evictions,
        }
    }
}
