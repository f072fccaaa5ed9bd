//! Application state for the roster engine API.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::calculation::{CacheStats, SettlementCache, SettlementInput};
use crate::config::ConfigLoader;
use crate::models::SettlementResult;

/// Shared application state.
///
/// Holds the loaded configuration and the process-local settlement cache.
#[derive(Clone)]
pub struct AppState {
    /// The loaded engine configuration.
    config: Arc<ConfigLoader>,
    /// Settlement memo shared by all handlers.
    cache: Arc<Mutex<SettlementCache>>,
}

impl AppState {
    /// Creates a new application state with the given configuration loader.
    ///
    /// The cache is bounded by the configured `cache_capacity`.
    pub fn new(config: ConfigLoader) -> Self {
        let capacity = config.config().settlement().cache_capacity;
        Self {
            config: Arc::new(config),
            cache: Arc::new(Mutex::new(SettlementCache::with_capacity(capacity))),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Settles one input through the shared cache.
    pub fn settle(&self, input: &SettlementInput) -> SettlementResult {
        self.cache().settle(input)
    }

    /// Settles many inputs through the shared cache.
    pub fn settle_batch(&self, inputs: &[SettlementInput]) -> (Vec<SettlementResult>, CacheStats) {
        let mut cache = self.cache();
        let results = cache.settle_batch(inputs);
        (results, cache.stats())
    }

    /// Current cache counters.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache().stats()
    }

    // A panic mid-settle leaves at worst a missing entry, so a poisoned lock
    // is still usable.
    fn cache(&self) -> MutexGuard<'_, SettlementCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
