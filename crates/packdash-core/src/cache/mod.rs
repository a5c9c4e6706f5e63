//! In-memory payload cache keyed by selector.
//!
//! Entries are replaced wholesale and never mutated in place, so readers
//! holding an `Arc<Payload>` always see one consistent build.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::kpi::types::{Payload, Selector};

#[derive(Default)]
pub struct PayloadCache {
    entries: Mutex<HashMap<Selector, Arc<Payload>>>,
}

impl PayloadCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, selector: &Selector) -> Option<Arc<Payload>> {
        let hit = self.lock().get(selector).cloned();
        if hit.is_some() {
            debug!(event = "core.cache.hit", selector = %selector);
        } else {
            debug!(event = "core.cache.miss", selector = %selector);
        }
        hit
    }

    /// Store a payload under `selector`, replacing any previous entry.
    pub fn put(&self, selector: Selector, payload: Arc<Payload>) {
        let replaced = self.lock().insert(selector, payload).is_some();
        debug!(event = "core.cache.stored", selector = %selector, replaced = replaced);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Selector, Arc<Payload>>> {
        // Entries are only ever moved in whole, so a poisoned map is intact
        self.entries.lock().unwrap_or_else(|poisoned| {
            warn!(event = "core.cache.lock_poisoned");
            poisoned.into_inner()
        })
    }
}
