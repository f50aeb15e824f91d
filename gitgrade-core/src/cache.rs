//! Memoized lookups shared by one evaluation session.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use log::debug;
use serde_json::Value;

use crate::domain::RepositoryRef;
use crate::transport::Transport;

type Slot = Arc<OnceLock<Option<Value>>>;

/// URL-keyed memo of JSON fetches.
///
/// Absence is stored like any other value, so a failed fetch is not retried.
/// There is no expiry and no invalidation; drop the cache with its session.
/// Concurrent callers asking for the same URL wait for the first fetch.
#[derive(Debug, Default)]
pub struct FetchCache {
    slots: Mutex<HashMap<String, Slot>>,
}

impl FetchCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the memoized value for `url`, fetching it through `transport`
    /// on first access.
    pub fn get_json<T: Transport + ?Sized>(&self, transport: &T, url: &str) -> Option<Value> {
        self.get_or_fetch(url, || transport.fetch_json(url))
    }

    /// Return the memoized value for `url`, computing it with `fetch` on
    /// first access.
    pub fn get_or_fetch<F>(&self, url: &str, fetch: F) -> Option<Value>
    where
        F: FnOnce() -> Option<Value>,
    {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            slots.entry(url.to_string()).or_default().clone()
        };
        if let Some(value) = slot.get() {
            debug!("cache hit: {url}");
            return value.clone();
        }
        slot.get_or_init(|| {
            debug!("cache miss: {url}");
            fetch()
        })
        .clone()
    }

    /// Number of URLs touched so far.
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no URL was touched yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Default branch per repository.
#[derive(Debug, Default)]
pub struct BranchCache {
    branches: Mutex<HashMap<RepositoryRef, String>>,
}

impl BranchCache {
    /// Create an empty branch cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached branch for `repo`, resolving it with `resolve` once.
    pub fn get_or_resolve<F>(&self, repo: &RepositoryRef, resolve: F) -> String
    where
        F: FnOnce() -> String,
    {
        if let Some(branch) = self
            .branches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(repo)
        {
            return branch.clone();
        }
        let branch = resolve();
        self.branches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(repo.clone())
            .or_insert(branch)
            .clone()
    }
}
