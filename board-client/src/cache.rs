//! Client-side query cache with named partitions.
//!
//! Values are stored as JSON under a [`QueryKey`]. Invalidating a partition marks every
//! entry in it stale and notifies the partition's subscribers so dependent views refetch.
//! The cache is single-threaded; it is shared through `Rc<RefCell<_>>` and no borrow is
//! ever held across an await point.

use crate::config::ClientConfig;
use crate::error::CacheError;
use chrono::{DateTime, Duration, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::rc::{Rc, Weak};

pub const COMMENTS: &str = "comments";
pub const REVIEWS: &str = "reviews";
pub const GET_TOKEN: &str = "getToken";

// Never written to a persister; the credential already has its own storage.
const MEMORY_ONLY: &[&str] = &[GET_TOKEN];

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryKey {
    pub partition: String,
    pub scope: Vec<String>,
}

impl QueryKey {
    pub fn new(partition: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            scope: Vec::new(),
        }
    }

    pub fn scoped<I, S>(partition: impl Into<String>, scope: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            partition: partition.into(),
            scope: scope.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: serde_json::Value,
    updated_at: DateTime<Utc>,
    stale: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedEntry {
    pub key: QueryKey,
    pub value: serde_json::Value,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub stale: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedCache {
    pub timestamp: DateTime<Utc>,
    pub buster: String,
    pub entries: Vec<PersistedEntry>,
}

/// Storage backend for cache snapshots (browser local storage, a file, memory).
pub trait CachePersister {
    fn persist(&self, snapshot: &PersistedCache) -> Result<(), CacheError>;
    fn restore(&self) -> Result<Option<PersistedCache>, CacheError>;
    fn remove(&self) -> Result<(), CacheError>;
}

/// Keeps the serialized snapshot in memory.
#[derive(Debug, Default)]
pub struct MemoryPersister {
    slot: RefCell<Option<String>>,
}

impl MemoryPersister {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl CachePersister for MemoryPersister {
    fn persist(&self, snapshot: &PersistedCache) -> Result<(), CacheError> {
        *self.slot.borrow_mut() = Some(serde_json::to_string(snapshot)?);
        Ok(())
    }

    fn restore(&self) -> Result<Option<PersistedCache>, CacheError> {
        match self.slot.borrow().as_deref() {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn remove(&self) -> Result<(), CacheError> {
        self.slot.borrow_mut().take();
        Ok(())
    }
}

type Listener = Rc<dyn Fn(&str)>;

struct ListenerSlot {
    id: u64,
    partition: String,
    callback: Listener,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<QueryKey, CacheEntry>,
    listeners: Vec<ListenerSlot>,
    next_listener_id: u64,
}

#[derive(Debug, Clone)]
struct CacheSettings {
    cache_time: Duration,
    stale_time: Duration,
    max_age: Duration,
    buster: String,
}

#[derive(Clone)]
pub struct QueryCache {
    state: Rc<RefCell<CacheState>>,
    settings: Rc<CacheSettings>,
    persister: Option<Rc<dyn CachePersister>>,
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.len())
            .field("settings", &self.settings)
            .field("persisted", &self.persister.is_some())
            .finish()
    }
}

impl PartialEq for QueryCache {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

/// Keeps a partition listener registered; dropping it unsubscribes.
pub struct Subscription {
    id: u64,
    state: Weak<RefCell<CacheState>>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            if let Ok(mut state) = state.try_borrow_mut() {
                state.listeners.retain(|slot| slot.id != self.id);
            }
        }
    }
}

impl QueryCache {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            state: Rc::new(RefCell::new(CacheState::default())),
            settings: Rc::new(CacheSettings {
                cache_time: config.cache_time,
                stale_time: config.stale_time,
                max_age: config.max_age,
                buster: config.buster.clone(),
            }),
            persister: None,
        }
    }

    pub fn with_persister(mut self, persister: Rc<dyn CachePersister>) -> Self {
        self.persister = Some(persister);
        self
    }

    pub fn len(&self) -> usize {
        self.state.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Loads a persisted snapshot. Returns how many entries were restored.
    pub fn restore(&self, now: DateTime<Utc>) -> usize {
        let Some(persister) = &self.persister else {
            return 0;
        };

        let snapshot = match persister.restore() {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => return 0,
            Err(e) => {
                tracing::warn!("Failed to restore query cache: {}", e);
                return 0;
            }
        };

        let expired = snapshot.timestamp + self.settings.max_age < now;
        if expired || snapshot.buster != self.settings.buster {
            tracing::debug!(
                "Discarding persisted query cache (expired: {}, buster: {:?})",
                expired,
                snapshot.buster
            );
            if let Err(e) = persister.remove() {
                tracing::warn!("Failed to remove persisted query cache: {}", e);
            }
            return 0;
        }

        let mut state = self.state.borrow_mut();
        let mut restored = 0;
        for entry in snapshot.entries {
            if MEMORY_ONLY.contains(&entry.key.partition.as_str()) {
                continue;
            }
            if entry.updated_at + self.settings.cache_time < now {
                continue;
            }
            state.entries.insert(
                entry.key,
                CacheEntry {
                    value: entry.value,
                    updated_at: entry.updated_at,
                    stale: entry.stale,
                },
            );
            restored += 1;
        }

        tracing::debug!("Restored {} query cache entries", restored);
        restored
    }

    pub fn persist(&self) {
        self.persist_at(Utc::now());
    }

    fn persist_at(&self, now: DateTime<Utc>) {
        let Some(persister) = &self.persister else {
            return;
        };

        let snapshot = {
            let state = self.state.borrow();
            PersistedCache {
                timestamp: now,
                buster: self.settings.buster.clone(),
                entries: state
                    .entries
                    .iter()
                    .filter(|(key, _)| !MEMORY_ONLY.contains(&key.partition.as_str()))
                    .map(|(key, entry)| PersistedEntry {
                        key: key.clone(),
                        value: entry.value.clone(),
                        updated_at: entry.updated_at,
                        stale: entry.stale,
                    })
                    .collect(),
            }
        };

        if let Err(e) = persister.persist(&snapshot) {
            tracing::warn!("Failed to persist query cache: {}", e);
        }
    }

    /// Cached value regardless of freshness, for showing something while a refetch runs.
    pub fn cached<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let state = self.state.borrow();
        let entry = state.entries.get(key)?;
        serde_json::from_value(entry.value.clone()).ok()
    }

    pub fn is_fresh(&self, key: &QueryKey, now: DateTime<Utc>) -> bool {
        self.state
            .borrow()
            .entries
            .get(key)
            .map(|entry| !entry.stale && now - entry.updated_at < self.settings.stale_time)
            .unwrap_or(false)
    }

    pub fn set<T: Serialize>(&self, key: QueryKey, value: &T) {
        self.set_at(key, value, Utc::now());
    }

    pub fn set_at<T: Serialize>(&self, key: QueryKey, value: &T, now: DateTime<Utc>) {
        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Value for {:?} is not cacheable: {}", key, e);
                return;
            }
        };

        self.state.borrow_mut().entries.insert(
            key,
            CacheEntry {
                value,
                updated_at: now,
                stale: false,
            },
        );
        self.persist_at(now);
    }

    pub async fn fetch<T, E, F, Fut>(&self, key: QueryKey, fetcher: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.fetch_at(key, Utc::now(), fetcher).await
    }

    /// Serves a fresh cached value or runs `fetcher` and stores its result. Errors are not cached.
    pub async fn fetch_at<T, E, F, Fut>(
        &self,
        key: QueryKey,
        now: DateTime<Utc>,
        fetcher: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if self.is_fresh(&key, now) {
            if let Some(value) = self.cached(&key) {
                tracing::trace!("Query cache hit for {:?}", key);
                return Ok(value);
            }
        }

        tracing::trace!("Fetching {:?}", key);
        let value = fetcher().await?;
        self.set_at(key, &value, now);
        Ok(value)
    }

    /// Marks every entry of `partition` stale and notifies its subscribers.
    pub fn invalidate(&self, partition: &str) -> usize {
        let (marked, callbacks) = {
            let mut state = self.state.borrow_mut();
            let mut marked = 0;
            for (key, entry) in state.entries.iter_mut() {
                if key.partition == partition {
                    entry.stale = true;
                    marked += 1;
                }
            }
            let callbacks: Vec<Listener> = state
                .listeners
                .iter()
                .filter(|slot| slot.partition == partition)
                .map(|slot| slot.callback.clone())
                .collect();
            (marked, callbacks)
        };

        tracing::debug!(
            "Invalidated partition {:?}: {} entries, {} subscribers",
            partition,
            marked,
            callbacks.len()
        );

        for callback in callbacks {
            callback(partition);
        }

        self.persist();
        marked
    }

    /// Drops every entry of `partition` without notifying subscribers.
    pub fn remove_partition(&self, partition: &str) -> usize {
        let removed = {
            let mut state = self.state.borrow_mut();
            let before = state.entries.len();
            state.entries.retain(|key, _| key.partition != partition);
            before - state.entries.len()
        };

        if removed > 0 {
            tracing::debug!("Removed {} entries of partition {:?}", removed, partition);
            self.persist();
        }
        removed
    }

    pub fn subscribe(
        &self,
        partition: impl Into<String>,
        callback: impl Fn(&str) + 'static,
    ) -> Subscription {
        let mut state = self.state.borrow_mut();
        let id = state.next_listener_id;
        state.next_listener_id += 1;
        state.listeners.push(ListenerSlot {
            id,
            partition: partition.into(),
            callback: Rc::new(callback),
        });

        Subscription {
            id,
            state: Rc::downgrade(&self.state),
        }
    }

    /// Drops entries not written for longer than the cache time.
    pub fn collect_garbage(&self, now: DateTime<Utc>) -> usize {
        let cache_time = self.settings.cache_time;
        let removed = {
            let mut state = self.state.borrow_mut();
            let before = state.entries.len();
            state
                .entries
                .retain(|_, entry| entry.updated_at + cache_time >= now);
            before - state.entries.len()
        };

        if removed > 0 {
            tracing::debug!("Collected {} expired query cache entries", removed);
            self.persist_at(now);
        }
        removed
    }
}
