use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

struct Cached<V> {
    value: V,
    fetched_at: Instant,
}

struct Slot<V> {
    state: Mutex<Option<Cached<V>>>,
}

/// Read-through cache keyed by query name.
///
/// A value is served until it is older than `stale_time`. Callers asking for the
/// same key while a fetch is running wait for that fetch instead of starting
/// their own. Failed fetches are retried with exponential backoff.
pub struct QueryCache<V> {
    slots: RwLock<HashMap<String, Arc<Slot<V>>>>,
    stale_time: Duration,
    retry: u32,
    retry_base: Duration,
}

impl<V: Clone> QueryCache<V> {
    pub fn new(stale_time: Duration, retry: u32) -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            stale_time,
            retry,
            retry_base: Duration::from_secs(1),
        }
    }

    pub fn with_retry_base(mut self, base: Duration) -> Self {
        self.retry_base = base;
        self
    }

    fn slot(&self, key: &str) -> Arc<Slot<V>> {
        if let Some(slot) = self.slots.read().unwrap_or_else(|e| e.into_inner()).get(key) {
            return slot.clone();
        }
        let mut slots = self.slots.write().unwrap_or_else(|e| e.into_inner());
        slots
            .entry(key.to_string())
            .or_insert_with(|| {
                Arc::new(Slot {
                    state: Mutex::new(None),
                })
            })
            .clone()
    }

    pub async fn get_or_fetch<F, Fut, E>(&self, key: &str, fetch: F) -> Result<V, E>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<V, E>>,
        E: std::fmt::Display,
    {
        let slot = self.slot(key);
        let mut state = slot.state.lock().await;

        if let Some(cached) = state.as_ref() {
            if cached.fetched_at.elapsed() < self.stale_time {
                tracing::trace!("cache hit: {}", key);
                return Ok(cached.value.clone());
            }
        }

        tracing::debug!("cache miss: {}", key);
        let value = self.fetch_with_retry(key, &fetch).await?;
        *state = Some(Cached {
            value: value.clone(),
            fetched_at: Instant::now(),
        });
        Ok(value)
    }

    async fn fetch_with_retry<F, Fut, E>(&self, key: &str, fetch: &F) -> Result<V, E>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<V, E>>,
        E: std::fmt::Display,
    {
        let mut attempt = 0;
        loop {
            match fetch().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.retry => {
                    let delay = self.retry_delay(attempt);
                    tracing::warn!(
                        "fetch for '{}' failed (attempt {}): {}; retrying in {:?}",
                        key,
                        attempt + 1,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn retry_delay(&self, attempt: u32) -> Duration {
        self.retry_base
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(MAX_RETRY_DELAY)
    }

    /// Drops every entry whose key starts with `prefix`.
    pub fn invalidate(&self, prefix: &str) {
        let mut slots = self.slots.write().unwrap_or_else(|e| e.into_inner());
        let before = slots.len();
        slots.retain(|key, _| !key.starts_with(prefix));
        tracing::debug!(
            "invalidated {} cache entr(ies) for '{}'",
            before - slots.len(),
            prefix
        );
    }

    /// Drops the entry for exactly `key`.
    pub fn remove(&self, key: &str) {
        self.slots
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key);
    }

    /// Drops entries that are stale or were never filled. Entries with a fetch in
    /// flight are kept. Returns how many were dropped.
    pub fn evict_stale(&self) -> usize {
        let mut slots = self.slots.write().unwrap_or_else(|e| e.into_inner());
        let before = slots.len();
        slots.retain(|_, slot| match slot.state.try_lock() {
            Ok(state) => state
                .as_ref()
                .is_some_and(|cached| cached.fetched_at.elapsed() < self.stale_time),
            Err(_) => true,
        });
        before - slots.len()
    }

    pub fn clear(&self) {
        self.slots
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    pub fn len(&self) -> usize {
        self.slots.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
