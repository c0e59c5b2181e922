use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::OnceCell;

/// Unbounded memo for one run, keyed by string.
///
/// Every key owns a once-cell, so concurrent first lookups of the same key
/// through [`Cache::remember_async`] compute once and the later callers wait
/// for that result.
pub struct Cache<V> {
    entries: Mutex<HashMap<String, Arc<OnceCell<V>>>>,
}

impl<V: Clone> Cache<V> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Stores `value` under `key`, replacing any previous entry, and returns it.
    pub fn set(&self, key: impl Into<String>, value: V) -> V {
        let cell = Arc::new(OnceCell::new_with(Some(value.clone())));
        self.lock().insert(key.into(), cell);
        value
    }

    pub fn get(&self, key: &str) -> Option<V> {
        self.lock().get(key).and_then(|cell| cell.get().cloned())
    }

    pub fn has(&self, key: &str) -> bool {
        self.lock().get(key).is_some_and(|cell| cell.initialized())
    }

    /// Returns the cached value for `key`, computing and storing it first if needed.
    pub fn remember<F>(&self, key: &str, compute: F) -> V
    where
        F: FnOnce() -> V,
    {
        let cell = self.cell(key);
        if let Some(value) = cell.get() {
            return value.clone();
        }
        let value = compute();
        match cell.set(value.clone()) {
            Ok(()) => value,
            // Someone else filled the cell meanwhile; theirs wins.
            Err(_) => cell.get().cloned().unwrap_or(value),
        }
    }

    /// Async form of [`Cache::remember`]; the settled value is what gets cached.
    pub async fn remember_async<F, Fut>(&self, key: &str, compute: F) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V>,
    {
        let cell = self.cell(key);
        cell.get_or_init(compute).await.clone()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Removes `key`, returning whether a value was stored under it.
    pub fn forget(&self, key: &str) -> bool {
        self.lock()
            .remove(key)
            .is_some_and(|cell| cell.initialized())
    }

    /// Number of settled entries.
    pub fn len(&self) -> usize {
        self.lock().values().filter(|cell| cell.initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn cell(&self, key: &str) -> Arc<OnceCell<V>> {
        self.lock()
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<OnceCell<V>>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V: Clone> Default for Cache<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::Cache;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn set_get_has() {
        let cache = Cache::new();
        assert_eq!(cache.get("a"), None);
        assert!(!cache.has("a"));

        assert_eq!(cache.set("a", 1), 1);
        assert_eq!(cache.get("a"), Some(1));
        assert!(cache.has("a"));

        cache.set("a", 2);
        assert_eq!(cache.get("a"), Some(2));
    }

    #[test]
    fn remember_computes_once() {
        let cache = Cache::new();
        let calls = AtomicUsize::new(0);
        let compute = || {
            calls.fetch_add(1, Ordering::SeqCst);
            "value".to_string()
        };

        assert_eq!(cache.remember("k", compute), "value");
        assert_eq!(cache.remember("k", || unreachable!()), "value");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn forget_and_clear() {
        let cache = Cache::new();
        cache.set("a", 1);
        cache.set("b", 2);

        assert!(cache.forget("a"));
        assert!(!cache.forget("a"));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
        assert!(!cache.has("b"));
    }

    #[tokio::test]
    async fn remember_async_caches_the_settled_value() {
        let cache = Cache::new();
        let value = cache.remember_async("k", || async { 42 }).await;
        assert_eq!(value, 42);
        assert_eq!(cache.get("k"), Some(42));
        assert_eq!(cache.remember("k", || 0), 42);
    }

    #[tokio::test]
    async fn concurrent_first_lookups_share_one_computation() {
        let cache = Arc::new(Cache::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let lookups = (0..8).map(|_| {
            let cache = cache.clone();
            let calls = calls.clone();
            async move {
                cache
                    .remember_async("shared", || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        "resolved"
                    })
                    .await
            }
        });
        let results = futures_util::future::join_all(lookups).await;

        assert!(results.iter().all(|r| *r == "resolved"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
