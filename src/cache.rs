use crate::errors::ApiResult;
use crate::utilities::Utility;
use log::info;
use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Memoizes computed results per utility and key, for the lifetime of the
/// process. Entries are never evicted; a recompute happens only after an
/// explicit [`ResultCache::invalidate`].
///
/// Each key gets its own cell, and the cell's lock is held across the
/// compute, so concurrent requests for the same key wait for the first one
/// instead of repeating the work. A failed compute stores nothing.
pub struct ResultCache<K, V> {
    cells: Mutex<HashMap<(Utility, K), Arc<Mutex<Option<V>>>>>,
}

impl<K, V> ResultCache<K, V>
where
    K: Clone + Debug + Eq + Hash,
    V: Clone,
{
    pub fn new() -> Self {
        ResultCache {
            cells: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached value for the key, or runs `compute` and stores its
    /// result. The boolean tells whether the value came out of the cache.
    pub async fn get_or_compute<F, Fut>(
        &self,
        utility: Utility,
        key: K,
        compute: F,
    ) -> ApiResult<(V, bool)>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ApiResult<V>>,
    {
        let cell = {
            let mut cells = self.cells.lock().await;
            cells
                .entry((utility, key.clone()))
                .or_insert_with(|| Arc::new(Mutex::new(None)))
                .clone()
        };
        let mut slot = cell.lock().await;
        if let Some(value) = slot.as_ref() {
            info!("returning cached result for {} {:?}", utility.name(), key);
            return Ok((value.clone(), true));
        }
        info!("not cached, computing {} {:?}", utility.name(), key);
        let value = compute().await?;
        *slot = Some(value.clone());
        Ok((value, false))
    }

    /// Drops every entry stored under the utility. A compute already in
    /// flight finishes on its detached cell and gets recomputed next time.
    pub async fn invalidate(&self, utility: Utility) {
        let mut cells = self.cells.lock().await;
        cells.retain(|(cached_utility, _), _| *cached_utility != utility);
        info!("dropped cached results for {}", utility.name());
    }
}

impl<K, V> Default for ResultCache<K, V>
where
    K: Clone + Debug + Eq + Hash,
    V: Clone,
{
    fn default() -> Self {
        ResultCache::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ApiError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::{sleep, Duration};

    mod get_or_compute {
        use super::*;

        #[tokio::test]
        async fn computes_once_and_replays() {
            let cache = ResultCache::new();
            let calls = AtomicUsize::new(0);
            let compute = || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(41)
            };
            let (first, first_cached) = cache
                .get_or_compute(Utility::Tepco, "hour".to_string(), compute)
                .await
                .expect("compute should succeed");
            let (second, second_cached) = cache
                .get_or_compute(Utility::Tepco, "hour".to_string(), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(99)
                })
                .await
                .expect("replay should succeed");
            assert_eq!((first, first_cached), (41, false));
            assert_eq!((second, second_cached), (41, true));
            assert_eq!(calls.load(Ordering::SeqCst), 1);
        }

        #[tokio::test]
        async fn keys_are_scoped_to_the_utility() {
            let cache = ResultCache::new();
            let (_, _) = cache
                .get_or_compute(Utility::Tepco, "hour".to_string(), || async { Ok(1) })
                .await
                .expect("compute should succeed");
            let (value, cached) = cache
                .get_or_compute(Utility::Kepco, "hour".to_string(), || async { Ok(2) })
                .await
                .expect("compute should succeed");
            assert_eq!((value, cached), (2, false));
        }

        #[tokio::test]
        async fn stores_nothing_on_failure() {
            let cache = ResultCache::new();
            let failed: ApiResult<(i32, bool)> = cache
                .get_or_compute(Utility::Tepco, "hour".to_string(), || async {
                    Err(ApiError::FactorFeedUnavailable("connection refused".to_string()))
                })
                .await;
            assert!(failed.is_err());
            let (value, cached) = cache
                .get_or_compute(Utility::Tepco, "hour".to_string(), || async { Ok(7) })
                .await
                .expect("retry should succeed");
            assert_eq!((value, cached), (7, false));
        }

        #[tokio::test]
        async fn concurrent_requests_share_one_compute() {
            let cache = Arc::new(ResultCache::new());
            let calls = Arc::new(AtomicUsize::new(0));
            let mut handles = Vec::new();
            for _ in 0..2 {
                let cache = Arc::clone(&cache);
                let calls = Arc::clone(&calls);
                handles.push(tokio::spawn(async move {
                    cache
                        .get_or_compute(Utility::Tepco, "month".to_string(), || async {
                            calls.fetch_add(1, Ordering::SeqCst);
                            sleep(Duration::from_millis(20)).await;
                            Ok(640)
                        })
                        .await
                        .expect("compute should succeed")
                }));
            }
            let mut flags = Vec::new();
            for handle in handles {
                let (value, cached) = handle.await.expect("task should not panic");
                assert_eq!(value, 640);
                flags.push(cached);
            }
            flags.sort();
            assert_eq!(flags, vec![false, true]);
            assert_eq!(calls.load(Ordering::SeqCst), 1);
        }
    }

    mod invalidate {
        use super::*;

        #[tokio::test]
        async fn forces_a_recompute() {
            let cache = ResultCache::new();
            let (_, _) = cache
                .get_or_compute(Utility::Okiden, "hour".to_string(), || async { Ok(10) })
                .await
                .expect("compute should succeed");
            cache.invalidate(Utility::Okiden).await;
            let (value, cached) = cache
                .get_or_compute(Utility::Okiden, "hour".to_string(), || async { Ok(11) })
                .await
                .expect("recompute should succeed");
            assert_eq!((value, cached), (11, false));
        }

        #[tokio::test]
        async fn leaves_other_utilities_alone() {
            let cache = ResultCache::new();
            let (_, _) = cache
                .get_or_compute(Utility::Okiden, "hour".to_string(), || async { Ok(10) })
                .await
                .expect("compute should succeed");
            let (_, _) = cache
                .get_or_compute(Utility::Kyuden, "hour".to_string(), || async { Ok(20) })
                .await
                .expect("compute should succeed");
            cache.invalidate(Utility::Okiden).await;
            let (value, cached) = cache
                .get_or_compute(Utility::Kyuden, "hour".to_string(), || async { Ok(21) })
                .await
                .expect("replay should succeed");
            assert_eq!((value, cached), (20, true));
        }
    }
}
