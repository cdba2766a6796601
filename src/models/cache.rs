use crate::models::stream::CachedPayload;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug, Clone)]
pub(crate) struct CacheEntry {
    pub(crate) data: Arc<CachedPayload>,
    pub(crate) fetched_at: i64,
}

#[derive(Debug)]
struct Slot<E> {
    entry: Option<CacheEntry>,
    /// Outcome of the most recent refresh attempt, if it failed.
    failure: Option<(u64, E)>,
}

/// Single-slot cache for the flattened schedule.
///
/// The slot lock is held across the refresh, so concurrent readers that find
/// the entry stale wait for one fetch instead of each issuing their own.
/// Readers that queued behind a failed refresh get that failure back rather
/// than retrying it one after another.
#[derive(Debug)]
pub struct StreamCache<E> {
    slot: Mutex<Slot<E>>,
    attempts: AtomicU64,
}

impl<E> Default for StreamCache<E> {
    fn default() -> Self {
        Self {
            slot: Mutex::new(Slot {
                entry: None,
                failure: None,
            }),
            attempts: AtomicU64::new(0),
        }
    }
}

impl<E: Clone> StreamCache<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored payload if it is younger than `ttl_secs` at `now`,
    /// otherwise runs `fetch` and stores its result stamped with `now`.
    ///
    /// A failed fetch leaves the previous entry in place.
    pub async fn get_or_refresh<F, Fut>(
        &self,
        now: i64,
        ttl_secs: i64,
        fetch: F,
    ) -> Result<Arc<CachedPayload>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<CachedPayload, E>>,
    {
        let seen = self.attempts.load(Ordering::Acquire);
        let mut slot = self.slot.lock().await;

        if let Some(entry) = slot.entry.as_ref() {
            let age = now - entry.fetched_at;
            if age < ttl_secs {
                debug!(age, "Cache hit for stream schedule");
                return Ok(entry.data.clone());
            }
            debug!(age, "Cached stream schedule expired");
        } else {
            debug!("Cache miss for stream schedule");
        }

        // A refresh finished while we waited for the lock and it failed.
        if let Some((attempt, err)) = slot.failure.as_ref() {
            if *attempt > seen {
                debug!(attempt, "Sharing failed refresh with waiting reader");
                return Err(err.clone());
            }
        }

        let result = fetch().await;
        let attempt = self.attempts.fetch_add(1, Ordering::AcqRel) + 1;
        match result {
            Ok(payload) => {
                let data = Arc::new(payload);
                slot.entry = Some(CacheEntry {
                    data: data.clone(),
                    fetched_at: now,
                });
                slot.failure = None;
                Ok(data)
            }
            Err(err) => {
                slot.failure = Some((attempt, err.clone()));
                Err(err)
            }
        }
    }

    #[cfg(test)]
    pub(crate) async fn entry(&self) -> Option<CacheEntry> {
        self.slot.lock().await.entry.clone()
    }
}
