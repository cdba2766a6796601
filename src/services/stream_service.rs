use crate::api::upstream::{ScheduleApi, StreamSource};
use crate::config::{Config, CACHE_TTL_SECS};
use crate::error::{AppError, AppResult};
use crate::models::cache::StreamCache;
use crate::models::stream::{CachedPayload, StreamRecord};
use crate::services::flatten::flatten;
use crate::services::query::{self, StreamQuery};
use crate::utils::clock::{Clock, SystemClock};
use std::sync::Arc;
use tracing::{info, warn};

pub struct StreamService {
    source: Arc<dyn StreamSource>,
    cache: StreamCache<AppError>,
    clock: Arc<dyn Clock>,
    ttl_secs: i64,
}

impl StreamService {
    pub fn new(source: Arc<dyn StreamSource>, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            cache: StreamCache::new(),
            clock,
            ttl_secs: CACHE_TTL_SECS,
        }
    }

    /// Service backed by the real upstream API and the system clock.
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let api = ScheduleApi::new(config.streams_url())?;
        Ok(Self::new(Arc::new(api), Arc::new(SystemClock)))
    }

    /// Current flattened schedule, refreshed from upstream when stale.
    pub async fn streams(&self) -> AppResult<Arc<CachedPayload>> {
        let now = self.clock.now();
        self.cache
            .get_or_refresh(now, self.ttl_secs, || async move {
                let raw = self.source.fetch().await.map_err(|e| {
                    warn!("Failed to refresh stream schedule: {}", e);
                    e
                })?;
                let payload = flatten(&raw, now);
                info!(count = payload.items.len(), "Refreshed stream schedule");
                Ok::<_, AppError>(payload)
            })
            .await
    }

    pub async fn list(
        &self,
        filter: &StreamQuery,
    ) -> AppResult<(Arc<CachedPayload>, Vec<StreamRecord>)> {
        let payload = self.streams().await?;
        let items = query::query(&payload, filter);
        Ok((payload, items))
    }

    pub async fn resolve(&self, ids: &[i64]) -> AppResult<Vec<StreamRecord>> {
        let payload = self.streams().await?;
        query::resolve(&payload, ids)
    }
}
