//! Time-bounded cache in front of a quote provider

use super::{QuoteProvider, QuoteResult};
use async_trait::async_trait;
use cached::{Cached, TimedCache};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Caches successful quotes for a fixed lifespan
///
/// Failed lookups are never cached, so a transient outage does not pin an
/// error for the whole TTL.
pub struct CachedQuoteProvider<P> {
    inner: P,
    cache: Arc<RwLock<TimedCache<String, QuoteResult>>>,
}

impl<P: QuoteProvider> CachedQuoteProvider<P> {
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            cache: Arc::new(RwLock::new(TimedCache::with_lifespan(ttl))),
        }
    }

    /// Drop every cached quote
    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.cache_clear();
    }

    /// Number of cached quotes
    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.cache_size()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl<P: QuoteProvider> QuoteProvider for CachedQuoteProvider<P> {
    async fn quote(&self, company: &str) -> QuoteResult {
        let key = company.trim().to_string();

        {
            let mut cache = self.cache.write().await;
            if let Some(hit) = cache.cache_get(&key) {
                tracing::debug!(company = %key, "Quote cache hit");
                return hit.clone();
            }
        }

        tracing::debug!(company = %key, provider = self.inner.name(), "Quote cache miss");
        let result = self.inner.quote(&key).await;

        if !result.is_error() {
            let mut cache = self.cache.write().await;
            let _ = cache.cache_set(key, result.clone());
        }
        result
    }

    fn name(&self) -> &str {
        "cached"
    }
}
