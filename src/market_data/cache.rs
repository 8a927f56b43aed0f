// TTL memoization for fetched views. A read inside the window returns the
// cached value with no network activity; after expiry the caller's future is
// awaited and the slot rewritten wholesale. The refresh cycle is sequential,
// so there are no concurrent writers and no locking.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::time::{Duration, Instant};

use crate::market_data::types::*;

#[derive(Debug, Clone)]
pub struct Cached<T> {
    pub value: T,
    pub fetched_at: Instant,
}

impl<T> Cached<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            fetched_at: Instant::now(),
        }
    }

    pub fn fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

/// Serve from the slot while fresh, otherwise await `fetch` and rewrite it.
/// The future is lazy; constructing it costs nothing on a cache hit.
pub async fn through<T, Fut>(slot: &mut Option<Cached<T>>, ttl: Duration, fetch: Fut) -> T
where
    T: Clone,
    Fut: Future<Output = T>,
{
    if let Some(cached) = slot.as_ref().filter(|c| c.fresh(ttl)) {
        metrics::counter!("coindash_cache_hits").increment(1);
        return cached.value.clone();
    }
    let value = fetch.await;
    metrics::counter!("coindash_cache_refreshes").increment(1);
    *slot = Some(Cached::new(value.clone()));
    value
}

pub async fn through_keyed<K, T, Fut>(
    map: &mut HashMap<K, Cached<T>>,
    key: K,
    ttl: Duration,
    fetch: Fut,
) -> T
where
    K: Eq + Hash,
    T: Clone,
    Fut: Future<Output = T>,
{
    if let Some(cached) = map.get(&key).filter(|c| c.fresh(ttl)) {
        metrics::counter!("coindash_cache_hits").increment(1);
        return cached.value.clone();
    }
    let value = fetch.await;
    metrics::counter!("coindash_cache_refreshes").increment(1);
    map.insert(key, Cached::new(value.clone()));
    value
}

/// One slot per source view. Rewritten wholesale on refresh; readers never
/// observe a partially updated cache.
#[derive(Default)]
pub struct MarketCache {
    pub assets: Option<Cached<Vec<AssetSnapshot>>>,
    pub details: HashMap<String, Cached<AssetSnapshot>>,
    pub histories: HashMap<(String, u64), Cached<PriceHistory>>,
    pub overview: Option<Cached<GlobalOverview>>,
    pub depth: HashMap<String, Cached<OrderBookDepth>>,
    pub derivatives: HashMap<String, Cached<DerivativesSnapshot>>,
    pub gas: Option<Cached<GasSnapshot>>,
    pub exchanges: Option<Cached<ExchangesSnapshot>>,
    pub fear_greed: Option<Cached<FearGreed>>,
    pub hashrate: Option<Cached<HashrateSnapshot>>,
    pub news: Option<Cached<NewsFeed>>,
}

impl MarketCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything; the next refresh repopulates from the adapters.
    pub fn invalidate(&mut self) {
        *self = Self::default();
    }
}
