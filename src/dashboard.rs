// One refresh cycle: pull every view through the TTL cache, then derive the
// presentation frame. Fetching happens only for expired slots; inside a TTL
// window a refresh is pure recomputation over cached records.

use std::collections::HashMap;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::aggregator::{self, ComparisonSeries, DominanceBreakdown, Leaderboard, MarketExtremes, MarketKpis};
use crate::config::{self, ttl};
use crate::market_data::cache::{through, through_keyed, Cached, MarketCache};
use crate::market_data::source::MarketSource;
use crate::market_data::synthetic;
use crate::market_data::types::*;
use crate::presentation::globe::{self, GlobeParams};
use crate::presentation::{self, HeatmapCell, TickerItem};
use crate::session::SessionSettings;

/// Two-state cycle: a dashboard is either serving frames or mid-fetch. No
/// partially-applied state in between. There is no cancellation primitive; a
/// refresh future dropped mid-await leaves the state `Fetching` until the
/// next `refresh` call overwrites it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefreshState {
    Idle,
    Fetching,
}

/// Everything a renderer needs for one paint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardFrame {
    pub overview: GlobalOverview,
    pub leaderboard: Leaderboard,
    pub kpis: MarketKpis,
    pub dominance: DominanceBreakdown,
    pub volatility_pct: f64,
    pub spread_pct: f64,
    pub extremes: MarketExtremes,
    pub derivatives: DerivativesSnapshot,
    pub gas: GasSnapshot,
    pub exchanges: ExchangesSnapshot,
    pub fear_greed: FearGreed,
    pub hashrate: HashrateSnapshot,
    pub news: NewsFeed,
    pub comparison: Vec<ComparisonSeries>,
    pub ticker: Vec<TickerItem>,
    pub heatmap: Vec<HeatmapCell>,
    pub globe: GlobeParams,
    pub watchlist_alerts: usize,
    /// True when any record in the frame is synthetic.
    pub degraded: bool,
    pub generated_at_ms: u64,
}

pub struct Dashboard<S: MarketSource> {
    source: S,
    cache: MarketCache,
    pub session: SessionSettings,
    state: RefreshState,
}

impl<S: MarketSource> Dashboard<S> {
    pub fn new(source: S) -> Self {
        Self::with_session(source, SessionSettings::default())
    }

    pub fn with_session(source: S, session: SessionSettings) -> Self {
        Self {
            source,
            cache: MarketCache::new(),
            session,
            state: RefreshState::Idle,
        }
    }

    pub fn state(&self) -> RefreshState {
        self.state
    }

    /// Force the next refresh to refetch every view.
    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }

    /// Detail view for one asset, cached independently of the KPI basket.
    pub async fn asset_detail(&mut self, id: &str) -> AssetSnapshot {
        through_keyed(
            &mut self.cache.details,
            id.to_string(),
            ttl::ASSET_DETAIL,
            self.source.asset_detail(id),
        )
        .await
    }

    pub async fn refresh(&mut self) -> DashboardFrame {
        self.state = RefreshState::Fetching;
        let frame = self.build_frame().await;
        self.state = RefreshState::Idle;
        info!(
            degraded = frame.degraded,
            assets = frame.leaderboard.rows.len(),
            "refresh cycle complete"
        );
        frame
    }

    async fn build_frame(&mut self) -> DashboardFrame {
        let basket = through(
            &mut self.cache.assets,
            ttl::ASSETS,
            self.source.top_assets(config::KPI_BASKET),
        )
        .await;
        let top: Vec<AssetSnapshot> = basket.iter().take(config::TOP_ASSETS).cloned().collect();

        let sparkline_ids: Vec<String> = top.iter().map(|a| a.id.clone()).collect();
        let histories = self.histories(&sparkline_ids, config::HISTORY_HOURS).await;

        let compare_ids: Vec<String> = config::COMPARE_ASSETS
            .iter()
            .map(|(id, _)| id.to_string())
            .collect();
        let compare_histories = self.histories(&compare_ids, config::HISTORY_HOURS).await;
        let comparison = aggregator::comparison_series(
            &config::COMPARE_ASSETS
                .iter()
                .map(|(id, sym)| {
                    let h = compare_histories
                        .get(*id)
                        .cloned()
                        .unwrap_or_else(|| PriceHistory::empty(id));
                    (id.to_string(), sym.to_string(), h)
                })
                .collect::<Vec<_>>(),
        );

        let overview = through(
            &mut self.cache.overview,
            ttl::OVERVIEW,
            self.source.global_overview(),
        )
        .await;
        let depth = through_keyed(
            &mut self.cache.depth,
            "BTCUSDT".to_string(),
            ttl::DEPTH,
            self.source.order_book("BTCUSDT", config::DEPTH_LEVELS),
        )
        .await;
        let derivatives = through_keyed(
            &mut self.cache.derivatives,
            "BTCUSDT".to_string(),
            ttl::DERIVATIVES,
            self.source.derivatives("BTCUSDT"),
        )
        .await;
        let gas = through(&mut self.cache.gas, ttl::GAS, self.source.gas()).await;
        let exchanges = through(
            &mut self.cache.exchanges,
            ttl::EXCHANGES,
            self.source.exchanges(),
        )
        .await;
        let fear_greed = through(
            &mut self.cache.fear_greed,
            ttl::FEAR_GREED,
            self.source.fear_greed(),
        )
        .await;
        let hashrate = through(
            &mut self.cache.hashrate,
            ttl::HASHRATE,
            self.source.hashrate(),
        )
        .await;
        let news = through(&mut self.cache.news, ttl::NEWS, self.source.news(6)).await;

        let leaderboard = aggregator::leaderboard(&basket, &histories, config::TOP_ASSETS);
        let kpis = aggregator::kpis(&basket, config::MOVE_THRESHOLD_PCT);
        let dominance =
            aggregator::dominance(&basket, config::STABLE_SYMBOLS, config::L2_SYMBOLS);
        let btc_history = histories
            .get("bitcoin")
            .cloned()
            .unwrap_or_else(|| PriceHistory::empty("bitcoin"));

        let degraded = aggregator::degraded(
            basket
                .iter()
                .map(|a| a.origin)
                .chain(histories.values().map(|h| h.origin))
                .chain([
                    overview.origin,
                    depth.origin,
                    derivatives.origin,
                    gas.origin,
                    exchanges.origin,
                    fear_greed.origin,
                    hashrate.origin,
                    news.origin,
                ]),
        );

        DashboardFrame {
            volatility_pct: aggregator::volatility_pct(&btc_history),
            spread_pct: aggregator::spread_pct(&depth),
            extremes: aggregator::extremes(&basket),
            ticker: presentation::ticker_items(&top, &news),
            heatmap: presentation::heatmap(&top, 5),
            globe: globe::params(&self.session, &top),
            watchlist_alerts: aggregator::watchlist_alerts(&self.session.watchlist, &basket),
            overview,
            leaderboard,
            kpis,
            dominance,
            derivatives,
            gas,
            exchanges,
            fear_greed,
            hashrate,
            news,
            comparison,
            degraded,
            generated_at_ms: synthetic::now_ms(),
        }
    }

    /// Concurrent fan-out over whichever histories have expired; fresh keys
    /// are served from cache without touching the source.
    async fn histories(&mut self, ids: &[String], hours: u64) -> HashMap<String, PriceHistory> {
        let missing: Vec<String> = ids
            .iter()
            .filter(|id| {
                self.cache
                    .histories
                    .get(&((*id).clone(), hours))
                    .map_or(true, |c| !c.fresh(ttl::HISTORY))
            })
            .cloned()
            .collect();

        if !missing.is_empty() {
            debug!(count = missing.len(), "refetching expired price histories");
            let fetched = join_all(
                missing
                    .iter()
                    .map(|id| self.source.price_history(id, hours)),
            )
            .await;
            for (id, history) in missing.iter().zip(fetched) {
                metrics::counter!("coindash_cache_refreshes").increment(1);
                self.cache
                    .histories
                    .insert((id.clone(), hours), Cached::new(history));
            }
        }
        let hits = ids.len() - missing.len();
        if hits > 0 {
            metrics::counter!("coindash_cache_hits").increment(hits as u64);
        }

        ids.iter()
            .map(|id| {
                let history = self
                    .cache
                    .histories
                    .get(&(id.clone(), hours))
                    .map(|c| c.value.clone())
                    .unwrap_or_else(|| PriceHistory::empty(id));
                (id.clone(), history)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct SyntheticSource;

    #[async_trait]
    impl MarketSource for SyntheticSource {
        async fn top_assets(&self, limit: usize) -> Vec<AssetSnapshot> {
            synthetic::asset_list(limit)
        }
        async fn asset_detail(&self, id: &str) -> AssetSnapshot {
            synthetic::asset_snapshot(id, "BTC")
        }
        async fn price_history(&self, id: &str, hours: u64) -> PriceHistory {
            synthetic::price_history(id, hours, 300_000, 24)
        }
        async fn global_overview(&self) -> GlobalOverview {
            synthetic::global_overview()
        }
        async fn order_book(&self, symbol: &str, _limit: usize) -> OrderBookDepth {
            synthetic::order_book(symbol)
        }
        async fn derivatives(&self, symbol: &str) -> DerivativesSnapshot {
            synthetic::derivatives(symbol)
        }
        async fn gas(&self) -> GasSnapshot {
            synthetic::gas()
        }
        async fn exchanges(&self) -> ExchangesSnapshot {
            synthetic::exchanges()
        }
        async fn fear_greed(&self) -> FearGreed {
            synthetic::fear_greed()
        }
        async fn hashrate(&self) -> HashrateSnapshot {
            synthetic::hashrate()
        }
        async fn news(&self, limit: usize) -> NewsFeed {
            synthetic::news(limit)
        }
    }

    #[tokio::test]
    async fn fully_synthetic_source_still_yields_a_complete_frame() {
        let mut dash = Dashboard::new(SyntheticSource);
        let frame = dash.refresh().await;

        assert!(frame.degraded);
        assert_eq!(frame.leaderboard.rows.len(), config::TOP_ASSETS);
        assert_eq!(frame.globe.hubs.len(), 12);
        assert_eq!(frame.comparison.len(), config::COMPARE_ASSETS.len());
        assert!(!frame.news.items.is_empty());
        assert!((0.0..=100.0).contains(&frame.kpis.btc_dominance_pct));
        assert_eq!(dash.state(), RefreshState::Idle);
    }

    #[tokio::test]
    async fn asset_detail_is_cached_per_id() {
        let mut dash = Dashboard::new(SyntheticSource);
        let first = dash.asset_detail("bitcoin").await;
        let second = dash.asset_detail("bitcoin").await;
        // Synthetic records are randomized, so equality proves a cache hit.
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn watchlist_alert_flows_into_the_frame() {
        let mut session = SessionSettings::default();
        // Threshold 0 fires on any nonzero change.
        session.watch("BTC", 0.0);
        let mut dash = Dashboard::with_session(SyntheticSource, session);
        let frame = dash.refresh().await;
        assert!(frame.watchlist_alerts >= 1);
    }
}
