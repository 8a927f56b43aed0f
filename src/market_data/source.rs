// The seam between the cache/aggregator and the provider adapters. Tests
// substitute a counting stub here; production composes the adapters over one
// FetchGuard. Every method is infallible by contract: worst case it returns
// a synthetic record flagged as such.

use async_trait::async_trait;

use crate::config;
use crate::fetch::{FetchError, FetchGuard};
use crate::market_data::adapters::binance::BinanceAdapter;
use crate::market_data::adapters::coincap::CoinCapAdapter;
use crate::market_data::adapters::etherscan::EtherscanAdapter;
use crate::market_data::adapters::news::NewsAdapter;
use crate::market_data::adapters::sentiment::SentimentAdapter;
use crate::market_data::types::*;

#[async_trait]
pub trait MarketSource: Send + Sync {
    async fn top_assets(&self, limit: usize) -> Vec<AssetSnapshot>;
    async fn asset_detail(&self, id: &str) -> AssetSnapshot;
    async fn price_history(&self, id: &str, hours: u64) -> PriceHistory;
    async fn global_overview(&self) -> GlobalOverview;
    async fn order_book(&self, symbol: &str, limit: usize) -> OrderBookDepth;
    async fn derivatives(&self, symbol: &str) -> DerivativesSnapshot;
    async fn gas(&self) -> GasSnapshot;
    async fn exchanges(&self) -> ExchangesSnapshot;
    async fn fear_greed(&self) -> FearGreed;
    async fn hashrate(&self) -> HashrateSnapshot;
    async fn news(&self, limit: usize) -> NewsFeed;
}

pub struct LiveSource {
    guard: FetchGuard,
    coincap: CoinCapAdapter,
    binance: BinanceAdapter,
    etherscan: EtherscanAdapter,
    sentiment: SentimentAdapter,
    news: NewsAdapter,
}

impl LiveSource {
    pub fn new() -> Result<Self, FetchError> {
        Ok(Self {
            guard: FetchGuard::new()?,
            coincap: CoinCapAdapter::new(),
            binance: BinanceAdapter::new(),
            etherscan: EtherscanAdapter::new(config::etherscan_api_key()),
            sentiment: SentimentAdapter::new(),
            news: NewsAdapter::new(),
        })
    }
}

#[async_trait]
impl MarketSource for LiveSource {
    async fn top_assets(&self, limit: usize) -> Vec<AssetSnapshot> {
        self.coincap.top_assets(&self.guard, limit).await
    }

    async fn asset_detail(&self, id: &str) -> AssetSnapshot {
        self.coincap.asset_detail(&self.guard, id).await
    }

    async fn price_history(&self, id: &str, hours: u64) -> PriceHistory {
        self.coincap.price_history(&self.guard, id, hours).await
    }

    async fn global_overview(&self) -> GlobalOverview {
        self.coincap.global_overview(&self.guard).await
    }

    async fn order_book(&self, symbol: &str, limit: usize) -> OrderBookDepth {
        self.binance.order_book(&self.guard, symbol, limit).await
    }

    async fn derivatives(&self, symbol: &str) -> DerivativesSnapshot {
        self.binance.derivatives(&self.guard, symbol).await
    }

    async fn gas(&self) -> GasSnapshot {
        self.etherscan.gas(&self.guard).await
    }

    async fn exchanges(&self) -> ExchangesSnapshot {
        self.coincap.exchanges(&self.guard).await
    }

    async fn fear_greed(&self) -> FearGreed {
        self.sentiment.fear_greed(&self.guard).await
    }

    async fn hashrate(&self) -> HashrateSnapshot {
        self.sentiment.hashrate(&self.guard).await
    }

    async fn news(&self, limit: usize) -> NewsFeed {
        self.news.news(&self.guard, limit).await
    }
}
