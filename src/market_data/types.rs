use serde::{Deserialize, Serialize};

/// Where a record came from. Synthetic records are the fallback the UI shows
/// with a "demo data" badge; the flag is the badge signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataOrigin {
    Live,
    Synthetic,
}

impl DataOrigin {
    pub fn is_synthetic(self) -> bool {
        self == DataOrigin::Synthetic
    }

    /// Live only when both inputs were live.
    pub fn combine(self, other: DataOrigin) -> DataOrigin {
        if self.is_synthetic() || other.is_synthetic() {
            DataOrigin::Synthetic
        } else {
            DataOrigin::Live
        }
    }
}

// One asset as of the last refresh. Immutable once fetched; the whole record
// is replaced on the next cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSnapshot {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub price_usd: f64,
    pub change_percent_24h: f64,
    pub volume_usd_24h: f64,
    pub market_cap_usd: f64,
    pub origin: DataOrigin,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub ts_ms: u64,
    pub price_usd: f64,
}

/// Ordered price series, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    pub asset_id: String,
    pub points: Vec<PricePoint>,
    pub origin: DataOrigin,
}

impl PriceHistory {
    pub fn empty(asset_id: &str) -> Self {
        Self {
            asset_id: asset_id.to_string(),
            points: Vec::new(),
            origin: DataOrigin::Synthetic,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalOverview {
    pub total_market_cap_usd: f64,
    pub total_volume_usd_24h: f64,
    pub origin: DataOrigin,
}

/// Best-first depth ladder. Sourced from the spot order-book endpoint; may be
/// stale relative to asset snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBookDepth {
    pub symbol: String,
    pub bids: Vec<(f64, f64)>, // (price, qty)
    pub asks: Vec<(f64, f64)>,
    pub origin: DataOrigin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivativesSnapshot {
    pub symbol: String,
    pub funding_rate_pct: f64,
    pub mark_price_usd: f64,
    pub open_interest_usd: f64,
    pub origin: DataOrigin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GasSnapshot {
    pub low_gwei: f64,
    pub average_gwei: f64,
    pub fast_gwei: f64,
    pub origin: DataOrigin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub link: Option<String>,
    pub published_at: Option<String>,
}

/// Headlines, most recent first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsFeed {
    pub items: Vec<NewsItem>,
    pub origin: DataOrigin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangesSnapshot {
    pub active_count: usize,
    pub top_by_volume: Option<(String, f64)>,
    pub origin: DataOrigin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FearGreed {
    pub value: u32,
    pub classification: String,
    pub origin: DataOrigin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashrateSnapshot {
    pub eh_per_s: f64,
    pub origin: DataOrigin,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combine_is_live_only_when_both_live() {
        assert_eq!(DataOrigin::Live.combine(DataOrigin::Live), DataOrigin::Live);
        assert_eq!(
            DataOrigin::Live.combine(DataOrigin::Synthetic),
            DataOrigin::Synthetic
        );
        assert_eq!(
            DataOrigin::Synthetic.combine(DataOrigin::Live),
            DataOrigin::Synthetic
        );
    }
}
