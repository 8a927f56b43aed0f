// Centralized fallback generator. Every adapter that loses its provider pulls
// a plausible record from here so downstream code never special-cases
// "missing data". All records carry DataOrigin::Synthetic.

use rand::Rng;

use crate::config;
use crate::market_data::types::*;

const FALLBACK_SYMBOLS: &[(&str, &str)] = &[
    ("bitcoin", "BTC"),
    ("ethereum", "ETH"),
    ("tether", "USDT"),
    ("binance-coin", "BNB"),
    ("solana", "SOL"),
    ("ripple", "XRP"),
    ("usd-coin", "USDC"),
    ("cardano", "ADA"),
    ("dogecoin", "DOGE"),
    ("toncoin", "TON"),
];

const FALLBACK_HEADLINES: &[&str] = &[
    "Crypto market holds total capitalization steady",
    "BTC and ETH stable despite volatility",
    "SOL leads the day's gainers",
    "Volumes rise across major venues",
    "Fresh capital flows into the market",
    "Stablecoin supply unchanged on the week",
];

pub fn asset_snapshot(id: &str, symbol: &str) -> AssetSnapshot {
    let mut rng = rand::thread_rng();
    AssetSnapshot {
        id: id.to_string(),
        symbol: symbol.to_string(),
        name: symbol.to_string(),
        price_usd: rng
            .gen_range(config::SYNTHETIC_PRICE_MIN_USD..config::SYNTHETIC_PRICE_MAX_USD),
        change_percent_24h: rng.gen_range(-5.0..5.0),
        volume_usd_24h: rng.gen_range(1e8..5e10),
        market_cap_usd: rng.gen_range(1e10..9e11),
        origin: DataOrigin::Synthetic,
    }
}

/// Basket of exactly `limit` assets. Past the symbol table the entries wrap
/// around with a numeric id suffix so ids stay unique for keyed consumers.
pub fn asset_list(limit: usize) -> Vec<AssetSnapshot> {
    (0..limit)
        .map(|i| {
            let (id, sym) = FALLBACK_SYMBOLS[i % FALLBACK_SYMBOLS.len()];
            let mut asset = asset_snapshot(id, sym);
            if i >= FALLBACK_SYMBOLS.len() {
                asset.id = format!("{id}-{}", i / FALLBACK_SYMBOLS.len() + 1);
            }
            asset
        })
        .collect()
}

/// Random-walk price series matching the point density a live fetch would
/// have returned for the same hour span.
pub fn price_history(asset_id: &str, hours: u64, step_ms: u64, points: usize) -> PriceHistory {
    let mut rng = rand::thread_rng();
    let end_ms = now_ms();
    let start_ms = end_ms.saturating_sub(hours * 3_600_000);
    let mut price = rng.gen_range(50.0..100.0);
    let points = points.max(10);

    let series = (0..points)
        .map(|i| {
            price += rng.gen_range(-0.5..0.5);
            PricePoint {
                ts_ms: start_ms + i as u64 * step_ms,
                price_usd: price,
            }
        })
        .collect();

    PriceHistory {
        asset_id: asset_id.to_string(),
        points: series,
        origin: DataOrigin::Synthetic,
    }
}

pub fn global_overview() -> GlobalOverview {
    let mut rng = rand::thread_rng();
    GlobalOverview {
        total_market_cap_usd: 1.95e12 + rng.gen_range(-3e10..3e10),
        total_volume_usd_24h: 8.2e10 + rng.gen_range(-1e10..1e10),
        origin: DataOrigin::Synthetic,
    }
}

pub fn order_book(symbol: &str) -> OrderBookDepth {
    let mut rng = rand::thread_rng();
    let mid = rng.gen_range(100.0..90_000.0f64);
    let tick = mid * 0.0001;
    let bids = (1..=5)
        .map(|i| (mid - i as f64 * tick, rng.gen_range(0.1..5.0)))
        .collect();
    let asks = (1..=5)
        .map(|i| (mid + i as f64 * tick, rng.gen_range(0.1..5.0)))
        .collect();
    OrderBookDepth {
        symbol: symbol.to_string(),
        bids,
        asks,
        origin: DataOrigin::Synthetic,
    }
}

pub fn derivatives(symbol: &str) -> DerivativesSnapshot {
    let mut rng = rand::thread_rng();
    let mark = rng.gen_range(100.0..90_000.0);
    DerivativesSnapshot {
        symbol: symbol.to_string(),
        funding_rate_pct: rng.gen_range(-0.05..0.05),
        mark_price_usd: mark,
        open_interest_usd: mark * rng.gen_range(1_000.0..100_000.0),
        origin: DataOrigin::Synthetic,
    }
}

pub fn gas() -> GasSnapshot {
    let mut rng = rand::thread_rng();
    let base: f64 = 20.0 + rng.gen_range(-5.0..5.0);
    GasSnapshot {
        low_gwei: (base * 0.7).max(1.0),
        average_gwei: base.max(1.0),
        fast_gwei: (base * 1.3).max(1.0),
        origin: DataOrigin::Synthetic,
    }
}

pub fn exchanges() -> ExchangesSnapshot {
    ExchangesSnapshot {
        active_count: 0,
        top_by_volume: None,
        origin: DataOrigin::Synthetic,
    }
}

pub fn fear_greed() -> FearGreed {
    let mut rng = rand::thread_rng();
    FearGreed {
        value: (50.0 + rng.gen_range(-20.0..20.0)) as u32,
        classification: "Neutral".to_string(),
        origin: DataOrigin::Synthetic,
    }
}

pub fn hashrate() -> HashrateSnapshot {
    let mut rng = rand::thread_rng();
    HashrateSnapshot {
        eh_per_s: 350.0 + rng.gen_range(-50.0..50.0),
        origin: DataOrigin::Synthetic,
    }
}

pub fn news(limit: usize) -> NewsFeed {
    NewsFeed {
        items: FALLBACK_HEADLINES
            .iter()
            .take(limit)
            .map(|t| NewsItem {
                title: t.to_string(),
                link: None,
                published_at: None,
            })
            .collect(),
        origin: DataOrigin::Synthetic,
    }
}

pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_asset_stays_in_documented_price_bound() {
        for _ in 0..100 {
            let a = asset_snapshot("bitcoin", "BTC");
            assert!(a.price_usd >= config::SYNTHETIC_PRICE_MIN_USD);
            assert!(a.price_usd <= config::SYNTHETIC_PRICE_MAX_USD);
            assert!(a.origin.is_synthetic());
        }
    }

    #[test]
    fn fallback_basket_honors_requested_size() {
        let assets = asset_list(25);
        assert_eq!(assets.len(), 25);
        let ids: std::collections::HashSet<_> = assets.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids.len(), 25);
        assert!(assets.iter().all(|a| a.origin.is_synthetic()));
    }

    #[test]
    fn synthetic_history_is_ordered_and_non_empty() {
        let h = price_history("bitcoin", 24, 300_000, 288);
        assert_eq!(h.points.len(), 288);
        assert!(h.points.windows(2).all(|w| w[0].ts_ms < w[1].ts_ms));
        assert!(h.origin.is_synthetic());
    }

    #[test]
    fn synthetic_history_enforces_minimum_points() {
        let h = price_history("bitcoin", 1, 60_000, 3);
        assert!(h.points.len() >= 10);
    }

    #[test]
    fn synthetic_book_has_crossed_free_ladder() {
        let book = order_book("BTCUSDT");
        let best_bid = book.bids.first().map(|(p, _)| *p).unwrap();
        let best_ask = book.asks.first().map(|(p, _)| *p).unwrap();
        assert!(best_ask > best_bid);
    }
}
