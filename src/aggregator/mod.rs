// Derived views over normalized records. Everything in here is a pure
// function: no network, no clocks, no mutation of inputs, so re-running a
// refresh over frozen records reproduces identical views. Ratio math guards
// zero denominators and empty series instead of propagating errors.

use std::collections::HashMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::market_data::types::*;
use crate::session::WatchEntry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub rank: usize,
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub price_usd: f64,
    pub change_percent_24h: f64,
    pub market_cap_usd: f64,
    pub volume_usd_24h: f64,
    /// Min/max-normalized sparkline, empty when no history was available.
    pub sparkline: Vec<(u64, f64)>,
    pub origin: DataOrigin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub rows: Vec<LeaderboardRow>,
    pub volume_sum_usd: f64,
    pub degraded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketKpis {
    pub btc_dominance_pct: f64,
    pub advancers: usize,
    pub decliners: usize,
    pub avg_change_pct: f64,
    pub median_change_pct: f64,
    pub breadth_pct: f64,
    pub big_gainers: usize,
    pub big_losers: usize,
    pub degraded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DominanceBreakdown {
    pub btc_pct: f64,
    pub eth_pct: f64,
    pub alt_pct: f64,
    pub stablecoin_pct: f64,
    pub l2_pct: f64,
    pub stablecap_usd: f64,
    pub degraded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketExtremes {
    pub top_gainer: Option<AssetSnapshot>,
    pub top_loser: Option<AssetSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSeries {
    pub asset_id: String,
    pub symbol: String,
    pub points: Vec<(u64, f64)>,
    pub origin: DataOrigin,
}

pub fn degraded(origins: impl IntoIterator<Item = DataOrigin>) -> bool {
    origins.into_iter().any(|o| o.is_synthetic())
}

/// Top-N rows with sparklines. Assets come pre-ranked from the provider.
pub fn leaderboard(
    assets: &[AssetSnapshot],
    histories: &HashMap<String, PriceHistory>,
    n: usize,
) -> Leaderboard {
    let rows: Vec<LeaderboardRow> = assets
        .iter()
        .take(n)
        .enumerate()
        .map(|(i, a)| {
            let (sparkline, hist_origin) = match histories.get(&a.id) {
                Some(h) => (normalized_series(h), h.origin),
                None => (Vec::new(), DataOrigin::Synthetic),
            };
            LeaderboardRow {
                rank: i + 1,
                id: a.id.clone(),
                symbol: a.symbol.clone(),
                name: a.name.clone(),
                price_usd: a.price_usd,
                change_percent_24h: a.change_percent_24h,
                market_cap_usd: a.market_cap_usd,
                volume_usd_24h: a.volume_usd_24h,
                sparkline,
                origin: a.origin.combine(hist_origin),
            }
        })
        .collect();

    Leaderboard {
        volume_sum_usd: rows.iter().map(|r| r.volume_usd_24h.max(0.0)).sum(),
        degraded: degraded(rows.iter().map(|r| r.origin)),
        rows,
    }
}

/// Min/max normalization into [0, 1]. A flat series maps to 0 everywhere
/// (span floored at epsilon); an empty history yields an empty series.
pub fn normalized_series(history: &PriceHistory) -> Vec<(u64, f64)> {
    if history.points.is_empty() {
        return Vec::new();
    }
    let min = history
        .points
        .iter()
        .map(|p| p.price_usd)
        .fold(f64::INFINITY, f64::min);
    let max = history
        .points
        .iter()
        .map(|p| p.price_usd)
        .fold(f64::NEG_INFINITY, f64::max);
    let span = (max - min).max(1e-9);
    history
        .points
        .iter()
        .map(|p| (p.ts_ms, (p.price_usd - min) / span))
        .collect()
}

pub fn kpis(basket: &[AssetSnapshot], move_threshold_pct: f64) -> MarketKpis {
    let changes: Vec<f64> = basket.iter().map(|a| a.change_percent_24h).collect();
    let advancers = changes.iter().filter(|c| **c > 0.0).count();
    let decliners = changes.len() - advancers;
    let avg = if changes.is_empty() {
        0.0
    } else {
        changes.iter().sum::<f64>() / changes.len() as f64
    };
    let breadth = if changes.is_empty() {
        0.0
    } else {
        100.0 * advancers as f64 / changes.len() as f64
    };

    MarketKpis {
        btc_dominance_pct: share_of(basket, |a| is_btc(a)),
        advancers,
        decliners,
        avg_change_pct: avg,
        median_change_pct: median(&changes),
        breadth_pct: breadth,
        big_gainers: changes.iter().filter(|c| **c >= move_threshold_pct).count(),
        big_losers: changes.iter().filter(|c| **c <= -move_threshold_pct).count(),
        degraded: degraded(basket.iter().map(|a| a.origin)),
    }
}

pub fn dominance(
    basket: &[AssetSnapshot],
    stable_symbols: &[&str],
    l2_symbols: &[&str],
) -> DominanceBreakdown {
    let btc = share_of(basket, |a| is_btc(a));
    let eth = share_of(basket, |a| is_eth(a));
    let in_set = |a: &AssetSnapshot, set: &[&str]| {
        set.iter().any(|s| a.symbol.eq_ignore_ascii_case(s))
    };

    DominanceBreakdown {
        btc_pct: btc,
        eth_pct: eth,
        alt_pct: (100.0 - btc - eth).max(0.0),
        stablecoin_pct: share_of(basket, |a| in_set(a, stable_symbols)),
        l2_pct: share_of(basket, |a| in_set(a, l2_symbols)),
        stablecap_usd: basket
            .iter()
            .filter(|a| in_set(a, stable_symbols))
            .map(|a| a.market_cap_usd.max(0.0))
            .sum(),
        degraded: degraded(basket.iter().map(|a| a.origin)),
    }
}

/// Share of total market cap held by assets matching `pick`, in percent.
/// Zero total (including the empty basket) yields 0, never a division error.
fn share_of(basket: &[AssetSnapshot], pick: impl Fn(&AssetSnapshot) -> bool) -> f64 {
    let total: f64 = basket.iter().map(|a| a.market_cap_usd.max(0.0)).sum();
    if total <= 0.0 {
        return 0.0;
    }
    let part: f64 = basket
        .iter()
        .filter(|a| pick(a))
        .map(|a| a.market_cap_usd.max(0.0))
        .sum();
    part / total * 100.0
}

fn is_btc(a: &AssetSnapshot) -> bool {
    a.id == "bitcoin" || a.symbol.eq_ignore_ascii_case("BTC")
}

fn is_eth(a: &AssetSnapshot) -> bool {
    a.id == "ethereum" || a.symbol.eq_ignore_ascii_case("ETH")
}

fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sorted: Vec<f64> = values.iter().copied().sorted_by(|a, b| a.total_cmp(b)).collect();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// Std-dev of simple returns over the series, in percent. Series shorter
/// than 10 points carry too little signal and report 0.
pub fn volatility_pct(history: &PriceHistory) -> f64 {
    if history.points.len() < 10 {
        return 0.0;
    }
    let returns: Vec<f64> = history
        .points
        .windows(2)
        .filter(|w| w[0].price_usd != 0.0)
        .map(|w| w[1].price_usd / w[0].price_usd - 1.0)
        .collect();
    if returns.len() < 2 {
        return 0.0;
    }
    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let var = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>()
        / (returns.len() - 1) as f64;
    var.sqrt() * 100.0
}

/// Best bid/ask spread over mid, in percent. Missing sides or a zero mid
/// report 0.
pub fn spread_pct(depth: &OrderBookDepth) -> f64 {
    let (Some((bid, _)), Some((ask, _))) = (depth.bids.first(), depth.asks.first()) else {
        return 0.0;
    };
    let mid = (bid + ask) / 2.0;
    if mid <= 0.0 {
        return 0.0;
    }
    (ask - bid) / mid * 100.0
}

pub fn extremes(basket: &[AssetSnapshot]) -> MarketExtremes {
    MarketExtremes {
        top_gainer: basket
            .iter()
            .max_by(|a, b| a.change_percent_24h.total_cmp(&b.change_percent_24h))
            .cloned(),
        top_loser: basket
            .iter()
            .min_by(|a, b| a.change_percent_24h.total_cmp(&b.change_percent_24h))
            .cloned(),
    }
}

pub fn comparison_series(histories: &[(String, String, PriceHistory)]) -> Vec<ComparisonSeries> {
    histories
        .iter()
        .map(|(id, symbol, h)| ComparisonSeries {
            asset_id: id.clone(),
            symbol: symbol.clone(),
            points: normalized_series(h),
            origin: h.origin,
        })
        .collect()
}

/// Watchlist symbols whose |24h change| reached their configured threshold.
pub fn watchlist_alerts(
    watchlist: &HashMap<String, WatchEntry>,
    basket: &[AssetSnapshot],
) -> usize {
    if watchlist.is_empty() {
        return 0;
    }
    let by_symbol: HashMap<String, &AssetSnapshot> = basket
        .iter()
        .map(|a| (a.symbol.to_uppercase(), a))
        .collect();
    watchlist
        .iter()
        .filter(|(symbol, entry)| {
            by_symbol
                .get(&symbol.to_uppercase())
                .is_some_and(|a| a.change_percent_24h.abs() >= entry.threshold_pct)
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn asset(id: &str, symbol: &str, change: f64, mcap: f64) -> AssetSnapshot {
        AssetSnapshot {
            id: id.to_string(),
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            price_usd: 100.0,
            change_percent_24h: change,
            volume_usd_24h: 1e9,
            market_cap_usd: mcap,
            origin: DataOrigin::Live,
        }
    }

    fn history(prices: &[f64]) -> PriceHistory {
        PriceHistory {
            asset_id: "bitcoin".to_string(),
            points: prices
                .iter()
                .enumerate()
                .map(|(i, p)| PricePoint {
                    ts_ms: i as u64 * 1000,
                    price_usd: *p,
                })
                .collect(),
            origin: DataOrigin::Live,
        }
    }

    #[test]
    fn zero_total_market_cap_yields_zero_dominance() {
        let basket = vec![
            asset("bitcoin", "BTC", 1.0, 0.0),
            asset("ethereum", "ETH", -1.0, 0.0),
        ];
        let d = dominance(&basket, &["USDT"], &["ARB"]);
        assert_eq!(d.btc_pct, 0.0);
        assert_eq!(d.eth_pct, 0.0);
        assert_eq!(d.alt_pct, 0.0);
        assert_eq!(d.stablecoin_pct, 0.0);
    }

    #[test]
    fn empty_basket_is_all_neutral() {
        let k = kpis(&[], 5.0);
        assert_eq!(k.btc_dominance_pct, 0.0);
        assert_eq!(k.avg_change_pct, 0.0);
        assert_eq!(k.median_change_pct, 0.0);
        assert_eq!(k.breadth_pct, 0.0);
        let d = dominance(&[], &[], &[]);
        assert_eq!(d.alt_pct, 0.0);
        assert!(extremes(&[]).top_gainer.is_none());
    }

    #[test]
    fn dominance_splits_btc_eth_alt() {
        let basket = vec![
            asset("bitcoin", "BTC", 0.0, 600.0),
            asset("ethereum", "ETH", 0.0, 300.0),
            asset("solana", "SOL", 0.0, 100.0),
        ];
        let d = dominance(&basket, &[], &[]);
        assert!((d.btc_pct - 60.0).abs() < 1e-9);
        assert!((d.eth_pct - 30.0).abs() < 1e-9);
        assert!((d.alt_pct - 10.0).abs() < 1e-9);
    }

    #[test]
    fn kpis_count_movers_and_breadth() {
        let basket = vec![
            asset("a", "AAA", 6.0, 1.0),
            asset("b", "BBB", 2.0, 1.0),
            asset("c", "CCC", -1.0, 1.0),
            asset("d", "DDD", -7.0, 1.0),
        ];
        let k = kpis(&basket, 5.0);
        assert_eq!(k.advancers, 2);
        assert_eq!(k.decliners, 2);
        assert_eq!(k.big_gainers, 1);
        assert_eq!(k.big_losers, 1);
        assert!((k.breadth_pct - 50.0).abs() < 1e-9);
        assert!((k.avg_change_pct - 0.0).abs() < 1e-9);
        assert!((k.median_change_pct - 0.5).abs() < 1e-9);
    }

    #[test]
    fn empty_history_gives_empty_series_not_a_crash() {
        let h = PriceHistory::empty("bitcoin");
        assert!(normalized_series(&h).is_empty());
        assert_eq!(volatility_pct(&h), 0.0);
    }

    #[test]
    fn flat_series_normalizes_without_dividing_by_zero() {
        let h = history(&[50.0; 20]);
        let series = normalized_series(&h);
        assert_eq!(series.len(), 20);
        assert!(series.iter().all(|(_, v)| *v == 0.0));
        assert_eq!(volatility_pct(&h), 0.0);
    }

    #[test]
    fn volatility_needs_ten_points() {
        assert_eq!(volatility_pct(&history(&[1.0, 2.0, 3.0])), 0.0);
        let h = history(&[100.0, 101.0, 99.0, 102.0, 98.0, 103.0, 97.0, 104.0, 96.0, 105.0]);
        assert!(volatility_pct(&h) > 0.0);
    }

    #[test]
    fn spread_handles_missing_sides() {
        let empty = OrderBookDepth {
            symbol: "BTCUSDT".to_string(),
            bids: vec![],
            asks: vec![],
            origin: DataOrigin::Live,
        };
        assert_eq!(spread_pct(&empty), 0.0);

        let book = OrderBookDepth {
            symbol: "BTCUSDT".to_string(),
            bids: vec![(99.0, 1.0)],
            asks: vec![(101.0, 1.0)],
            origin: DataOrigin::Live,
        };
        assert!((spread_pct(&book) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn extremes_pick_best_and_worst() {
        let basket = vec![
            asset("a", "AAA", 6.0, 1.0),
            asset("b", "BBB", -9.0, 1.0),
            asset("c", "CCC", 1.0, 1.0),
        ];
        let e = extremes(&basket);
        assert_eq!(e.top_gainer.unwrap().symbol, "AAA");
        assert_eq!(e.top_loser.unwrap().symbol, "BBB");
    }

    #[test]
    fn watchlist_alerts_respect_thresholds() {
        let basket = vec![
            asset("bitcoin", "BTC", 6.0, 1.0),
            asset("ethereum", "ETH", -2.0, 1.0),
        ];
        let mut wl = HashMap::new();
        wl.insert("btc".to_string(), WatchEntry { threshold_pct: 5.0 });
        wl.insert("ETH".to_string(), WatchEntry { threshold_pct: 5.0 });
        wl.insert("SOL".to_string(), WatchEntry { threshold_pct: 1.0 });
        assert_eq!(watchlist_alerts(&wl, &basket), 1);
    }

    #[test]
    fn leaderboard_flags_degraded_rows() {
        let mut basket = vec![asset("bitcoin", "BTC", 1.0, 1.0)];
        basket[0].origin = DataOrigin::Synthetic;
        let board = leaderboard(&basket, &HashMap::new(), 10);
        assert_eq!(board.rows.len(), 1);
        assert!(board.degraded);
        assert!(board.rows[0].sparkline.is_empty());
    }

    proptest! {
        #[test]
        fn dominance_shares_stay_in_range(
            mcaps in proptest::collection::vec((0usize..6, -1e12f64..1e13f64), 0..40)
        ) {
            let symbols = ["BTC", "ETH", "USDT", "SOL", "ARB", "DOGE"];
            let basket: Vec<AssetSnapshot> = mcaps
                .iter()
                .enumerate()
                .map(|(i, (s, m))| asset(&format!("asset-{i}"), symbols[*s], 0.0, *m))
                .collect();
            let d = dominance(&basket, &["USDT"], &["ARB"]);

            for share in [d.btc_pct, d.eth_pct, d.alt_pct, d.stablecoin_pct, d.l2_pct] {
                prop_assert!((0.0..=100.0).contains(&share));
            }
            prop_assert!(d.btc_pct + d.eth_pct <= 100.0 + 1e-6);
            prop_assert!(d.btc_pct + d.eth_pct + d.alt_pct <= 100.0 + 1e-6);
        }
    }
}
