// Binance adapter: spot order-book depth plus perp funding/open-interest.
// Depth levels arrive as [["price","qty"], ...] string pairs.

use serde_json::Value;
use tracing::warn;

use super::{num_field, record_fallback};
use crate::config::endpoints;
use crate::fetch::FetchGuard;
use crate::market_data::synthetic;
use crate::market_data::types::*;

pub struct BinanceAdapter {
    depth_url: String,
    premium_url: String,
    open_interest_url: String,
}

impl BinanceAdapter {
    pub fn new() -> Self {
        Self {
            depth_url: endpoints::BINANCE_SPOT_DEPTH.to_string(),
            premium_url: endpoints::BINANCE_PREMIUM_INDEX.to_string(),
            open_interest_url: endpoints::BINANCE_OPEN_INTEREST.to_string(),
        }
    }

    #[cfg(test)]
    fn with_base(base: &str) -> Self {
        Self {
            depth_url: format!("{base}/depth"),
            premium_url: format!("{base}/premiumIndex"),
            open_interest_url: format!("{base}/openInterest"),
        }
    }

    pub async fn order_book(
        &self,
        guard: &FetchGuard,
        symbol: &str,
        limit: usize,
    ) -> OrderBookDepth {
        let query = [
            ("symbol", symbol.to_string()),
            ("limit", limit.to_string()),
        ];
        let body = guard.get_json(&self.depth_url, &query).await;

        match body.as_ref().and_then(|v| parse_depth(symbol, v)) {
            Some(depth) => depth,
            None => {
                warn!(symbol, "depth unavailable, serving synthetic ladder");
                record_fallback("binance_depth");
                synthetic::order_book(symbol)
            }
        }
    }

    /// Funding rate and open interest come from two endpoints; OI in USD is
    /// contract quantity times the mark price. Either one missing degrades
    /// the whole record to synthetic, never a half-filled one.
    pub async fn derivatives(&self, guard: &FetchGuard, symbol: &str) -> DerivativesSnapshot {
        let query = [("symbol", symbol.to_string())];
        let premium = guard.get_json(&self.premium_url, &query).await;
        let open_interest = guard.get_json(&self.open_interest_url, &query).await;

        let parsed = premium.as_ref().and_then(|p| {
            let funding = num_field(p, "lastFundingRate")?;
            let mark = num_field(p, "markPrice")?;
            let qty = open_interest.as_ref().and_then(|oi| num_field(oi, "openInterest"))?;
            Some(DerivativesSnapshot {
                symbol: symbol.to_string(),
                funding_rate_pct: funding * 100.0,
                mark_price_usd: mark,
                open_interest_usd: qty * mark,
                origin: DataOrigin::Live,
            })
        });

        match parsed {
            Some(snapshot) => snapshot,
            None => {
                warn!(symbol, "funding/open-interest unavailable");
                record_fallback("binance_derivatives");
                synthetic::derivatives(symbol)
            }
        }
    }
}

impl Default for BinanceAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_depth(symbol: &str, body: &Value) -> Option<OrderBookDepth> {
    let bids = parse_side(body.get("bids")?)?;
    let asks = parse_side(body.get("asks")?)?;
    if bids.is_empty() && asks.is_empty() {
        return None;
    }
    Some(OrderBookDepth {
        symbol: symbol.to_string(),
        bids,
        asks,
        origin: DataOrigin::Live,
    })
}

fn parse_side(side: &Value) -> Option<Vec<(f64, f64)>> {
    let levels = side.as_array()?;
    Some(
        levels
            .iter()
            .filter_map(|level| {
                let pair = level.as_array()?;
                let price = pair.first()?.as_str()?.parse::<f64>().ok()?;
                let qty = pair.get(1)?.as_str()?.parse::<f64>().ok()?;
                Some((price, qty))
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_string_pair_levels() {
        let body = json!({
            "bids": [["64999.5", "1.2"], ["64999.0", "0.4"]],
            "asks": [["65000.5", "0.9"]]
        });
        let depth = parse_depth("BTCUSDT", &body).unwrap();
        assert_eq!(depth.bids.len(), 2);
        assert_eq!(depth.bids[0], (64999.5, 1.2));
        assert_eq!(depth.asks[0], (65000.5, 0.9));
        assert_eq!(depth.origin, DataOrigin::Live);
    }

    #[test]
    fn malformed_levels_are_dropped() {
        let body = json!({
            "bids": [["bad", "1.2"], ["64999.0"], "not-a-pair", ["64998.0", "2.0"]],
            "asks": []
        });
        let depth = parse_depth("BTCUSDT", &body).unwrap();
        assert_eq!(depth.bids, vec![(64998.0, 2.0)]);
    }

    #[test]
    fn fully_empty_book_counts_as_absent() {
        let body = json!({"bids": [], "asks": []});
        assert!(parse_depth("BTCUSDT", &body).is_none());
    }

    #[tokio::test]
    async fn refused_connection_falls_back_to_synthetic_records() {
        let guard = crate::fetch::FetchGuard::new().unwrap();
        let adapter = BinanceAdapter::with_base("http://127.0.0.1:9");

        let depth = adapter.order_book(&guard, "BTCUSDT", 50).await;
        assert!(depth.origin.is_synthetic());
        assert!(!depth.bids.is_empty());
        assert!(!depth.asks.is_empty());

        let derivatives = adapter.derivatives(&guard, "BTCUSDT").await;
        assert!(derivatives.origin.is_synthetic());
        assert_eq!(derivatives.symbol, "BTCUSDT");
    }
}
