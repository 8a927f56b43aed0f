// CoinCap adapter: asset list/detail, price history, global overview, and
// the exchanges board. CoinCap wraps everything in {"data": ...} and encodes
// numbers as strings.

use serde_json::Value;
use tracing::warn;

use super::{num_field, record_fallback, str_field, u64_field};
use crate::config::endpoints;
use crate::fetch::FetchGuard;
use crate::market_data::synthetic;
use crate::market_data::types::*;

pub struct CoinCapAdapter {
    base: String,
}

impl CoinCapAdapter {
    pub fn new() -> Self {
        Self {
            base: endpoints::COINCAP_BASE.to_string(),
        }
    }

    #[cfg(test)]
    fn with_base(base: &str) -> Self {
        Self {
            base: base.to_string(),
        }
    }

    pub async fn top_assets(&self, guard: &FetchGuard, limit: usize) -> Vec<AssetSnapshot> {
        let url = format!("{}/assets", self.base);
        let body = guard.get_json(&url, &[("limit", limit.to_string())]).await;

        match body.as_ref().and_then(parse_asset_list) {
            Some(assets) if !assets.is_empty() => assets,
            _ => {
                warn!(limit, "asset list unavailable, serving synthetic basket");
                record_fallback("coincap_assets");
                synthetic::asset_list(limit)
            }
        }
    }

    pub async fn asset_detail(&self, guard: &FetchGuard, id: &str) -> AssetSnapshot {
        let url = format!("{}/assets/{}", self.base, id);
        let body = guard.get_json(&url, &[]).await;

        match body.as_ref().and_then(|v| parse_asset(v.get("data")?)) {
            Some(asset) => asset,
            None => {
                warn!(id, "asset detail unavailable, serving synthetic record");
                record_fallback("coincap_detail");
                let symbol: String = id.chars().take(3).collect();
                synthetic::asset_snapshot(id, &symbol.to_uppercase())
            }
        }
    }

    pub async fn price_history(&self, guard: &FetchGuard, id: &str, hours: u64) -> PriceHistory {
        let (interval, step_ms, points) = interval_for(hours);
        let end = synthetic::now_ms();
        let start = end.saturating_sub(hours * 3_600_000);
        let url = format!("{}/assets/{}/history", self.base, id);
        let query = [
            ("interval", interval.to_string()),
            ("start", start.to_string()),
            ("end", end.to_string()),
        ];
        let body = guard.get_json(&url, &query).await;

        match body.as_ref().and_then(|v| parse_history(id, v)) {
            Some(history) if !history.points.is_empty() => history,
            _ => {
                warn!(id, hours, "price history unavailable, serving random walk");
                record_fallback("coincap_history");
                synthetic::price_history(id, hours, step_ms, points)
            }
        }
    }

    pub async fn global_overview(&self, guard: &FetchGuard) -> GlobalOverview {
        let url = format!("{}/global", self.base);
        let body = guard.get_json(&url, &[]).await;

        match body.as_ref().and_then(|v| parse_overview(v.get("data")?)) {
            Some(overview) => overview,
            None => {
                warn!("global overview unavailable, serving synthetic totals");
                record_fallback("coincap_global");
                synthetic::global_overview()
            }
        }
    }

    pub async fn exchanges(&self, guard: &FetchGuard) -> ExchangesSnapshot {
        let url = format!("{}/exchanges", self.base);
        let body = guard.get_json(&url, &[("limit", "2000".to_string())]).await;

        match body.as_ref().and_then(parse_exchanges) {
            Some(snapshot) => snapshot,
            None => {
                warn!("exchange board unavailable");
                record_fallback("coincap_exchanges");
                synthetic::exchanges()
            }
        }
    }
}

impl Default for CoinCapAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick the coarsest interval that still gives a dense series for the span.
fn interval_for(hours: u64) -> (&'static str, u64, usize) {
    if hours <= 6 {
        ("m1", 60_000, (hours * 60) as usize)
    } else if hours <= 24 {
        ("m5", 300_000, (hours * 12) as usize)
    } else if hours <= 7 * 24 {
        ("h1", 3_600_000, hours as usize)
    } else {
        ("d1", 86_400_000, (hours / 24) as usize)
    }
}

fn parse_asset_list(body: &Value) -> Option<Vec<AssetSnapshot>> {
    let rows = body.get("data")?.as_array()?;
    // Entries that fail validation are dropped; a record is all-or-nothing.
    Some(rows.iter().filter_map(parse_asset).collect())
}

fn parse_asset(row: &Value) -> Option<AssetSnapshot> {
    let id = str_field(row, "id")?;
    let symbol = str_field(row, "symbol")?;
    let name = str_field(row, "name").unwrap_or_else(|| symbol.clone());
    Some(AssetSnapshot {
        price_usd: num_field(row, "priceUsd")?,
        change_percent_24h: num_field(row, "changePercent24Hr").unwrap_or(0.0),
        volume_usd_24h: num_field(row, "volumeUsd24Hr").unwrap_or(0.0),
        market_cap_usd: num_field(row, "marketCapUsd").unwrap_or(0.0),
        id,
        symbol,
        name,
        origin: DataOrigin::Live,
    })
}

fn parse_history(asset_id: &str, body: &Value) -> Option<PriceHistory> {
    let rows = body.get("data")?.as_array()?;
    let mut points: Vec<PricePoint> = rows
        .iter()
        .filter_map(|row| {
            Some(PricePoint {
                ts_ms: u64_field(row, "time")?,
                price_usd: num_field(row, "priceUsd")?,
            })
        })
        .collect();
    points.sort_by_key(|p| p.ts_ms);
    Some(PriceHistory {
        asset_id: asset_id.to_string(),
        points,
        origin: DataOrigin::Live,
    })
}

fn parse_overview(data: &Value) -> Option<GlobalOverview> {
    Some(GlobalOverview {
        total_market_cap_usd: num_field(data, "totalMarketCapUsd")?,
        total_volume_usd_24h: num_field(data, "totalVolumeUsd24Hr")?,
        origin: DataOrigin::Live,
    })
}

fn parse_exchanges(body: &Value) -> Option<ExchangesSnapshot> {
    let rows = body.get("data")?.as_array()?;
    // CoinCap has used both 'volumeUsd' and 'volumeUsd24Hr' here.
    let volume = |row: &Value| {
        num_field(row, "volumeUsd24Hr")
            .or_else(|| num_field(row, "volumeUsd"))
            .unwrap_or(0.0)
    };
    let top = rows
        .iter()
        .filter_map(|row| Some((str_field(row, "name")?, volume(row))))
        .max_by(|a, b| a.1.total_cmp(&b.1));
    Some(ExchangesSnapshot {
        active_count: rows.len(),
        top_by_volume: top,
        origin: DataOrigin::Live,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_stringly_typed_asset_row() {
        let body = json!({
            "data": [{"id": "bitcoin", "symbol": "BTC", "name": "Bitcoin",
                      "priceUsd": "65000.12", "changePercent24Hr": "2.3",
                      "marketCapUsd": "1.2e12", "volumeUsd24Hr": "3.4e10"}]
        });
        let assets = parse_asset_list(&body).unwrap();
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].id, "bitcoin");
        assert_eq!(assets[0].price_usd, 65000.12);
        assert_eq!(assets[0].change_percent_24h, 2.3);
        assert_eq!(assets[0].origin, DataOrigin::Live);
    }

    #[test]
    fn drops_rows_missing_required_fields() {
        let body = json!({
            "data": [
                {"id": "bitcoin", "symbol": "BTC", "priceUsd": "65000.12"},
                {"id": "broken", "symbol": "BRK"},             // no price
                {"symbol": "ANON", "priceUsd": "1.0"},          // no id
                {"id": "weird", "symbol": "WRD", "priceUsd": {}} // mistyped
            ]
        });
        let assets = parse_asset_list(&body).unwrap();
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].id, "bitcoin");
    }

    #[test]
    fn missing_optional_fields_default_to_zero() {
        let row = json!({"id": "bitcoin", "symbol": "BTC", "priceUsd": "100"});
        let asset = parse_asset(&row).unwrap();
        assert_eq!(asset.change_percent_24h, 0.0);
        assert_eq!(asset.market_cap_usd, 0.0);
    }

    #[test]
    fn history_rows_are_sorted_and_validated() {
        let body = json!({
            "data": [
                {"time": 2000u64, "priceUsd": "101.0"},
                {"time": 1000u64, "priceUsd": "100.0"},
                {"priceUsd": "99.0"},          // no timestamp
                {"time": 3000u64}               // no price
            ]
        });
        let h = parse_history("bitcoin", &body).unwrap();
        assert_eq!(h.points.len(), 2);
        assert_eq!(h.points[0].ts_ms, 1000);
        assert_eq!(h.points[1].price_usd, 101.0);
    }

    #[test]
    fn interval_scales_with_span() {
        assert_eq!(interval_for(1).0, "m1");
        assert_eq!(interval_for(24).0, "m5");
        assert_eq!(interval_for(7 * 24).0, "h1");
        assert_eq!(interval_for(30 * 24).0, "d1");
    }

    // Nothing listens on the discard port, so every request is refused
    // immediately and the adapter must serve flagged synthetic records.
    #[tokio::test]
    async fn refused_connection_falls_back_to_synthetic_records() {
        let guard = FetchGuard::new().unwrap();
        let adapter = CoinCapAdapter::with_base("http://127.0.0.1:9");

        let assets = adapter.top_assets(&guard, 5).await;
        assert_eq!(assets.len(), 5);
        assert!(assets.iter().all(|a| a.origin.is_synthetic()));

        let history = adapter.price_history(&guard, "bitcoin", 24).await;
        assert!(!history.points.is_empty());
        assert!(history.origin.is_synthetic());

        let overview = adapter.global_overview(&guard).await;
        assert!(overview.origin.is_synthetic());
        assert!(overview.total_market_cap_usd > 0.0);
    }

    #[test]
    fn exchanges_picks_top_by_either_volume_key() {
        let body = json!({
            "data": [
                {"name": "Alpha", "volumeUsd": "100.0"},
                {"name": "Beta", "volumeUsd24Hr": "900.0"},
                {"name": "NoVolume"}
            ]
        });
        let snap = parse_exchanges(&body).unwrap();
        assert_eq!(snap.active_count, 3);
        assert_eq!(snap.top_by_volume, Some(("Beta".to_string(), 900.0)));
    }
}
