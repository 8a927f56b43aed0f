// Market-mood extras: alternative.me Fear & Greed index and the
// blockchain.info network hashrate chart (reported in TH/s, shown in EH/s).

use serde_json::Value;
use tracing::warn;

use super::{num_field, record_fallback, str_field};
use crate::config::endpoints;
use crate::fetch::FetchGuard;
use crate::market_data::synthetic;
use crate::market_data::types::*;

pub struct SentimentAdapter {
    fear_greed_url: String,
    hashrate_url: String,
}

impl SentimentAdapter {
    pub fn new() -> Self {
        Self {
            fear_greed_url: endpoints::FEAR_GREED.to_string(),
            hashrate_url: endpoints::HASHRATE_CHART.to_string(),
        }
    }

    #[cfg(test)]
    fn with_base(base: &str) -> Self {
        Self {
            fear_greed_url: format!("{base}/fng"),
            hashrate_url: format!("{base}/charts/hash-rate"),
        }
    }

    pub async fn fear_greed(&self, guard: &FetchGuard) -> FearGreed {
        let body = guard
            .get_json(&self.fear_greed_url, &[("limit", "1".to_string())])
            .await;

        match body.as_ref().and_then(parse_fear_greed) {
            Some(index) => index,
            None => {
                warn!("fear & greed unavailable");
                record_fallback("fear_greed");
                synthetic::fear_greed()
            }
        }
    }

    pub async fn hashrate(&self, guard: &FetchGuard) -> HashrateSnapshot {
        let query = [
            ("timespan", "3days".to_string()),
            ("format", "json".to_string()),
        ];
        let body = guard.get_json(&self.hashrate_url, &query).await;

        match body.as_ref().and_then(parse_hashrate) {
            Some(snapshot) => snapshot,
            None => {
                warn!("hashrate chart unavailable");
                record_fallback("hashrate");
                synthetic::hashrate()
            }
        }
    }
}

impl Default for SentimentAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_fear_greed(body: &Value) -> Option<FearGreed> {
    let first = body.get("data")?.as_array()?.first()?;
    let value = num_field(first, "value")?;
    if !(0.0..=100.0).contains(&value) {
        return None;
    }
    Some(FearGreed {
        value: value as u32,
        classification: str_field(first, "value_classification")
            .unwrap_or_else(|| "N/A".to_string()),
        origin: DataOrigin::Live,
    })
}

fn parse_hashrate(body: &Value) -> Option<HashrateSnapshot> {
    let last = body.get("values")?.as_array()?.last()?;
    let th_per_s = num_field(last, "y")?;
    if th_per_s <= 0.0 {
        return None;
    }
    Some(HashrateSnapshot {
        eh_per_s: th_per_s / 1_000_000.0,
        origin: DataOrigin::Live,
    })
}
