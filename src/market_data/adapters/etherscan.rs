// Etherscan gas oracle, key-gated. Without ETHERSCAN_API_KEY the live call is
// disabled and the adapter serves synthetic gas; no other adapter is affected.

use serde_json::Value;
use tracing::{debug, warn};

use super::{num_field, record_fallback};
use crate::config::endpoints;
use crate::fetch::FetchGuard;
use crate::market_data::synthetic;
use crate::market_data::types::*;

pub struct EtherscanAdapter {
    url: String,
    api_key: Option<String>,
}

impl EtherscanAdapter {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            url: endpoints::ETHERSCAN_API.to_string(),
            api_key,
        }
    }

    #[cfg(test)]
    fn with_url(url: &str, api_key: Option<String>) -> Self {
        Self {
            url: url.to_string(),
            api_key,
        }
    }

    pub async fn gas(&self, guard: &FetchGuard) -> GasSnapshot {
        let Some(key) = self.api_key.as_deref() else {
            debug!("no etherscan api key, gas adapter disabled");
            return synthetic::gas();
        };

        let query = [
            ("module", "gastracker".to_string()),
            ("action", "gasoracle".to_string()),
            ("apikey", key.to_string()),
        ];
        let body = guard.get_json(&self.url, &query).await;

        match body.as_ref().and_then(|v| parse_gas(v.get("result")?)) {
            Some(gas) => gas,
            None => {
                warn!("gas oracle unavailable, serving synthetic gas");
                record_fallback("etherscan_gas");
                synthetic::gas()
            }
        }
    }
}

fn parse_gas(result: &Value) -> Option<GasSnapshot> {
    Some(GasSnapshot {
        low_gwei: num_field(result, "SafeGasPrice")?,
        average_gwei: num_field(result, "ProposeGasPrice")?,
        fast_gwei: num_field(result, "FastGasPrice")?,
        origin: DataOrigin::Live,
    })
}
