// Process-wide constants: one timeout for every outbound call, one TTL per
// cached view. Callers must not invent their own durations.

use std::time::Duration;

/// Single timeout bound applied to every outbound HTTP request.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// How many assets the leaderboard shows.
pub const TOP_ASSETS: usize = 10;

/// Basket size used for KPI / dominance / breadth computations.
pub const KPI_BASKET: usize = 100;

/// Order-book depth levels requested per snapshot.
pub const DEPTH_LEVELS: usize = 50;

/// Hour span used for sparklines and the volatility estimate.
pub const HISTORY_HOURS: u64 = 24;

/// |24h change| at or beyond this counts as a big mover.
pub const MOVE_THRESHOLD_PCT: f64 = 5.0;

/// Assets compared in the multi-asset series view.
pub const COMPARE_ASSETS: &[(&str, &str)] = &[
    ("bitcoin", "BTC"),
    ("ethereum", "ETH"),
    ("solana", "SOL"),
];

pub const STABLE_SYMBOLS: &[&str] = &["USDT", "USDC", "DAI", "TUSD", "USDP"];
pub const L2_SYMBOLS: &[&str] = &["ARB", "OP", "STRK", "METIS", "MANTA"];

/// Plausibility bounds for synthetic asset prices, documented so tests can
/// assert fallback records stay inside them.
pub const SYNTHETIC_PRICE_MIN_USD: f64 = 1.0;
pub const SYNTHETIC_PRICE_MAX_USD: f64 = 100_000.0;

/// Freshness window per cached view. Mirrors how often each upstream source
/// meaningfully changes; the depth snapshot churns fastest, sentiment slowest.
pub mod ttl {
    use std::time::Duration;

    pub const ASSETS: Duration = Duration::from_secs(60);
    pub const ASSET_DETAIL: Duration = Duration::from_secs(60);
    pub const HISTORY: Duration = Duration::from_secs(120);
    pub const OVERVIEW: Duration = Duration::from_secs(60);
    pub const DEPTH: Duration = Duration::from_secs(30);
    pub const DERIVATIVES: Duration = Duration::from_secs(60);
    pub const GAS: Duration = Duration::from_secs(60);
    pub const EXCHANGES: Duration = Duration::from_secs(180);
    pub const FEAR_GREED: Duration = Duration::from_secs(600);
    pub const HASHRATE: Duration = Duration::from_secs(300);
    pub const NEWS: Duration = Duration::from_secs(300);
}

pub mod endpoints {
    pub const COINCAP_BASE: &str = "https://api.coincap.io/v2";
    pub const BINANCE_SPOT_DEPTH: &str = "https://api.binance.com/api/v3/depth";
    pub const BINANCE_PREMIUM_INDEX: &str = "https://fapi.binance.com/fapi/v1/premiumIndex";
    pub const BINANCE_OPEN_INTEREST: &str = "https://fapi.binance.com/fapi/v1/openInterest";
    pub const ETHERSCAN_API: &str = "https://api.etherscan.io/api";
    pub const FEAR_GREED: &str = "https://api.alternative.me/fng/";
    pub const HASHRATE_CHART: &str = "https://api.blockchain.info/charts/hash-rate";
    pub const RSS_FEEDS: &[&str] = &[
        "https://www.coindesk.com/arc/outboundfeeds/rss/",
        "https://cointelegraph.com/rss",
    ];
}

/// Optional credential for the gas-price provider. Absent key disables that
/// adapter only; everything else keeps running.
pub fn etherscan_api_key() -> Option<String> {
    std::env::var("ETHERSCAN_API_KEY").ok().filter(|k| !k.is_empty())
}
