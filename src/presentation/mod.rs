// View-model bindings: plain structs a renderer can consume directly, plus
// the formatting helpers the views share. No I/O in this module.

pub mod globe;

use serde::{Deserialize, Serialize};

use crate::market_data::types::{AssetSnapshot, NewsFeed};

/// Compact USD figure with K/M/B/T abbreviation, e.g. `1.95T` or `-12.40M`.
pub fn usd_fmt(value: f64) -> String {
    const ABBR: [&str; 5] = ["", "K", "M", "B", "T"];
    let sign = if value < 0.0 { "-" } else { "" };
    let mut value = value.abs();
    let mut i = 0;
    while value >= 1000.0 && i < ABBR.len() - 1 {
        value /= 1000.0;
        i += 1;
    }
    format!("{sign}{value:.2}{}", ABBR[i])
}

/// 24h change with an explicit sign, e.g. `+1.23%`.
pub fn signed_pct(change: f64) -> String {
    format!("{change:+.2}%")
}

/// One entry in the scrolling ticker strip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TickerItem {
    Asset {
        symbol: String,
        price_usd: f64,
        change_percent_24h: f64,
    },
    Headline(String),
}

/// Asset quotes first, headlines after, matching the strip's scroll order.
pub fn ticker_items(assets: &[AssetSnapshot], news: &NewsFeed) -> Vec<TickerItem> {
    assets
        .iter()
        .map(|a| TickerItem::Asset {
            symbol: a.symbol.clone(),
            price_usd: a.price_usd,
            change_percent_24h: a.change_percent_24h,
        })
        .chain(
            news.items
                .iter()
                .map(|n| TickerItem::Headline(n.title.clone())),
        )
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub symbol: String,
    pub change_percent_24h: f64,
    pub row: usize,
    pub col: usize,
}

/// Row-major grid placement, `cols` cells per row.
pub fn heatmap(assets: &[AssetSnapshot], cols: usize) -> Vec<HeatmapCell> {
    let cols = cols.max(1);
    assets
        .iter()
        .enumerate()
        .map(|(i, a)| HeatmapCell {
            symbol: a.symbol.clone(),
            change_percent_24h: a.change_percent_24h,
            row: i / cols,
            col: i % cols,
        })
        .collect()
}
