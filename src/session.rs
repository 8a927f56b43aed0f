// Per-viewer knobs. These survive across refresh cycles but never across
// process restarts; nothing in here is persisted.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WatchEntry {
    /// |24h change| in percent at which this symbol raises an alert.
    pub threshold_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSettings {
    pub auto_rotate: bool,
    pub camera_distance: u32,
    pub rotate_speed: f64,
    /// Decorative extra points scattered on the globe besides the hub cities.
    pub extra_points: usize,
    pub live_update: bool,
    pub refresh_secs: u64,
    /// Keyed by upper-cased symbol.
    pub watchlist: HashMap<String, WatchEntry>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            auto_rotate: true,
            camera_distance: 420,
            rotate_speed: 1.0,
            extra_points: 150,
            live_update: true,
            refresh_secs: 60,
            watchlist: HashMap::new(),
        }
    }
}

impl SessionSettings {
    pub fn watch(&mut self, symbol: &str, threshold_pct: f64) {
        self.watchlist
            .insert(symbol.to_uppercase(), WatchEntry { threshold_pct });
    }

    pub fn unwatch(&mut self, symbol: &str) -> bool {
        self.watchlist.remove(&symbol.to_uppercase()).is_some()
    }

    pub fn clear_watchlist(&mut self) {
        self.watchlist.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watch_upper_cases_the_key() {
        let mut s = SessionSettings::default();
        s.watch("btc", 5.0);
        assert!(s.watchlist.contains_key("BTC"));
        assert!(s.unwatch("Btc"));
        assert!(!s.unwatch("BTC"));
    }

    #[test]
    fn defaults_match_the_sidebar() {
        let s = SessionSettings::default();
        assert!(s.auto_rotate);
        assert_eq!(s.camera_distance, 420);
        assert_eq!(s.refresh_secs, 60);
        assert!(s.watchlist.is_empty());
    }
}
