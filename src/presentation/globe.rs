// Parameters for the 3D globe view: a fixed table of trading hub cities,
// randomized activity decoration, and the camera settings carried over from
// the session. The renderer consumes GlobeParams as-is.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::market_data::types::AssetSnapshot;
use crate::session::SessionSettings;

/// Major trading hubs pinned on the globe.
pub const HUB_CITIES: &[(&str, f64, f64, &str)] = &[
    ("New York", 40.7128, -74.0060, "US"),
    ("London", 51.5074, -0.1278, "UK"),
    ("Tokyo", 35.6762, 139.6503, "JP"),
    ("Singapore", 1.3521, 103.8198, "SG"),
    ("Frankfurt", 50.1109, 8.6821, "DE"),
    ("Hong Kong", 22.3193, 114.1694, "HK"),
    ("Seoul", 37.5665, 126.9780, "KR"),
    ("Sydney", -33.8688, 151.2093, "AU"),
    ("Paris", 48.8566, 2.3522, "FR"),
    ("Dubai", 25.2048, 55.2708, "AE"),
    ("Toronto", 43.6532, -79.3832, "CA"),
    ("São Paulo", -23.5558, -46.6396, "BR"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobeHub {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub region: String,
    /// Decorative activity figure, not a market number.
    pub volume_usd: f64,
    pub trend_pct: f64,
    pub top_coins: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobeParams {
    pub camera_distance: u32,
    pub auto_rotate: bool,
    pub rotate_speed: f64,
    pub hubs: Vec<GlobeHub>,
    pub extras: Vec<GlobeHub>,
}

fn top_coins(assets: &[AssetSnapshot]) -> String {
    if assets.is_empty() {
        return "BTC, ETH, SOL".to_string();
    }
    assets
        .iter()
        .take(3)
        .map(|a| a.symbol.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// The fixed hub table decorated with randomized activity.
pub fn hubs(assets: &[AssetSnapshot]) -> Vec<GlobeHub> {
    let coins = top_coins(assets);
    let mut rng = rand::thread_rng();
    HUB_CITIES
        .iter()
        .map(|(name, lat, lon, region)| GlobeHub {
            name: name.to_string(),
            lat: *lat,
            lon: *lon,
            region: region.to_string(),
            volume_usd: rng.gen_range(5e7..8.5e8),
            trend_pct: rng.gen_range(-4.0..4.0),
            top_coins: coins.clone(),
        })
        .collect()
}

/// Randomly scattered minor nodes. Latitudes stay inside ±70° so points do
/// not bunch up at the poles.
pub fn extra_points(count: usize, assets: &[AssetSnapshot]) -> Vec<GlobeHub> {
    let coins = top_coins(assets);
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|i| GlobeHub {
            name: format!("Node {}", i + 1),
            lat: rng.gen_range(-70.0..70.0),
            lon: rng.gen_range(-180.0..180.0),
            region: "Global".to_string(),
            volume_usd: rng.gen_range(1e6..8.1e7),
            trend_pct: rng.gen_range(-5.0..5.0),
            top_coins: coins.clone(),
        })
        .collect()
}

pub fn params(session: &SessionSettings, assets: &[AssetSnapshot]) -> GlobeParams {
    GlobeParams {
        camera_distance: session.camera_distance,
        auto_rotate: session.auto_rotate,
        rotate_speed: session.rotate_speed,
        hubs: hubs(assets),
        extras: extra_points(session.extra_points, assets),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::synthetic;

    #[test]
    fn twelve_hubs_with_plausible_decoration() {
        let assets = synthetic::asset_list(10);
        let hubs = hubs(&assets);
        assert_eq!(hubs.len(), 12);
        for h in &hubs {
            assert!((-90.0..=90.0).contains(&h.lat));
            assert!((-180.0..=180.0).contains(&h.lon));
            assert!(h.volume_usd > 0.0);
            assert!(h.trend_pct.abs() <= 4.0);
        }
        assert_eq!(hubs[0].name, "New York");
    }

    #[test]
    fn extra_points_stay_off_the_poles() {
        let nodes = extra_points(40, &[]);
        assert_eq!(nodes.len(), 40);
        for n in &nodes {
            assert!(n.lat.abs() <= 70.0);
            assert_eq!(n.top_coins, "BTC, ETH, SOL");
        }
    }

    #[test]
    fn params_carry_session_camera() {
        let mut session = SessionSettings::default();
        session.camera_distance = 300;
        session.extra_points = 5;
        let p = params(&session, &[]);
        assert_eq!(p.camera_distance, 300);
        assert_eq!(p.extras.len(), 5);
        assert!(p.auto_rotate);
    }
}
