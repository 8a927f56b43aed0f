pub mod aggregator;
pub mod config;
pub mod dashboard;
pub mod fetch;
pub mod market_data;
pub mod presentation;
pub mod session;
pub mod telemetry;

pub use dashboard::{Dashboard, DashboardFrame, RefreshState};
pub use market_data::source::{LiveSource, MarketSource};
pub use session::SessionSettings;
