use clap::Parser;
use coindash::presentation::usd_fmt;
use coindash::{Dashboard, DashboardFrame, LiveSource, SessionSettings};

#[derive(Parser, Debug)]
#[command(name = "coindash", about = "Market dashboard aggregation core")]
struct Cli {
    /// Seconds between refresh cycles.
    #[arg(long, default_value_t = 60)]
    refresh_secs: u64,

    /// Run a single refresh cycle and exit.
    #[arg(long)]
    once: bool,

    /// Symbols to watch for big moves, e.g. --watch BTC --watch ETH.
    #[arg(long)]
    watch: Vec<String>,

    /// |24h change| threshold in percent for watchlist alerts.
    #[arg(long, default_value_t = 5.0)]
    alert_threshold: f64,
}

fn print_frame(frame: &DashboardFrame) {
    println!("\n=== Market Frame ===");
    if frame.degraded {
        println!("(degraded: some views are synthetic fallback data)");
    }
    println!(
        "Market cap: ${}  Volume 24h: ${}",
        usd_fmt(frame.overview.total_market_cap_usd),
        usd_fmt(frame.overview.total_volume_usd_24h)
    );
    println!(
        "BTC dominance: {:.1}%  Breadth: {:.0}%  Advancers/Decliners: {}/{}",
        frame.kpis.btc_dominance_pct,
        frame.kpis.breadth_pct,
        frame.kpis.advancers,
        frame.kpis.decliners
    );
    println!(
        "Fear&Greed: {} ({})  Hashrate: {:.0} EH/s  Gas avg: {:.1} gwei",
        frame.fear_greed.value,
        frame.fear_greed.classification,
        frame.hashrate.eh_per_s,
        frame.gas.average_gwei
    );
    println!(
        "BTC volatility: {:.2}%  Spot spread: {:.4}%  Funding: {:+.4}%",
        frame.volatility_pct, frame.spread_pct, frame.derivatives.funding_rate_pct
    );
    for row in &frame.leaderboard.rows {
        println!(
            "  #{:<2} {:<6} ${:<12.2} {:+.2}%  mcap ${}",
            row.rank,
            row.symbol,
            row.price_usd,
            row.change_percent_24h,
            usd_fmt(row.market_cap_usd)
        );
    }
    if let Some(gainer) = &frame.extremes.top_gainer {
        println!(
            "Top gainer: {} {:+.2}%",
            gainer.symbol, gainer.change_percent_24h
        );
    }
    if frame.watchlist_alerts > 0 {
        println!("Watchlist alerts: {}", frame.watchlist_alerts);
    }
    for item in frame.news.items.iter().take(3) {
        println!("  news: {}", item.title);
    }
    println!("====================\n");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok(); // load .env

    coindash::telemetry::init_tracing("coindash=info");
    coindash::telemetry::init_metrics();

    let cli = Cli::parse();
    let mut session = SessionSettings {
        refresh_secs: cli.refresh_secs,
        ..Default::default()
    };
    for symbol in &cli.watch {
        session.watch(symbol, cli.alert_threshold);
    }

    let source = LiveSource::new()?;
    let mut dashboard = Dashboard::with_session(source, session);

    loop {
        let frame = dashboard.refresh().await;
        print_frame(&frame);
        if cli.once {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_secs(cli.refresh_secs)).await;
    }
    Ok(())
}
