//! Prediction-market surveillance daemon
//!
//! Polls Polymarket and Kalshi for recent trades and pushes flagged
//! ones to Telegram. Configuration comes from the environment.

use clap::Parser;
use insider_monitor::{
    client::{KalshiClient, MarketFilter, PolymarketClient},
    config::Config,
    monitor::{run_delivery, PollLoop},
    notify::Notifier,
    scoring::{Scorer, SizeTierScorer},
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "insider-monitor")]
#[command(about = "Monitors Polymarket and Kalshi for abnormal trade patterns")]
struct Cli {
    /// Path to a .env file to load before reading the environment
    #[arg(long, default_value = ".env")]
    env_file: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Missing file is fine; required variables may come from the shell
    let _ = dotenvy::from_path(&cli.env_file);

    // Fatal before any loop starts: missing BOT_TOKEN/CHAT_ID or bad values
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Startup failed: {}", e);
            std::process::exit(1);
        }
    };

    run_monitor(config).await
}

async fn run_monitor(config: Config) -> anyhow::Result<()> {
    tracing::info!("Starting insider monitor");

    let notifier = Arc::new(Notifier::new(
        config.bot_token.clone(),
        config.chat_id.clone(),
    )?);

    if let Err(e) = notifier.startup().await {
        tracing::warn!("Failed to send startup notification: {}", e);
    }

    let filter = MarketFilter {
        market_limit: config.market_limit,
        trade_limit: config.trade_limit,
    };
    let scorer: Arc<dyn Scorer> = Arc::new(SizeTierScorer);

    let (alert_tx, alert_rx) = mpsc::channel(100);

    let polymarket = PollLoop::new(
        PolymarketClient::new()?,
        scorer.clone(),
        filter,
        config.poll_interval,
        config.history_window,
        alert_tx.clone(),
    );
    let kalshi = PollLoop::new(
        KalshiClient::new(config.kalshi_api_key.clone())?,
        scorer,
        filter,
        config.kalshi_poll_interval,
        config.history_window,
        alert_tx,
    );

    tokio::spawn(run_delivery(notifier, alert_rx));
    tokio::spawn(polymarket.run());
    tokio::spawn(kalshi.run());

    tracing::info!("Monitoring started, press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");

    // In-flight requests are abandoned; there is no persisted state to
    // corrupt, so dropping the tasks is a clean exit.
    Ok(())
}
