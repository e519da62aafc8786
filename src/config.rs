//! Environment-based configuration
//!
//! All settings come from the process environment (a `.env` file is
//! loaded first if present). `BOT_TOKEN` and `CHAT_ID` are required;
//! everything else has a default.

use crate::error::{MonitorError, Result};
use std::time::Duration;

/// Kalshi's public API budget is roughly 1000 req/hour; one markets call
/// plus a handful of trade calls per cycle keeps us far under at 60s.
const KALSHI_MIN_INTERVAL_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram bot token from @BotFather
    pub bot_token: String,
    /// Destination chat for alerts
    pub chat_id: String,
    /// Polymarket poll interval
    pub poll_interval: Duration,
    /// Kalshi poll interval (floored at 60s)
    pub kalshi_poll_interval: Duration,
    /// Optional Kalshi API key for private endpoints
    pub kalshi_api_key: Option<String>,
    /// Active markets scanned per cycle
    pub market_limit: usize,
    /// Trades fetched per market per cycle
    pub trade_limit: usize,
    /// Per-market trade history retained for the scorer
    pub history_window: usize,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Returns `MonitorError::Config` for missing required variables or
    /// unparseable numeric values; the caller treats that as fatal.
    pub fn from_env() -> Result<Self> {
        let bot_token = require("BOT_TOKEN")?;
        let chat_id = require("CHAT_ID")?;

        let poll_secs = parse_var("POLL_INTERVAL_SECS", 60u64)?;
        if poll_secs == 0 {
            return Err(MonitorError::Config(
                "POLL_INTERVAL_SECS must be greater than zero".to_string(),
            ));
        }
        let kalshi_secs = parse_var(
            "KALSHI_POLL_INTERVAL_SECS",
            poll_secs.max(KALSHI_MIN_INTERVAL_SECS),
        )?
        .max(KALSHI_MIN_INTERVAL_SECS);

        Ok(Self {
            bot_token,
            chat_id,
            poll_interval: Duration::from_secs(poll_secs),
            kalshi_poll_interval: Duration::from_secs(kalshi_secs),
            kalshi_api_key: std::env::var("KALSHI_API_KEY").ok().filter(|s| !s.is_empty()),
            market_limit: parse_var("MARKET_LIMIT", 20usize)?,
            trade_limit: parse_var("TRADE_LIMIT", 5usize)?,
            history_window: parse_var("HISTORY_WINDOW", 50usize)?,
        })
    }
}

fn require(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(MonitorError::Config(format!(
            "{} must be set (see .env.example)",
            name
        ))),
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
{
    match std::env::var(name) {
        Ok(v) => v.trim().parse().map_err(|_| {
            MonitorError::Config(format!("{} has invalid value: {:?}", name, v))
        }),
        Err(_) => Ok(default),
    }
}
