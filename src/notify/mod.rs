//! Telegram alert delivery
//!
//! Sends HTML-formatted messages through the Bot API, never closer than
//! one second apart. The spacing is enforced inside the notifier so the
//! invariant holds no matter how many loops share one instance.

use crate::error::{MonitorError, Result};
use crate::types::AlertEvent;
use crate::utils::rate_limit::RateLimiter;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Telegram allows 1 message per second to the same chat
const MIN_SEND_INTERVAL: Duration = Duration::from_secs(1);

/// Telegram notifier with built-in send spacing
pub struct Notifier {
    http: Client,
    base_url: String,
    bot_token: String,
    chat_id: String,
    limiter: RateLimiter,
    enabled: bool,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest {
    chat_id: String,
    text: String,
    parse_mode: String,
    disable_web_page_preview: bool,
}

#[derive(Debug, Deserialize)]
struct SendMessageResponse {
    ok: bool,
    description: Option<String>,
}

impl Notifier {
    pub fn new(bot_token: String, chat_id: String) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            base_url: "https://api.telegram.org".to_string(),
            bot_token,
            chat_id,
            limiter: RateLimiter::new(MIN_SEND_INTERVAL),
            enabled: true,
        })
    }

    /// A notifier that drops everything (no Telegram configured)
    pub fn disabled() -> Self {
        Self {
            http: Client::new(),
            base_url: "https://api.telegram.org".to_string(),
            bot_token: String::new(),
            chat_id: String::new(),
            limiter: RateLimiter::new(MIN_SEND_INTERVAL),
            enabled: false,
        }
    }

    /// Point at a different API host (tests)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Send a formatted alert for a flagged trade
    pub async fn send_alert(&self, event: &AlertEvent) -> Result<()> {
        let text = format_alert(event);
        self.send(&text).await?;
        info!("Alert sent: {}", event.alert_id());
        Ok(())
    }

    /// Send a raw HTML message, waiting out the rate limit first
    pub async fn send(&self, text: &str) -> Result<()> {
        if !self.enabled {
            debug!("Notifier disabled, dropping message");
            return Ok(());
        }

        let waited = self.limiter.acquire().await;
        if !waited.is_zero() {
            debug!("Rate limit: delayed send by {:?}", waited);
        }

        let url = format!("{}/bot{}/sendMessage", self.base_url, self.bot_token);
        let request = SendMessageRequest {
            chat_id: self.chat_id.clone(),
            text: text.to_string(),
            parse_mode: "HTML".to_string(),
            disable_web_page_preview: true,
        };

        let resp = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| MonitorError::Delivery(e.to_string()))?;

        let status = resp.status();
        let body: SendMessageResponse = resp
            .json()
            .await
            .map_err(|e| MonitorError::Delivery(e.to_string()))?;

        if !body.ok {
            return Err(MonitorError::Delivery(format!(
                "Telegram returned {}: {}",
                status,
                body.description.unwrap_or_else(|| "unknown error".to_string())
            )));
        }

        Ok(())
    }

    /// Startup banner sent once before the loops begin
    pub async fn startup(&self) -> Result<()> {
        self.send("✅ <b>Insider Monitor started</b> (Polymarket + Kalshi)")
            .await
    }
}

/// Build the HTML alert body: market, trade details, flag reason, and a
/// direct trading link.
fn format_alert(event: &AlertEvent) -> String {
    let trade = &event.trade;
    // Exchange payloads are untrusted; truncate on char boundaries
    let wallet = if trade.trader_reference.chars().count() > 16 {
        let prefix: String = trade.trader_reference.chars().take(16).collect();
        format!("{}...", prefix)
    } else {
        trade.trader_reference.clone()
    };

    format!(
        "{} <b>{}</b>\n\
         Risk Score: {}/100\n\
         Risk Level: {}\n\n\
         <b>Trade Details</b>\n\
         Source: {}\n\
         Size: ${:.0}\n\
         Wallet: <code>{}</code>\n\
         Time: {} UTC\n\n\
         <b>Flags</b>\n\
         {}\n\n\
         🔗 <a href=\"{}\">Trade on {}</a>",
        event.level.emoji(),
        trade.market_name,
        event.score,
        event.level.as_str(),
        trade.source,
        trade.notional(),
        wallet,
        trade.timestamp.format("%Y-%m-%d %H:%M:%S"),
        event.reason,
        trade.trading_url(),
        trade.source,
    )
}
