//! Kalshi public API client (trade-api v2)
//!
//! The public endpoints need no authentication; an API key can be
//! supplied to unlock private ones.

use crate::client::{MarketFilter, MarketSource};
use crate::error::{MonitorError, Result};
use crate::types::{Exchange, Side, TradeRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const SOURCE: &str = "Kalshi";

/// Kalshi's public trade feed does not expose account identities
const ANONYMOUS_TRADER: &str = "kalshi-anonymous";

/// Client for Kalshi's v2 trade API
pub struct KalshiClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MarketsResponse {
    #[serde(default)]
    markets: Vec<KalshiMarket>,
}

#[derive(Debug, Deserialize)]
struct KalshiMarket {
    ticker: String,
    title: Option<String>,
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TradesResponse {
    #[serde(default)]
    trades: Vec<KalshiTrade>,
}

#[derive(Debug, Deserialize)]
struct KalshiTrade {
    trade_id: Option<String>,
    /// Contracts traded
    count: Option<i64>,
    /// Price of the YES side in cents
    yes_price: Option<i64>,
    taker_side: Option<String>,
    created_time: Option<DateTime<Utc>>,
}

impl KalshiClient {
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_base_url("https://api.elections.kalshi.com/trade-api/v2", api_key)
    }

    /// Construct against an explicit base URL (tests)
    pub fn with_base_url(base_url: &str, api_key: Option<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let mut req = self.http.get(url);
        if let Some(key) = &self.api_key {
            req = req.header("Authorization", format!("Bearer {}", key));
        }
        req
    }

    async fn get_active_markets(&self, limit: usize) -> Result<Vec<KalshiMarket>> {
        let url = format!("{}/markets", self.base_url);
        let resp = self
            .get(&url)
            .query(&[("limit", limit.to_string()), ("status", "open".to_string())])
            .send()
            .await
            .map_err(|e| MonitorError::fetch(SOURCE, e))?;

        if !resp.status().is_success() {
            return Err(MonitorError::fetch(
                SOURCE,
                format!("markets returned {}", resp.status()),
            ));
        }

        let body: MarketsResponse =
            resp.json().await.map_err(|e| MonitorError::fetch(SOURCE, e))?;

        Ok(body
            .markets
            .into_iter()
            .filter(|m| m.status.as_deref().map(|s| s != "closed").unwrap_or(true))
            .collect())
    }

    async fn get_market_trades(
        &self,
        market: &KalshiMarket,
        limit: usize,
    ) -> Result<Vec<TradeRecord>> {
        let url = format!("{}/markets/{}/trades", self.base_url, market.ticker);
        let resp = self
            .get(&url)
            .query(&[("limit", limit.to_string())])
            .send()
            .await
            .map_err(|e| MonitorError::fetch(SOURCE, e))?;

        if !resp.status().is_success() {
            return Err(MonitorError::fetch(
                SOURCE,
                format!("trades returned {}", resp.status()),
            ));
        }

        let body: TradesResponse =
            resp.json().await.map_err(|e| MonitorError::fetch(SOURCE, e))?;

        // Feed is newest first; we hand trades out newest last
        let mut trades: Vec<TradeRecord> = body
            .trades
            .into_iter()
            .filter_map(|t| normalize_trade(market, t))
            .collect();
        trades.reverse();
        Ok(trades)
    }
}

fn normalize_trade(market: &KalshiMarket, t: KalshiTrade) -> Option<TradeRecord> {
    let side = t.taker_side.as_deref().and_then(Side::parse)?;
    let count = Decimal::from(t.count.unwrap_or(0));
    // Prices are quoted in cents per contract
    let price = Decimal::from(t.yes_price.unwrap_or(0)) / Decimal::ONE_HUNDRED;

    Some(TradeRecord {
        market_id: market.ticker.clone(),
        market_name: market
            .title
            .clone()
            .unwrap_or_else(|| market.ticker.clone()),
        source: Exchange::Kalshi,
        side,
        size: count,
        price,
        timestamp: t.created_time.unwrap_or_else(Utc::now),
        trade_id: t.trade_id.unwrap_or_else(|| "unknown".to_string()),
        trader_reference: ANONYMOUS_TRADER.to_string(),
        market_slug: None,
    })
}

#[async_trait]
impl MarketSource for KalshiClient {
    fn name(&self) -> &str {
        SOURCE
    }

    async fn fetch_recent_trades(&self, filter: &MarketFilter) -> Result<Vec<TradeRecord>> {
        let markets = self.get_active_markets(filter.market_limit).await?;
        debug!("Scanning {} open Kalshi markets", markets.len());

        let mut all = Vec::new();
        for market in &markets {
            match self.get_market_trades(market, filter.trade_limit).await {
                Ok(trades) => all.extend(trades),
                Err(e) => {
                    debug!("Skipping market {}: {}", market.ticker, e);
                }
            }
        }
        Ok(all)
    }
}
