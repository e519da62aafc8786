//! Polymarket public API client
//!
//! Uses the CLOB API for the active-market list and the Data API for
//! per-market trade history. No authentication required.

use crate::client::{MarketFilter, MarketSource};
use crate::error::{MonitorError, Result};
use crate::types::{Exchange, Side, TradeRecord};
use crate::utils::rate_limit::WindowLimiter;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const SOURCE: &str = "Polymarket";

/// Polymarket allows roughly 50-100 requests per 10s window; one markets
/// call plus `market_limit` trade calls per cycle stays well under this.
const BURST_LIMIT: usize = 30;
const BURST_WINDOW: Duration = Duration::from_secs(10);

/// Client for Polymarket's public CLOB and Data APIs
pub struct PolymarketClient {
    http: Client,
    clob_url: String,
    data_url: String,
    burst: WindowLimiter,
}

#[derive(Debug, Deserialize)]
struct ClobMarketsResponse {
    #[serde(default)]
    data: Vec<ClobMarket>,
}

#[derive(Debug, Deserialize)]
struct ClobMarket {
    condition_id: Option<String>,
    question: Option<String>,
    #[serde(default)]
    active: bool,
    #[serde(default)]
    closed: bool,
    market_slug: Option<String>,
}

/// One trade from the Data API. Numeric fields arrive as JSON numbers.
#[derive(Debug, Deserialize)]
struct DataTrade {
    #[serde(rename = "transactionHash")]
    transaction_hash: Option<String>,
    #[serde(rename = "proxyWallet")]
    proxy_wallet: Option<String>,
    side: Option<String>,
    size: Option<f64>,
    price: Option<f64>,
    /// Unix seconds
    timestamp: Option<i64>,
    slug: Option<String>,
    #[serde(rename = "eventSlug")]
    event_slug: Option<String>,
}

impl PolymarketClient {
    pub fn new() -> Result<Self> {
        Self::with_urls("https://clob.polymarket.com", "https://data-api.polymarket.com")
    }

    /// Construct against explicit base URLs (tests)
    pub fn with_urls(clob_url: &str, data_url: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            clob_url: clob_url.trim_end_matches('/').to_string(),
            data_url: data_url.trim_end_matches('/').to_string(),
            burst: WindowLimiter::new(BURST_LIMIT, BURST_WINDOW),
        })
    }

    /// Fetch active markets from the CLOB, limited client-side
    async fn get_active_markets(&self, limit: usize) -> Result<Vec<ClobMarket>> {
        self.burst.acquire().await;

        let url = format!("{}/markets", self.clob_url);
        let resp = self.http.get(&url).send().await.map_err(|e| MonitorError::fetch(SOURCE, e))?;

        if !resp.status().is_success() {
            return Err(MonitorError::fetch(
                SOURCE,
                format!("markets returned {}", resp.status()),
            ));
        }

        let body: ClobMarketsResponse =
            resp.json().await.map_err(|e| MonitorError::fetch(SOURCE, e))?;

        Ok(body
            .data
            .into_iter()
            .filter(|m| m.active && !m.closed && m.condition_id.is_some())
            .take(limit)
            .collect())
    }

    /// Fetch recent trades for one market (condition id) from the Data API
    async fn get_market_trades(
        &self,
        market: &ClobMarket,
        limit: usize,
    ) -> Result<Vec<TradeRecord>> {
        self.burst.acquire().await;

        let condition_id = market.condition_id.as_deref().unwrap_or_default();
        let url = format!("{}/trades", self.data_url);
        let resp = self
            .http
            .get(&url)
            .query(&[("market", condition_id), ("limit", &limit.to_string())])
            .send()
            .await
            .map_err(|e| MonitorError::fetch(SOURCE, e))?;

        if !resp.status().is_success() {
            return Err(MonitorError::fetch(
                SOURCE,
                format!("trades returned {}", resp.status()),
            ));
        }

        let raw: Vec<DataTrade> = resp.json().await.map_err(|e| MonitorError::fetch(SOURCE, e))?;

        // Data API returns newest first; we hand trades out newest last
        let mut trades: Vec<TradeRecord> = raw
            .into_iter()
            .filter_map(|t| normalize_trade(market, t))
            .collect();
        trades.reverse();
        Ok(trades)
    }
}

fn normalize_trade(market: &ClobMarket, t: DataTrade) -> Option<TradeRecord> {
    let side = t.side.as_deref().and_then(Side::parse)?;
    let size = Decimal::try_from(t.size.unwrap_or(0.0)).ok()?;
    let price = Decimal::try_from(t.price.unwrap_or(0.0)).ok()?;
    let timestamp = t
        .timestamp
        .and_then(|s| DateTime::<Utc>::from_timestamp(s, 0))
        .unwrap_or_else(Utc::now);

    Some(TradeRecord {
        market_id: market.condition_id.clone().unwrap_or_default(),
        market_name: market
            .question
            .clone()
            .unwrap_or_else(|| "Unknown".to_string()),
        source: Exchange::Polymarket,
        side,
        size,
        price,
        timestamp,
        trade_id: t.transaction_hash.unwrap_or_else(|| "unknown".to_string()),
        trader_reference: t.proxy_wallet.unwrap_or_else(|| "unknown".to_string()),
        market_slug: t
            .event_slug
            .or(t.slug)
            .or_else(|| market.market_slug.clone()),
    })
}

#[async_trait]
impl MarketSource for PolymarketClient {
    fn name(&self) -> &str {
        SOURCE
    }

    async fn fetch_recent_trades(&self, filter: &MarketFilter) -> Result<Vec<TradeRecord>> {
        let markets = self.get_active_markets(filter.market_limit).await?;
        debug!("Scanning {} active Polymarket markets", markets.len());

        let mut all = Vec::new();
        for market in &markets {
            match self.get_market_trades(market, filter.trade_limit).await {
                Ok(trades) => all.extend(trades),
                Err(e) => {
                    // One bad market should not sink the whole cycle
                    debug!("Skipping market {:?}: {}", market.condition_id, e);
                }
            }
        }
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_market() -> ClobMarket {
        ClobMarket {
            condition_id: Some("0xabc".to_string()),
            question: Some("Will it rain tomorrow?".to_string()),
            active: true,
            closed: false,
            market_slug: Some("will-it-rain".to_string()),
        }
    }

    #[test]
    fn normalizes_data_api_trade() {
        let raw = DataTrade {
            transaction_hash: Some("0xdeadbeef".to_string()),
            proxy_wallet: Some("0x7a3f".to_string()),
            side: Some("BUY".to_string()),
            size: Some(1200.0),
            price: Some(0.15),
            timestamp: Some(1_700_000_000),
            slug: None,
            event_slug: Some("rain-event".to_string()),
        };

        let trade = normalize_trade(&sample_market(), raw).unwrap();
        assert_eq!(trade.source, Exchange::Polymarket);
        assert_eq!(trade.side, Side::Buy);
        assert_eq!(trade.notional(), dec!(180.00));
        assert_eq!(trade.trader_reference, "0x7a3f");
        assert_eq!(
            trade.trading_url(),
            "https://polymarket.com/event/rain-event"
        );
    }

    #[test]
    fn drops_trade_with_unknown_side() {
        let raw = DataTrade {
            transaction_hash: None,
            proxy_wallet: None,
            side: Some("MERGE".to_string()),
            size: Some(1.0),
            price: Some(0.5),
            timestamp: None,
            slug: None,
            event_slug: None,
        };
        assert!(normalize_trade(&sample_market(), raw).is_none());
    }

    #[test]
    fn falls_back_to_market_slug() {
        let raw = DataTrade {
            transaction_hash: None,
            proxy_wallet: None,
            side: Some("SELL".to_string()),
            size: Some(10.0),
            price: Some(0.4),
            timestamp: None,
            slug: None,
            event_slug: None,
        };
        let trade = normalize_trade(&sample_market(), raw).unwrap();
        assert_eq!(
            trade.trading_url(),
            "https://polymarket.com/event/will-it-rain"
        );
    }
}
