//! Core types shared across the monitor

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "SELL")]
    Sell,
}

impl Side {
    /// Tolerant parse from the strings the exchange feeds actually emit
    /// (Polymarket uses BUY/SELL, Kalshi taker sides come as yes/no).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "buy" | "yes" | "bid" => Some(Side::Buy),
            "sell" | "no" | "ask" => Some(Side::Sell),
            _ => None,
        }
    }
}

/// Which exchange a trade came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Exchange {
    Polymarket,
    Kalshi,
}

impl Exchange {
    pub fn as_str(&self) -> &'static str {
        match self {
            Exchange::Polymarket => "Polymarket",
            Exchange::Kalshi => "Kalshi",
        }
    }
}

impl std::fmt::Display for Exchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized trade observed on an exchange.
///
/// Immutable once built by a market client; discarded after the poll
/// cycle that fetched it (no persistence).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRecord {
    /// Exchange-native market identifier (condition id / ticker)
    pub market_id: String,
    /// Human-readable market question or title
    pub market_name: String,
    pub source: Exchange,
    pub side: Side,
    /// Contracts traded
    pub size: Decimal,
    /// Price per contract in dollars
    pub price: Decimal,
    pub timestamp: DateTime<Utc>,
    /// Trade id for dedup/reference (tx hash on Polymarket, trade_id on Kalshi)
    pub trade_id: String,
    /// Counterparty reference; Kalshi's public feed is anonymous
    pub trader_reference: String,
    /// URL slug for building a direct trading link, when the API exposes one
    pub market_slug: Option<String>,
}

impl TradeRecord {
    /// Dollar notional of the trade
    pub fn notional(&self) -> Decimal {
        self.size * self.price
    }

    /// Direct link to trade the market on its exchange
    pub fn trading_url(&self) -> String {
        match self.source {
            Exchange::Polymarket => match &self.market_slug {
                Some(slug) => format!("https://polymarket.com/event/{}", slug),
                None => format!(
                    "https://polymarket.com/market/{}",
                    self.market_name.to_lowercase().replace(' ', "-")
                ),
            },
            Exchange::Kalshi => format!("https://kalshi.com/markets/{}", self.market_id),
        }
    }
}

/// Severity bucket for a flagged trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    High,
    Medium,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::High => "HIGH",
            RiskLevel::Medium => "MEDIUM",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            RiskLevel::High => "🔴",
            RiskLevel::Medium => "🟡",
        }
    }
}

/// A trade the scorer flagged for notification.
///
/// Produced at most once per trade per poll cycle, consumed exactly once
/// by the delivery task.
#[derive(Debug, Clone)]
pub struct AlertEvent {
    pub trade: TradeRecord,
    /// Risk score, 0-100
    pub score: u8,
    pub level: RiskLevel,
    pub reason: String,
    pub generated_at: DateTime<Utc>,
}

impl AlertEvent {
    pub fn alert_id(&self) -> String {
        format!(
            "{}_{}_{}",
            self.trade.source, self.trade.market_id, self.trade.trade_id
        )
    }
}
