//! Market data clients
//!
//! One client per exchange, each normalizing its trade feed into
//! [`TradeRecord`]s behind the [`MarketSource`] trait.

pub mod kalshi;
pub mod polymarket;

pub use kalshi::KalshiClient;
pub use polymarket::PolymarketClient;

use crate::error::Result;
use crate::types::TradeRecord;
use async_trait::async_trait;

/// Limits applied to one poll cycle
#[derive(Debug, Clone, Copy)]
pub struct MarketFilter {
    /// Active markets scanned per cycle
    pub market_limit: usize,
    /// Trades fetched per market
    pub trade_limit: usize,
}

impl Default for MarketFilter {
    fn default() -> Self {
        Self {
            market_limit: 20,
            trade_limit: 5,
        }
    }
}

/// A pollable trade feed from one exchange
#[async_trait]
pub trait MarketSource: Send + Sync {
    fn name(&self) -> &str;

    /// Fetch recent trades across the most active markets.
    ///
    /// Returns trades ordered newest last; an empty vec is a valid
    /// result (quiet markets), not an error.
    async fn fetch_recent_trades(&self, filter: &MarketFilter) -> Result<Vec<TradeRecord>>;
}

#[cfg(test)]
use mockall::mock;

#[cfg(test)]
mock! {
    pub Source {}

    #[async_trait]
    impl MarketSource for Source {
        fn name(&self) -> &str;
        async fn fetch_recent_trades(&self, filter: &MarketFilter) -> Result<Vec<TradeRecord>>;
    }
}
