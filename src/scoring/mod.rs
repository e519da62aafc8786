//! Risk scoring
//!
//! Scorers are pure: one trade plus its market's recent history in, at
//! most one alert out. No I/O, no shared state, so policies can be unit
//! tested and swapped without touching the polling machinery.

use crate::types::{AlertEvent, RiskLevel, TradeRecord};
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::collections::VecDeque;

/// Score at or above which a trade is flagged
pub const ALERT_THRESHOLD: u8 = 70;
/// Score at or above which an alert is HIGH rather than MEDIUM
pub const HIGH_THRESHOLD: u8 = 85;

/// A pure risk-scoring policy
pub trait Scorer: Send + Sync {
    /// Score one trade against its market's recent history.
    ///
    /// Returns `None` for unremarkable trades, at most one alert
    /// otherwise.
    fn score(&self, trade: &TradeRecord, history: &[TradeRecord]) -> Option<AlertEvent>;
}

/// Placeholder policy: nothing is ever flagged
pub struct NoopScorer;

impl Scorer for NoopScorer {
    fn score(&self, _trade: &TradeRecord, _history: &[TradeRecord]) -> Option<AlertEvent> {
        None
    }
}

/// Notional-size heuristic.
///
/// Base score 10, bumped by size tier: +70 above $50k (whale, immediate
/// HIGH), +40 above $10k, +10 above $1k. Flags at [`ALERT_THRESHOLD`].
pub struct SizeTierScorer;

impl SizeTierScorer {
    fn raw_score(notional: Decimal) -> u8 {
        let mut score: u8 = 10;
        if notional > Decimal::from(50_000) {
            score += 70;
        } else if notional > Decimal::from(10_000) {
            score += 40;
        } else if notional > Decimal::from(1_000) {
            score += 10;
        }
        score.min(100)
    }
}

impl Scorer for SizeTierScorer {
    fn score(&self, trade: &TradeRecord, _history: &[TradeRecord]) -> Option<AlertEvent> {
        let notional = trade.notional();
        let score = Self::raw_score(notional);

        if score < ALERT_THRESHOLD {
            return None;
        }

        let level = if score >= HIGH_THRESHOLD {
            RiskLevel::High
        } else {
            RiskLevel::Medium
        };

        Some(AlertEvent {
            trade: trade.clone(),
            score,
            level,
            reason: format!("🐋 WHALE | ${:.0} position", notional),
            generated_at: Utc::now(),
        })
    }
}

/// Bounded per-market trade history fed to the scorer.
///
/// Owned by one poll loop; never shared across exchanges. Oldest trades
/// are evicted first once a market's window is full.
pub struct TradeHistory {
    window: usize,
    by_market: HashMap<String, VecDeque<TradeRecord>>,
}

impl TradeHistory {
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            by_market: HashMap::new(),
        }
    }

    /// Recent trades for a market, oldest first
    pub fn recent(&self, market_id: &str) -> Vec<TradeRecord> {
        self.by_market
            .get(market_id)
            .map(|q| q.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn record(&mut self, trade: &TradeRecord) {
        let q = self.by_market.entry(trade.market_id.clone()).or_default();
        if q.len() == self.window {
            q.pop_front();
        }
        q.push_back(trade.clone());
    }
}
