//! Polling orchestration
//!
//! One [`PollLoop`] per exchange, each ticking on its own interval:
//! fetch trades, score them in arrival order, push flagged ones into a
//! channel. A single delivery task owns the notifier and drains that
//! channel, so sends are serialized across all sources.
//!
//! A failed cycle is logged and skipped; it never stops the loop, and
//! one exchange's outage never touches the other loop.

use crate::client::{MarketFilter, MarketSource};
use crate::error::{MonitorError, Result};
use crate::notify::Notifier;
use crate::scoring::{Scorer, TradeHistory};
use crate::types::AlertEvent;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{error, info, warn};

/// Per-exchange cycle bookkeeping, owned by its loop
#[derive(Debug, Clone, Copy)]
pub struct PollState {
    pub last_poll: Option<Instant>,
    pub next_allowed: Option<Instant>,
}

impl PollState {
    fn new() -> Self {
        Self {
            last_poll: None,
            next_allowed: None,
        }
    }

    fn advance(&mut self, interval: Duration) {
        let now = Instant::now();
        self.last_poll = Some(now);
        self.next_allowed = Some(now + interval);
    }
}

/// What one poll cycle saw, for logging
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CycleStats {
    pub trades_seen: usize,
    pub alerts_raised: usize,
}

/// Fetch-score-notify loop for a single market source
pub struct PollLoop<S: MarketSource> {
    source: S,
    scorer: Arc<dyn Scorer>,
    filter: MarketFilter,
    interval: Duration,
    history: TradeHistory,
    state: PollState,
    alert_tx: mpsc::Sender<AlertEvent>,
}

impl<S: MarketSource> PollLoop<S> {
    pub fn new(
        source: S,
        scorer: Arc<dyn Scorer>,
        filter: MarketFilter,
        interval: Duration,
        history_window: usize,
        alert_tx: mpsc::Sender<AlertEvent>,
    ) -> Self {
        Self {
            source,
            scorer,
            filter,
            interval,
            history: TradeHistory::new(history_window),
            state: PollState::new(),
            alert_tx,
        }
    }

    /// Run until the alert channel closes (process shutdown).
    pub async fn run(mut self) {
        info!(
            "Starting {} monitoring (interval {:?})",
            self.source.name(),
            self.interval
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            match self.run_cycle().await {
                Ok(stats) => {
                    info!(
                        "{}: {} trades scanned, {} flagged",
                        self.source.name(),
                        stats.trades_seen,
                        stats.alerts_raised
                    );
                }
                Err(MonitorError::Delivery(msg)) => {
                    // Channel closed: the delivery side is gone, stop the loop
                    warn!("{}: {}", self.source.name(), msg);
                    return;
                }
                Err(e) => {
                    error!("{} cycle failed, skipping: {}", self.source.name(), e);
                }
            }
        }
    }

    /// One fetch-score-notify pass. Every fetched trade is scored exactly
    /// once, in arrival order.
    pub async fn run_cycle(&mut self) -> Result<CycleStats> {
        let trades = self.source.fetch_recent_trades(&self.filter).await;
        self.state.advance(self.interval);
        let trades = trades?;

        let mut stats = CycleStats {
            trades_seen: trades.len(),
            alerts_raised: 0,
        };

        for trade in &trades {
            let recent = self.history.recent(&trade.market_id);
            if let Some(event) = self.scorer.score(trade, &recent) {
                stats.alerts_raised += 1;
                self.alert_tx.send(event).await.map_err(|_| {
                    MonitorError::Delivery("alert channel closed".to_string())
                })?;
            }
            self.history.record(trade);
        }

        Ok(stats)
    }

    pub fn state(&self) -> &PollState {
        &self.state
    }
}

/// Drain flagged trades and hand them to the notifier one at a time.
///
/// A delivery failure is logged and the event dropped; retry policy, if
/// any, belongs to the poll loops, and a lost alert is not fatal.
pub async fn run_delivery(notifier: Arc<Notifier>, mut alert_rx: mpsc::Receiver<AlertEvent>) {
    info!("Alert delivery task started");

    while let Some(event) = alert_rx.recv().await {
        if let Err(e) = notifier.send_alert(&event).await {
            error!("Failed to deliver alert {}: {}", event.alert_id(), e);
        }
    }

    info!("Alert delivery task stopped");
}
