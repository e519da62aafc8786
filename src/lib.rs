//! Prediction-Market Surveillance Bot
//!
//! Polls Polymarket and Kalshi for recent trades, scores them for
//! abnormal activity, and delivers flagged trades to Telegram.
//!
//! ## Architecture
//!
//! ```text
//! PollLoop (Polymarket) ─┐
//!                        ├─> Scorer ─> mpsc ─> Delivery task ─> Notifier (1 msg/sec)
//! PollLoop (Kalshi) ─────┘
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod monitor;
pub mod notify;
pub mod scoring;
pub mod types;
pub mod utils;

#[cfg(test)]
mod types_tests;
#[cfg(test)]
mod config_tests;
