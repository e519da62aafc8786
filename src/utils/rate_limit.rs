//! Outbound rate limiting
//!
//! Two flavors: a minimum-spacing limiter for Telegram (1 msg/sec to the
//! same chat) and a sliding-window limiter for exchange request bursts.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Enforces a minimum interval between successive permits.
///
/// `acquire` holds the internal lock across the wait, so concurrent
/// callers are strictly serialized: no two permits are ever granted
/// closer together than `min_interval`.
pub struct RateLimiter {
    min_interval: Duration,
    last_permit: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_permit: Mutex::new(None),
        }
    }

    /// Wait until a send is allowed and claim the slot.
    ///
    /// Returns the time waited.
    pub async fn acquire(&self) -> Duration {
        let mut last = self.last_permit.lock().await;
        let waited = match *last {
            Some(prev) => {
                let elapsed = prev.elapsed();
                if elapsed < self.min_interval {
                    let wait = self.min_interval - elapsed;
                    tokio::time::sleep(wait).await;
                    wait
                } else {
                    Duration::ZERO
                }
            }
            None => Duration::ZERO,
        };
        *last = Some(Instant::now());
        waited
    }
}

/// Caps the number of permits inside a sliding window.
///
/// Used by the Polymarket client to pace per-market trade requests under
/// the exchange's ~50-100 req/10s ceiling.
pub struct WindowLimiter {
    max_in_window: usize,
    window: Duration,
    timestamps: Mutex<Vec<Instant>>,
}

impl WindowLimiter {
    pub fn new(max_in_window: usize, window: Duration) -> Self {
        Self {
            max_in_window,
            window,
            timestamps: Mutex::new(Vec::new()),
        }
    }

    /// Wait until issuing one more request stays under the window cap.
    pub async fn acquire(&self) {
        let mut stamps = self.timestamps.lock().await;
        loop {
            let now = Instant::now();
            stamps.retain(|t| now.saturating_duration_since(*t) < self.window);
            if stamps.len() < self.max_in_window {
                stamps.push(Instant::now());
                return;
            }
            // Oldest entry ages out of the window first
            let wait = (stamps[0] + self.window).saturating_duration_since(Instant::now());
            tokio::time::sleep(wait).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn first_acquire_is_immediate() {
        let limiter = RateLimiter::new(Duration::from_secs(1));
        assert_eq!(limiter.acquire().await, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn back_to_back_acquires_wait_full_interval() {
        let limiter = RateLimiter::new(Duration::from_secs(1));
        limiter.acquire().await;
        let waited = limiter.acquire().await;
        assert_eq!(waited, Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn no_wait_after_interval_elapsed() {
        let limiter = RateLimiter::new(Duration::from_secs(1));
        limiter.acquire().await;
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(limiter.acquire().await, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_never_closer_than_interval() {
        let limiter = Arc::new(RateLimiter::new(Duration::from_secs(1)));
        let mut handles = Vec::new();

        // Simulate both poll loops flagging trades at once
        for _ in 0..8 {
            let l = limiter.clone();
            handles.push(tokio::spawn(async move {
                l.acquire().await;
                Instant::now()
            }));
        }

        let mut grants = Vec::new();
        for h in handles {
            grants.push(h.await.unwrap());
        }
        grants.sort();

        for pair in grants.windows(2) {
            assert!(
                pair[1] - pair[0] >= Duration::from_secs(1),
                "permits granted {:?} apart",
                pair[1] - pair[0]
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn window_limiter_caps_burst() {
        let limiter = Arc::new(WindowLimiter::new(3, Duration::from_secs(10)));
        let start = Instant::now();

        for _ in 0..3 {
            limiter.acquire().await;
        }
        // Burst of 3 is free
        assert_eq!(Instant::now(), start);

        // Fourth must wait for the window to roll
        limiter.acquire().await;
        assert!(Instant::now() - start >= Duration::from_secs(10));
    }
}
