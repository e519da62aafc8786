//! Tests for configuration
//!
//! Environment variables are process-global, so these tests serialize
//! on a lock.

#[cfg(test)]
mod tests {
    use super::super::config::*;
    use super::super::error::MonitorError;
    use std::sync::Mutex;
    use std::time::Duration;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const ALL_VARS: &[&str] = &[
        "BOT_TOKEN",
        "CHAT_ID",
        "POLL_INTERVAL_SECS",
        "KALSHI_POLL_INTERVAL_SECS",
        "KALSHI_API_KEY",
        "MARKET_LIMIT",
        "TRADE_LIMIT",
        "HISTORY_WINDOW",
    ];

    fn with_env<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
        let _guard = ENV_LOCK.lock().unwrap();
        for v in ALL_VARS {
            std::env::remove_var(v);
        }
        for (k, v) in vars {
            std::env::set_var(k, v);
        }
        f();
        for v in ALL_VARS {
            std::env::remove_var(v);
        }
    }

    #[test]
    fn test_minimal_config_defaults() {
        with_env(&[("BOT_TOKEN", "123:abc"), ("CHAT_ID", "42")], || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.bot_token, "123:abc");
            assert_eq!(config.chat_id, "42");
            assert_eq!(config.poll_interval, Duration::from_secs(60));
            assert_eq!(config.kalshi_poll_interval, Duration::from_secs(60));
            assert!(config.kalshi_api_key.is_none());
            assert_eq!(config.market_limit, 20);
            assert_eq!(config.trade_limit, 5);
            assert_eq!(config.history_window, 50);
        });
    }

    #[test]
    fn test_missing_bot_token_is_config_error() {
        with_env(&[("CHAT_ID", "42")], || {
            let err = Config::from_env().unwrap_err();
            assert!(matches!(err, MonitorError::Config(ref m) if m.contains("BOT_TOKEN")));
        });
    }

    #[test]
    fn test_missing_chat_id_is_config_error() {
        with_env(&[("BOT_TOKEN", "123:abc")], || {
            let err = Config::from_env().unwrap_err();
            assert!(matches!(err, MonitorError::Config(ref m) if m.contains("CHAT_ID")));
        });
    }

    #[test]
    fn test_blank_required_value_rejected() {
        with_env(&[("BOT_TOKEN", "  "), ("CHAT_ID", "42")], || {
            assert!(Config::from_env().is_err());
        });
    }

    #[test]
    fn test_kalshi_interval_floored_at_60s() {
        with_env(
            &[
                ("BOT_TOKEN", "123:abc"),
                ("CHAT_ID", "42"),
                ("POLL_INTERVAL_SECS", "15"),
                ("KALSHI_POLL_INTERVAL_SECS", "30"),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.poll_interval, Duration::from_secs(15));
                assert_eq!(config.kalshi_poll_interval, Duration::from_secs(60));
            },
        );
    }

    #[test]
    fn test_kalshi_interval_tracks_slower_poll() {
        with_env(
            &[
                ("BOT_TOKEN", "123:abc"),
                ("CHAT_ID", "42"),
                ("POLL_INTERVAL_SECS", "120"),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.kalshi_poll_interval, Duration::from_secs(120));
            },
        );
    }

    #[test]
    fn test_invalid_interval_names_the_variable() {
        with_env(
            &[
                ("BOT_TOKEN", "123:abc"),
                ("CHAT_ID", "42"),
                ("POLL_INTERVAL_SECS", "soon"),
            ],
            || {
                let err = Config::from_env().unwrap_err();
                assert!(
                    matches!(err, MonitorError::Config(ref m) if m.contains("POLL_INTERVAL_SECS"))
                );
            },
        );
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        // A zero period would blow up the loop's interval timer at runtime
        with_env(
            &[
                ("BOT_TOKEN", "123:abc"),
                ("CHAT_ID", "42"),
                ("POLL_INTERVAL_SECS", "0"),
            ],
            || {
                let err = Config::from_env().unwrap_err();
                assert!(
                    matches!(err, MonitorError::Config(ref m) if m.contains("POLL_INTERVAL_SECS"))
                );
            },
        );
    }

    #[test]
    fn test_zero_kalshi_interval_floored() {
        with_env(
            &[
                ("BOT_TOKEN", "123:abc"),
                ("CHAT_ID", "42"),
                ("KALSHI_POLL_INTERVAL_SECS", "0"),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.kalshi_poll_interval, Duration::from_secs(60));
            },
        );
    }

    #[test]
    fn test_empty_api_key_treated_as_absent() {
        with_env(
            &[
                ("BOT_TOKEN", "123:abc"),
                ("CHAT_ID", "42"),
                ("KALSHI_API_KEY", ""),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert!(config.kalshi_api_key.is_none());
            },
        );
    }

    #[test]
    fn test_api_key_passed_through() {
        with_env(
            &[
                ("BOT_TOKEN", "123:abc"),
                ("CHAT_ID", "42"),
                ("KALSHI_API_KEY", "k-secret"),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.kalshi_api_key.as_deref(), Some("k-secret"));
            },
        );
    }
}
