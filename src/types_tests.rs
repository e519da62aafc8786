//! Tests for core types

#[cfg(test)]
mod tests {
    use super::super::types::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn sample_trade(source: Exchange) -> TradeRecord {
        TradeRecord {
            market_id: "FED-26MAR".to_string(),
            market_name: "Fed Rate Decision".to_string(),
            source,
            side: Side::Buy,
            size: dec!(1000),
            price: dec!(0.15),
            timestamp: Utc::now(),
            trade_id: "t-1".to_string(),
            trader_reference: "0x7a3f".to_string(),
            market_slug: None,
        }
    }

    #[test]
    fn test_side_serialization() {
        assert_eq!(serde_json::to_string(&Side::Buy).unwrap(), "\"BUY\"");
        assert_eq!(serde_json::to_string(&Side::Sell).unwrap(), "\"SELL\"");
    }

    #[test]
    fn test_side_parse_exchange_strings() {
        assert_eq!(Side::parse("BUY"), Some(Side::Buy));
        assert_eq!(Side::parse("sell"), Some(Side::Sell));
        assert_eq!(Side::parse("yes"), Some(Side::Buy));
        assert_eq!(Side::parse("no"), Some(Side::Sell));
        assert_eq!(Side::parse("merge"), None);
    }

    #[test]
    fn test_notional() {
        let trade = sample_trade(Exchange::Polymarket);
        assert_eq!(trade.notional(), dec!(150.00));
    }

    #[test]
    fn test_kalshi_trading_url_uses_ticker() {
        let trade = sample_trade(Exchange::Kalshi);
        assert_eq!(
            trade.trading_url(),
            "https://kalshi.com/markets/FED-26MAR"
        );
    }

    #[test]
    fn test_polymarket_url_prefers_slug() {
        let mut trade = sample_trade(Exchange::Polymarket);
        trade.market_slug = Some("fed-rate-decision".to_string());
        assert_eq!(
            trade.trading_url(),
            "https://polymarket.com/event/fed-rate-decision"
        );
    }

    #[test]
    fn test_polymarket_url_falls_back_to_name() {
        let trade = sample_trade(Exchange::Polymarket);
        assert_eq!(
            trade.trading_url(),
            "https://polymarket.com/market/fed-rate-decision"
        );
    }

    #[test]
    fn test_alert_id_is_stable() {
        let event = AlertEvent {
            trade: sample_trade(Exchange::Kalshi),
            score: 90,
            level: RiskLevel::High,
            reason: "test".to_string(),
            generated_at: Utc::now(),
        };
        assert_eq!(event.alert_id(), "Kalshi_FED-26MAR_t-1");
        assert_eq!(event.alert_id(), event.alert_id());
    }

    #[test]
    fn test_risk_level_labels() {
        assert_eq!(RiskLevel::High.as_str(), "HIGH");
        assert_eq!(RiskLevel::Medium.as_str(), "MEDIUM");
    }
}
