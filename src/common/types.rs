//! Market-facing types consumed by the engine
//!
//! These are supplied by the broker adapter and the dispatch loop on every
//! call; the engine never stores them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order side (buy or sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// +1 for buy, -1 for sell
    pub fn sign(self) -> f64 {
        match self {
            Side::Buy => 1.0,
            Side::Sell => -1.0,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// Static description of the traded market
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarketInfo {
    /// Smallest tradable increment of the asset
    #[serde(alias = "asset_step")]
    pub asset_step: f64,
    /// Smallest price increment
    #[serde(alias = "currency_step")]
    pub currency_step: f64,
    /// Minimum order size in asset units
    #[serde(alias = "min_size")]
    pub min_size: f64,
    /// Minimum order volume in currency units
    #[serde(alias = "min_volume")]
    pub min_volume: f64,
    /// Fee rate charged in currency on the traded volume
    pub fees: f64,
    /// Leverage of the market; zero means a spot market
    pub leverage: f64,
}

impl MarketInfo {
    /// Whether the budget is collateral (leveraged) rather than spot holdings
    pub fn is_leveraged(&self) -> bool {
        self.leverage != 0.0
    }

    /// Smallest acceptable order size at `price`
    pub fn min_order_size(&self, price: f64) -> f64 {
        let by_volume = if price > 0.0 {
            self.min_volume / price
        } else {
            0.0
        };
        self.min_size.max(by_volume)
    }
}

/// Top-of-book snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    pub bid: f64,
    pub ask: f64,
    pub last: f64,
    #[serde(default = "Utc::now")]
    pub time: DateTime<Utc>,
}

impl Ticker {
    pub fn new(bid: f64, ask: f64, last: f64) -> Self {
        Self {
            bid,
            ask,
            last,
            time: Utc::now(),
        }
    }
}

/// An executed trade as reported by the broker adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fill {
    /// Execution price
    pub price: f64,
    /// Signed size: positive = bought, negative = sold
    pub size: f64,
    /// Asset balance after the fill
    pub assets_left: f64,
    /// Currency balance after the fill
    pub currency_left: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_leverage() {
        let spot = MarketInfo::default();
        assert!(!spot.is_leveraged());

        let futures = MarketInfo {
            leverage: 10.0,
            ..Default::default()
        };
        assert!(futures.is_leveraged());
    }

    #[test]
    fn test_min_order_size() {
        let market = MarketInfo {
            min_size: 0.01,
            min_volume: 5.0,
            ..Default::default()
        };
        // 5.0 / 100 = 0.05 beats the 0.01 size floor
        assert_eq!(market.min_order_size(100.0), 0.05);
        assert_eq!(market.min_order_size(1000.0), 0.01);
        assert_eq!(market.min_order_size(0.0), 0.01);
    }

    #[test]
    fn test_side_sign() {
        assert_eq!(Side::Buy.sign(), 1.0);
        assert_eq!(Side::Sell.sign(), -1.0);
        assert_eq!(Side::Sell.to_string(), "SELL");
    }

    #[test]
    fn test_fill_camel_case() {
        let fill: Fill = serde_json::from_str(
            r#"{"price": 100.0, "size": 1.5, "assetsLeft": 1.5, "currencyLeft": 850.0}"#,
        )
        .unwrap();
        assert_eq!(fill.assets_left, 1.5);
        assert_eq!(fill.currency_left, 850.0);
    }
}
