use serde::{Deserialize, Serialize};

/// Closed price interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMax {
    pub min: f64,
    pub max: f64,
}

impl MinMax {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// The interval `[0, +inf)`
    pub fn unbounded() -> Self {
        Self::new(0.0, f64::INFINITY)
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price <= self.max
    }
}

/// How urgently the order-placement layer should treat an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    /// Regular order, no alert needed
    #[default]
    Disabled,
    /// No order can be placed; place a price alert instead
    Enabled,
    /// The loss bound was reached; place the order aggressively
    Forced,
    /// Available equity is exhausted; close the position
    Stoploss,
}

/// Order instruction produced by the engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderData {
    /// Limit price; zero means "use the market/recommended price"
    pub price: f64,
    /// Signed size: positive buys, negative sells
    pub size: f64,
    pub alert: AlertLevel,
}

impl OrderData {
    pub fn new(price: f64, size: f64, alert: AlertLevel) -> Self {
        Self { price, size, alert }
    }
}

/// Profit split reported after a fill is settled
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnTradeResult {
    /// Profit not absorbed by the curve and not reinvested
    pub normalized_profit: f64,
    /// Profit folded back into the curve's power
    pub normalized_accum: f64,
    /// Neutral price after the fill
    pub neutral_price: f64,
    /// Price at which the post-trade holding is the curve target
    pub open_price: f64,
}
