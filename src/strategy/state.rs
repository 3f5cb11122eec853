//! Engine state and its persisted form

use serde::{Deserialize, Serialize};

/// Numeric state of one engine value
///
/// All zero means "not initialized yet".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct State {
    pub neutral_price: f64,
    pub last_price: f64,
    /// Curve position at `last_price`, without `neutral_pos`
    pub position: f64,
    /// Budget behind `power`, including reinvested profit
    pub balance: f64,
    /// Curve value at `last_price` under the effective power
    pub value: f64,
    /// Base amplitude before trend damping
    pub power: f64,
    /// Holding the curve oscillates around
    pub neutral_pos: f64,
    /// Signed length of the current run of same-direction moves
    pub trend_counter: i32,
}

impl State {
    pub fn is_valid(&self) -> bool {
        self.neutral_price > 0.0 && self.last_price > 0.0 && self.power > 0.0
    }
}

/// JSON document written by `export_state`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    pub neutral: f64,
    pub last_price: f64,
    pub position: f64,
    pub balance: f64,
    pub value: f64,
    pub power: f64,
    #[serde(default)]
    pub neutral_pos: f64,
    #[serde(default)]
    pub trend_counter: i32,
    pub config_hash: String,
}

impl PersistedState {
    pub fn new(state: &State, config_hash: impl Into<String>) -> Self {
        Self {
            neutral: state.neutral_price,
            last_price: state.last_price,
            position: state.position,
            balance: state.balance,
            value: state.value,
            power: state.power,
            neutral_pos: state.neutral_pos,
            trend_counter: state.trend_counter,
            config_hash: config_hash.into(),
        }
    }

    pub fn state(&self) -> State {
        State {
            neutral_price: self.neutral,
            last_price: self.last_price,
            position: self.position,
            balance: self.balance,
            value: self.value,
            power: self.power,
            neutral_pos: self.neutral_pos,
            trend_counter: self.trend_counter,
        }
    }
}
