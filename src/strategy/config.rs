//! Strategy configuration parameters.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::common::errors::{EngineError, Result};

/// What to do with an order smaller than the exchange minimum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preference {
    /// Skip the order and let the caller place a price alert
    #[default]
    Alert,
    /// Round the order up to the minimum size
    MinSize,
}

/// Tunables of the leveraged strategy.
///
/// Shared between engine values through an `Arc` and never mutated after
/// construction. Persisted state remembers the [`config_hash`] it was
/// produced under.
///
/// [`config_hash`]: StrategyConfig::config_hash
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Amplitude in `(0, 100]`; 50 commits the budget one to one.
    pub power: f64,

    /// Asymmetry in `[-1, 1]`.
    ///
    /// Positive values buy harder on the way down and sell softer on the way
    /// up; `1` makes the upper side flat.
    pub asym: f64,

    /// Fraction of the available balance kept out of the safe-range
    /// computation, in `[0, 1)`.
    pub max_loss: f64,

    /// Share of a favorable move's profit spent pulling the neutral price
    /// toward the market, in `[0, 1]`.
    pub reduction: f64,

    /// Budget held outside the exchange account.
    pub external_balance: f64,

    /// Share of normalized profit reinvested into the curve, in `[0, 1]`.
    pub power_adjust: f64,

    /// Extra reduction per unit of relative distance from neutral.
    pub dynamic_reduction: f64,

    /// Position offset at initialization, in units of power.
    pub initial_boost: f64,

    /// Damp the curve while prices keep moving in one direction.
    pub detect_trend: bool,

    /// On leveraged markets, start at the current price even when a position
    /// is already open.
    pub recalc_keep_neutral: bool,

    /// Never hold a short position.
    pub long_only: bool,

    pub preference: Preference,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            power: 50.0,
            asym: 0.0,
            max_loss: 0.0,
            reduction: 0.0,
            external_balance: 0.0,
            power_adjust: 0.0,
            dynamic_reduction: 0.0,
            initial_boost: 0.0,
            detect_trend: false,
            recalc_keep_neutral: true,
            long_only: false,
            preference: Preference::Alert,
        }
    }
}

fn check_range(name: &str, value: f64, lo: f64, hi: f64) -> Result<()> {
    if !(value >= lo && value <= hi) {
        return Err(EngineError::InvalidConfiguration(format!(
            "{name} must be in [{lo}, {hi}], got {value}"
        )));
    }
    Ok(())
}

fn check_non_negative(name: &str, value: f64) -> Result<()> {
    if !(value >= 0.0 && value.is_finite()) {
        return Err(EngineError::InvalidConfiguration(format!(
            "{name} must be non-negative, got {value}"
        )));
    }
    Ok(())
}

impl StrategyConfig {
    /// Checks every field against its documented range.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidConfiguration` naming the first field
    /// out of range.
    pub fn validate(&self) -> Result<()> {
        if !(self.power > 0.0 && self.power <= 100.0) {
            return Err(EngineError::InvalidConfiguration(format!(
                "power must be in (0, 100], got {}",
                self.power
            )));
        }
        check_range("asym", self.asym, -1.0, 1.0)?;
        if !(self.max_loss >= 0.0 && self.max_loss < 1.0) {
            return Err(EngineError::InvalidConfiguration(format!(
                "max_loss must be in [0, 1), got {}",
                self.max_loss
            )));
        }
        check_range("reduction", self.reduction, 0.0, 1.0)?;
        check_range("power_adjust", self.power_adjust, 0.0, 1.0)?;
        check_non_negative("external_balance", self.external_balance)?;
        check_non_negative("dynamic_reduction", self.dynamic_reduction)?;
        if !self.initial_boost.is_finite() {
            return Err(EngineError::invalid("initial_boost must be finite"));
        }
        Ok(())
    }

    /// Budget multiplier for the UI power: `10^((power - 50) / 25)`
    pub fn power_multiplier(&self) -> f64 {
        10f64.powf((self.power - 50.0) / 25.0)
    }

    /// Hex SHA-256 of the canonical JSON form together with the
    /// [`Curve::fingerprint`](crate::strategy::Curve::fingerprint) of the
    /// curve it drives
    pub fn config_hash(&self, curve: &str) -> Result<String> {
        let canonical = serde_json::to_vec(self)?;
        let mut hasher = Sha256::new();
        hasher.update(&canonical);
        hasher.update(b"\n");
        hasher.update(curve.as_bytes());
        Ok(hex::encode(hasher.finalize()))
    }
}
