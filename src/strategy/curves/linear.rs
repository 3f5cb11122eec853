//! Linear curve
//!
//! ```text
//! position = P * s * (1 - p/n)
//! value    = -P * s * (p - n)^2 / (2n)
//! ```
//!
//! The position is capped at `P * s` as the price approaches zero. Every
//! inverse has a closed form.

use crate::strategy::traits::{asym_norm, side_factor, Curve};
use crate::strategy::types::MinMax;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinearCurve;

impl Curve for LinearCurve {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn position(&self, power: f64, asym: f64, neutral: f64, price: f64) -> f64 {
        power * side_factor(asym, neutral, price) * (1.0 - price / neutral)
    }

    fn value(&self, power: f64, asym: f64, neutral: f64, price: f64) -> f64 {
        let d = price - neutral;
        -power * side_factor(asym, neutral, price) * d * d / (2.0 * neutral)
    }

    fn power(&self, neutral: f64, balance: f64, asym: f64) -> f64 {
        balance / (neutral * asym_norm(asym))
    }

    fn price_from_position(&self, power: f64, asym: f64, neutral: f64, position: f64) -> f64 {
        if position == 0.0 {
            return neutral;
        }
        let s = if position > 0.0 { 1.0 + asym } else { 1.0 - asym };
        if s <= 0.0 || power <= 0.0 {
            return neutral;
        }
        (neutral * (1.0 - position / (power * s))).max(0.0)
    }

    fn neutral_from_position(&self, power: f64, asym: f64, position: f64, price: f64) -> f64 {
        if position == 0.0 {
            return price;
        }
        let s = if position > 0.0 { 1.0 + asym } else { 1.0 - asym };
        if s <= 0.0 || power <= 0.0 {
            return price;
        }
        let d = 1.0 - position / (power * s);
        if d <= 0.0 {
            // long beyond the cap at price zero
            f64::INFINITY
        } else {
            price / d
        }
    }

    fn roots(&self, power: f64, asym: f64, neutral: f64, balance: f64) -> MinMax {
        if balance <= 0.0 {
            return MinMax::new(neutral, neutral);
        }
        let distance = |s: f64| (2.0 * neutral * balance / (power * s)).sqrt();

        let s_low = 1.0 + asym;
        let min = if s_low <= 0.0 || power <= 0.0 {
            0.0
        } else {
            (neutral - distance(s_low)).max(0.0)
        };

        let s_high = 1.0 - asym;
        let max = if s_high <= 0.0 || power <= 0.0 {
            f64::INFINITY
        } else {
            neutral + distance(s_high)
        };

        MinMax::new(min, max)
    }
}
