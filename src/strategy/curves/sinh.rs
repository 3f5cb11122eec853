//! Sinh curve
//!
//! ```text
//! x        = c * (p - n) / n
//! position = -P * s * sinh(x)
//! value    = -P * s * (n / c) * (cosh(x) - 1)
//! ```
//!
//! Flat around the neutral price and steep away from it; `curvature` (`c`)
//! controls how quickly it bends. The neutral-from-position inverse is left
//! to the root finder.

use serde::{Deserialize, Serialize};

use crate::common::errors::{EngineError, Result};
use crate::strategy::traits::{asym_norm, side_factor, Curve};
use crate::strategy::types::MinMax;

fn default_curvature() -> f64 {
    1.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SinhCurve {
    #[serde(default = "default_curvature")]
    pub curvature: f64,
}

impl SinhCurve {
    /// # Errors
    ///
    /// Returns `EngineError::InvalidConfiguration` unless `curvature` is a
    /// positive finite number.
    pub fn new(curvature: f64) -> Result<Self> {
        let curve = Self { curvature };
        curve.validate()?;
        Ok(curve)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.curvature > 0.0 && self.curvature.is_finite()) {
            return Err(EngineError::invalid("sinh curvature must be positive"));
        }
        Ok(())
    }

    fn arg(&self, neutral: f64, price: f64) -> f64 {
        self.curvature * (price - neutral) / neutral
    }
}

impl Default for SinhCurve {
    fn default() -> Self {
        Self {
            curvature: default_curvature(),
        }
    }
}

impl Curve for SinhCurve {
    fn name(&self) -> &'static str {
        "sinh"
    }

    fn fingerprint(&self) -> String {
        format!("sinh:{}", self.curvature)
    }

    fn position(&self, power: f64, asym: f64, neutral: f64, price: f64) -> f64 {
        -power * side_factor(asym, neutral, price) * self.arg(neutral, price).sinh()
    }

    fn value(&self, power: f64, asym: f64, neutral: f64, price: f64) -> f64 {
        let s = side_factor(asym, neutral, price);
        -power * s * (neutral / self.curvature) * (self.arg(neutral, price).cosh() - 1.0)
    }

    fn power(&self, neutral: f64, balance: f64, asym: f64) -> f64 {
        balance / (neutral * self.curvature * asym_norm(asym))
    }

    fn price_from_position(&self, power: f64, asym: f64, neutral: f64, position: f64) -> f64 {
        if position == 0.0 {
            return neutral;
        }
        let s = if position > 0.0 { 1.0 + asym } else { 1.0 - asym };
        if s <= 0.0 || power <= 0.0 {
            return neutral;
        }
        let x = (-position / (power * s)).asinh();
        (neutral * (1.0 + x / self.curvature)).max(0.0)
    }

    fn roots(&self, power: f64, asym: f64, neutral: f64, balance: f64) -> MinMax {
        if balance <= 0.0 {
            return MinMax::new(neutral, neutral);
        }
        let c = self.curvature;
        let distance = |s: f64| (1.0 + balance * c / (power * s * neutral)).acosh() / c;

        let s_low = 1.0 + asym;
        let min = if s_low <= 0.0 || power <= 0.0 {
            0.0
        } else {
            (neutral * (1.0 - distance(s_low))).max(0.0)
        };

        let s_high = 1.0 - asym;
        let max = if s_high <= 0.0 || power <= 0.0 {
            f64::INFINITY
        } else {
            neutral * (1.0 + distance(s_high))
        };

        MinMax::new(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel(a: f64, b: f64) -> f64 {
        ((a - b) / b).abs()
    }

    #[test]
    fn test_invalid_curvature() {
        assert!(SinhCurve::new(0.0).is_err());
        assert!(SinhCurve::new(-1.0).is_err());
        assert!(SinhCurve::new(f64::NAN).is_err());
        assert!(SinhCurve::new(2.0).is_ok());
    }

    #[test]
    fn test_flat_near_neutral() {
        let curve = SinhCurve::default();
        assert_eq!(curve.position(10.0, 0.0, 100.0, 100.0), 0.0);
        // sinh(x) ~ x near zero
        let pos = curve.position(10.0, 0.0, 100.0, 99.0);
        assert!(rel(pos, 0.1) < 1e-4);
    }

    #[test]
    fn test_price_from_position_closed_form() {
        let curve = SinhCurve::new(1.5).unwrap();
        for price in [30.0, 90.0, 100.0, 120.0, 260.0] {
            let pos = curve.position(10.0, 0.4, 100.0, price);
            assert!(rel(curve.price_from_position(10.0, 0.4, 100.0, pos), price) < 1e-9);
        }
    }

    #[test]
    fn test_neutral_from_position_via_root_finder() {
        let curve = SinhCurve::new(1.5).unwrap();
        for neutral in [60.0, 95.0, 140.0] {
            let pos = curve.position(10.0, 0.0, neutral, 100.0);
            let solved = curve.neutral_from_position(10.0, 0.0, pos, 100.0);
            assert!(rel(solved, neutral) < 1e-5, "{solved} vs {neutral}");
        }
    }

    #[test]
    fn test_roots_match_value() {
        let curve = SinhCurve::new(2.0).unwrap();
        let roots = curve.roots(10.0, 0.0, 100.0, 300.0);
        assert!(rel(curve.value(10.0, 0.0, 100.0, roots.min), -300.0) < 1e-9);
        assert!(rel(curve.value(10.0, 0.0, 100.0, roots.max), -300.0) < 1e-9);
    }

    #[test]
    fn test_deserialize_default_curvature() {
        let curve: SinhCurve = serde_json::from_str("{}").unwrap();
        assert_eq!(curve.curvature, 1.0);
    }
}
