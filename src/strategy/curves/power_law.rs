//! Power-law curve
//!
//! ```text
//! k        = r * s
//! position = P * (n/p)^k
//! value    = P * n * (g(p/n, k) + 1)
//! g(u, k)  = (u^(1-k) - 1) / (1 - k)        (ln u when k == 1)
//! ```
//!
//! Unlike the other shapes the position does not cross zero at the neutral
//! price: the curve holds `P` there and the neutral price only acts as the
//! reference point. With `r = 1` the value is `P * n * (ln(p/n) + 1)`.

use serde::{Deserialize, Serialize};

use crate::common::errors::{EngineError, Result};
use crate::strategy::traits::{side_factor, Curve};

fn default_ratio() -> f64 {
    1.0
}

/// Exponents closer to one than this use the logarithmic branch of `g`
const LOG_BRANCH: f64 = 1e-9;

fn integral(u: f64, k: f64) -> f64 {
    let e = 1.0 - k;
    if e.abs() < LOG_BRANCH {
        u.ln()
    } else {
        (u.powf(e) - 1.0) / e
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerLawCurve {
    #[serde(default = "default_ratio")]
    pub ratio: f64,
}

impl PowerLawCurve {
    pub fn new(ratio: f64) -> Result<Self> {
        let curve = Self { ratio };
        curve.validate()?;
        Ok(curve)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.ratio > 0.0 && self.ratio.is_finite()) {
            return Err(EngineError::invalid("power-law ratio must be positive"));
        }
        Ok(())
    }

    fn exponent(&self, asym: f64, neutral: f64, price: f64) -> f64 {
        self.ratio * side_factor(asym, neutral, price)
    }
}

impl Default for PowerLawCurve {
    fn default() -> Self {
        Self {
            ratio: default_ratio(),
        }
    }
}

impl Curve for PowerLawCurve {
    fn name(&self) -> &'static str {
        "power_law"
    }

    fn fingerprint(&self) -> String {
        format!("power_law:{}", self.ratio)
    }

    fn position(&self, power: f64, asym: f64, neutral: f64, price: f64) -> f64 {
        let k = self.exponent(asym, neutral, price);
        power * (neutral / price).powf(k)
    }

    fn value(&self, power: f64, asym: f64, neutral: f64, price: f64) -> f64 {
        let k = self.exponent(asym, neutral, price);
        power * neutral * (integral(price / neutral, k) + 1.0)
    }

    fn power(&self, neutral: f64, balance: f64, _asym: f64) -> f64 {
        balance / neutral
    }

    fn neutral_from_position(&self, power: f64, asym: f64, position: f64, price: f64) -> f64 {
        if position <= 0.0 || power <= 0.0 {
            return 0.0;
        }
        // holding more than P puts the neutral above the price
        let s = if position > power { 1.0 + asym } else { 1.0 - asym };
        let k = self.ratio * s;
        if k <= 0.0 {
            return price;
        }
        price * (position / power).powf(1.0 / k)
    }
}
