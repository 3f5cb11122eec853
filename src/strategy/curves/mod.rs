//! Concrete pricing curves
//!
//! Each shape implements [`Curve`] directly. [`CurveKind`] wraps them in a
//! serde-tagged enum so a configuration file can pick one at runtime:
//!
//! ```toml
//! [curve]
//! type = "sinh"
//! curvature = 2.0
//! ```

mod hyperbolic;
mod linear;
mod power_law;
mod sinh;

use serde::{Deserialize, Serialize};

pub use hyperbolic::HyperbolicCurve;
pub use linear::LinearCurve;
pub use power_law::PowerLawCurve;
pub use sinh::SinhCurve;

use crate::common::errors::Result;
use crate::strategy::traits::Curve;
use crate::strategy::types::MinMax;

/// Runtime-selected curve
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CurveKind {
    #[default]
    Hyperbolic,
    Linear,
    Sinh(SinhCurve),
    PowerLaw(PowerLawCurve),
}

impl CurveKind {
    pub fn curve(&self) -> &dyn Curve {
        match self {
            CurveKind::Hyperbolic => &HyperbolicCurve,
            CurveKind::Linear => &LinearCurve,
            CurveKind::Sinh(curve) => curve,
            CurveKind::PowerLaw(curve) => curve,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            CurveKind::Hyperbolic | CurveKind::Linear => Ok(()),
            CurveKind::Sinh(curve) => curve.validate(),
            CurveKind::PowerLaw(curve) => curve.validate(),
        }
    }
}

impl Curve for CurveKind {
    fn name(&self) -> &'static str {
        self.curve().name()
    }

    fn fingerprint(&self) -> String {
        self.curve().fingerprint()
    }

    fn position(&self, power: f64, asym: f64, neutral: f64, price: f64) -> f64 {
        self.curve().position(power, asym, neutral, price)
    }

    fn value(&self, power: f64, asym: f64, neutral: f64, price: f64) -> f64 {
        self.curve().value(power, asym, neutral, price)
    }

    fn power(&self, neutral: f64, balance: f64, asym: f64) -> f64 {
        self.curve().power(neutral, balance, asym)
    }

    fn price_from_position(&self, power: f64, asym: f64, neutral: f64, position: f64) -> f64 {
        self.curve().price_from_position(power, asym, neutral, position)
    }

    fn neutral_from_position(&self, power: f64, asym: f64, position: f64, price: f64) -> f64 {
        self.curve().neutral_from_position(power, asym, position, price)
    }

    fn neutral_from_value(
        &self,
        power: f64,
        asym: f64,
        neutral: f64,
        value: f64,
        price: f64,
    ) -> f64 {
        self.curve().neutral_from_value(power, asym, neutral, value, price)
    }

    fn roots(&self, power: f64, asym: f64, neutral: f64, balance: f64) -> MinMax {
        self.curve().roots(power, asym, neutral, balance)
    }
}
