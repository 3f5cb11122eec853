//! Hyperbolic curve
//!
//! ```text
//! position = P * s * (n/p - 1)
//! value    = P * s * (n * ln(p/n) - p + n)
//! ```
//!
//! The position grows without bound as the price falls toward zero and
//! approaches `-P * s` as it rises, so the loss is unbounded on both sides.
//! The loss roots have no closed form and go through the root finder.

use crate::strategy::traits::{asym_norm, side_factor, Curve};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HyperbolicCurve;

impl Curve for HyperbolicCurve {
    fn name(&self) -> &'static str {
        "hyperbolic"
    }

    fn position(&self, power: f64, asym: f64, neutral: f64, price: f64) -> f64 {
        power * side_factor(asym, neutral, price) * (neutral / price - 1.0)
    }

    fn value(&self, power: f64, asym: f64, neutral: f64, price: f64) -> f64 {
        let s = side_factor(asym, neutral, price);
        power * s * (neutral * (price / neutral).ln() - price + neutral)
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
        let d = 1.0 + position / (power * s);
        if d <= 0.0 {
            // short beyond the asymptote
            f64::INFINITY
        } else {
            neutral / d
        }
    }

    fn neutral_from_position(&self, power: f64, asym: f64, position: f64, price: f64) -> f64 {
        if position == 0.0 {
            return price;
        }
        let s = if position > 0.0 { 1.0 + asym } else { 1.0 - asym };
        if s <= 0.0 || power <= 0.0 {
            return price;
        }
        (price * (1.0 + position / (power * s))).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P: f64 = 100.0;

    fn rel(a: f64, b: f64) -> f64 {
        ((a - b) / b).abs()
    }

    #[test]
    fn test_zero_at_neutral() {
        let curve = HyperbolicCurve;
        assert_eq!(curve.position(P, 0.3, 100.0, 100.0), 0.0);
        assert_eq!(curve.value(P, 0.3, 100.0, 100.0), 0.0);
    }

    #[test]
    fn test_known_points() {
        let curve = HyperbolicCurve;
        // 100 * (100/50 - 1) = 100
        assert_eq!(curve.position(P, 0.0, 100.0, 50.0), 100.0);
        // 100 * (100/200 - 1) = -50
        assert_eq!(curve.position(P, 0.0, 100.0, 200.0), -50.0);
        // 100 * (100 ln 0.5 - 50 + 100)
        let expected = P * (100.0 * 0.5f64.ln() + 50.0);
        assert!(rel(curve.value(P, 0.0, 100.0, 50.0), expected) < 1e-12);
    }

    #[test]
    fn test_value_never_positive() {
        let curve = HyperbolicCurve;
        for price in [1.0, 25.0, 99.0, 101.0, 400.0, 10_000.0] {
            assert!(curve.value(P, -0.4, 100.0, price) <= 0.0);
        }
    }

    #[test]
    fn test_asymmetric_slopes() {
        let curve = HyperbolicCurve;
        let buy = curve.position(P, 0.5, 100.0, 80.0);
        let sell = curve.position(P, 0.5, 100.0, 125.0);
        // |100/80 - 1| == |100/125 - 1| * 1.25, scaled by 1.5 and 0.5
        assert!(rel(buy, 1.5 * 25.0) < 1e-12);
        assert!(rel(sell, -0.5 * 20.0) < 1e-12);
    }

    #[test]
    fn test_closed_form_inverses() {
        let curve = HyperbolicCurve;
        for price in [20.0, 80.0, 100.0, 150.0, 900.0] {
            let pos = curve.position(P, 0.2, 100.0, price);
            assert!(rel(curve.price_from_position(P, 0.2, 100.0, pos), price) < 1e-12);
            assert!(rel(curve.neutral_from_position(P, 0.2, pos, price), 100.0) < 1e-12);
        }
    }

    #[test]
    fn test_unreachable_short() {
        let curve = HyperbolicCurve;
        // the short side saturates at -P * (1 - asym)
        assert!(curve.price_from_position(P, 0.0, 100.0, -150.0).is_infinite());
        // fully skewed curve never shorts
        assert_eq!(curve.price_from_position(P, 1.0, 100.0, -5.0), 100.0);
    }

    #[test]
    fn test_roots_via_root_finder() {
        let curve = HyperbolicCurve;
        let roots = curve.roots(P, 0.0, 100.0, 8000.0);
        assert!(roots.min > 0.0 && roots.min < 100.0);
        assert!(roots.max > 100.0 && roots.max.is_finite());
        assert!(rel(curve.value(P, 0.0, 100.0, roots.min), -8000.0) < 1e-4);
        assert!(rel(curve.value(P, 0.0, 100.0, roots.max), -8000.0) < 1e-4);
    }

    #[test]
    fn test_power_matches_budget() {
        let curve = HyperbolicCurve;
        assert_eq!(curve.power(100.0, 10_000.0, 0.0), 100.0);
        assert_eq!(curve.power(100.0, 10_000.0, -0.25), 80.0);
    }
}
