use crate::strategy::root_finder::RootFinder;
use crate::strategy::types::MinMax;

/// Multiplier applied to the curve on the side of `price` relative to `neutral`
///
/// Prices below neutral (the buying side) use `1 + asym`, prices at or above
/// neutral use `1 - asym`. A zero factor makes that side flat.
pub fn side_factor(asym: f64, neutral: f64, price: f64) -> f64 {
    if price < neutral {
        1.0 + asym
    } else {
        1.0 - asym
    }
}

/// Normalization that keeps the steeper side of an asymmetric curve at the
/// amplitude of the symmetric one
pub fn asym_norm(asym: f64) -> f64 {
    1.0 + asym.abs()
}

/// Pricing curve contract
///
/// A curve is a set of pure relations between price, target position and
/// budget value. The engine never looks inside a curve; every shape plugs in
/// by implementing the three forward functions and, where a closed form
/// exists, overriding the inverses.
///
/// # Contract
///
/// - `position` is non-increasing in `price` and non-decreasing in `neutral`
/// - `d value / d price == position`
/// - for a fixed `price`, `value(.., neutral, price)` as a function of
///   `neutral` peaks at `neutral == price`
///
/// The default inverses rely on exactly these properties and solve them with
/// the [`RootFinder`].
///
/// # Example
///
/// ```
/// use leveraged_mm::strategy::{Curve, HyperbolicCurve};
///
/// let curve = HyperbolicCurve;
/// let pos = curve.position(10.0, 0.0, 100.0, 80.0);
/// let price = curve.price_from_position(10.0, 0.0, 100.0, pos);
/// assert!((price - 80.0).abs() < 1e-9);
/// ```
pub trait Curve: Send + Sync + std::fmt::Debug {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Identity of the shape and its parameters, part of the config hash
    fn fingerprint(&self) -> String {
        self.name().to_string()
    }

    /// Target position at `price`
    fn position(&self, power: f64, asym: f64, neutral: f64, price: f64) -> f64;

    /// Value of following the curve from `neutral` to `price`
    fn value(&self, power: f64, asym: f64, neutral: f64, price: f64) -> f64;

    /// Amplitude for a fresh curve committing `balance` at `neutral`
    fn power(&self, neutral: f64, balance: f64, asym: f64) -> f64;

    /// Inverse of [`position`](Self::position) with respect to `price`
    fn price_from_position(&self, power: f64, asym: f64, neutral: f64, position: f64) -> f64 {
        let finder = RootFinder::default();
        let f = |p: f64| self.position(power, asym, neutral, p) - position;
        if f(neutral) > 0.0 {
            finder.search_up(neutral, f)
        } else {
            finder.search_down(neutral, f)
        }
    }

    /// Inverse of [`position`](Self::position) with respect to `neutral`
    fn neutral_from_position(&self, power: f64, asym: f64, position: f64, price: f64) -> f64 {
        let finder = RootFinder::default();
        let f = |n: f64| self.position(power, asym, n, price) - position;
        if f(price) < 0.0 {
            finder.search_up(price, f)
        } else {
            finder.search_down(price, f)
        }
    }

    /// Inverse of [`value`](Self::value) with respect to `neutral`
    ///
    /// Two neutral prices generally produce the same value; the one on the
    /// same side of `price` as the hint `neutral` is returned. A `value`
    /// above the peak resolves to `price` itself.
    fn neutral_from_value(
        &self,
        power: f64,
        asym: f64,
        neutral: f64,
        value: f64,
        price: f64,
    ) -> f64 {
        let finder = RootFinder::default();
        let f = |n: f64| self.value(power, asym, n, price) - value;
        if f(price) <= 0.0 || neutral == price {
            return price;
        }
        if neutral > price {
            finder.search_up(price, f)
        } else {
            finder.search_down(price, f)
        }
    }

    /// Prices at which following the curve loses `balance`
    ///
    /// A side on which the loss is never reached reports `0` (below) or
    /// `+inf` (above).
    fn roots(&self, power: f64, asym: f64, neutral: f64, balance: f64) -> MinMax {
        if balance <= 0.0 {
            return MinMax::new(neutral, neutral);
        }
        let finder = RootFinder::default();
        let base = self.value(power, asym, neutral, neutral);
        let f = |p: f64| self.value(power, asym, neutral, p) - base + balance;
        MinMax::new(finder.search_down(neutral, &f), finder.search_up(neutral, &f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Linear curve with only the forward functions, so every inverse goes
    /// through the default root-finder path.
    #[derive(Debug)]
    struct BareLinear;

    impl Curve for BareLinear {
        fn name(&self) -> &'static str {
            "bare_linear"
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
    }

    fn close(a: f64, b: f64) -> bool {
        ((a - b) / b).abs() < 1e-5
    }

    #[test]
    fn test_side_factor() {
        assert_eq!(side_factor(0.5, 100.0, 90.0), 1.5);
        assert_eq!(side_factor(0.5, 100.0, 110.0), 0.5);
        assert_eq!(side_factor(0.5, 100.0, 100.0), 0.5);
        assert_eq!(asym_norm(-0.25), 1.25);
    }

    #[test]
    fn test_default_price_from_position() {
        let curve = BareLinear;
        // position(80) = 10 * (1 - 0.8) = 2
        assert!(close(curve.price_from_position(10.0, 0.0, 100.0, 2.0), 80.0));
        assert!(close(curve.price_from_position(10.0, 0.0, 100.0, -3.0), 130.0));
        assert_eq!(curve.price_from_position(10.0, 0.0, 100.0, 0.0), 100.0);
    }

    #[test]
    fn test_default_neutral_from_position() {
        let curve = BareLinear;
        let pos = curve.position(10.0, 0.2, 120.0, 100.0);
        assert!(close(curve.neutral_from_position(10.0, 0.2, pos, 100.0), 120.0));

        let pos = curve.position(10.0, 0.2, 80.0, 100.0);
        assert!(close(curve.neutral_from_position(10.0, 0.2, pos, 100.0), 80.0));
    }

    #[test]
    fn test_default_neutral_from_value_respects_side() {
        let curve = BareLinear;
        let target = curve.value(10.0, 0.0, 120.0, 100.0);

        let above = curve.neutral_from_value(10.0, 0.0, 130.0, target, 100.0);
        assert!(close(above, 120.0));

        // the mirror solution below the price has the same value
        let below = curve.neutral_from_value(10.0, 0.0, 90.0, target, 100.0);
        assert!(below < 100.0);
        let value = curve.value(10.0, 0.0, below, 100.0);
        assert!(((value - target) / target).abs() < 1e-3);

        // nothing beats the peak at neutral == price
        assert_eq!(curve.neutral_from_value(10.0, 0.0, 130.0, 1.0, 100.0), 100.0);
    }

    #[test]
    fn test_default_roots() {
        let curve = BareLinear;
        // -10 * d^2 / 200 = -50  =>  d = 31.62
        let roots = curve.roots(10.0, 0.0, 100.0, 50.0);
        let d = 1000f64.sqrt();
        assert!(close(roots.min, 100.0 - d));
        assert!(close(roots.max, 100.0 + d));

        let collapsed = curve.roots(10.0, 0.0, 100.0, 0.0);
        assert_eq!(collapsed, MinMax::new(100.0, 100.0));
    }
}
