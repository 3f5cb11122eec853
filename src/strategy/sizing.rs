//! Order size adjustments applied at the exchange boundary
//!
//! Rounding goes through `Decimal` so that sizes such as `0.3` on a `0.1`
//! step stay at three steps instead of collapsing to two.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use crate::common::types::{MarketInfo, Side};
use crate::strategy::config::Preference;

/// Round `size` toward zero to a multiple of `step`
pub fn round_decimal(size: Decimal, step: Decimal) -> Decimal {
    if step <= Decimal::ZERO {
        return size;
    }
    match size.checked_div(step) {
        Some(steps) => steps.trunc() * step,
        None => size,
    }
}

/// [`round_decimal`] for `f64` sizes
///
/// Sizes outside the `Decimal` range fall back to plain float arithmetic.
pub fn round_to_step(size: f64, step: f64) -> f64 {
    if step <= 0.0 || !size.is_finite() {
        return size;
    }
    let rounded = Decimal::from_f64(size)
        .zip(Decimal::from_f64(step))
        .and_then(|(s, st)| round_decimal(s, st).to_f64());
    match rounded {
        Some(value) => value,
        None => (size / step).trunc() * step,
    }
}

/// Round a limit price to `step` away from the spread: buys round down,
/// sells round up
pub fn round_price(price: f64, step: f64, side: Side) -> f64 {
    if step <= 0.0 || !price.is_finite() {
        return price;
    }
    let rounded = Decimal::from_f64(price)
        .zip(Decimal::from_f64(step))
        .and_then(|(p, st)| {
            let steps = p.checked_div(st)?;
            let steps = match side {
                Side::Buy => steps.floor(),
                Side::Sell => steps.ceil(),
            };
            (steps * st).to_f64()
        });
    match (rounded, side) {
        (Some(value), _) => value,
        (None, Side::Buy) => (price / step).floor() * step,
        (None, Side::Sell) => (price / step).ceil() * step,
    }
}

/// Apply the exchange minimum to a signed size.
///
/// Returns the size unchanged when it already meets the minimum, zero when
/// the order should be skipped, or the minimum in the same direction.
pub fn apply_minimum(
    market: &MarketInfo,
    price: f64,
    size: f64,
    preference: Preference,
    rejected_last: bool,
) -> f64 {
    if size == 0.0 {
        return 0.0;
    }
    let min = market.min_order_size(price);
    if size.abs() >= min {
        return size;
    }
    if rejected_last || preference == Preference::Alert {
        0.0
    } else {
        min.copysign(size)
    }
}
