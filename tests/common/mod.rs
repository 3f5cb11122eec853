//! Common test utilities and fixtures

#![allow(dead_code)]

use leveraged_mm::common::types::{MarketInfo, Ticker};
use leveraged_mm::strategy::{
    Curve, CurveKind, LeveragedEngine, PowerLawCurve, SinhCurve, StrategyConfig,
};

/// Collateral budget used by most fixtures
pub const BUDGET: f64 = 1000.0;

/// Starting price used by most fixtures
pub const START: f64 = 100.0;

/// Leveraged market without size limits
pub fn futures_market() -> MarketInfo {
    MarketInfo {
        leverage: 10.0,
        ..Default::default()
    }
}

/// Spot market without size limits
pub fn spot_market() -> MarketInfo {
    MarketInfo::default()
}

/// One instance of every curve shape
pub fn all_curves() -> Vec<CurveKind> {
    vec![
        CurveKind::Hyperbolic,
        CurveKind::Linear,
        CurveKind::Sinh(SinhCurve { curvature: 1.5 }),
        CurveKind::PowerLaw(PowerLawCurve { ratio: 1.0 }),
    ]
}

/// Engine initialized at [`START`] on the futures market with [`BUDGET`]
pub fn started<C: Curve>(curve: C, config: StrategyConfig) -> LeveragedEngine<C> {
    LeveragedEngine::new(curve, config)
        .expect("valid config")
        .on_idle(&futures_market(), &Ticker::new(START, START, START), 0.0, BUDGET)
        .expect("engine initializes")
}

/// Assert `actual` is within `tol` relative error of `expected`
pub fn assert_rel(actual: f64, expected: f64, tol: f64) {
    let scale = expected.abs().max(1e-12);
    let err = (actual - expected).abs() / scale;
    assert!(
        err <= tol,
        "expected {} got {} (relative error {})",
        expected,
        actual,
        err
    );
}

/// Sample replay streams
pub mod events {
    /// Price dips, a buy fills, price recovers, the position is sold back
    pub const ROUND_TRIP: &str = r#"
# session start
{"type":"tick","bid":99.5,"ask":100.5,"last":100.0}
{"type":"tick","bid":89.5,"ask":90.5,"last":90.0}
{"type":"fill","price":90.0,"size":1.0,"assetsLeft":1.0,"currencyLeft":1000.0}

{"type":"tick","bid":99.5,"ask":100.5,"last":100.0}
{"type":"fill","price":100.0,"size":-1.0,"assetsLeft":0.0,"currencyLeft":1000.0}
"#;
}
