//! leveraged_mm Library
//!
//! Decision core of a curve-based market-making bot: given a tick or an
//! executed trade, compute the order to place and the next strategy state.

pub mod common;
pub mod config;
pub mod replay;
pub mod strategy;

// Re-export commonly used types
pub use common::errors::{EngineError, Result};
pub use common::speedtest::{BenchmarkStats, SpeedTest, SpeedTestResult};
pub use common::types::{Fill, MarketInfo, Side, Ticker};
pub use config::types::AppConfig;
pub use replay::{read_events, Replay, ReplayEvent, ReplayStep};

// Strategy types
pub use strategy::{
    AlertLevel, Curve, CurveKind, HyperbolicCurve, LeveragedEngine, LinearCurve, MinMax,
    OnTradeResult, OrderData, PowerLawCurve, RootFinder, SinhCurve, StrategyConfig,
};
