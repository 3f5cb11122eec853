//! Leveraged pricing-curve strategy
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    LeveragedEngine<C>                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  on_idle / get_new_order / on_trade / calc_safe_range       │
//! │    - State (replaced on every transition)                   │
//! │    - Arc<StrategyConfig>, Arc<C>                            │
//! └──────────────────────────────┬──────────────────────────────┘
//!                                │ position / value / inverses
//!                                ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Curve (Hyperbolic, Linear, Sinh, PowerLaw, CurveKind)      │
//! │    default inverses ──▶ RootFinder (bounded bisection)      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`Curve`]: pricing shape contract with root-finder default inverses
//! - [`RootFinder`]: monotonic bisection solver
//! - [`LeveragedEngine`]: the stateful algorithm, generic over its curve
//! - [`StrategyConfig`]: validated tunables, compared by hash on import
//!
//! # Example
//!
//! ```
//! use leveraged_mm::common::types::{MarketInfo, Side, Ticker};
//! use leveraged_mm::strategy::{HyperbolicCurve, LeveragedEngine, StrategyConfig};
//!
//! let market = MarketInfo { leverage: 5.0, ..Default::default() };
//! let engine = LeveragedEngine::new(HyperbolicCurve, StrategyConfig::default())
//!     .unwrap()
//!     .on_idle(&market, &Ticker::new(99.0, 101.0, 100.0), 0.0, 1000.0)
//!     .unwrap();
//!
//! let order = engine
//!     .get_new_order(&market, 100.0, 95.0, Side::Buy, 0.0, 1000.0, false)
//!     .unwrap();
//! assert!(order.size > 0.0);
//! ```

pub mod config;
pub mod curves;
pub mod engine;
pub mod root_finder;
pub mod sizing;
pub mod state;
pub mod traits;
pub mod types;

pub use config::{Preference, StrategyConfig};
pub use curves::{CurveKind, HyperbolicCurve, LinearCurve, PowerLawCurve, SinhCurve};
pub use engine::LeveragedEngine;
pub use root_finder::RootFinder;
pub use state::{PersistedState, State};
pub use traits::Curve;
pub use types::{AlertLevel, MinMax, OnTradeResult, OrderData};
