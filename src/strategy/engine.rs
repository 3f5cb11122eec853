//! Leveraged strategy engine
//!
//! The engine is an immutable value. Every operation that changes the state
//! returns a new engine; the one it was called on stays valid and unchanged,
//! so a caller can keep the previous value around until the exchange
//! confirms an order.
//!
//! ```text
//! Uninitialized ──on_idle / on_trade──▶ Initialized ──on_trade──▶ Initialized
//!       ▲                                    │
//!       └────────────────reset───────────────┘
//! ```
//!
//! Curve queries always use the *effective* power: the compounded base power
//! damped by the trend detector.

use std::sync::{Arc, OnceLock};

use serde_json::Value;
use tracing::{debug, warn};

use crate::common::errors::{EngineError, Result};
use crate::common::types::{MarketInfo, Side, Ticker};
use crate::strategy::config::StrategyConfig;
use crate::strategy::sizing::{apply_minimum, round_price, round_to_step};
use crate::strategy::state::{PersistedState, State};
use crate::strategy::traits::Curve;
use crate::strategy::types::{AlertLevel, MinMax, OnTradeResult, OrderData};

/// Run length after which the trend detector starts damping
const TREND_THRESHOLD: u32 = 3;
/// Damping applied per move beyond the threshold
const TREND_DAMPING: f64 = 0.8;
/// Lowest damping factor
const TREND_FLOOR: f64 = 0.2;

/// Result of settling a (real or hypothetical) fill
#[derive(Debug, Clone, Copy)]
struct Settlement {
    state: State,
    profit: f64,
    accum: f64,
}

/// Curve-driven market-making engine
#[derive(Debug)]
pub struct LeveragedEngine<C: Curve> {
    curve: Arc<C>,
    config: Arc<StrategyConfig>,
    config_hash: Arc<str>,
    state: State,
    /// Safe range keyed by the available balance it was computed for
    roots_cache: OnceLock<(f64, MinMax)>,
}

impl<C: Curve> Clone for LeveragedEngine<C> {
    fn clone(&self) -> Self {
        Self {
            curve: Arc::clone(&self.curve),
            config: Arc::clone(&self.config),
            config_hash: Arc::clone(&self.config_hash),
            state: self.state,
            roots_cache: self.roots_cache.clone(),
        }
    }
}

impl<C: Curve> LeveragedEngine<C> {
    /// Create an uninitialized engine.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidConfiguration` if the config fails
    /// validation.
    pub fn new(curve: C, config: StrategyConfig) -> Result<Self> {
        Self::from_shared(Arc::new(curve), Arc::new(config))
    }

    /// Create an uninitialized engine from an already shared curve and config
    pub fn from_shared(curve: Arc<C>, config: Arc<StrategyConfig>) -> Result<Self> {
        config.validate()?;
        let config_hash: Arc<str> = Arc::from(config.config_hash(&curve.fingerprint())?);
        Ok(Self {
            curve,
            config,
            config_hash,
            state: State::default(),
            roots_cache: OnceLock::new(),
        })
    }

    fn with_state(&self, state: State) -> Self {
        Self {
            curve: Arc::clone(&self.curve),
            config: Arc::clone(&self.config),
            config_hash: Arc::clone(&self.config_hash),
            state,
            roots_cache: OnceLock::new(),
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    pub fn curve(&self) -> &C {
        &self.curve
    }

    pub fn config_hash(&self) -> &str {
        &self.config_hash
    }

    pub fn is_valid(&self) -> bool {
        self.state.is_valid()
    }

    /// Power the curve is currently evaluated with
    pub fn effective_power(&self) -> f64 {
        self.effective(&self.state)
    }

    fn effective(&self, state: &State) -> f64 {
        state.power * self.trend_factor(state.trend_counter)
    }

    fn trend_factor(&self, counter: i32) -> f64 {
        if !self.config.detect_trend {
            return 1.0;
        }
        let excess = counter.unsigned_abs().saturating_sub(TREND_THRESHOLD);
        if excess == 0 {
            return 1.0;
        }
        let exponent = i32::try_from(excess).unwrap_or(i32::MAX);
        TREND_DAMPING.powi(exponent).max(TREND_FLOOR)
    }

    fn budget(&self, market: &MarketInfo, price: f64, assets: f64, currency: f64) -> f64 {
        let external = self.config.external_balance;
        if market.is_leveraged() {
            currency + external
        } else {
            assets * price + currency + external
        }
    }

    /// Equity left if the price moves to `price` with the current holding
    fn equity(&self, market: &MarketInfo, state: &State, price: f64, assets: f64, currency: f64) -> f64 {
        if market.is_leveraged() {
            currency + self.config.external_balance + assets * (price - state.last_price)
        } else {
            self.budget(market, price, assets, currency)
        }
    }

    fn init_state(&self, market: &MarketInfo, price: f64, assets: f64, currency: f64) -> Result<State> {
        if !(price > 0.0 && price.is_finite()) {
            return Err(EngineError::InvalidConfiguration(format!(
                "cannot initialize at price {price}"
            )));
        }
        let budget = self.budget(market, price, assets, currency);
        if !(budget > 0.0 && budget.is_finite()) {
            return Err(EngineError::InvalidConfiguration(format!(
                "budget must be positive, got {budget}"
            )));
        }

        let cfg = &self.config;
        let power = self
            .curve
            .power(price, budget * cfg.power_multiplier(), cfg.asym);
        if !(power > 0.0 && power.is_finite()) {
            return Err(EngineError::InvalidConfiguration(format!(
                "curve power must be positive, got {power}"
            )));
        }

        let usable = |n: f64| if n > 0.0 && n.is_finite() { n } else { price };
        let neutral = if market.is_leveraged() && !cfg.recalc_keep_neutral && assets != 0.0 {
            usable(self.curve.neutral_from_position(power, cfg.asym, assets, price))
        } else if cfg.initial_boost != 0.0 {
            let boosted =
                self.curve.position(power, cfg.asym, price, price) + cfg.initial_boost * power;
            usable(self.curve.neutral_from_position(power, cfg.asym, boosted, price))
        } else {
            price
        };

        let position = self.curve.position(power, cfg.asym, neutral, price);
        let neutral_pos = if market.is_leveraged() {
            0.0
        } else {
            assets - position
        };

        debug!(
            "Initialized {} curve: neutral={} price={} budget={} power={}",
            self.curve.name(),
            neutral,
            price,
            budget,
            power
        );

        Ok(State {
            neutral_price: neutral,
            last_price: price,
            position,
            balance: budget,
            value: self.curve.value(power, cfg.asym, neutral, price),
            power,
            neutral_pos,
            trend_counter: 0,
        })
    }

    fn next_trend(counter: i32, last_price: f64, price: f64) -> i32 {
        if price > last_price {
            if counter > 0 {
                counter.saturating_add(1)
            } else {
                1
            }
        } else if price < last_price {
            if counter < 0 {
                counter.saturating_sub(1)
            } else {
                -1
            }
        } else {
            counter
        }
    }

    /// New neutral price after a move to `price` that earned `pnl`
    fn reduce(&self, neutral: f64, price: f64, pnl: f64, power: f64) -> f64 {
        if pnl <= 0.0 {
            return neutral;
        }
        let cfg = &self.config;
        let r = (cfg.reduction + cfg.dynamic_reduction * (price / neutral - 1.0).abs())
            .clamp(0.0, 1.0);
        if r == 0.0 {
            return neutral;
        }
        let current = self.curve.value(power, cfg.asym, neutral, price);
        let peak = self.curve.value(power, cfg.asym, price, price);
        let target = (current + r * pnl).min(peak);
        let reduced = self
            .curve
            .neutral_from_value(power, cfg.asym, neutral, target, price);
        if !(reduced > 0.0 && reduced.is_finite()) {
            return neutral;
        }
        let (lo, hi) = if neutral <= price {
            (neutral, price)
        } else {
            (price, neutral)
        };
        reduced.clamp(lo, hi)
    }

    /// Settle a fill at `price` for a curve holding of `held` before it
    fn settle(&self, state: &State, price: f64, held: f64) -> Settlement {
        let cfg = &self.config;
        let pnl = held * (price - state.last_price);
        let trend_counter = Self::next_trend(state.trend_counter, state.last_price, price);
        let factor = self.trend_factor(trend_counter);

        let neutral = self.reduce(state.neutral_price, price, pnl, state.power * factor);
        let value = self
            .curve
            .value(state.power * factor, cfg.asym, neutral, price);

        let profit = pnl - (value - state.value);
        let accum = profit * cfg.power_adjust;

        let balance = state.balance + accum;
        let power = if state.balance > 0.0 && balance > 0.0 {
            state.power * balance / state.balance
        } else {
            state.power
        };
        let effective = power * factor;

        Settlement {
            state: State {
                neutral_price: neutral,
                last_price: price,
                position: self.curve.position(effective, cfg.asym, neutral, price),
                balance,
                value: self.curve.value(effective, cfg.asym, neutral, price),
                power,
                neutral_pos: state.neutral_pos,
                trend_counter,
            },
            profit,
            accum,
        }
    }

    /// Lazily initialize at the ticker's last price.
    ///
    /// An already initialized engine is returned unchanged.
    pub fn on_idle(&self, market: &MarketInfo, ticker: &Ticker, assets: f64, currency: f64) -> Result<Self> {
        if self.state.is_valid() {
            return Ok(self.clone());
        }
        let state = self.init_state(market, ticker.last, assets, currency)?;
        Ok(self.with_state(state))
    }

    /// Order to place if the price moves to `new_price`.
    ///
    /// The target is the holding the engine would want after settling a fill
    /// at `new_price`, adjusted by the safety rules and the exchange limits.
    #[allow(clippy::too_many_arguments)]
    pub fn get_new_order(
        &self,
        market: &MarketInfo,
        current_price: f64,
        new_price: f64,
        side: Side,
        assets: f64,
        currency: f64,
        rejected_last: bool,
    ) -> Result<OrderData> {
        if !(new_price > 0.0 && new_price.is_finite()) {
            return Err(EngineError::InvalidConfiguration(format!(
                "order price must be positive, got {new_price}"
            )));
        }
        let state = if self.state.is_valid() {
            self.state
        } else {
            let price = if current_price > 0.0 { current_price } else { new_price };
            self.init_state(market, price, assets, currency)?
        };
        let cfg = &self.config;

        if self.equity(market, &state, new_price, assets, currency) <= 0.0 {
            let size = round_to_step(-assets, market.asset_step);
            debug!("Stoploss at {}: closing {}", new_price, assets);
            return Ok(OrderData::new(0.0, size, AlertLevel::Stoploss));
        }

        let settled = self.settle(&state, new_price, assets - state.neutral_pos).state;
        let mut target = settled.position + state.neutral_pos;

        let range = if self.state.is_valid() {
            self.calc_safe_range(market, assets, currency)
        } else {
            self.compute_safe_range(&state, market, assets, currency)
        };
        let bound = if range.contains(new_price) {
            None
        } else if new_price < range.min {
            Some(range.min)
        } else {
            Some(range.max)
        };
        if let Some(bound) = bound {
            target = self
                .curve
                .position(self.effective(&settled), cfg.asym, settled.neutral_price, bound)
                + state.neutral_pos;
        }

        if cfg.long_only || !market.is_leveraged() {
            target = target.max(0.0);
        }

        let mut size = target - assets;
        if size * side.sign() < 0.0 {
            size = 0.0;
        }
        size = apply_minimum(market, new_price, size, cfg.preference, rejected_last);
        size = round_to_step(size, market.asset_step);

        let limit = round_price(new_price, market.currency_step, side);
        let order = match bound {
            Some(bound) => {
                debug!("Price {} outside safe range at {}: forced order", new_price, bound);
                OrderData::new(0.0, size, AlertLevel::Forced)
            }
            None if size == 0.0 => OrderData::new(limit, 0.0, AlertLevel::Enabled),
            None => OrderData::new(limit, size, AlertLevel::Disabled),
        };
        Ok(order)
    }

    /// Settle an executed trade.
    ///
    /// `assets_left` and `currency_left` are the balances after the fill; an
    /// uninitialized engine is first initialized from the balances before it,
    /// with the fee on the traded volume given back to the currency.
    pub fn on_trade(
        &self,
        market: &MarketInfo,
        price: f64,
        size: f64,
        assets_left: f64,
        currency_left: f64,
    ) -> Result<(OnTradeResult, Self)> {
        if !(price > 0.0 && price.is_finite()) {
            return Err(EngineError::InvalidConfiguration(format!(
                "trade price must be positive, got {price}"
            )));
        }
        let state = if self.state.is_valid() {
            self.state
        } else {
            let volume = size * price;
            let currency = currency_left + volume + volume.abs() * market.fees;
            self.init_state(market, price, assets_left - size, currency)?
        };

        let held = assets_left - size - state.neutral_pos;
        let mut settlement = self.settle(&state, price, held);
        if self.config.long_only || !market.is_leveraged() {
            let floor = -settlement.state.neutral_pos;
            settlement.state.position = settlement.state.position.max(floor);
        }
        let next = self.with_state(settlement.state);

        let result = OnTradeResult {
            normalized_profit: settlement.profit - settlement.accum,
            normalized_accum: settlement.accum,
            neutral_price: settlement.state.neutral_price,
            open_price: next.get_equilibrium(assets_left),
        };

        debug!(
            "Trade {} @ {}: profit={} accum={} neutral={} trend={}",
            size,
            price,
            result.normalized_profit,
            result.normalized_accum,
            result.neutral_price,
            settlement.state.trend_counter
        );

        Ok((result, next))
    }

    /// Price interval within which the loss stays inside the budget.
    ///
    /// The first range computed for an engine value is memoized.
    pub fn calc_safe_range(&self, market: &MarketInfo, assets: f64, currencies: f64) -> MinMax {
        if !self.state.is_valid() {
            return MinMax::unbounded();
        }
        let available = self.available(&self.state, market, assets, currencies);
        if let Some((key, range)) = self.roots_cache.get() {
            if *key == available {
                return *range;
            }
        }
        let range = self.roots_for(&self.state, available);
        // a different balance keeps the first entry and is just recomputed
        let _ = self.roots_cache.set((available, range));
        range
    }

    fn compute_safe_range(&self, state: &State, market: &MarketInfo, assets: f64, currencies: f64) -> MinMax {
        let available = self.available(state, market, assets, currencies);
        self.roots_for(state, available)
    }

    fn available(&self, state: &State, market: &MarketInfo, assets: f64, currencies: f64) -> f64 {
        let available = self.budget(market, state.last_price, assets, currencies);
        available * (1.0 - self.config.max_loss)
    }

    fn roots_for(&self, state: &State, available: f64) -> MinMax {
        self.curve.roots(
            self.effective(state),
            self.config.asym,
            state.neutral_price,
            available,
        )
    }

    /// Price at which holding `assets` is exactly the curve target
    pub fn get_equilibrium(&self, assets: f64) -> f64 {
        if !self.state.is_valid() {
            return 0.0;
        }
        self.curve.price_from_position(
            self.effective_power(),
            self.config.asym,
            self.state.neutral_price,
            assets - self.state.neutral_pos,
        )
    }

    /// Snapshot the state as a [`PersistedState`] document
    pub fn export_state(&self) -> Result<Value> {
        let persisted = PersistedState::new(&self.state, &*self.config_hash);
        Ok(serde_json::to_value(persisted)?)
    }

    /// Restore a document written by [`export_state`](Self::export_state).
    ///
    /// A document produced under a different config yields an uninitialized
    /// engine.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::JsonParse` if the document does not match the
    /// schema.
    pub fn import_state(&self, doc: &Value) -> Result<Self> {
        let persisted: PersistedState = serde_json::from_value(doc.clone())?;
        if persisted.config_hash != *self.config_hash {
            let err = EngineError::ConfigMismatch {
                expected: self.config_hash.to_string(),
                found: persisted.config_hash,
            };
            warn!("Discarding persisted state: {}", err);
            return Ok(self.reset());
        }
        Ok(self.with_state(persisted.state()))
    }

    pub fn reset(&self) -> Self {
        self.with_state(State::default())
    }
}
