//! Offline replay of ticks and fills through one engine
//!
//! Events are read from JSON lines, one event per line:
//!
//! ```text
//! {"type":"tick","bid":99.5,"ask":100.5,"last":100.0}
//! {"type":"fill","price":99.5,"size":0.05,"assetsLeft":0.05,"currencyLeft":1000.0}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use std::io::BufRead;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::common::errors::Result;
use crate::common::types::{Fill, MarketInfo, Side, Ticker};
use crate::strategy::{Curve, LeveragedEngine, OnTradeResult, OrderData};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReplayEvent {
    Tick(Ticker),
    Fill(Fill),
}

/// What the engine produced for one event
#[derive(Debug, Clone, PartialEq)]
pub enum ReplayStep {
    /// Orders the engine would keep on both sides of the book
    Quoted { buy: OrderData, sell: OrderData },
    /// Settlement of an executed trade
    Traded(OnTradeResult),
}

/// One engine fed with a strictly sequential event stream
#[derive(Debug)]
pub struct Replay<C: Curve> {
    engine: LeveragedEngine<C>,
    market: MarketInfo,
    assets: f64,
    currency: f64,
}

impl<C: Curve> Replay<C> {
    pub fn new(engine: LeveragedEngine<C>, market: MarketInfo, assets: f64, currency: f64) -> Self {
        Self {
            engine,
            market,
            assets,
            currency,
        }
    }

    pub fn engine(&self) -> &LeveragedEngine<C> {
        &self.engine
    }

    pub fn into_engine(self) -> LeveragedEngine<C> {
        self.engine
    }

    pub fn assets(&self) -> f64 {
        self.assets
    }

    pub fn currency(&self) -> f64 {
        self.currency
    }

    /// Feed one event.
    ///
    /// On error the engine and balances are left as they were.
    pub fn apply(&mut self, event: &ReplayEvent) -> Result<ReplayStep> {
        match event {
            ReplayEvent::Tick(ticker) => {
                let engine = self
                    .engine
                    .on_idle(&self.market, ticker, self.assets, self.currency)?;
                let buy = engine.get_new_order(
                    &self.market,
                    ticker.last,
                    ticker.bid,
                    Side::Buy,
                    self.assets,
                    self.currency,
                    false,
                )?;
                let sell = engine.get_new_order(
                    &self.market,
                    ticker.last,
                    ticker.ask,
                    Side::Sell,
                    self.assets,
                    self.currency,
                    false,
                )?;
                debug!("Tick {}: buy {:?} sell {:?}", ticker.last, buy, sell);
                self.engine = engine;
                Ok(ReplayStep::Quoted { buy, sell })
            }
            ReplayEvent::Fill(fill) => {
                let (result, engine) = self.engine.on_trade(
                    &self.market,
                    fill.price,
                    fill.size,
                    fill.assets_left,
                    fill.currency_left,
                )?;
                self.engine = engine;
                self.assets = fill.assets_left;
                self.currency = fill.currency_left;
                Ok(ReplayStep::Traded(result))
            }
        }
    }

    /// Feed one event, logging and skipping it on error.
    ///
    /// A skipped event leaves the replay untouched, so the next event retries
    /// from the same engine and balances.
    pub fn apply_or_skip(&mut self, event: &ReplayEvent) -> Option<ReplayStep> {
        match self.apply(event) {
            Ok(step) => Some(step),
            Err(err) => {
                warn!("Skipping {:?}: {}", event, err);
                None
            }
        }
    }

    /// Feed every event in order, stopping at the first error
    pub fn run<'a, I>(&mut self, events: I) -> Result<Vec<ReplayStep>>
    where
        I: IntoIterator<Item = &'a ReplayEvent>,
    {
        events.into_iter().map(|event| self.apply(event)).collect()
    }
}

/// Parse a JSON-lines event stream
pub fn read_events<R: BufRead>(reader: R) -> Result<Vec<ReplayEvent>> {
    let mut events = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        events.push(serde_json::from_str(line)?);
    }
    Ok(events)
}
