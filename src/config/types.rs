//! Configuration types

use serde::{Deserialize, Serialize};

use crate::common::errors::Result;
use crate::common::types::MarketInfo;
use crate::strategy::{CurveKind, StrategyConfig};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Strategy tunables
    #[serde(default)]
    pub strategy: StrategyConfig,
    /// Pricing curve and its parameters
    #[serde(default)]
    pub curve: CurveKind,
    /// Description of the traded market
    #[serde(default)]
    pub market: MarketInfo,
    /// General application settings
    #[serde(default)]
    pub settings: AppSettings,
}

impl AppConfig {
    /// Validate the strategy and curve sections
    pub fn validate(&self) -> Result<()> {
        self.strategy.validate()?;
        self.curve.validate()
    }
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Where the engine state is loaded from and saved to
    #[serde(default)]
    pub state_path: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            state_path: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
