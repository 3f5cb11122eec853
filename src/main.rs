//! leveraged_mm - Main Entry Point
//!
//! Replays a JSON-lines stream of ticks and fills through one strategy
//! engine, loading and saving the persisted state around the run.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use leveraged_mm::config::loader::load_config;
use leveraged_mm::replay::{read_events, Replay, ReplayStep};
use leveraged_mm::strategy::LeveragedEngine;

/// CLI arguments for the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// JSON-lines file of tick and fill events
    #[arg(short, long)]
    events: PathBuf,

    /// State file to load before and save after the replay
    #[arg(short, long)]
    state: Option<PathBuf>,

    /// Asset balance at the start of the replay
    #[arg(long, default_value_t = 0.0)]
    assets: f64,

    /// Currency balance at the start of the replay
    #[arg(long, default_value_t = 0.0)]
    currency: f64,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, env = "LOG_LEVEL")]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn init_logging(level: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true);

    if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    }
    .map_err(|e| anyhow::anyhow!(e))
}

fn main() -> Result<()> {
    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = load_config(Some(&args.config))
        .with_context(|| format!("loading configuration from {}", args.config))?;

    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.settings.log_level.clone());
    init_logging(&level, args.json_logs)?;

    info!("Starting leveraged_mm replay");
    info!("Configuration file: {}", args.config);
    info!("Curve: {:?}", config.curve);

    let mut engine = LeveragedEngine::new(config.curve, config.strategy.clone())?;

    let state_path = args
        .state
        .clone()
        .or_else(|| config.settings.state_path.as_ref().map(PathBuf::from));
    if let Some(path) = state_path.as_deref().filter(|p| p.exists()) {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let doc: serde_json::Value = serde_json::from_reader(BufReader::new(file))?;
        engine = engine.import_state(&doc)?;
        info!(
            "Loaded state from {} (initialized: {})",
            path.display(),
            engine.is_valid()
        );
    }

    let file = File::open(&args.events)
        .with_context(|| format!("opening {}", args.events.display()))?;
    let events = read_events(BufReader::new(file))?;
    info!("Replaying {} events", events.len());

    let mut replay = Replay::new(engine, config.market.clone(), args.assets, args.currency);
    for (index, event) in events.iter().enumerate() {
        match replay.apply_or_skip(event) {
            Some(ReplayStep::Quoted { buy, sell }) => info!(
                "#{} quote: buy {} @ {} ({:?}), sell {} @ {} ({:?})",
                index, buy.size, buy.price, buy.alert, sell.size, sell.price, sell.alert
            ),
            Some(ReplayStep::Traded(result)) => info!(
                "#{} trade: profit {:.6} accum {:.6} neutral {:.6} open {:.6}",
                index,
                result.normalized_profit,
                result.normalized_accum,
                result.neutral_price,
                result.open_price
            ),
            None => {}
        }
    }

    let engine = replay.into_engine();
    info!("Final state: {:?}", engine.state());

    if let Some(path) = state_path.as_deref() {
        save_state(path, &engine.export_state()?)?;
        info!("Saved state to {}", path.display());
    }

    Ok(())
}

fn save_state(path: &Path, doc: &serde_json::Value) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), doc)?;
    Ok(())
}
