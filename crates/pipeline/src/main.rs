//! # subrank Entry Point
//!
//! Operational entry point: runs one fetch cycle and emits the result
//! as JSON lines on stdout. Formatting for humans is a presenter
//! concern and stays outside this binary.
//!
//! ## Configuration Modes
//!
//! ### Mode 1: TOML file
//! ```text
//! subrank <config.toml> [rank|usage]
//! ```
//!
//! ### Mode 2: Environment Variables
//! ```text
//! subrank env [rank|usage]
//! ```
//!
//! Required environment variables for env mode:
//! - `SUBRANK_API_KEY`: Gateway API key
//! - `SUBRANK_SUBGRAPH_ID`: Primary subgraph id
//! - `SUBRANK_LABEL_SUBGRAPH_ID`: Name-service subgraph id
//!
//! Optional:
//! - `SUBRANK_GATEWAY_URL`, `SUBRANK_SCALING_DECIMALS`,
//!   `SUBRANK_STAKE_THRESHOLD`, `SUBRANK_FEE_THRESHOLD`,
//!   `SUBRANK_PAGE_SIZE`, `SUBRANK_TIMEOUT_MS`
//!
//! ## Run Flow
//! 1. Parse configuration (file or env)
//! 2. Build the live sources
//! 3. Run the requested cycle (ranking by default, usage series with `usage`)
//! 4. Emit one JSON object per line

use std::env;

use tracing::{error, info, Level};

use subrank_common::{
    NameServiceSource, PipelineConfig, SubgraphSource, UsageSource,
};
use subrank_pipeline::RankingPipeline;

/// Which cycle the invocation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunMode {
    Rank,
    Usage,
}

struct Invocation {
    config: PipelineConfig,
    config_source: String,
    mode: RunMode,
}

impl Invocation {
    /// Parses CLI arguments.
    ///
    /// `args[1]` selects the config mode (`env` or a TOML path);
    /// `args[2]` optionally selects the cycle (`rank` or `usage`).
    fn from_args() -> Result<Self, String> {
        let args: Vec<String> = env::args().collect();

        let (config, config_source) = match args.get(1).map(String::as_str) {
            Some("env") => {
                let config = PipelineConfig::from_env().map_err(|e| e.to_string())?;
                (config, "env".to_string())
            }
            Some(path) => {
                let config = PipelineConfig::load_from_file(path).map_err(|e| e.to_string())?;
                (config, format!("file:{}", path))
            }
            None => {
                return Err("usage: subrank <config.toml|env> [rank|usage]".to_string());
            }
        };

        let mode = match args.get(2).map(String::as_str) {
            None | Some("rank") => RunMode::Rank,
            Some("usage") => RunMode::Usage,
            Some(other) => {
                return Err(format!("unknown mode '{}', expected rank or usage", other));
            }
        };

        Ok(Self {
            config,
            config_source,
            mode,
        })
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    let invocation = match Invocation::from_args() {
        Ok(i) => i,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    let config = &invocation.config;

    info!("═══════════════════════════════════════════════════════════════");
    info!("                    subrank pipeline                            ");
    info!("═══════════════════════════════════════════════════════════════");
    info!("Config Mode:     {}", invocation.config_source);
    info!("Gateway:         {}", config.gateway_url);
    info!("Subgraph:        {}", config.subgraph_id);
    info!("Label Subgraph:  {}", config.label_subgraph_id);
    info!("Page Size:       {}", config.page_size);
    info!("Stake Threshold: {}", config.stake_threshold);
    info!("Fee Threshold:   {}", config.fee_threshold);
    info!("═══════════════════════════════════════════════════════════════");

    let source = match SubgraphSource::from_config(config) {
        Ok(s) => s,
        Err(e) => {
            error!("failed to build subgraph source: {}", e);
            std::process::exit(1);
        }
    };

    match invocation.mode {
        RunMode::Rank => {
            let labels = match NameServiceSource::from_config(config) {
                Ok(l) => l,
                Err(e) => {
                    error!("failed to build label source: {}", e);
                    std::process::exit(1);
                }
            };

            let pipeline = RankingPipeline::new(source, labels, config);
            let ranked = match pipeline.run().await {
                Ok(r) => r,
                Err(e) => {
                    error!("fetch cycle failed: {}", e);
                    std::process::exit(1);
                }
            };

            info!("{} records ranked", ranked.len());
            for record in &ranked {
                match serde_json::to_string(record) {
                    Ok(line) => println!("{}", line),
                    Err(e) => {
                        error!("failed to serialize record {}: {}", record.record.id, e);
                        std::process::exit(1);
                    }
                }
            }
        }
        RunMode::Usage => {
            let series = match source.fetch_daily_usage(config.page_size).await {
                Ok(s) => s,
                Err(e) => {
                    error!("usage fetch failed: {}", e);
                    std::process::exit(1);
                }
            };

            info!("{} usage points fetched", series.len());
            for point in &series {
                match serde_json::to_string(point) {
                    Ok(line) => println!("{}", line),
                    Err(e) => {
                        error!("failed to serialize usage point: {}", e);
                        std::process::exit(1);
                    }
                }
            }
        }
    }
}
