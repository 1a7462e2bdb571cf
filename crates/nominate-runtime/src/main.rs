//! # nominate-client
//!
//! Scores relay-chain validators every round and submits the best of them as
//! the nomination of a liquid-staking pool.
//!
//! ```text
//! nominate-client -r ws://127.0.0.1:9944 -p ws://127.0.0.1:9948 -s //Eve -t 120000
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use nc_telemetry::{init_telemetry, TelemetryConfig};
use nominate_runtime::metrics_server::serve_metrics;
use nominate_runtime::{resolve_seed, wiring, Cli, RuntimeConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let seed = resolve_seed(&cli).context("Failed to read seed")?;
    let config = RuntimeConfig::from_cli(&cli, seed)?;

    let _telemetry = init_telemetry(TelemetryConfig::from_env())?;

    info!("===========================================");
    info!("  nominate-client v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");
    info!(
        relay = %config.gateway.relay_ws,
        para = %config.gateway.para_ws,
        tick_ms = config.tick.as_millis() as u64,
        trigger = ?config.trigger,
        dry_run = config.orchestrator.dry_run,
        "Configuration loaded"
    );

    if let Some(addr) = config.metrics_addr {
        tokio::spawn(async move {
            if let Err(err) = serve_metrics(addr).await {
                error!(%addr, error = %err, "Metrics endpoint stopped");
            }
        });
    }

    let result = wiring::run(config).await;
    if let Err(err) = &result {
        error!(error = ?err, "Exiting");
    }
    result
}
