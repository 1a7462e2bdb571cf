//! Command line of `nominate-client`.
//!
//! Every option can also be set through its `NC_*` environment variable.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use nc_01_chain_gateway::{DEFAULT_PARA_WS, DEFAULT_RELAY_WS};

/// Default signing seed (development account).
pub const DEFAULT_SEED: &str = "//Eve";

/// Default interval between rounds, in milliseconds.
pub const DEFAULT_TICK_MS: u64 = 120_000;

/// What starts a round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum TriggerMode {
    /// Fixed interval ticks
    #[default]
    Interval,
    /// Relay era changes
    EraChange,
    /// Both sources
    Both,
}

impl TriggerMode {
    /// Interval ticks enabled.
    pub fn uses_interval(self) -> bool {
        matches!(self, TriggerMode::Interval | TriggerMode::Both)
    }

    /// Era change notifications enabled.
    pub fn uses_era_changes(self) -> bool {
        matches!(self, TriggerMode::EraChange | TriggerMode::Both)
    }
}

/// nominate-client: validator selection for a liquid-staking pool
#[derive(Parser, Debug, Clone)]
#[command(name = "nominate-client")]
#[command(about = "Scores relay-chain validators and nominates the best of them")]
#[command(version)]
pub struct Cli {
    /// Para chain WebSocket endpoint
    #[arg(short = 'p', long, env = "NC_PARA_WS", default_value = DEFAULT_PARA_WS)]
    pub para_ws: String,

    /// Relay chain WebSocket endpoint
    #[arg(short = 'r', long, env = "NC_RELAY_WS", default_value = DEFAULT_RELAY_WS)]
    pub relay_ws: String,

    /// Interval between rounds in milliseconds
    #[arg(short = 't', long, env = "NC_TICK", default_value_t = DEFAULT_TICK_MS)]
    pub tick: u64,

    /// Seed of the signing account
    #[arg(
        short = 's',
        long,
        env = "NC_SEED",
        default_value = DEFAULT_SEED,
        hide_env_values = true,
        hide_default_value = true
    )]
    pub seed: String,

    /// Prompt for the seed instead of taking it from the command line
    #[arg(short = 'i', long)]
    pub interactive: bool,

    /// Round trigger
    #[arg(long, value_enum, env = "NC_TRIGGER", default_value_t = TriggerMode::Interval)]
    pub trigger: TriggerMode,

    /// TOML policy file
    #[arg(short = 'c', long, env = "NC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Build nominations without submitting them
    #[arg(long, env = "NC_DRY_RUN")]
    pub dry_run: bool,

    /// Serve Prometheus metrics on this address
    #[arg(long, env = "NC_METRICS_ADDR")]
    pub metrics_addr: Option<SocketAddr>,
}

/// Seed from the prompt in interactive mode, else from the command line.
pub fn resolve_seed(cli: &Cli) -> dialoguer::Result<String> {
    if !cli.interactive {
        return Ok(cli.seed.clone());
    }
    dialoguer::Password::new()
        .with_prompt("Seed of the signing account")
        .interact()
}
