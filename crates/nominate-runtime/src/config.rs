//! # Runtime Configuration
//!
//! Merges the command line with the optional TOML policy file.
//!
//! ## Policy File
//!
//! ```toml
//! [scoring]
//! era_window = 28
//! include_current_era = false
//! max_commission_percent = 7.5
//! coefficients = { commission_weight = 100.0, nomination_weight = 1000.0, era_points_weight = 10.0 }
//!
//! [selection]
//! max_validators = 16
//! tie_break = "lower-stake-first"
//! include_zero_scores = false
//!
//! [orchestrator]
//! exposure_concurrency = 16
//! mark_failed_eras = false
//! queue_capacity = 16
//! ```
//!
//! Every field is optional. Without `coefficients` or `max_validators` the
//! values are read from the para chain each round.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use nc_01_chain_gateway::GatewayConfig;
use nc_02_validator_scoring::{TieBreak, DEFAULT_ERA_WINDOW, DEFAULT_MAX_COMMISSION_PERCENT};
use nc_03_round_orchestrator::OrchestratorConfig;
use serde::Deserialize;
use shared_types::{Perbill, ScoringCoefficients};
use thiserror::Error;

use crate::cli::{Cli, TriggerMode};

/// Configuration errors, reported before connecting.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Policy file could not be read.
    #[error("Failed to read config {path}: {reason}")]
    Read {
        /// File path
        path: PathBuf,
        /// I/O error
        reason: String,
    },

    /// Policy file is not valid TOML for this client.
    #[error("Failed to parse config {path}: {reason}")]
    Parse {
        /// File path
        path: PathBuf,
        /// Parser error
        reason: String,
    },

    /// Tick interval of zero.
    #[error("Tick must be a positive number of milliseconds")]
    InvalidTick,

    /// Empty signing seed.
    #[error("Seed must not be empty")]
    EmptySeed,

    /// A value is out of range.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// `[scoring]` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringSection {
    /// Eras in the observation window
    pub era_window: usize,
    /// Count the active era as historic
    pub include_current_era: bool,
    /// Commission cap in percent
    pub max_commission_percent: f64,
    /// Static coefficients
    pub coefficients: Option<ScoringCoefficients>,
}

impl Default for ScoringSection {
    fn default() -> Self {
        Self {
            era_window: DEFAULT_ERA_WINDOW,
            include_current_era: false,
            max_commission_percent: DEFAULT_MAX_COMMISSION_PERCENT,
            coefficients: None,
        }
    }
}

/// `[selection]` section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectionSection {
    /// Static validator cap
    pub max_validators: Option<u32>,
    /// Ordering among equal scores
    pub tie_break: TieBreak,
    /// Pad with zero scores
    pub include_zero_scores: bool,
}

/// `[orchestrator]` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrchestratorSection {
    /// Exposure queries in flight at once
    pub exposure_concurrency: usize,
    /// Mark eras of failed rounds as processed
    pub mark_failed_eras: bool,
    /// Trigger queue capacity
    pub queue_capacity: usize,
}

impl Default for OrchestratorSection {
    fn default() -> Self {
        let defaults = OrchestratorConfig::default();
        Self {
            exposure_concurrency: defaults.exposure_concurrency,
            mark_failed_eras: defaults.mark_failed_eras,
            queue_capacity: defaults.queue_capacity,
        }
    }
}

/// Contents of the policy file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Scoring policy
    pub scoring: ScoringSection,
    /// Selection policy
    pub selection: SelectionSection,
    /// Orchestrator limits
    pub orchestrator: OrchestratorSection,
}

impl FileConfig {
    /// Read and parse a policy file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::parse(&text).map_err(|reason| ConfigError::Parse {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Parse policy TOML.
    pub fn parse(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|e| e.to_string())
    }

    /// Orchestrator configuration for this policy.
    pub fn to_orchestrator_config(&self, dry_run: bool) -> Result<OrchestratorConfig, ConfigError> {
        let percent = self.scoring.max_commission_percent;
        if !percent.is_finite() || percent < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "max_commission_percent must be a non-negative number, got {percent}"
            )));
        }

        let config = OrchestratorConfig {
            coefficients: self.scoring.coefficients,
            max_validators: self.selection.max_validators,
            max_commission: Some(Perbill::from_percent(percent)),
            era_window: self.scoring.era_window,
            include_current_era: self.scoring.include_current_era,
            tie_break: self.selection.tie_break,
            include_zero_scores: self.selection.include_zero_scores,
            exposure_concurrency: self.orchestrator.exposure_concurrency,
            mark_failed_eras: self.orchestrator.mark_failed_eras,
            queue_capacity: self.orchestrator.queue_capacity,
            dry_run,
        };
        config
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(config)
    }
}

/// Everything the client needs to start.
#[derive(Clone)]
pub struct RuntimeConfig {
    /// Chain endpoints
    pub gateway: GatewayConfig,
    /// Signing seed
    pub seed: String,
    /// Interval between ticks
    pub tick: Duration,
    /// Enabled trigger sources
    pub trigger: TriggerMode,
    /// Round policy
    pub orchestrator: OrchestratorConfig,
    /// Prometheus endpoint address
    pub metrics_addr: Option<SocketAddr>,
}

impl RuntimeConfig {
    /// Build from the command line, a resolved seed and the policy file if any.
    pub fn from_cli(cli: &Cli, seed: String) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::build(cli, seed, &file)
    }

    /// Build from already loaded parts.
    pub fn build(cli: &Cli, seed: String, file: &FileConfig) -> Result<Self, ConfigError> {
        if cli.tick == 0 {
            return Err(ConfigError::InvalidTick);
        }
        if seed.is_empty() {
            return Err(ConfigError::EmptySeed);
        }

        let gateway = GatewayConfig {
            relay_ws: cli.relay_ws.clone(),
            para_ws: cli.para_ws.clone(),
            ..GatewayConfig::default()
        };
        gateway.validate().map_err(ConfigError::Invalid)?;

        Ok(Self {
            gateway,
            seed,
            tick: Duration::from_millis(cli.tick),
            trigger: cli.trigger,
            orchestrator: file.to_orchestrator_config(cli.dry_run)?,
            metrics_addr: cli.metrics_addr,
        })
    }
}

impl std::fmt::Debug for RuntimeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeConfig")
            .field("gateway", &self.gateway)
            .field("tick", &self.tick)
            .field("trigger", &self.trigger)
            .field("orchestrator", &self.orchestrator)
            .field("metrics_addr", &self.metrics_addr)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["nominate-client"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults_without_file() {
        let config = RuntimeConfig::build(&cli(&[]), "//Eve".into(), &FileConfig::default()).unwrap();
        assert_eq!(config.tick, Duration::from_secs(120));
        assert_eq!(config.orchestrator, OrchestratorConfig::default());
        assert_eq!(config.gateway.relay_ws, "ws://127.0.0.1:9944");
    }

    #[test]
    fn test_zero_tick_rejected() {
        let result = RuntimeConfig::build(&cli(&["-t", "0"]), "//Eve".into(), &FileConfig::default());
        assert!(matches!(result, Err(ConfigError::InvalidTick)));
    }

    #[test]
    fn test_empty_seed_rejected() {
        let result = RuntimeConfig::build(&cli(&[]), String::new(), &FileConfig::default());
        assert!(matches!(result, Err(ConfigError::EmptySeed)));
    }

    #[test]
    fn test_non_websocket_endpoint_rejected() {
        let result = RuntimeConfig::build(
            &cli(&["-r", "http://127.0.0.1:9944"]),
            "//Eve".into(),
            &FileConfig::default(),
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_policy_file_sections() {
        let file = FileConfig::parse(
            r#"
            [scoring]
            era_window = 7
            max_commission_percent = 10.0
            coefficients = { commission_weight = 1.0, nomination_weight = 2.0, era_points_weight = 3.0 }

            [selection]
            max_validators = 24
            tie_break = "score-only"

            [orchestrator]
            mark_failed_eras = true
            "#,
        )
        .unwrap();

        let config = file.to_orchestrator_config(true).unwrap();
        assert_eq!(config.era_window, 7);
        assert_eq!(config.max_commission, Some(Perbill::from_percent(10.0)));
        assert_eq!(config.coefficients.unwrap().era_points_weight, 3.0);
        assert_eq!(config.max_validators, Some(24));
        assert_eq!(config.tie_break, TieBreak::ScoreOnly);
        assert!(config.mark_failed_eras);
        assert_eq!(config.queue_capacity, 16);
        assert!(config.dry_run);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(FileConfig::parse("[scoring]\nwindow = 3\n").is_err());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let file = FileConfig::parse("[selection]\nmax_validators = 0\n").unwrap();
        assert!(matches!(
            file.to_orchestrator_config(false),
            Err(ConfigError::Invalid(_))
        ));

        let file = FileConfig::parse("[scoring]\nmax_commission_percent = -1.0\n").unwrap();
        assert!(file.to_orchestrator_config(false).is_err());
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[scoring]\nera_window = 3").unwrap();

        let args = cli(&["--config", file.path().to_str().unwrap()]);
        let config = RuntimeConfig::from_cli(&args, "//Eve".into()).unwrap();
        assert_eq!(config.orchestrator.era_window, 3);
    }

    #[test]
    fn test_missing_file_reported() {
        let args = cli(&["--config", "/definitely/not/here.toml"]);
        assert!(matches!(
            RuntimeConfig::from_cli(&args, "//Eve".into()),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_debug_hides_seed() {
        let config =
            RuntimeConfig::build(&cli(&[]), "secret words".into(), &FileConfig::default()).unwrap();
        assert!(!format!("{config:?}").contains("secret"));
    }
}
