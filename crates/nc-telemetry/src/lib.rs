//! # Nominee Election Telemetry
//!
//! Logging and metrics shared by every subsystem.
//!
//! ## Components
//!
//! - **Logs**: `tracing-subscriber` with an env filter, pretty or JSON console
//!   output, and an optional error-only log file.
//! - **Metrics**: a Prometheus registry with the round metrics, exported as
//!   text by [`encode_metrics`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use nc_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let _guard = init_telemetry(TelemetryConfig::from_env())?;
//!     // rounds run here
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `NC_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `NC_JSON_LOGS` | `false` (`true` in containers) | JSON console output |
//! | `NC_ERROR_LOG` | `errors.log` | Error-only log file, empty to disable |
//! | `NC_CONSOLE_OUTPUT` | `true` | Console output |

#![warn(missing_docs)]

mod config;
pub mod metrics;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use metrics::{encode_metrics, register_metrics, HistogramTimer, MetricsHandle};
pub use tracing_setup::build_layers;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// Log filter directive could not be parsed
    #[error("Invalid log filter: {0}")]
    Filter(String),

    /// Error log file could not be opened
    #[error("Failed to open error log {path}: {reason}")]
    LogFile {
        /// Path of the log file
        path: String,
        /// Underlying I/O error
        reason: String,
    },

    /// A global subscriber is already installed
    #[error("Failed to install subscriber: {0}")]
    Subscriber(String),

    /// Metric registration or encoding failed
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),
}

/// Install the global subscriber and register metrics.
///
/// Hold the returned guard for the lifetime of the process.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let metrics = register_metrics()?;
    tracing_setup::init_tracing(&config)?;

    tracing::info!(
        service = %config.service_name,
        level = %config.log_level,
        json = config.json_logs,
        error_log = ?config.error_log,
        "Telemetry initialized"
    );

    Ok(TelemetryGuard { _metrics: metrics })
}

/// Keeps telemetry alive. Dropped on exit.
pub struct TelemetryGuard {
    _metrics: MetricsHandle,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("Shutting down telemetry...");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TelemetryError::LogFile {
            path: "/nope/errors.log".into(),
            reason: "denied".into(),
        };
        assert_eq!(err.to_string(), "Failed to open error log /nope/errors.log: denied");
    }
}
