//! Telemetry configuration from environment variables.

use std::env;
use std::path::PathBuf;

/// Default error-only log file.
pub const DEFAULT_ERROR_LOG: &str = "errors.log";

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to startup logs
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error or full directives)
    pub log_level: String,

    /// Whether to enable console output
    pub console_output: bool,

    /// Whether console output is JSON
    pub json_logs: bool,

    /// File receiving ERROR events only. `None` disables it.
    pub error_log: Option<PathBuf>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "nominate-client".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
            error_log: Some(PathBuf::from(DEFAULT_ERROR_LOG)),
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// - `NC_LOG_LEVEL` or `RUST_LOG`: log level (default: info)
    /// - `NC_CONSOLE_OUTPUT`: console output (default: true)
    /// - `NC_JSON_LOGS`: JSON logs (default: false, true in containers)
    /// - `NC_ERROR_LOG`: error log path (default: errors.log, empty disables)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: "nominate-client".to_string(),

            log_level: env::var("NC_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            console_output: env::var("NC_CONSOLE_OUTPUT")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true),

            json_logs: env::var("NC_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(is_container),

            error_log: match env::var("NC_ERROR_LOG") {
                Ok(path) if path.is_empty() => None,
                Ok(path) => Some(PathBuf::from(path)),
                Err(_) => Some(PathBuf::from(DEFAULT_ERROR_LOG)),
            },
        }
    }

    /// Console-only configuration for tests.
    pub fn for_testing() -> Self {
        Self {
            log_level: "debug".to_string(),
            error_log: None,
            ..Self::default()
        }
    }
}
