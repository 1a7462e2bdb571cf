//! Subscriber setup.
//!
//! Console events pass the env filter; the error file receives ERROR events
//! regardless of it.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

use crate::{TelemetryConfig, TelemetryError};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Layers for `config`, ready to stack on a [`Registry`].
pub fn build_layers(config: &TelemetryConfig) -> Result<Vec<BoxedLayer>, TelemetryError> {
    let mut layers: Vec<BoxedLayer> = Vec::with_capacity(2);

    if config.console_output {
        let env_filter = EnvFilter::try_new(&config.log_level)
            .map_err(|e| TelemetryError::Filter(e.to_string()))?;

        if config.json_logs {
            // JSON output for containers/production
            layers.push(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_filter(env_filter)
                    .boxed(),
            );
        } else {
            // Pretty output for development
            layers.push(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_ansi(true)
                    .with_filter(env_filter)
                    .boxed(),
            );
        }
    }

    if let Some(path) = &config.error_log {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| TelemetryError::LogFile {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        layers.push(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true)
                .with_filter(LevelFilter::ERROR)
                .boxed(),
        );
    }

    Ok(layers)
}

/// Install the global subscriber.
pub(crate) fn init_tracing(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    tracing_subscriber::registry()
        .with(build_layers(config)?)
        .try_init()
        .map_err(|e| TelemetryError::Subscriber(e.to_string()))
}
