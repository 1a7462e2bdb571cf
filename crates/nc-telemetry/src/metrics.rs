//! Prometheus metrics for the nominee election client.
//!
//! All metrics follow the naming convention: `nc_<metric>_<unit>`
//!
//! | Metric | Type | Labels |
//! |--------|------|--------|
//! | `nc_rounds_total` | counter | `outcome` |
//! | `nc_round_duration_seconds` | histogram | |
//! | `nc_validators_scored` | gauge | |
//! | `nc_validators_selected` | gauge | |
//! | `nc_last_processed_era` | gauge | |
//! | `nc_nominations_submitted_total` | counter | |
//! | `nc_round_errors_total` | counter | `kind` |
//! | `nc_triggers_skipped_total` | counter | `reason` |

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge,
    Opts, Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// Rounds by terminal outcome (done, failed, dry_run)
    pub static ref ROUNDS: IntCounterVec = IntCounterVec::new(
        Opts::new("nc_rounds_total", "Total nomination rounds by outcome"),
        &["outcome"]
    ).expect("metric creation failed");

    /// Round wall time from trigger to terminal phase
    pub static ref ROUND_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "nc_round_duration_seconds",
            "Time from round start to its terminal phase"
        ).buckets(exponential_buckets(0.05, 2.0, 12).expect("valid buckets"))
    ).expect("metric creation failed");

    /// Validators scored in the last round
    pub static ref VALIDATORS_SCORED: IntGauge = IntGauge::new(
        "nc_validators_scored",
        "Number of validators scored in the last round"
    ).expect("metric creation failed");

    /// Validators selected in the last round
    pub static ref VALIDATORS_SELECTED: IntGauge = IntGauge::new(
        "nc_validators_selected",
        "Number of validators selected in the last round"
    ).expect("metric creation failed");

    /// Last era a nomination was submitted for
    pub static ref LAST_PROCESSED_ERA: IntGauge = IntGauge::new(
        "nc_last_processed_era",
        "Era of the last processed round"
    ).expect("metric creation failed");

    /// Nominations accepted by the pool
    pub static ref NOMINATIONS_SUBMITTED: IntCounter = IntCounter::new(
        "nc_nominations_submitted_total",
        "Total nominations accepted by the transaction pool"
    ).expect("metric creation failed");

    /// Round errors by kind
    pub static ref ROUND_ERRORS: IntCounterVec = IntCounterVec::new(
        Opts::new("nc_round_errors_total", "Round errors by kind"),
        &["kind"]
    ).expect("metric creation failed");

    /// Triggers that did not start a round
    pub static ref TRIGGERS_SKIPPED: IntCounterVec = IntCounterVec::new(
        Opts::new("nc_triggers_skipped_total", "Triggers skipped by reason"),
        &["reason"]  // reason: busy/already_processed
    ).expect("metric creation failed");
}

/// Handle returned by [`register_metrics`].
pub struct MetricsHandle {
    _registry: Registry,
}

/// Register all metrics with the global registry. Safe to call more than once.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(ROUNDS.clone()),
        Box::new(ROUND_DURATION.clone()),
        Box::new(VALIDATORS_SCORED.clone()),
        Box::new(VALIDATORS_SELECTED.clone()),
        Box::new(LAST_PROCESSED_ERA.clone()),
        Box::new(NOMINATIONS_SUBMITTED.clone()),
        Box::new(ROUND_ERRORS.clone()),
        Box::new(TRIGGERS_SKIPPED.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle {
        _registry: REGISTRY.clone(),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}
