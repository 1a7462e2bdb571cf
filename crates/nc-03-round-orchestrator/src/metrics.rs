//! # Orchestrator Metrics
//!
//! Records round metrics into the `nc-telemetry` registry.
//!
//! Enable with the `metrics` feature:
//! ```toml
//! nc-03-round-orchestrator = { path = "...", features = ["metrics"] }
//! ```

#[cfg(feature = "metrics")]
use nc_telemetry::metrics::{
    LAST_PROCESSED_ERA, NOMINATIONS_SUBMITTED, ROUNDS, ROUND_DURATION, ROUND_ERRORS,
    TRIGGERS_SKIPPED, VALIDATORS_SCORED, VALIDATORS_SELECTED,
};

// =============================================================================
// METRIC RECORDING FUNCTIONS
// =============================================================================

/// Record a finished round
#[cfg(feature = "metrics")]
pub fn record_round(outcome: &str, duration_secs: f64) {
    ROUNDS.with_label_values(&[outcome]).inc();
    ROUND_DURATION.observe(duration_secs);
}

/// Record a round error by kind
#[cfg(feature = "metrics")]
pub fn record_round_error(kind: &str) {
    ROUND_ERRORS.with_label_values(&[kind]).inc();
}

/// Record a skipped trigger
#[cfg(feature = "metrics")]
pub fn record_trigger_skipped(reason: &str) {
    TRIGGERS_SKIPPED.with_label_values(&[reason]).inc();
}

/// Validators scored in the current round
#[cfg(feature = "metrics")]
pub fn set_validators_scored(count: usize) {
    VALIDATORS_SCORED.set(count as i64);
}

/// Validators selected in the current round
#[cfg(feature = "metrics")]
pub fn set_validators_selected(count: usize) {
    VALIDATORS_SELECTED.set(count as i64);
}

/// Latest processed era
#[cfg(feature = "metrics")]
pub fn set_last_processed_era(era: u32) {
    LAST_PROCESSED_ERA.set(i64::from(era));
}

/// Nomination accepted by the pool
#[cfg(feature = "metrics")]
pub fn record_nomination_submitted() {
    NOMINATIONS_SUBMITTED.inc();
}

// =============================================================================
// NO-OP IMPLEMENTATIONS (when metrics feature disabled)
// =============================================================================

#[cfg(not(feature = "metrics"))]
pub fn record_round(_outcome: &str, _duration_secs: f64) {}

#[cfg(not(feature = "metrics"))]
pub fn record_round_error(_kind: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_trigger_skipped(_reason: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn set_validators_scored(_count: usize) {}

#[cfg(not(feature = "metrics"))]
pub fn set_validators_selected(_count: usize) {}

#[cfg(not(feature = "metrics"))]
pub fn set_last_processed_era(_era: u32) {}

#[cfg(not(feature = "metrics"))]
pub fn record_nomination_submitted() {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_never_panics() {
        record_round("done", 0.5);
        record_round_error("data_unavailable");
        record_trigger_skipped("busy");
        set_validators_scored(20);
        set_validators_selected(16);
        set_last_processed_era(42);
        record_nomination_submitted();
    }
}
