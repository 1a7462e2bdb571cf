//! # Orchestrator Configuration
//!
//! Round policy. `None` for coefficients or the validator cap means the value
//! is read from the para chain every round.

use nc_02_validator_scoring::{
    TieBreak, DEFAULT_ERA_WINDOW, DEFAULT_MAX_COMMISSION_PERCENT,
};
use shared_types::{Perbill, ScoringCoefficients};

use crate::error::RoundError;

/// Round orchestrator configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct OrchestratorConfig {
    /// Static coefficients; `None` reads them on-chain.
    pub coefficients: Option<ScoringCoefficients>,
    /// Static validator cap; `None` reads it on-chain.
    pub max_validators: Option<u32>,
    /// Commission cap; `None` disables it.
    pub max_commission: Option<Perbill>,
    /// Eras in the observation window.
    pub era_window: usize,
    /// Count the active era as historic.
    pub include_current_era: bool,
    /// Ordering among equal scores.
    pub tie_break: TieBreak,
    /// Pad the selection with zero scores.
    pub include_zero_scores: bool,
    /// Exposure queries in flight at once.
    pub exposure_concurrency: usize,
    /// Also mark an era processed when its round fails.
    pub mark_failed_eras: bool,
    /// Capacity of the trigger queue.
    pub queue_capacity: usize,
    /// Build nominations without submitting them.
    pub dry_run: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            coefficients: None,
            max_validators: None,
            max_commission: Some(Perbill::from_percent(DEFAULT_MAX_COMMISSION_PERCENT)),
            era_window: DEFAULT_ERA_WINDOW,
            include_current_era: false,
            tie_break: TieBreak::default(),
            include_zero_scores: false,
            exposure_concurrency: 16,
            mark_failed_eras: false,
            queue_capacity: 16,
            dry_run: false,
        }
    }
}

impl OrchestratorConfig {
    /// On-chain policy with a small window.
    pub fn for_testing() -> Self {
        Self {
            era_window: 4,
            exposure_concurrency: 4,
            queue_capacity: 8,
            ..Self::default()
        }
    }

    /// Reject values no round could run with.
    pub fn validate(&self) -> Result<(), RoundError> {
        if self.era_window == 0 {
            return Err(invalid("era_window must be positive"));
        }
        if self.exposure_concurrency == 0 {
            return Err(invalid("exposure_concurrency must be positive"));
        }
        if self.queue_capacity == 0 {
            return Err(invalid("queue_capacity must be positive"));
        }
        if self.max_validators == Some(0) {
            return Err(invalid("max_validators must be positive"));
        }
        if let Some(coefficients) = &self.coefficients {
            if !coefficients.is_valid() {
                return Err(invalid(&format!("coefficients {:?}", coefficients)));
            }
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> RoundError {
    RoundError::ConfigurationInvalid(msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.era_window, 28);
        assert_eq!(config.max_commission, Some(Perbill::from_parts(75_000_000)));
        assert!(!config.mark_failed_eras);
        assert!(config.validate().is_ok());
        assert!(OrchestratorConfig::for_testing().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_values() {
        for config in [
            OrchestratorConfig {
                era_window: 0,
                ..Default::default()
            },
            OrchestratorConfig {
                exposure_concurrency: 0,
                ..Default::default()
            },
            OrchestratorConfig {
                max_validators: Some(0),
                ..Default::default()
            },
        ] {
            assert!(matches!(
                config.validate(),
                Err(RoundError::ConfigurationInvalid(_))
            ));
        }
    }

    #[test]
    fn test_rejects_negative_static_coefficients() {
        let config = OrchestratorConfig {
            coefficients: Some(ScoringCoefficients {
                nomination_weight: -5.0,
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
