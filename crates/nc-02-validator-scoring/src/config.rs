//! # Scoring Configuration
//!
//! Policy values for the scoring formula and the selector.

use serde::{Deserialize, Serialize};
use shared_types::{Balance, Perbill, ScoringCoefficients};

use crate::domain::ScoringError;

/// Default commission cap, in percent.
pub const DEFAULT_MAX_COMMISSION_PERCENT: f64 = 7.5;

/// Default observation window, in eras (about a week on Polkadot, a month of Kusama eras).
pub const DEFAULT_ERA_WINDOW: usize = 28;

/// Default number of validators to nominate.
pub const DEFAULT_MAX_VALIDATORS: u32 = 16;

/// Largest decimals value whose unit still fits in a `u128`.
const MAX_TOKEN_DECIMALS: u8 = 38;

/// Inputs of the scoring formula for one round.
///
/// Only constructible through [`ScoringPolicy::new`], so every instance has
/// valid coefficients and a representable token unit.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoringPolicy {
    coefficients: ScoringCoefficients,
    max_commission: Option<Perbill>,
    token_decimals: u8,
    unit: Balance,
}

impl ScoringPolicy {
    /// Validate and build a policy.
    pub fn new(
        coefficients: ScoringCoefficients,
        max_commission: Option<Perbill>,
        token_decimals: u8,
    ) -> Result<Self, ScoringError> {
        if !coefficients.is_valid() {
            return Err(ScoringError::InvalidCoefficients(format!("{:?}", coefficients)));
        }
        if token_decimals > MAX_TOKEN_DECIMALS {
            return Err(ScoringError::InvalidTokenDecimals(token_decimals));
        }

        Ok(Self {
            coefficients,
            max_commission,
            token_decimals,
            unit: 10u128.pow(u32::from(token_decimals)),
        })
    }

    /// Policy with default coefficients, the default commission cap and 12 decimals.
    pub fn for_testing() -> Self {
        Self {
            coefficients: ScoringCoefficients::default(),
            max_commission: Some(Perbill::from_percent(DEFAULT_MAX_COMMISSION_PERCENT)),
            token_decimals: 12,
            unit: 1_000_000_000_000,
        }
    }

    /// Formula weights.
    pub fn coefficients(&self) -> &ScoringCoefficients {
        &self.coefficients
    }

    /// Commission above which a validator scores 0. `None` disables the cap.
    pub fn max_commission(&self) -> Option<Perbill> {
        self.max_commission
    }

    /// Token decimals of the relay chain.
    pub fn token_decimals(&self) -> u8 {
        self.token_decimals
    }

    /// Base units per whole token.
    pub fn unit(&self) -> Balance {
        self.unit
    }
}

/// How validators with equal scores are ordered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// Lower nominated stake first, then account id.
    #[default]
    LowerStakeFirst,
    /// Keep snapshot order among equal scores.
    ScoreOnly,
}

/// Selector policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionPolicy {
    /// Maximum number of nominees.
    pub max_validators: u32,
    /// Ordering among equal scores.
    pub tie_break: TieBreak,
    /// Keep zero-scoring validators as filler when fewer than the cap score.
    pub include_zero_scores: bool,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            max_validators: DEFAULT_MAX_VALIDATORS,
            tie_break: TieBreak::LowerStakeFirst,
            include_zero_scores: false,
        }
    }
}

impl SelectionPolicy {
    /// Default policy with a different cap.
    pub fn with_max_validators(max_validators: u32) -> Self {
        Self {
            max_validators,
            ..Self::default()
        }
    }

    /// Reject a zero cap.
    pub fn validate(&self) -> Result<(), ScoringError> {
        if self.max_validators == 0 {
            return Err(ScoringError::InvalidMaxValidators(self.max_validators));
        }
        Ok(())
    }
}
