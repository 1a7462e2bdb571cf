//! Raw round inputs.

use serde::{Deserialize, Serialize};
use shared_types::{
    AccountId, DerivativeIndex, EraIndex, EraPoints, EraSlashes, Exposure, ScoringCoefficients,
    ValidatorAccount, ValidatorIdentity,
};
use std::collections::BTreeMap;

/// Everything one round reads from the chain, gathered before scoring.
///
/// Maps are ordered so a serialized snapshot is byte-stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundSnapshot {
    /// Active validator stashes, in chain order.
    pub stashes: Vec<AccountId>,
    /// Identity per stash. Missing entries mean no identity.
    pub identities: BTreeMap<AccountId, ValidatorIdentity>,
    /// Staking account info per stash.
    pub accounts: BTreeMap<AccountId, ValidatorAccount>,
    /// Exposure per stash. Missing entries mean nothing nominated.
    pub exposures: BTreeMap<AccountId, Exposure>,
    /// Observation window, ascending.
    pub eras: Vec<EraIndex>,
    /// Points for the eras of the window.
    pub era_points: Vec<EraPoints>,
    /// Slashes per era of the window.
    pub slashes: BTreeMap<EraIndex, EraSlashes>,
    /// Coefficients in force for this round.
    pub coefficients: ScoringCoefficients,
    /// Validator cap in force for this round.
    pub max_validators: u32,
    /// Relay token decimals.
    pub token_decimals: u8,
    /// Liquid-staking pool being nominated for.
    pub derivative_index: Option<DerivativeIndex>,
}

impl RoundSnapshot {
    /// Number of stashes listed.
    pub fn validator_count(&self) -> usize {
        self.stashes.len()
    }
}
