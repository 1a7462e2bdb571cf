//! Per-validator scoring input.

use serde::{Deserialize, Serialize};
use shared_types::{AccountId, Balance, NominationEntry, Perbill, Score, ValidatorIdentity};

/// One validator in one round.
///
/// Rebuilt from the snapshot every round. `score` is `None` until the
/// [`ScoreEngine`](crate::ScoreEngine) has run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatorRecord {
    /// Account used for era points and slashes.
    pub account_id: AccountId,
    /// Stash the validator was listed under.
    pub stash_id: AccountId,
    /// Controller account.
    pub controller_id: AccountId,
    /// Declared commission.
    pub commission: Perbill,
    /// Refuses new nominations.
    pub blocked: bool,
    /// On-chain identity.
    pub identity: ValidatorIdentity,
    /// Total minus own stake, in base units.
    pub nominated_stake: Balance,
    /// Average points of this validator over the window.
    pub avg_era_points: f64,
    /// Average total points of the whole set over the window. Same for every record of a round.
    pub avg_era_points_of_all: f64,
    /// Any non-zero slash within the window.
    pub was_slashed: bool,
    /// Computed score.
    pub score: Option<Score>,
}

impl ValidatorRecord {
    /// `1` for a named, unblocked validator, `0` otherwise.
    pub fn reputation(&self) -> u8 {
        let named = self.identity.has_identity && self.identity.display_name.is_some();
        u8::from(named && !self.blocked)
    }

    /// Commission as a fraction in `[0, 1]`.
    pub fn commission_fraction(&self) -> f64 {
        self.commission.as_fraction()
    }

    /// Score, treating unscored as zero.
    pub fn score_or_zero(&self) -> Score {
        self.score.unwrap_or(0)
    }

    /// Output entry for this record.
    pub fn to_entry(&self) -> NominationEntry {
        NominationEntry {
            display_name: self.identity.display_name.clone(),
            account_id: self.account_id.clone(),
            stake: self.nominated_stake,
            score: self.score_or_zero(),
        }
    }

    /// Minimal record for tests.
    pub fn for_testing(account: &str) -> Self {
        let account_id = AccountId::from(account);
        Self {
            stash_id: account_id.clone(),
            controller_id: account_id.clone(),
            account_id,
            commission: Perbill::from_percent(5.0),
            blocked: false,
            identity: ValidatorIdentity::named(account),
            nominated_stake: 1_000_000_000_000,
            avg_era_points: 500.0,
            avg_era_points_of_all: 400.0,
            was_slashed: false,
            score: None,
        }
    }
}
