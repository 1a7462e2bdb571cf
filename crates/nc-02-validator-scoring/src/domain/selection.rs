//! Ranking and capping of scored records.

use std::cmp::Ordering;

use shared_types::NominationEntry;

use super::ValidatorRecord;
use crate::config::{SelectionPolicy, TieBreak};

fn compare(a: &ValidatorRecord, b: &ValidatorRecord, tie_break: TieBreak) -> Ordering {
    let by_score = b.score_or_zero().cmp(&a.score_or_zero());
    match tie_break {
        TieBreak::ScoreOnly => by_score,
        TieBreak::LowerStakeFirst => by_score
            .then_with(|| a.nominated_stake.cmp(&b.nominated_stake))
            .then_with(|| a.account_id.cmp(&b.account_id)),
    }
}

/// Rank `records` and keep at most `policy.max_validators`.
///
/// Zero scores are dropped unless `include_zero_scores` is set, so the
/// output may be shorter than the cap or empty.
pub fn select_nominees(records: &[ValidatorRecord], policy: &SelectionPolicy) -> Vec<NominationEntry> {
    let mut candidates: Vec<&ValidatorRecord> = records
        .iter()
        .filter(|r| policy.include_zero_scores || r.score_or_zero() > 0)
        .collect();

    // stable: ScoreOnly keeps snapshot order among equal scores
    candidates.sort_by(|a, b| compare(a, b, policy.tie_break));

    candidates
        .into_iter()
        .take(policy.max_validators as usize)
        .map(ValidatorRecord::to_entry)
        .collect()
}

/// Applies a [`SelectionPolicy`] to scored records.
#[derive(Debug, Clone, Copy)]
pub struct Selector {
    policy: SelectionPolicy,
}

impl Selector {
    /// Create a selector. Fails on a zero cap.
    pub fn new(policy: SelectionPolicy) -> Result<Self, super::ScoringError> {
        policy.validate()?;
        Ok(Self { policy })
    }

    /// Policy in force.
    pub fn policy(&self) -> &SelectionPolicy {
        &self.policy
    }

    /// Ranked, capped nominees.
    pub fn select(&self, records: &[ValidatorRecord]) -> Vec<NominationEntry> {
        select_nominees(records, &self.policy)
    }
}
