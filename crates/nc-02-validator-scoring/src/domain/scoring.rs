//! # Score Formula
//!
//! ```text
//! score = round(r × (cw × (1 − c) + nw × 1/n × ew × avg/avg_of_all) × sr)
//! ```
//!
//! All intermediate values are `f64`; rounding is half away from zero and the
//! result saturates into `u128`.

use shared_types::Score;

use super::ValidatorRecord;
use crate::config::ScoringPolicy;

/// `avg / avg_of_all`, or 0 when the set earned nothing.
pub fn era_points_ratio(avg_era_points: f64, avg_era_points_of_all: f64) -> f64 {
    if !avg_era_points_of_all.is_finite() || avg_era_points_of_all <= 0.0 {
        return 0.0;
    }
    avg_era_points / avg_era_points_of_all
}

/// Score one record under `policy`.
pub fn score_validator(record: &ValidatorRecord, policy: &ScoringPolicy) -> Score {
    let nomination = record.nominated_stake / policy.unit();
    if nomination == 0 {
        return 0;
    }

    if let Some(max) = policy.max_commission() {
        if record.commission > max {
            return 0;
        }
    }

    if record.was_slashed {
        return 0;
    }

    let coefficients = policy.coefficients();
    let reputation = f64::from(record.reputation());

    let commission_factor = coefficients.commission_weight * (1.0 - record.commission_fraction());
    let nomination_factor = coefficients.nomination_weight
        * (1.0 / nomination as f64)
        * coefficients.era_points_weight
        * era_points_ratio(record.avg_era_points, record.avg_era_points_of_all);

    to_score(reputation * (commission_factor + nomination_factor))
}

fn to_score(value: f64) -> Score {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    // `as` saturates at u128::MAX
    value.round() as Score
}

/// Applies the score formula to records.
#[derive(Debug, Clone)]
pub struct ScoreEngine {
    policy: ScoringPolicy,
}

impl ScoreEngine {
    /// Create an engine for one round's policy.
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    /// Policy in force.
    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Score a single record without storing the result.
    pub fn score(&self, record: &ValidatorRecord) -> Score {
        score_validator(record, &self.policy)
    }

    /// Store a score in every record. Returns how many scored above zero.
    pub fn score_all(&self, records: &mut [ValidatorRecord]) -> usize {
        let mut positive = 0;
        for record in records.iter_mut() {
            let score = self.score(record);
            if score > 0 {
                positive += 1;
            }
            record.score = Some(score);
        }
        positive
    }
}
