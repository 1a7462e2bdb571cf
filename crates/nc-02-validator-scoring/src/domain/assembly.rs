//! Record assembly from a round snapshot.

use std::collections::{BTreeSet, HashSet};

use shared_types::{AccountId, EraIndex};
use tracing::warn;

use super::{RoundSnapshot, ScoringError, ValidatorRecord};

/// Build one unscored record per stash.
///
/// - Averages are window sums divided by the window length; an empty window gives 0.
/// - A stash without exposure has nominated stake 0.
/// - A stash without account info fails the whole snapshot.
/// - Later records with an already-seen account id are dropped.
pub fn assemble_records(snapshot: &RoundSnapshot) -> Result<Vec<ValidatorRecord>, ScoringError> {
    let window: BTreeSet<EraIndex> = snapshot.eras.iter().copied().collect();
    let window_len = window.len();

    let avg_era_points_of_all = average(
        snapshot
            .era_points
            .iter()
            .filter(|points| window.contains(&points.era))
            .map(|points| f64::from(points.total))
            .sum(),
        window_len,
    );

    let slashed: HashSet<&AccountId> = snapshot
        .slashes
        .iter()
        .filter(|(era, _)| window.contains(era))
        .flat_map(|(_, slashes)| slashes.iter())
        .filter(|(_, amount)| **amount > 0)
        .map(|(account, _)| account)
        .collect();

    let mut seen = HashSet::with_capacity(snapshot.stashes.len());
    let mut records = Vec::with_capacity(snapshot.stashes.len());

    for stash in &snapshot.stashes {
        let account = snapshot
            .accounts
            .get(stash)
            .ok_or_else(|| ScoringError::MissingAccount(stash.clone()))?;

        if !seen.insert(account.account_id.clone()) {
            warn!(
                account = %account.account_id,
                stash = %stash,
                "[nc-02] Dropping duplicate validator"
            );
            continue;
        }

        let own_points: f64 = snapshot
            .era_points
            .iter()
            .filter(|points| window.contains(&points.era))
            .filter_map(|points| points.validators.get(&account.account_id))
            .map(|p| f64::from(*p))
            .sum();

        records.push(ValidatorRecord {
            account_id: account.account_id.clone(),
            stash_id: stash.clone(),
            controller_id: account.controller_id.clone(),
            commission: account.commission,
            blocked: account.blocked,
            identity: snapshot.identities.get(stash).cloned().unwrap_or_default(),
            nominated_stake: snapshot
                .exposures
                .get(stash)
                .map(|e| e.nominated())
                .unwrap_or(0),
            avg_era_points: average(own_points, window_len),
            avg_era_points_of_all,
            was_slashed: slashed.contains(&account.account_id),
            score: None,
        });
    }

    Ok(records)
}

fn average(sum: f64, len: usize) -> f64 {
    if len == 0 {
        0.0
    } else {
        sum / len as f64
    }
}
