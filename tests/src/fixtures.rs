//! Chain fixtures shared by the integration flows and benchmarks.

use std::sync::Arc;

use nc_01_chain_gateway::{ChainState, InMemoryChain};
use nc_02_validator_scoring::RoundSnapshot;
use shared_types::{AccountId, EraIndex, EraPoints, Exposure, Perbill, ValidatorAccount, ValidatorIdentity};

/// Scenario A: one named validator, 5% commission, 1 token nominated,
/// 500 points per era against an era total of 400. Scores 12595.
pub const SCENARIO_A: &str = r#"{
    "stashes": ["alice-stash"],
    "identities": { "alice-stash": { "hasIdentity": true, "displayName": "Alice" } },
    "accounts": {
        "alice-stash": {
            "accountId": "alice",
            "controllerId": "alice-ctrl",
            "commission": 50000000,
            "blocked": false
        }
    },
    "exposures": { "alice-stash": { "total": "2000000000000", "own": "1000000000000" } },
    "era_points": {
        "1": { "era": 1, "total": 400, "validators": { "alice": 500 } },
        "2": { "era": 2, "total": 400, "validators": { "alice": 500 } }
    },
    "current_era": 3,
    "token_decimals": 12,
    "derivative_index": 0
}"#;

/// Chain from [`SCENARIO_A`].
pub fn scenario_a_chain() -> Arc<InMemoryChain> {
    let state = ChainState::from_json(SCENARIO_A).expect("scenario A fixture parses");
    Arc::new(InMemoryChain::new(state, AccountId::from("//Eve")))
}

/// Chain with `validators` validators of distinct scores over eras `1..=eras`.
pub fn chain(validators: usize, eras: EraIndex) -> Arc<InMemoryChain> {
    Arc::new(InMemoryChain::for_testing(validators, eras))
}

/// Snapshot of `validators` validators with spread commissions, stakes and
/// points over a `window`-era window. Used by the benchmarks.
pub fn large_snapshot(validators: usize, window: EraIndex) -> RoundSnapshot {
    let unit = 1_000_000_000_000u128;
    let mut snapshot = RoundSnapshot {
        eras: (1..=window).collect(),
        token_decimals: 12,
        max_validators: 16,
        derivative_index: Some(0),
        ..Default::default()
    };

    for i in 0..validators {
        let id = AccountId::new(format!("validator-{i:05}"));
        snapshot.stashes.push(id.clone());
        snapshot.accounts.insert(
            id.clone(),
            ValidatorAccount {
                account_id: id.clone(),
                controller_id: id.clone(),
                commission: Perbill::from_parts((i as u32 % 100) * 1_000_000),
                blocked: i % 17 == 0,
            },
        );
        if i % 5 != 0 {
            snapshot
                .identities
                .insert(id.clone(), ValidatorIdentity::named(format!("V{i}")));
        }
        snapshot.exposures.insert(
            id,
            Exposure {
                total: (i as u128 % 1000 + 2) * unit,
                own: unit,
            },
        );
    }

    for era in 1..=window {
        let validators = snapshot
            .stashes
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), 20 + ((i as u32 * 7 + era) % 80)))
            .collect();
        let mut points = EraPoints {
            era,
            total: 0,
            validators,
        };
        points.total = points.validators.values().sum();
        snapshot.era_points.push(points);
    }
    snapshot
}
