//! # Scoring Flows
//!
//! Chain data gathered through the gateway port, scored and selected.
//!
//! ```text
//! InMemoryChain ──gather_snapshot──→ RoundSnapshot ──evaluate_snapshot──→ Ranking
//! ```

#[cfg(test)]
mod tests {
    use nc_02_validator_scoring::{evaluate_snapshot, ScoringPolicy, SelectionPolicy};
    use nc_03_round_orchestrator::{gather_snapshot, OrchestratorConfig};
    use shared_types::{AccountId, EraSlashes};

    use crate::fixtures::{chain, scenario_a_chain};

    // =============================================================================
    // SCENARIOS
    // =============================================================================

    #[tokio::test]
    async fn test_scenario_a_scores_12595() {
        let chain = scenario_a_chain();
        let snapshot = gather_snapshot(chain.as_ref(), &OrchestratorConfig::default())
            .await
            .unwrap();
        assert_eq!(snapshot.eras, vec![1, 2]);

        let ranking = evaluate_snapshot(
            &snapshot,
            ScoringPolicy::for_testing(),
            SelectionPolicy::default(),
        )
        .unwrap();

        assert_eq!(ranking.selected.len(), 1);
        let alice = &ranking.selected[0];
        assert_eq!(alice.account_id, AccountId::from("alice"));
        assert_eq!(alice.display_name.as_deref(), Some("Alice"));
        assert_eq!(alice.stake, 1_000_000_000_000);
        assert_eq!(alice.score, 12595);
    }

    #[tokio::test]
    async fn test_scenario_b_blocked_scores_zero() {
        let chain = scenario_a_chain();
        chain.update(|state| {
            for account in state.accounts.values_mut() {
                account.blocked = true;
            }
        });

        let snapshot = gather_snapshot(chain.as_ref(), &OrchestratorConfig::default())
            .await
            .unwrap();
        let ranking = evaluate_snapshot(
            &snapshot,
            ScoringPolicy::for_testing(),
            SelectionPolicy::default(),
        )
        .unwrap();

        assert_eq!(ranking.records[0].score, Some(0));
        assert!(ranking.selected.is_empty());
    }

    #[tokio::test]
    async fn test_slash_in_window_zeroes_score() {
        let chain = scenario_a_chain();
        chain.update(|state| {
            state
                .slashes
                .insert(1, EraSlashes::from([(AccountId::from("alice"), 5)]));
        });

        let snapshot = gather_snapshot(chain.as_ref(), &OrchestratorConfig::default())
            .await
            .unwrap();
        let ranking = evaluate_snapshot(
            &snapshot,
            ScoringPolicy::for_testing(),
            SelectionPolicy::default(),
        )
        .unwrap();
        assert_eq!(ranking.records[0].score, Some(0));
    }

    #[tokio::test]
    async fn test_slash_outside_window_is_ignored() {
        let chain = scenario_a_chain();
        chain.update(|state| {
            state
                .slashes
                .insert(1, EraSlashes::from([(AccountId::from("alice"), 5)]));
        });
        let config = OrchestratorConfig {
            era_window: 1,
            ..OrchestratorConfig::default()
        };

        let snapshot = gather_snapshot(chain.as_ref(), &config).await.unwrap();
        assert_eq!(snapshot.eras, vec![2]);

        let ranking = evaluate_snapshot(
            &snapshot,
            ScoringPolicy::for_testing(),
            SelectionPolicy::default(),
        )
        .unwrap();
        assert_eq!(ranking.records[0].score, Some(12595));
    }

    // =============================================================================
    // SELECTION
    // =============================================================================

    #[tokio::test]
    async fn test_twenty_validators_give_top_sixteen() {
        let chain = chain(20, 8);
        let snapshot = gather_snapshot(chain.as_ref(), &OrchestratorConfig::for_testing())
            .await
            .unwrap();
        let ranking = evaluate_snapshot(
            &snapshot,
            ScoringPolicy::for_testing(),
            SelectionPolicy::default(),
        )
        .unwrap();

        assert_eq!(ranking.positive_count(), 20);
        assert_eq!(ranking.selected.len(), 16);

        // fixture scores fall with stake, so the top 16 are v00..v15
        let expected: Vec<_> = (0..16).map(|i| AccountId::new(format!("v{i:02}"))).collect();
        let targets: Vec<_> = ranking.selected.iter().map(|e| e.account_id.clone()).collect();
        assert_eq!(targets, expected);

        assert!(ranking
            .selected
            .windows(2)
            .all(|pair| pair[0].score > pair[1].score));

        let best_dropped = ranking
            .records
            .iter()
            .filter(|r| !targets.contains(&r.account_id))
            .map(|r| r.score_or_zero())
            .max()
            .unwrap();
        assert!(ranking.selected.iter().all(|e| e.score > best_dropped));
    }

    #[tokio::test]
    async fn test_identical_chain_state_gives_identical_bytes() {
        let first_chain = chain(20, 8);
        let second_chain = chain(20, 8);
        let config = OrchestratorConfig::for_testing();

        let mut outputs = Vec::new();
        for chain in [first_chain, second_chain] {
            let snapshot = gather_snapshot(chain.as_ref(), &config).await.unwrap();
            let ranking = evaluate_snapshot(
                &snapshot,
                ScoringPolicy::for_testing(),
                SelectionPolicy::default(),
            )
            .unwrap();
            outputs.push(serde_json::to_vec(&ranking.to_call(&snapshot)).unwrap());
        }

        assert_eq!(outputs[0], outputs[1]);
    }
}
