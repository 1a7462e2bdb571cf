//! # Round Flows
//!
//! The orchestrator driving full rounds against the in-memory chain.
//!
//! ## Flows Tested
//!
//! 1. **Era guard**: a duplicate era notification produces no second submission
//! 2. **Single flight**: a trigger during an in-flight round is dropped
//! 3. **Recovery**: a failed round submits nothing and later rounds still run
//! 4. **Fatal disconnect**: lost connectivity stops `run`
//! 5. **Nonce freshness**: one nonce query per submission, right before it

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use nc_01_chain_gateway::{GatewayError, InMemoryChain};
    use nc_03_round_orchestrator::{
        EraChangeTrigger, OrchestratorConfig, RoundError, RoundOrchestrator, RoundOutcome,
        RoundPhase, SkipReason, Trigger, TriggerQueue, TriggerSource,
    };

    use crate::fixtures::chain;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn orchestrator(chain: &Arc<InMemoryChain>) -> Arc<RoundOrchestrator> {
        Arc::new(
            RoundOrchestrator::new(OrchestratorConfig::for_testing(), chain.clone(), chain.clone())
                .unwrap(),
        )
    }

    async fn wait_for_subscription(chain: &InMemoryChain) {
        while chain.era_subscribers() == 0 {
            tokio::task::yield_now().await;
        }
    }

    async fn wait_for_submissions(chain: &InMemoryChain, count: usize) {
        while chain.submissions().len() < count {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    // =============================================================================
    // ERA GUARD
    // =============================================================================

    #[tokio::test]
    async fn test_duplicate_era_event_submits_once() {
        let chain = chain(5, 10);
        let orchestrator = orchestrator(&chain);

        let (queue, triggers) = TriggerQueue::bounded(8);
        let source = EraChangeTrigger::new(chain.clone());
        tokio::spawn(async move { source.run(queue).await });
        let runner = tokio::spawn(orchestrator.clone().run(triggers));

        wait_for_subscription(&chain).await;
        chain.emit_era(10);
        wait_for_submissions(&chain, 1).await;

        // same era again, then a later one
        chain.emit_era(10);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(chain.submissions().len(), 1);

        chain.advance_era(11);
        wait_for_submissions(&chain, 2).await;

        assert_eq!(orchestrator.last_processed_era(), Some(11));
        assert_eq!(orchestrator.rounds_started(), 2);
        assert!(!runner.is_finished());
    }

    #[tokio::test]
    async fn test_tick_and_era_change_share_the_guard() {
        let chain = chain(5, 10);
        let orchestrator = orchestrator(&chain);

        assert!(orchestrator.handle_trigger(Trigger::Tick(1)).await.is_done());
        let report = orchestrator.handle_trigger(Trigger::EraChanged(10)).await;

        assert_eq!(report.skipped(), Some(SkipReason::AlreadyProcessed));
        assert_eq!(chain.submissions().len(), 1);
    }

    // =============================================================================
    // SINGLE FLIGHT
    // =============================================================================

    #[tokio::test(start_paused = true)]
    async fn test_busy_trigger_is_dropped_not_queued() {
        let chain = chain(5, 10);
        chain.set_read_delay(Some(Duration::from_secs(10)));
        let orchestrator = orchestrator(&chain);

        let (queue, triggers) = TriggerQueue::bounded(8);
        let runner = tokio::spawn(orchestrator.clone().run(triggers));

        queue.push(Trigger::EraChanged(10));
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(orchestrator.phase(), RoundPhase::Gathering);

        // arrives mid-round for a new era; must not run afterwards
        chain.advance_era(11);
        queue.push(Trigger::EraChanged(11));
        tokio::time::sleep(Duration::from_secs(20)).await;

        assert_eq!(orchestrator.phase(), RoundPhase::Idle);
        assert_eq!(chain.submissions().len(), 1);
        assert_eq!(chain.stash_queries(), 1);
        assert_eq!(orchestrator.last_processed_era(), Some(10));

        drop(queue);
        assert_eq!(runner.await.unwrap(), Ok(()));
    }

    // =============================================================================
    // FAILURE AND RECOVERY
    // =============================================================================

    #[tokio::test]
    async fn test_failure_then_recovery() {
        let chain = chain(5, 10);
        let orchestrator = orchestrator(&chain);

        chain.fail_reads(Some(GatewayError::Unavailable("relay timeout".into())));
        let failed = orchestrator.handle_trigger(Trigger::Tick(1)).await;
        assert!(matches!(
            failed.outcome,
            RoundOutcome::Failed(RoundError::DataUnavailable(_))
        ));
        assert!(chain.submissions().is_empty());

        chain.fail_reads(None);
        chain.fail_submissions(Some(GatewayError::Rejected("pool full".into())));
        let rejected = orchestrator.handle_trigger(Trigger::Tick(2)).await;
        assert!(matches!(
            rejected.outcome,
            RoundOutcome::Failed(RoundError::SubmissionFailed(_))
        ));

        chain.fail_submissions(None);
        let done = orchestrator.handle_trigger(Trigger::Tick(3)).await;
        assert!(done.is_done());
        assert_eq!(chain.submissions().len(), 1);
        assert_eq!(orchestrator.rounds_started(), 3);
    }

    #[tokio::test]
    async fn test_bad_chain_policy_then_recovery() {
        let chain = chain(5, 10);
        let orchestrator = orchestrator(&chain);

        chain.update(|s| s.coefficients.era_points_weight = f64::NAN);
        let failed = orchestrator.handle_trigger(Trigger::EraChanged(10)).await;
        assert!(matches!(
            failed.outcome,
            RoundOutcome::Failed(RoundError::ConfigurationInvalid(_))
        ));
        assert!(chain.submissions().is_empty());
        assert_eq!(chain.nonce_queries(), 0);
        assert_eq!(orchestrator.last_processed_era(), None);

        chain.update(|s| s.coefficients.era_points_weight = 10.0);
        assert!(orchestrator.handle_trigger(Trigger::EraChanged(10)).await.is_done());
        assert_eq!(chain.submissions().len(), 1);
    }

    #[tokio::test]
    async fn test_disconnect_stops_run() {
        let chain = chain(5, 10);
        let orchestrator = orchestrator(&chain);

        let (queue, triggers) = TriggerQueue::bounded(8);
        chain.fail_submissions(Some(GatewayError::Disconnected("ws://para".into())));
        queue.push(Trigger::EraChanged(10));

        let result = orchestrator.run(triggers).await;
        assert_eq!(result, Err(RoundError::ConnectivityLost("ws://para".into())));
        assert!(chain.submissions().is_empty());
    }

    // =============================================================================
    // NONCES
    // =============================================================================

    #[tokio::test]
    async fn test_nonce_fetched_once_per_submission() {
        let chain = chain(5, 10);
        let orchestrator = orchestrator(&chain);

        for era in 10..13 {
            chain.advance_era(era);
            assert!(orchestrator
                .handle_trigger(Trigger::EraChanged(era))
                .await
                .is_done());
        }

        let nonces: Vec<_> = chain.submissions().iter().map(|s| s.nonce).collect();
        assert_eq!(nonces, vec![0, 1, 2]);
        assert_eq!(chain.nonce_queries(), 3);
    }

    #[tokio::test]
    async fn test_external_nonce_change_is_picked_up() {
        let chain = chain(5, 10);
        let orchestrator = orchestrator(&chain);

        orchestrator.handle_trigger(Trigger::EraChanged(10)).await;
        // another transaction from the same account lands between rounds
        chain.update(|state| {
            state.nonces.insert("//Eve".into(), 7);
        });
        chain.advance_era(11);
        let report = orchestrator.handle_trigger(Trigger::EraChanged(11)).await;

        match report.outcome {
            RoundOutcome::Done { nonce, .. } => assert_eq!(nonce, 7),
            other => panic!("unexpected outcome {other:?}"),
        }
    }
}
