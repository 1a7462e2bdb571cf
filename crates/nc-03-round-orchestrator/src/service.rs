//! # Round Orchestrator Service
//!
//! Drains the trigger queue and runs at most one round at a time.
//!
//! ## Round Flow
//!
//! ```text
//! Trigger ──try_lock──→ resolve era ──guard──→ Gathering → Scoring → Selecting
//!    │ busy                  │ processed                                 │
//!    ↓                       ↓                               dry run ←──┤
//! Skipped(Busy)   Skipped(AlreadyProcessed)                             ↓
//!                                                  Submitting (nonce → submit)
//!                                                             │
//!                                                       Done | Failed
//! ```
//!
//! Rounds run as spawned tasks that own the round lock and report back over
//! an unbounded channel. A fatal report (lost connectivity) ends [`RoundOrchestrator::run`].

use std::sync::Arc;
use std::time::Instant;

use nc_01_chain_gateway::{ChainDataGateway, TxSubmitter};
use nc_02_validator_scoring::{
    assemble_records, ScoreEngine, ScoringPolicy, SelectionPolicy, Selector,
};
use parking_lot::Mutex;
use shared_types::{EraIndex, NominationCall};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::config::OrchestratorConfig;
use crate::domain::{
    EraGuard, RoundId, RoundOutcome, RoundPhase, RoundReport, SkipReason, Trigger,
};
use crate::error::{Result, RoundError};
use crate::gather::gather_snapshot;
use crate::metrics;

/// Cross-round state.
#[derive(Debug, Default)]
struct RoundState {
    guard: EraGuard,
    rounds_started: u64,
    phase: RoundPhase,
}

/// Runs nomination rounds in response to triggers.
pub struct RoundOrchestrator {
    config: OrchestratorConfig,
    gateway: Arc<dyn ChainDataGateway>,
    submitter: Arc<dyn TxSubmitter>,
    round_lock: Arc<tokio::sync::Mutex<()>>,
    state: Mutex<RoundState>,
}

impl RoundOrchestrator {
    /// Create an orchestrator. Fails on an unusable configuration.
    pub fn new(
        config: OrchestratorConfig,
        gateway: Arc<dyn ChainDataGateway>,
        submitter: Arc<dyn TxSubmitter>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            gateway,
            submitter,
            round_lock: Arc::new(tokio::sync::Mutex::new(())),
            state: Mutex::new(RoundState::default()),
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Phase of the current round, `Idle` between rounds.
    pub fn phase(&self) -> RoundPhase {
        self.state.lock().phase
    }

    /// Latest era whose round completed.
    pub fn last_processed_era(&self) -> Option<EraIndex> {
        self.state.lock().guard.last_processed()
    }

    /// Rounds started so far.
    pub fn rounds_started(&self) -> u64 {
        self.state.lock().rounds_started
    }

    /// Consume triggers until the queue closes or a round loses connectivity.
    ///
    /// Returns `Ok` after the queue closes and the in-flight round, if any,
    /// has reported.
    pub async fn run(self: Arc<Self>, mut triggers: mpsc::Receiver<Trigger>) -> Result<()> {
        let (report_tx, mut report_rx) = mpsc::unbounded_channel::<RoundReport>();

        info!(
            dry_run = self.config.dry_run,
            era_window = self.config.era_window,
            "[nc-03] Round orchestrator started"
        );

        loop {
            tokio::select! {
                biased;

                Some(report) = report_rx.recv() => {
                    if let Some(err) = report.fatal_error() {
                        error!(error = %err, "[nc-03] Fatal round error, stopping");
                        return Err(err.clone());
                    }
                }
                trigger = triggers.recv() => match trigger {
                    Some(trigger) => self.dispatch(trigger, &report_tx),
                    None => break,
                },
            }
        }

        // in-flight rounds hold the remaining senders
        drop(report_tx);
        while let Some(report) = report_rx.recv().await {
            if let Some(err) = report.fatal_error() {
                return Err(err.clone());
            }
        }

        info!("[nc-03] Trigger queue closed, orchestrator stopped");
        Ok(())
    }

    /// Handle one trigger inline, waiting for the round to finish.
    pub async fn handle_trigger(&self, trigger: Trigger) -> RoundReport {
        let started = Instant::now();
        match self.round_lock.try_lock() {
            Ok(_permit) => self.execute_round(trigger, started).await,
            Err(_) => self.skip(trigger, SkipReason::Busy, started),
        }
    }

    fn dispatch(self: &Arc<Self>, trigger: Trigger, reports: &mpsc::UnboundedSender<RoundReport>) {
        let started = Instant::now();
        let permit = match Arc::clone(&self.round_lock).try_lock_owned() {
            Ok(permit) => permit,
            Err(_) => {
                self.skip(trigger, SkipReason::Busy, started);
                return;
            }
        };

        let this = Arc::clone(self);
        let reports = reports.clone();
        tokio::spawn(async move {
            let report = this.execute_round(trigger, started).await;
            drop(permit);
            // receiver gone means run() already returned
            let _ = reports.send(report);
        });
    }

    async fn execute_round(&self, trigger: Trigger, started: Instant) -> RoundReport {
        let era = match trigger.era() {
            Some(era) => Some(era),
            None => match self.gateway.current_era().await {
                Ok(era) => era,
                Err(err) => {
                    let round = self.begin_round(trigger, None);
                    let err = RoundError::from_gateway(err, RoundPhase::Gathering);
                    return self.conclude(round, trigger, RoundOutcome::Failed(err), started);
                }
            },
        };

        if let Some(era) = era {
            if self.state.lock().guard.is_processed(era) {
                return self.skip(trigger, SkipReason::AlreadyProcessed, started);
            }
        }

        let round = self.begin_round(trigger, era);
        let outcome = match self.run_phases(&round).await {
            Ok(outcome) => outcome,
            Err(err) => RoundOutcome::Failed(err),
        };
        self.conclude(round, trigger, outcome, started)
    }

    async fn run_phases(&self, round: &RoundId) -> Result<RoundOutcome> {
        let snapshot = gather_snapshot(self.gateway.as_ref(), &self.config)
            .await
            .map_err(|e| RoundError::from_gateway(e, RoundPhase::Gathering))?;

        self.transition(round, RoundPhase::Scoring);
        let scoring = ScoringPolicy::new(
            snapshot.coefficients,
            self.config.max_commission,
            snapshot.token_decimals,
        )?;
        let selector = Selector::new(SelectionPolicy {
            max_validators: snapshot.max_validators,
            tie_break: self.config.tie_break,
            include_zero_scores: self.config.include_zero_scores,
        })?;

        let mut records = assemble_records(&snapshot)?;
        let positive = ScoreEngine::new(scoring).score_all(&mut records);
        metrics::set_validators_scored(records.len());
        debug!(
            round = %round,
            scored = records.len(),
            positive,
            "[nc-03] Validators scored"
        );

        self.transition(round, RoundPhase::Selecting);
        let entries = selector.select(&records);
        metrics::set_validators_selected(entries.len());
        if entries.is_empty() {
            return Err(RoundError::NoEligibleValidators {
                scored: records.len(),
            });
        }

        let call = NominationCall {
            derivative_index: snapshot.derivative_index,
            entries,
        };
        for (rank, entry) in call.entries.iter().enumerate() {
            debug!(
                rank = rank + 1,
                account = %entry.account_id,
                name = entry.display_name.as_deref().unwrap_or("-"),
                stake = %entry.stake,
                score = %entry.score,
                "[nc-03] Nominee"
            );
        }

        if self.config.dry_run {
            info!(round = %round, nominees = call.len(), "[nc-03] Dry run, not submitting");
            return Ok(RoundOutcome::DryRun { call });
        }

        self.transition(round, RoundPhase::Submitting);
        let signer = self.submitter.signer();
        let nonce = self
            .submitter
            .account_next_index(&signer)
            .await
            .map_err(|e| RoundError::from_gateway(e, RoundPhase::Submitting))?;
        let tx_hash = self
            .submitter
            .submit_nomination(&call, nonce)
            .await
            .map_err(|e| RoundError::from_gateway(e, RoundPhase::Submitting))?;

        Ok(RoundOutcome::Done {
            tx_hash,
            nonce,
            nominees: call.len(),
        })
    }

    fn begin_round(&self, trigger: Trigger, era: Option<EraIndex>) -> RoundId {
        let round = {
            let mut state = self.state.lock();
            state.rounds_started += 1;
            RoundId {
                number: state.rounds_started,
                era,
                trigger: trigger.kind(),
            }
        };
        info!(round = %round, "[nc-03] Round started");
        self.transition(&round, RoundPhase::Gathering);
        round
    }

    fn transition(&self, round: &RoundId, next: RoundPhase) {
        let mut state = self.state.lock();
        let current = state.phase;
        if !current.can_transition_to(next) {
            warn!(
                round = %round,
                from = %current,
                to = %next,
                "[nc-03] Unexpected phase transition"
            );
        }
        state.phase = next;
        debug!(round = %round, from = %current, to = %next, "[nc-03] Phase changed");
    }

    fn conclude(
        &self,
        round: RoundId,
        trigger: Trigger,
        outcome: RoundOutcome,
        started: Instant,
    ) -> RoundReport {
        let elapsed = started.elapsed();

        match &outcome {
            RoundOutcome::Done {
                tx_hash,
                nonce,
                nominees,
            } => {
                self.transition(&round, RoundPhase::Done);
                self.mark_era(&round);
                metrics::record_nomination_submitted();
                info!(
                    round = %round,
                    tx_hash = %tx_hash,
                    nonce,
                    nominees,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "[nc-03] Nomination submitted"
                );
            }
            RoundOutcome::DryRun { call } => {
                self.transition(&round, RoundPhase::Done);
                info!(round = %round, nominees = call.len(), "[nc-03] Dry run complete");
            }
            RoundOutcome::Failed(err) => {
                self.transition(&round, RoundPhase::Failed);
                if self.config.mark_failed_eras {
                    self.mark_era(&round);
                }
                metrics::record_round_error(err.kind());
                match err {
                    RoundError::NoEligibleValidators { .. } => {
                        warn!(round = %round, error = %err, "[nc-03] Round failed")
                    }
                    _ => error!(round = %round, error = %err, kind = err.kind(), "[nc-03] Round failed"),
                }
            }
            RoundOutcome::Skipped(_) => {}
        }

        metrics::record_round(outcome.as_str(), elapsed.as_secs_f64());
        self.transition(&round, RoundPhase::Idle);

        RoundReport {
            round: Some(round),
            trigger,
            outcome,
            elapsed,
        }
    }

    fn mark_era(&self, round: &RoundId) {
        if let Some(era) = round.era {
            if self.state.lock().guard.mark(era) {
                metrics::set_last_processed_era(era);
            }
        }
    }

    fn skip(&self, trigger: Trigger, reason: SkipReason, started: Instant) -> RoundReport {
        debug!(trigger = %trigger, reason = reason.as_str(), "[nc-03] Trigger skipped");
        metrics::record_trigger_skipped(reason.as_str());
        RoundReport {
            round: None,
            trigger,
            outcome: RoundOutcome::Skipped(reason),
            elapsed: started.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nc_01_chain_gateway::{GatewayError, InMemoryChain};
    use shared_types::{AccountId, Perbill};
    use std::time::Duration;

    fn orchestrator(chain: &Arc<InMemoryChain>, config: OrchestratorConfig) -> RoundOrchestrator {
        RoundOrchestrator::new(config, chain.clone(), chain.clone()).unwrap()
    }

    #[tokio::test]
    async fn test_round_submits_top_validators() {
        let chain = Arc::new(InMemoryChain::for_testing(20, 10));
        let orchestrator = orchestrator(&chain, OrchestratorConfig::for_testing());

        let report = orchestrator.handle_trigger(Trigger::EraChanged(10)).await;
        assert!(report.is_done(), "{:?}", report.outcome);
        assert_eq!(report.round.unwrap().number, 1);

        let submissions = chain.submissions();
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].call.len(), 16);
        assert_eq!(submissions[0].call.derivative_index, Some(0));
        // least nominated first
        assert_eq!(submissions[0].call.entries[0].account_id, AccountId::from("v00"));
        assert_eq!(orchestrator.last_processed_era(), Some(10));
        assert_eq!(orchestrator.phase(), RoundPhase::Idle);
    }

    #[tokio::test]
    async fn test_duplicate_era_is_skipped() {
        let chain = Arc::new(InMemoryChain::for_testing(3, 5));
        let orchestrator = orchestrator(&chain, OrchestratorConfig::for_testing());

        assert!(orchestrator.handle_trigger(Trigger::EraChanged(5)).await.is_done());
        let second = orchestrator.handle_trigger(Trigger::EraChanged(5)).await;
        assert_eq!(second.skipped(), Some(SkipReason::AlreadyProcessed));
        assert!(second.round.is_none());

        let older = orchestrator.handle_trigger(Trigger::EraChanged(4)).await;
        assert_eq!(older.skipped(), Some(SkipReason::AlreadyProcessed));

        assert_eq!(chain.submissions().len(), 1);
        assert_eq!(orchestrator.rounds_started(), 1);
    }

    #[tokio::test]
    async fn test_tick_resolves_current_era() {
        let chain = Arc::new(InMemoryChain::for_testing(3, 7));
        let orchestrator = orchestrator(&chain, OrchestratorConfig::for_testing());

        let report = orchestrator.handle_trigger(Trigger::Tick(1)).await;
        assert_eq!(report.round.unwrap().era, Some(7));
        assert!(report.is_done());

        let again = orchestrator.handle_trigger(Trigger::Tick(2)).await;
        assert_eq!(again.skipped(), Some(SkipReason::AlreadyProcessed));

        chain.advance_era(8);
        assert!(orchestrator.handle_trigger(Trigger::Tick(3)).await.is_done());
        assert_eq!(chain.submissions().len(), 2);
    }

    #[tokio::test]
    async fn test_nonce_is_fetched_for_every_submission() {
        let chain = Arc::new(InMemoryChain::for_testing(3, 2));
        let orchestrator = orchestrator(&chain, OrchestratorConfig::for_testing());

        orchestrator.handle_trigger(Trigger::EraChanged(2)).await;
        chain.advance_era(3);
        orchestrator.handle_trigger(Trigger::EraChanged(3)).await;

        let nonces: Vec<_> = chain.submissions().iter().map(|s| s.nonce).collect();
        assert_eq!(nonces, vec![0, 1]);
        assert_eq!(chain.nonce_queries(), 2);
    }

    #[tokio::test]
    async fn test_gathering_failure_leaves_era_open() {
        let chain = Arc::new(InMemoryChain::for_testing(3, 4));
        let orchestrator = orchestrator(&chain, OrchestratorConfig::for_testing());

        chain.fail_reads(Some(GatewayError::Unavailable("timeout".into())));
        let failed = orchestrator.handle_trigger(Trigger::EraChanged(4)).await;
        assert!(matches!(
            failed.outcome,
            RoundOutcome::Failed(RoundError::DataUnavailable(_))
        ));
        assert!(failed.fatal_error().is_none());
        assert_eq!(orchestrator.last_processed_era(), None);
        assert_eq!(orchestrator.phase(), RoundPhase::Idle);

        chain.fail_reads(None);
        assert!(orchestrator.handle_trigger(Trigger::EraChanged(4)).await.is_done());
        assert_eq!(chain.submissions().len(), 1);
    }

    #[tokio::test]
    async fn test_mark_failed_eras() {
        let chain = Arc::new(InMemoryChain::for_testing(3, 4));
        let config = OrchestratorConfig {
            mark_failed_eras: true,
            ..OrchestratorConfig::for_testing()
        };
        let orchestrator = orchestrator(&chain, config);

        chain.fail_submissions(Some(GatewayError::Rejected("bad origin".into())));
        let failed = orchestrator.handle_trigger(Trigger::EraChanged(4)).await;
        assert!(matches!(
            failed.outcome,
            RoundOutcome::Failed(RoundError::SubmissionFailed(_))
        ));
        assert_eq!(orchestrator.last_processed_era(), Some(4));
    }

    #[tokio::test]
    async fn test_no_eligible_validators_is_not_submitted() {
        let chain = Arc::new(InMemoryChain::for_testing(3, 4));
        chain.update(|state| {
            for account in state.accounts.values_mut() {
                account.commission = Perbill::from_percent(50.0);
            }
        });
        let orchestrator = orchestrator(&chain, OrchestratorConfig::for_testing());

        let report = orchestrator.handle_trigger(Trigger::EraChanged(4)).await;
        assert_eq!(
            report.outcome,
            RoundOutcome::Failed(RoundError::NoEligibleValidators { scored: 3 })
        );
        assert!(chain.submissions().is_empty());
        assert_eq!(chain.nonce_queries(), 0);
    }

    #[tokio::test]
    async fn test_invalid_chain_policy_fails_round() {
        let chain = Arc::new(InMemoryChain::for_testing(3, 4));
        let orchestrator = orchestrator(&chain, OrchestratorConfig::for_testing());
        let original = chain.state();

        chain.update(|s| s.max_validators = 0);
        let report = orchestrator.handle_trigger(Trigger::EraChanged(4)).await;
        assert!(matches!(
            report.outcome,
            RoundOutcome::Failed(RoundError::ConfigurationInvalid(_))
        ));

        chain.update(|s| {
            s.max_validators = original.max_validators;
            s.coefficients.nomination_weight = -1.0;
        });
        let report = orchestrator.handle_trigger(Trigger::EraChanged(4)).await;
        assert!(matches!(
            report.outcome,
            RoundOutcome::Failed(RoundError::ConfigurationInvalid(_))
        ));
        assert!(report.fatal_error().is_none());

        assert!(chain.submissions().is_empty());
        assert_eq!(chain.nonce_queries(), 0);
        assert_eq!(orchestrator.last_processed_era(), None);
        assert_eq!(orchestrator.phase(), RoundPhase::Idle);

        chain.update(|s| s.coefficients = original.coefficients);
        assert!(orchestrator.handle_trigger(Trigger::EraChanged(4)).await.is_done());
        assert_eq!(chain.submissions().len(), 1);
        assert_eq!(orchestrator.last_processed_era(), Some(4));
    }

    #[tokio::test]
    async fn test_stash_without_account_fails_round() {
        let chain = Arc::new(InMemoryChain::for_testing(3, 4));
        chain.update(|s| s.stashes.push(AccountId::from("orphan")));
        let orchestrator = orchestrator(&chain, OrchestratorConfig::for_testing());

        let report = orchestrator.handle_trigger(Trigger::EraChanged(4)).await;
        match &report.outcome {
            RoundOutcome::Failed(RoundError::DataUnavailable(msg)) => assert!(msg.contains("orphan")),
            other => panic!("unexpected outcome {other:?}"),
        }
        assert!(chain.submissions().is_empty());
        assert_eq!(chain.nonce_queries(), 0);
        assert_eq!(orchestrator.last_processed_era(), None);
    }

    #[tokio::test]
    async fn test_dry_run_builds_without_submitting() {
        let chain = Arc::new(InMemoryChain::for_testing(4, 4));
        let config = OrchestratorConfig {
            dry_run: true,
            ..OrchestratorConfig::for_testing()
        };
        let orchestrator = orchestrator(&chain, config);

        let report = orchestrator.handle_trigger(Trigger::EraChanged(4)).await;
        match report.outcome {
            RoundOutcome::DryRun { call } => assert_eq!(call.len(), 4),
            other => panic!("unexpected outcome {other:?}"),
        }
        assert!(chain.submissions().is_empty());
        assert_eq!(orchestrator.last_processed_era(), None);
    }

    #[tokio::test]
    async fn test_disconnect_is_fatal() {
        let chain = Arc::new(InMemoryChain::for_testing(3, 4));
        chain.fail_reads(Some(GatewayError::Disconnected("ws://relay".into())));
        let orchestrator = Arc::new(orchestrator(&chain, OrchestratorConfig::for_testing()));

        let (tx, rx) = mpsc::channel(8);
        tx.send(Trigger::EraChanged(4)).await.unwrap();

        let result = orchestrator.run(rx).await;
        assert_eq!(result, Err(RoundError::ConnectivityLost("ws://relay".into())));
    }

    #[tokio::test(start_paused = true)]
    async fn test_trigger_during_round_is_dropped() {
        let chain = Arc::new(InMemoryChain::for_testing(3, 4));
        chain.set_read_delay(Some(Duration::from_secs(30)));
        let orchestrator = Arc::new(orchestrator(&chain, OrchestratorConfig::for_testing()));

        let (tx, rx) = mpsc::channel(8);
        let task = tokio::spawn(orchestrator.clone().run(rx));

        tx.send(Trigger::EraChanged(4)).await.unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(orchestrator.phase(), RoundPhase::Gathering);

        tx.send(Trigger::Tick(1)).await.unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;

        drop(tx);
        assert_eq!(task.await.unwrap(), Ok(()));
        assert_eq!(chain.submissions().len(), 1);
        assert_eq!(chain.stash_queries(), 1);
        assert_eq!(orchestrator.rounds_started(), 1);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let chain = Arc::new(InMemoryChain::for_testing(1, 1));
        let result = RoundOrchestrator::new(
            OrchestratorConfig {
                era_window: 0,
                ..OrchestratorConfig::for_testing()
            },
            chain.clone(),
            chain,
        );
        assert!(matches!(result, Err(RoundError::ConfigurationInvalid(_))));
    }
}
