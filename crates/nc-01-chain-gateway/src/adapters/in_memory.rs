//! In-memory chain for tests.
//!
//! Implements every gateway port over a [`ChainState`] that tests can edit
//! between rounds. Failures are injected per call class and submissions are
//! recorded for inspection.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use shared_types::{
    AccountId, Balance, DerivativeIndex, EraIndex, EraPoints, EraSlashes, Exposure,
    NominationCall, Nonce, Perbill, ScoringCoefficients, TxHash, ValidatorAccount,
    ValidatorIdentity,
};
use sha2::{Digest, Sha256};
use tokio::sync::broadcast;
use tracing::debug;

use crate::error::{GatewayError, Result};
use crate::ports::{ChainDataGateway, EraEventSource, EraStream, TxSubmitter};

/// Contents of the in-memory chain. Deserializable so fixtures can live in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainState {
    /// Active validator stashes.
    pub stashes: Vec<AccountId>,
    /// Identity per stash.
    pub identities: HashMap<AccountId, ValidatorIdentity>,
    /// Account info per stash.
    pub accounts: HashMap<AccountId, ValidatorAccount>,
    /// Exposure per stash.
    pub exposures: HashMap<AccountId, Exposure>,
    /// Points per era. Keys double as the historic era list.
    pub era_points: BTreeMap<EraIndex, EraPoints>,
    /// Slashes per era.
    pub slashes: BTreeMap<EraIndex, EraSlashes>,
    /// Active era.
    pub current_era: Option<EraIndex>,
    /// On-chain coefficients.
    pub coefficients: ScoringCoefficients,
    /// On-chain validator cap.
    pub max_validators: u32,
    /// Relay token decimals.
    pub token_decimals: u8,
    /// Derivative index of the pool.
    pub derivative_index: Option<DerivativeIndex>,
    /// Next transaction index per account.
    pub nonces: HashMap<AccountId, Nonce>,
}

impl Default for ChainState {
    fn default() -> Self {
        Self {
            stashes: Vec::new(),
            identities: HashMap::new(),
            accounts: HashMap::new(),
            exposures: HashMap::new(),
            era_points: BTreeMap::new(),
            slashes: BTreeMap::new(),
            current_era: None,
            coefficients: ScoringCoefficients::default(),
            max_validators: 16,
            token_decimals: 12,
            derivative_index: Some(0),
            nonces: HashMap::new(),
        }
    }
}

impl ChainState {
    /// `count` named validators `v00..`, 5% commission, stake `i + 1` tokens,
    /// equal era points over eras `1..=eras`. Every score is distinct and positive.
    pub fn for_testing(count: usize, eras: EraIndex) -> Self {
        let mut state = Self::default();
        let unit = 10u128.pow(u32::from(state.token_decimals));

        for i in 0..count {
            let id = AccountId::new(format!("v{i:02}"));
            state.stashes.push(id.clone());
            state
                .identities
                .insert(id.clone(), ValidatorIdentity::named(format!("Validator {i}")));
            state.accounts.insert(
                id.clone(),
                ValidatorAccount {
                    account_id: id.clone(),
                    controller_id: AccountId::new(format!("c{i:02}")),
                    commission: Perbill::from_percent(5.0),
                    blocked: false,
                },
            );
            state.exposures.insert(
                id,
                Exposure {
                    total: (i as Balance + 2) * unit,
                    own: unit,
                },
            );
        }

        for era in 1..=eras {
            let validators: BTreeMap<_, _> =
                state.stashes.iter().map(|id| (id.clone(), 100)).collect();
            state.era_points.insert(
                era,
                EraPoints {
                    era,
                    total: 100 * count as u32,
                    validators,
                },
            );
        }
        state.current_era = (eras > 0).then_some(eras);
        state
    }

    /// Parse a JSON fixture.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| GatewayError::Malformed(e.to_string()))
    }
}

/// A nomination accepted by the in-memory pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedNomination {
    /// Submitted payload.
    pub call: NominationCall,
    /// Nonce it was signed with.
    pub nonce: Nonce,
    /// Hash returned to the submitter.
    pub hash: TxHash,
}

#[derive(Default)]
struct Faults {
    reads: Option<GatewayError>,
    submissions: Option<GatewayError>,
    read_delay: Option<Duration>,
}

/// Scriptable chain implementing all gateway ports.
pub struct InMemoryChain {
    state: RwLock<ChainState>,
    faults: Mutex<Faults>,
    signer: AccountId,
    submissions: Mutex<Vec<SubmittedNomination>>,
    nonce_queries: AtomicUsize,
    stash_queries: AtomicUsize,
    era_events: Mutex<broadcast::Sender<EraIndex>>,
}

impl InMemoryChain {
    /// Chain with `state`, signing as `signer`.
    pub fn new(state: ChainState, signer: AccountId) -> Self {
        let (era_events, _) = broadcast::channel(64);
        Self {
            state: RwLock::new(state),
            faults: Mutex::new(Faults::default()),
            signer,
            submissions: Mutex::new(Vec::new()),
            nonce_queries: AtomicUsize::new(0),
            stash_queries: AtomicUsize::new(0),
            era_events: Mutex::new(era_events),
        }
    }

    /// Chain from [`ChainState::for_testing`] signing as `//Eve`.
    pub fn for_testing(validators: usize, eras: EraIndex) -> Self {
        Self::new(
            ChainState::for_testing(validators, eras),
            AccountId::from("//Eve"),
        )
    }

    /// Edit the chain contents.
    pub fn update(&self, f: impl FnOnce(&mut ChainState)) {
        f(&mut self.state.write());
    }

    /// Copy of the chain contents.
    pub fn state(&self) -> ChainState {
        self.state.read().clone()
    }

    /// Fail every read with `err` until cleared with `None`.
    pub fn fail_reads(&self, err: Option<GatewayError>) {
        self.faults.lock().reads = err;
    }

    /// Fail every submission with `err` until cleared with `None`.
    pub fn fail_submissions(&self, err: Option<GatewayError>) {
        self.faults.lock().submissions = err;
    }

    /// Delay the stash listing, keeping a round in flight.
    pub fn set_read_delay(&self, delay: Option<Duration>) {
        self.faults.lock().read_delay = delay;
    }

    /// Advance the active era and notify subscribers.
    pub fn advance_era(&self, era: EraIndex) {
        self.state.write().current_era = Some(era);
        self.emit_era(era);
    }

    /// Notify subscribers of `era` without touching the state. Used for duplicates.
    pub fn emit_era(&self, era: EraIndex) {
        // no subscribers is fine
        let _ = self.era_events.lock().send(era);
    }

    /// End every live era subscription while staying connected.
    pub fn end_era_subscriptions(&self) {
        let (fresh, _) = broadcast::channel(64);
        // dropping the old sender closes its receivers
        drop(std::mem::replace(&mut *self.era_events.lock(), fresh));
    }

    /// Live era subscriptions.
    pub fn era_subscribers(&self) -> usize {
        self.era_events.lock().receiver_count()
    }

    /// Accepted submissions, oldest first.
    pub fn submissions(&self) -> Vec<SubmittedNomination> {
        self.submissions.lock().clone()
    }

    /// How many times a nonce was requested.
    pub fn nonce_queries(&self) -> usize {
        self.nonce_queries.load(Ordering::SeqCst)
    }

    /// How many times the stash list was requested. One per gathered round.
    pub fn stash_queries(&self) -> usize {
        self.stash_queries.load(Ordering::SeqCst)
    }

    fn check_reads(&self) -> Result<()> {
        match &self.faults.lock().reads {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ChainDataGateway for InMemoryChain {
    async fn list_validator_stashes(&self) -> Result<Vec<AccountId>> {
        self.stash_queries.fetch_add(1, Ordering::SeqCst);
        let delay = self.faults.lock().read_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.check_reads()?;
        Ok(self.state.read().stashes.clone())
    }

    async fn fetch_identities(
        &self,
        stashes: &[AccountId],
    ) -> Result<HashMap<AccountId, ValidatorIdentity>> {
        self.check_reads()?;
        let state = self.state.read();
        Ok(stashes
            .iter()
            .filter_map(|s| state.identities.get(s).map(|i| (s.clone(), i.clone())))
            .collect())
    }

    async fn fetch_validator_accounts(
        &self,
        stashes: &[AccountId],
    ) -> Result<HashMap<AccountId, ValidatorAccount>> {
        self.check_reads()?;
        let state = self.state.read();
        Ok(stashes
            .iter()
            .filter_map(|s| state.accounts.get(s).map(|a| (s.clone(), a.clone())))
            .collect())
    }

    async fn fetch_exposure(&self, stash: &AccountId) -> Result<Exposure> {
        self.check_reads()?;
        Ok(self
            .state
            .read()
            .exposures
            .get(stash)
            .copied()
            .unwrap_or_default())
    }

    async fn list_historic_eras(&self, include_current: bool) -> Result<Vec<EraIndex>> {
        self.check_reads()?;
        let state = self.state.read();
        Ok(state
            .era_points
            .keys()
            .copied()
            .filter(|era| include_current || Some(*era) != state.current_era)
            .collect())
    }

    async fn fetch_era_points(&self, eras: &[EraIndex]) -> Result<Vec<EraPoints>> {
        self.check_reads()?;
        let state = self.state.read();
        Ok(eras
            .iter()
            .map(|era| {
                state.era_points.get(era).cloned().unwrap_or(EraPoints {
                    era: *era,
                    ..Default::default()
                })
            })
            .collect())
    }

    async fn fetch_era_slashes(&self, era: EraIndex) -> Result<HashMap<AccountId, Balance>> {
        self.check_reads()?;
        Ok(self
            .state
            .read()
            .slashes
            .get(&era)
            .map(|s| s.iter().map(|(k, v)| (k.clone(), *v)).collect())
            .unwrap_or_default())
    }

    async fn fetch_scoring_coefficients(&self) -> Result<ScoringCoefficients> {
        self.check_reads()?;
        Ok(self.state.read().coefficients)
    }

    async fn fetch_max_validators(&self) -> Result<u32> {
        self.check_reads()?;
        Ok(self.state.read().max_validators)
    }

    async fn current_era(&self) -> Result<Option<EraIndex>> {
        self.check_reads()?;
        Ok(self.state.read().current_era)
    }

    async fn token_decimals(&self) -> Result<u8> {
        self.check_reads()?;
        Ok(self.state.read().token_decimals)
    }

    async fn derivative_index(&self) -> Result<Option<DerivativeIndex>> {
        self.check_reads()?;
        Ok(self.state.read().derivative_index)
    }
}

#[async_trait]
impl TxSubmitter for InMemoryChain {
    fn signer(&self) -> AccountId {
        self.signer.clone()
    }

    async fn account_next_index(&self, account: &AccountId) -> Result<Nonce> {
        self.nonce_queries.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.faults.lock().submissions.clone() {
            return Err(err);
        }
        Ok(self
            .state
            .read()
            .nonces
            .get(account)
            .copied()
            .unwrap_or(0))
    }

    async fn submit_nomination(&self, call: &NominationCall, nonce: Nonce) -> Result<TxHash> {
        if let Some(err) = self.faults.lock().submissions.clone() {
            return Err(err);
        }

        let mut state = self.state.write();
        let expected = state.nonces.entry(self.signer.clone()).or_insert(0);
        if nonce != *expected {
            return Err(GatewayError::Rejected(format!(
                "stale nonce {nonce}, expected {expected}"
            )));
        }
        *expected += 1;

        let encoded =
            serde_json::to_vec(&(nonce, call)).map_err(|e| GatewayError::Malformed(e.to_string()))?;
        let hash = TxHash(format!("0x{}", hex::encode(Sha256::digest(&encoded))));

        debug!(nonce, targets = call.len(), hash = %hash, "[nc-01] Nomination accepted");
        self.submissions.lock().push(SubmittedNomination {
            call: call.clone(),
            nonce,
            hash: hash.clone(),
        });
        Ok(hash)
    }
}

#[async_trait]
impl EraEventSource for InMemoryChain {
    async fn subscribe_era_changes(&self) -> Result<EraStream> {
        self.check_reads()?;
        let rx = self.era_events.lock().subscribe();
        let stream = futures::stream::unfold(rx, |mut rx| async move {
            loop {
                match rx.recv().await {
                    Ok(era) => return Some((Ok(era), rx)),
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
        });
        Ok(stream.boxed())
    }
}
