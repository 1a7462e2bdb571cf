//! # Outbound Ports
//!
//! Traits for the chains this client talks to. Adapters live in
//! [`crate::adapters`].

use std::collections::HashMap;

use async_trait::async_trait;
use futures::stream::BoxStream;
use shared_types::{
    AccountId, Balance, DerivativeIndex, EraIndex, EraPoints, Exposure, NominationCall, Nonce,
    ScoringCoefficients, TxHash, ValidatorAccount, ValidatorIdentity,
};

use crate::error::{GatewayError, Result};

/// Stream of era indices. May repeat an era.
pub type EraStream = BoxStream<'static, std::result::Result<EraIndex, GatewayError>>;

/// Read side of the relay and para chains.
#[async_trait]
pub trait ChainDataGateway: Send + Sync {
    /// Stashes of all currently active validators.
    async fn list_validator_stashes(&self) -> Result<Vec<AccountId>>;

    /// Identity per stash. Stashes without an entry have no identity.
    async fn fetch_identities(
        &self,
        stashes: &[AccountId],
    ) -> Result<HashMap<AccountId, ValidatorIdentity>>;

    /// Staking account info per stash.
    async fn fetch_validator_accounts(
        &self,
        stashes: &[AccountId],
    ) -> Result<HashMap<AccountId, ValidatorAccount>>;

    /// Active exposure of one stash. Unknown stashes have an empty exposure.
    async fn fetch_exposure(&self, stash: &AccountId) -> Result<Exposure>;

    /// Historic eras, ascending.
    async fn list_historic_eras(&self, include_current: bool) -> Result<Vec<EraIndex>>;

    /// Reward points for each requested era.
    async fn fetch_era_points(&self, eras: &[EraIndex]) -> Result<Vec<EraPoints>>;

    /// Slashes applied in one era, by validator account.
    async fn fetch_era_slashes(&self, era: EraIndex) -> Result<HashMap<AccountId, Balance>>;

    /// Scoring weights configured on the para chain.
    async fn fetch_scoring_coefficients(&self) -> Result<ScoringCoefficients>;

    /// Validator cap configured on the para chain.
    async fn fetch_max_validators(&self) -> Result<u32>;

    /// Active era, if staking has started.
    async fn current_era(&self) -> Result<Option<EraIndex>>;

    /// Relay token decimals.
    async fn token_decimals(&self) -> Result<u8>;

    /// Liquid-staking derivative index on the para chain.
    async fn derivative_index(&self) -> Result<Option<DerivativeIndex>>;
}

/// Write side of the para chain.
#[async_trait]
pub trait TxSubmitter: Send + Sync {
    /// Account submissions are signed by.
    fn signer(&self) -> AccountId;

    /// Next transaction index of `account`, including pending pool transactions.
    async fn account_next_index(&self, account: &AccountId) -> Result<Nonce>;

    /// Sign and submit a nomination. Pool acceptance counts as success.
    async fn submit_nomination(&self, call: &NominationCall, nonce: Nonce) -> Result<TxHash>;
}

/// Source of era change notifications.
#[async_trait]
pub trait EraEventSource: Send + Sync {
    /// Subscribe to era changes. Delivery is at-least-once.
    async fn subscribe_era_changes(&self) -> Result<EraStream>;
}

/// Key material used to sign submissions.
pub trait TxSigner: Send + Sync {
    /// Address derived from the key.
    fn address(&self) -> AccountId;

    /// Signature over `payload`.
    fn sign(&self, payload: &[u8]) -> Vec<u8>;
}
