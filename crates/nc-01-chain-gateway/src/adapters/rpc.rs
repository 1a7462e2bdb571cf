//! # JSON-RPC Adapters
//!
//! Ports implemented over `jsonrpsee` WebSocket clients. One
//! [`RpcConnection`] per chain; both are shared by the adapters built on
//! them.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use jsonrpsee::core::client::{
    ClientT, Subscription, SubscriptionClientT, SubscriptionCloseReason,
};
use jsonrpsee::core::params::ArrayParams;
use jsonrpsee::core::ClientError;
use jsonrpsee::rpc_params;
use jsonrpsee::ws_client::{WsClient, WsClientBuilder};
use serde::de::DeserializeOwned;
use shared_types::{
    AccountId, Balance, DerivativeIndex, EraIndex, EraPoints, Exposure, NominationCall, Nonce,
    ScoringCoefficients, TxHash, ValidatorAccount, ValidatorIdentity,
};
use tracing::{debug, info, warn};

use super::wire::{
    signing_payload, SignedNomination, WireCoefficients, WireIdentity, WireProperties, WireSlash,
    WireValidatorAccount,
};
use crate::error::{GatewayError, Result};
use crate::ports::{ChainDataGateway, EraEventSource, EraStream, TxSigner, TxSubmitter};

/// Shared WebSocket connection to one chain.
#[derive(Clone)]
pub struct RpcConnection {
    client: Arc<WsClient>,
    endpoint: Arc<str>,
}

impl RpcConnection {
    /// Open a connection. Fails with `Unavailable` if the endpoint cannot be reached.
    pub async fn connect(endpoint: &str, subscription_buffer: usize) -> Result<Self> {
        info!(endpoint, "[nc-01] Connecting");
        let client = WsClientBuilder::default()
            .max_buffer_capacity_per_subscription(subscription_buffer)
            .build(endpoint)
            .await
            .map_err(|e| GatewayError::Unavailable(format!("{endpoint}: {e}")))?;

        Ok(Self {
            client: Arc::new(client),
            endpoint: Arc::from(endpoint),
        })
    }

    /// Endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Whether the background connection task is still alive.
    pub fn is_connected(&self) -> bool {
        self.client.is_connected()
    }

    /// Resolves once the connection is gone.
    pub async fn closed(&self) -> GatewayError {
        self.client.on_disconnect().await;
        warn!(endpoint = %self.endpoint, "[nc-01] Connection closed");
        GatewayError::Disconnected(self.endpoint.to_string())
    }

    async fn call<R: DeserializeOwned>(
        &self,
        method: &str,
        params: ArrayParams,
    ) -> std::result::Result<R, ClientError> {
        debug!(endpoint = %self.endpoint, method, "[nc-01] RPC call");
        self.client.request(method, params).await
    }

    async fn request<R: DeserializeOwned>(&self, method: &str, params: ArrayParams) -> Result<R> {
        self.call(method, params)
            .await
            .map_err(|e| map_read_error(&self.endpoint, method, e))
    }
}

impl std::fmt::Debug for RpcConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcConnection")
            .field("endpoint", &self.endpoint)
            .field("connected", &self.is_connected())
            .finish()
    }
}

fn map_read_error(endpoint: &str, method: &str, err: ClientError) -> GatewayError {
    match err {
        ClientError::RestartNeeded(_) => GatewayError::Disconnected(endpoint.to_string()),
        ClientError::ParseError(e) => GatewayError::Malformed(format!("{method}: {e}")),
        other => GatewayError::Unavailable(format!("{method}: {other}")),
    }
}

fn map_submit_error(endpoint: &str, method: &str, err: ClientError) -> GatewayError {
    match err {
        ClientError::Call(obj) => GatewayError::Rejected(obj.message().to_string()),
        other => map_read_error(endpoint, method, other),
    }
}

// =============================================================================
// ChainDataGateway
// =============================================================================

/// Reads staking data from the relay chain and nomination policy from the para chain.
#[derive(Clone, Debug)]
pub struct RpcChainGateway {
    relay: RpcConnection,
    para: RpcConnection,
}

impl RpcChainGateway {
    /// Build over existing connections.
    pub fn new(relay: RpcConnection, para: RpcConnection) -> Self {
        Self { relay, para }
    }
}

#[async_trait]
impl ChainDataGateway for RpcChainGateway {
    async fn list_validator_stashes(&self) -> Result<Vec<AccountId>> {
        self.relay
            .request("staking_validatorStashes", rpc_params![])
            .await
    }

    async fn fetch_identities(
        &self,
        stashes: &[AccountId],
    ) -> Result<HashMap<AccountId, ValidatorIdentity>> {
        let identities: Vec<WireIdentity> = self
            .relay
            .request("identity_hasIdentityMulti", rpc_params![stashes])
            .await?;
        Ok(identities.into_iter().map(WireIdentity::into_entry).collect())
    }

    async fn fetch_validator_accounts(
        &self,
        stashes: &[AccountId],
    ) -> Result<HashMap<AccountId, ValidatorAccount>> {
        let accounts: Vec<WireValidatorAccount> = self
            .relay
            .request("staking_validatorAccounts", rpc_params![stashes])
            .await?;
        Ok(accounts
            .into_iter()
            .map(WireValidatorAccount::into_entry)
            .collect())
    }

    async fn fetch_exposure(&self, stash: &AccountId) -> Result<Exposure> {
        let exposure: Option<Exposure> = self
            .relay
            .request("staking_exposure", rpc_params![stash])
            .await?;
        Ok(exposure.unwrap_or_default())
    }

    async fn list_historic_eras(&self, include_current: bool) -> Result<Vec<EraIndex>> {
        let mut eras: Vec<EraIndex> = self
            .relay
            .request("staking_erasHistoric", rpc_params![include_current])
            .await?;
        eras.sort_unstable();
        Ok(eras)
    }

    async fn fetch_era_points(&self, eras: &[EraIndex]) -> Result<Vec<EraPoints>> {
        self.relay
            .request("staking_erasPoints", rpc_params![eras])
            .await
    }

    async fn fetch_era_slashes(&self, era: EraIndex) -> Result<HashMap<AccountId, Balance>> {
        let slashes: Vec<WireSlash> = self
            .relay
            .request("staking_eraSlashes", rpc_params![era])
            .await?;

        let mut by_validator = HashMap::with_capacity(slashes.len());
        for slash in slashes {
            let total: &mut Balance = by_validator.entry(slash.validator).or_default();
            *total = total.saturating_add(slash.amount);
        }
        Ok(by_validator)
    }

    async fn fetch_scoring_coefficients(&self) -> Result<ScoringCoefficients> {
        let coefficients: WireCoefficients = self
            .para
            .request("nomineeElection_coefficients", rpc_params![])
            .await?;
        Ok(coefficients.into())
    }

    async fn fetch_max_validators(&self) -> Result<u32> {
        self.para
            .request("nomineeElection_maxValidators", rpc_params![])
            .await
    }

    async fn current_era(&self) -> Result<Option<EraIndex>> {
        self.relay.request("staking_currentEra", rpc_params![]).await
    }

    async fn token_decimals(&self) -> Result<u8> {
        let properties: WireProperties = self
            .relay
            .request("system_properties", rpc_params![])
            .await?;
        properties
            .token_decimals
            .and_then(|d| d.native())
            .ok_or_else(|| GatewayError::Malformed("system_properties: missing tokenDecimals".into()))
    }

    async fn derivative_index(&self) -> Result<Option<DerivativeIndex>> {
        self.para
            .request("liquidStaking_derivativeIndex", rpc_params![])
            .await
    }
}

// =============================================================================
// TxSubmitter
// =============================================================================

/// Submits signed nominations to the para chain.
pub struct RpcTxSubmitter {
    para: RpcConnection,
    signer: Arc<dyn TxSigner>,
}

impl RpcTxSubmitter {
    /// Build over the para connection with `signer`.
    pub fn new(para: RpcConnection, signer: Arc<dyn TxSigner>) -> Self {
        Self { para, signer }
    }
}

#[async_trait]
impl TxSubmitter for RpcTxSubmitter {
    fn signer(&self) -> AccountId {
        self.signer.address()
    }

    async fn account_next_index(&self, account: &AccountId) -> Result<Nonce> {
        self.para
            .request("system_accountNextIndex", rpc_params![account])
            .await
    }

    async fn submit_nomination(&self, call: &NominationCall, nonce: Nonce) -> Result<TxHash> {
        const METHOD: &str = "nomineeElection_submitNomination";

        let payload =
            signing_payload(call, nonce).map_err(|e| GatewayError::Malformed(e.to_string()))?;
        let signer = self.signer.address();
        let envelope = SignedNomination {
            signer: &signer,
            nonce,
            call,
            signature: hex::encode(self.signer.sign(&payload)),
        };

        self.para
            .call(METHOD, rpc_params![envelope])
            .await
            .map_err(|e| map_submit_error(self.para.endpoint(), METHOD, e))
    }
}

// =============================================================================
// EraEventSource
// =============================================================================

/// Era change subscription on the relay chain.
#[derive(Clone, Debug)]
pub struct RpcEraEvents {
    relay: RpcConnection,
}

impl RpcEraEvents {
    /// Build over the relay connection.
    pub fn new(relay: RpcConnection) -> Self {
        Self { relay }
    }
}

#[async_trait]
impl EraEventSource for RpcEraEvents {
    async fn subscribe_era_changes(&self) -> Result<EraStream> {
        const SUBSCRIBE: &str = "staking_subscribeCurrentEra";

        let subscription: Subscription<EraIndex> = self
            .relay
            .client
            .subscribe(SUBSCRIBE, rpc_params![], "staking_unsubscribeCurrentEra")
            .await
            .map_err(|e| map_read_error(self.relay.endpoint(), SUBSCRIBE, e))?;

        let endpoint = self.relay.endpoint().to_string();
        let stream = futures::stream::unfold(Some(subscription), move |subscription| {
            let endpoint = endpoint.clone();
            async move {
                let mut subscription = subscription?;
                match subscription.next().await {
                    Some(item) => {
                        let item = item
                            .map_err(|e| GatewayError::Malformed(format!("{SUBSCRIBE}: {e}")));
                        Some((item, Some(subscription)))
                    }
                    None => {
                        let err = end_of_subscription(&endpoint, subscription.close_reason())?;
                        Some((Err(err), None))
                    }
                }
            }
        });
        Ok(stream.boxed())
    }
}

/// Error to surface when a subscription ends; `None` ends the stream quietly.
fn end_of_subscription(
    endpoint: &str,
    reason: Option<SubscriptionCloseReason>,
) -> Option<GatewayError> {
    match reason {
        Some(SubscriptionCloseReason::Lagged) => {
            warn!(endpoint, "[nc-01] Era subscription dropped for lagging");
            None
        }
        Some(SubscriptionCloseReason::ConnectionClosed) | None => {
            Some(GatewayError::Disconnected(endpoint.to_string()))
        }
    }
}
