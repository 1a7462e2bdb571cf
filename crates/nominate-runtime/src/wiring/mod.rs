//! # Wiring
//!
//! Connects the chain adapters, trigger sources and the round orchestrator.
//!
//! ```text
//! relay ws ──RpcEraEvents──→ EraChangeTrigger ─┐
//!                            IntervalTrigger ──┼──→ TriggerQueue ──→ RoundOrchestrator
//! relay ws ─┬─RpcChainGateway ←────────────────┼───────────────────────────┘
//! para ws ──┴─RpcTxSubmitter ←─────────────────┘
//! ```
//!
//! The client stops when the orchestrator reports lost connectivity, when a
//! connection closes, when a trigger source fails, or on shutdown.

use std::future::Future;
use std::sync::Arc;

use nc_01_chain_gateway::{
    ChainDataGateway, EraEventSource, GatewayError, RpcChainGateway, RpcConnection, RpcEraEvents,
    RpcTxSubmitter, SeedSigner, TxSigner, TxSubmitter,
};
use nc_03_round_orchestrator::{
    EraChangeTrigger, IntervalTrigger, RoundError, RoundOrchestrator, RoundPhase, TriggerQueue,
    TriggerSource,
};
use tokio::task::JoinSet;
use tracing::{error, info};

use crate::config::RuntimeConfig;

/// Chain ports the client runs against.
#[derive(Clone)]
pub struct Adapters {
    /// Chain data reads
    pub gateway: Arc<dyn ChainDataGateway>,
    /// Nonce and submission
    pub submitter: Arc<dyn TxSubmitter>,
    /// Era notifications
    pub events: Arc<dyn EraEventSource>,
}

/// Open both chain connections and build the RPC adapters.
pub async fn connect(
    config: &RuntimeConfig,
) -> Result<(Adapters, RpcConnection, RpcConnection), GatewayError> {
    let buffer = config.gateway.subscription_buffer;
    let (relay, para) = tokio::try_join!(
        RpcConnection::connect(&config.gateway.relay_ws, buffer),
        RpcConnection::connect(&config.gateway.para_ws, buffer),
    )?;

    let signer = Arc::new(SeedSigner::from_seed(&config.seed));
    info!(signer = %signer.address(), "[runtime] Signing account loaded");

    let adapters = Adapters {
        gateway: Arc::new(RpcChainGateway::new(relay.clone(), para.clone())),
        submitter: Arc::new(RpcTxSubmitter::new(para.clone(), signer)),
        events: Arc::new(RpcEraEvents::new(relay.clone())),
    };
    Ok((adapters, relay, para))
}

/// Trigger sources enabled by the configuration.
pub fn trigger_sources(
    config: &RuntimeConfig,
    events: Arc<dyn EraEventSource>,
) -> Vec<Box<dyn TriggerSource>> {
    let mut sources: Vec<Box<dyn TriggerSource>> = Vec::new();
    if config.trigger.uses_interval() {
        sources.push(Box::new(IntervalTrigger::new(config.tick)));
    }
    if config.trigger.uses_era_changes() {
        sources.push(Box::new(EraChangeTrigger::new(events)));
    }
    sources
}

/// Run rounds until `shutdown` resolves or something fatal happens.
///
/// `disconnected` resolves when a chain connection is lost.
pub async fn run_with(
    config: &RuntimeConfig,
    adapters: Adapters,
    shutdown: impl Future<Output = ()>,
    disconnected: impl Future<Output = GatewayError>,
) -> Result<(), RoundError> {
    let orchestrator = Arc::new(RoundOrchestrator::new(
        config.orchestrator.clone(),
        adapters.gateway,
        adapters.submitter,
    )?);

    let (queue, triggers) = TriggerQueue::bounded(config.orchestrator.queue_capacity);
    let mut sources = JoinSet::new();
    for source in trigger_sources(config, adapters.events) {
        let queue = queue.clone();
        info!(source = source.name(), "[runtime] Starting trigger source");
        sources.spawn(async move {
            let name = source.name();
            source.run(queue).await.map_err(|err| (name, err))
        });
    }
    drop(queue);

    // source failures win over the queue closing behind them
    let result = tokio::select! {
        biased;

        err = disconnected => Err(RoundError::from_gateway(err, RoundPhase::Idle)),
        Some(joined) = sources.join_next() => match joined {
            Ok(Ok(())) => Ok(()),
            Ok(Err((name, err))) => {
                error!(source = name, error = %err, "[runtime] Trigger source failed");
                Err(err)
            }
            Err(join_err) => Err(RoundError::ConnectivityLost(format!(
                "trigger source aborted: {join_err}"
            ))),
        },
        result = orchestrator.run(triggers) => result,
        _ = shutdown => {
            info!("[runtime] Shutdown requested");
            Ok(())
        }
    };

    sources.shutdown().await;
    result
}

/// Connect and run with the RPC adapters until Ctrl+C or a fatal error.
pub async fn run(config: RuntimeConfig) -> anyhow::Result<()> {
    use anyhow::Context;

    let (adapters, relay, para) = connect(&config)
        .await
        .context("Failed to connect to the chains")?;

    let disconnected = async move {
        tokio::select! {
            err = relay.closed() => err,
            err = para.closed() => err,
        }
    };
    let shutdown = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "[runtime] Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    run_with(&config, adapters, shutdown, disconnected)
        .await
        .context("Nomination client stopped")
}
