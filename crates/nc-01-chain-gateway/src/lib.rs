//! # NC-01 Chain Gateway
//!
//! Everything this client reads from or writes to the relay and para chains.
//!
//! **Subsystem ID:** 01
//! **Architecture:** Hexagonal (ports + adapters)
//!
//! ## Ports
//!
//! | Port | Direction | Purpose |
//! |------|-----------|---------|
//! | [`ChainDataGateway`] | read | validators, identities, exposures, eras, points, slashes, policy |
//! | [`TxSubmitter`] | write | nonce lookup and nomination submission |
//! | [`EraEventSource`] | stream | era change notifications (at-least-once) |
//! | [`TxSigner`] | local | signs submission payloads |
//!
//! ## Adapters
//!
//! - [`RpcChainGateway`], [`RpcTxSubmitter`], [`RpcEraEvents`]: JSON-RPC over
//!   WebSocket against a chain-client bridge, one connection per chain.
//! - [`InMemoryChain`]: scriptable chain for tests.
//! - [`SeedSigner`]: ed25519 key derived from a seed phrase.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod config;
pub mod error;
pub mod ports;

pub use adapters::{
    ChainState, InMemoryChain, RpcChainGateway, RpcConnection, RpcEraEvents, RpcTxSubmitter,
    SeedSigner, SubmittedNomination,
};
pub use config::{GatewayConfig, DEFAULT_PARA_WS, DEFAULT_RELAY_WS};
pub use error::{GatewayError, Result};
pub use ports::{ChainDataGateway, EraEventSource, EraStream, TxSigner, TxSubmitter};
