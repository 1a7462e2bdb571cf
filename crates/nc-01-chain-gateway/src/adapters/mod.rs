//! Adapters implementing the gateway ports

mod in_memory;
mod rpc;
mod signer;
mod wire;

pub use in_memory::{ChainState, InMemoryChain, SubmittedNomination};
pub use rpc::{RpcChainGateway, RpcConnection, RpcEraEvents, RpcTxSubmitter};
pub use signer::SeedSigner;
