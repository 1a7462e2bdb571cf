//! # Ports
//!
//! Inbound side of the orchestrator: sources of round triggers. The chain
//! ports it drives live in `nc-01-chain-gateway`.

use async_trait::async_trait;

use crate::error::Result;
use crate::triggers::TriggerSender;

/// Something that decides when a round should run.
#[async_trait]
pub trait TriggerSource: Send + Sync {
    /// Name for logs.
    fn name(&self) -> &'static str;

    /// Push triggers until the queue closes or the source ends.
    ///
    /// Returns an error when the source can no longer produce triggers.
    async fn run(&self, queue: TriggerSender) -> Result<()>;
}
