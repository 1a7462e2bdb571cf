//! # nc-03-round-orchestrator
//!
//! Decides when a nomination round runs and drives it from chain data to a
//! submitted nomination.
//!
//! ## Overview
//!
//! This subsystem provides:
//! - **Triggers**: interval ticks and era-change notifications feeding one bounded queue
//! - **Single Flight**: at most one round at a time; triggers arriving mid-round are dropped
//! - **Era Guard**: an era is nominated for at most once
//! - **Fresh Nonces**: the signer's nonce is queried right before every submission
//!
//! ## Architecture
//!
//! ```text
//! IntervalTrigger ──┐
//!                   ├──→ TriggerQueue ──→ RoundOrchestrator ──→ Chain Gateway (1)
//! EraChangeTrigger ─┘                            │
//!                                                └──→ Validator Scoring (2)
//! ```
//!
//! ## Failure Handling
//!
//! | Error | Effect |
//! |-------|--------|
//! | `DataUnavailable` | round fails, wait for next trigger |
//! | `ConfigurationInvalid` | round fails, wait for next trigger |
//! | `SubmissionFailed` | round fails, era stays open |
//! | `NoEligibleValidators` | warning, nothing submitted |
//! | `ConnectivityLost` | `run` returns the error |
//!
//! ## Example
//!
//! ```rust,ignore
//! use nc_03_round_orchestrator::{
//!     IntervalTrigger, OrchestratorConfig, RoundOrchestrator, TriggerQueue, TriggerSource,
//! };
//!
//! let orchestrator = Arc::new(RoundOrchestrator::new(config, gateway, submitter)?);
//! let (queue, rx) = TriggerQueue::bounded(config.queue_capacity);
//!
//! tokio::spawn(async move { IntervalTrigger::new(period).run(queue).await });
//! orchestrator.run(rx).await?;
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod gather;
pub mod metrics;
pub mod ports;
pub mod service;
pub mod triggers;

pub use config::OrchestratorConfig;
pub use domain::{
    EraGuard, RoundId, RoundOutcome, RoundPhase, RoundReport, SkipReason, Trigger, TriggerKind,
};
pub use error::{Result, RoundError};
pub use gather::gather_snapshot;
pub use ports::TriggerSource;
pub use service::RoundOrchestrator;
pub use triggers::{EraChangeTrigger, IntervalTrigger, PushResult, TriggerQueue, TriggerSender};
