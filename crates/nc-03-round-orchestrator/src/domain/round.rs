//! Round identity, outcome and report.

use std::fmt;
use std::time::Duration;

use shared_types::{EraIndex, NominationCall, Nonce, TxHash};

use super::{Trigger, TriggerKind};
use crate::error::RoundError;

/// Identity of one round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RoundId {
    /// Monotonic round number, starting at 1.
    pub number: u64,
    /// Era the round runs for, if known.
    pub era: Option<EraIndex>,
    /// What started it.
    pub trigger: TriggerKind,
}

impl fmt::Display for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.era {
            Some(era) => write!(f, "#{} era={} {}", self.number, era, self.trigger.as_str()),
            None => write!(f, "#{} era=? {}", self.number, self.trigger.as_str()),
        }
    }
}

/// Why a trigger did not start a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// Another round holds the round lock.
    Busy,
    /// The trigger's era was already processed.
    AlreadyProcessed,
}

impl SkipReason {
    /// Metric label.
    pub fn as_str(self) -> &'static str {
        match self {
            SkipReason::Busy => "busy",
            SkipReason::AlreadyProcessed => "already_processed",
        }
    }
}

/// How a trigger ended.
#[derive(Clone, Debug, PartialEq)]
pub enum RoundOutcome {
    /// Nomination accepted by the pool.
    Done {
        /// Pool hash
        tx_hash: TxHash,
        /// Nonce used
        nonce: Nonce,
        /// Nominees submitted
        nominees: usize,
    },
    /// Nomination built but not submitted.
    DryRun {
        /// The call that would have been submitted
        call: NominationCall,
    },
    /// Round aborted.
    Failed(RoundError),
    /// No round was started.
    Skipped(SkipReason),
}

impl RoundOutcome {
    /// Metric label.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundOutcome::Done { .. } => "done",
            RoundOutcome::DryRun { .. } => "dry_run",
            RoundOutcome::Failed(_) => "failed",
            RoundOutcome::Skipped(_) => "skipped",
        }
    }
}

/// Result of handling one trigger.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundReport {
    /// Round identity; `None` when skipped.
    pub round: Option<RoundId>,
    /// Trigger handled.
    pub trigger: Trigger,
    /// Outcome.
    pub outcome: RoundOutcome,
    /// Time spent handling the trigger.
    pub elapsed: Duration,
}

impl RoundReport {
    /// Error that must stop the orchestrator.
    pub fn fatal_error(&self) -> Option<&RoundError> {
        match &self.outcome {
            RoundOutcome::Failed(err) if err.is_fatal() => Some(err),
            _ => None,
        }
    }

    /// Nomination accepted.
    pub fn is_done(&self) -> bool {
        matches!(self.outcome, RoundOutcome::Done { .. })
    }

    /// Skip reason, if skipped.
    pub fn skipped(&self) -> Option<SkipReason> {
        match self.outcome {
            RoundOutcome::Skipped(reason) => Some(reason),
            _ => None,
        }
    }
}
