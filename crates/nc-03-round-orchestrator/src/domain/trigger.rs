//! Round triggers.

use serde::{Deserialize, Serialize};
use shared_types::EraIndex;
use std::fmt;

/// Request to run a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trigger {
    /// n-th interval tick
    Tick(u64),
    /// Relay chain entered `era`
    EraChanged(EraIndex),
}

impl Trigger {
    /// Kind without payload.
    pub fn kind(&self) -> TriggerKind {
        match self {
            Trigger::Tick(_) => TriggerKind::Tick,
            Trigger::EraChanged(_) => TriggerKind::EraChanged,
        }
    }

    /// Era carried by the trigger, if any. Ticks resolve theirs from the chain.
    pub fn era(&self) -> Option<EraIndex> {
        match self {
            Trigger::Tick(_) => None,
            Trigger::EraChanged(era) => Some(*era),
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Tick(n) => write!(f, "tick #{n}"),
            Trigger::EraChanged(era) => write!(f, "era change to {era}"),
        }
    }
}

/// Trigger kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerKind {
    /// Interval tick
    Tick,
    /// Era change
    EraChanged,
}

impl TriggerKind {
    /// Lowercase name for logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            TriggerKind::Tick => "tick",
            TriggerKind::EraChanged => "era_changed",
        }
    }
}
