//! Round state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of the current round.
///
/// State Machine:
/// ```text
/// [IDLE] ──trigger──→ [GATHERING] ──→ [SCORING] ──→ [SELECTING] ──→ [SUBMITTING]
///   ↑                      │              │              │    │            │
///   │                      └──────────────┴───────┬──────┘    │ dry run    │
///   │                                             ↓           ↓            ↓
///   └─────────────────────────────────────── [FAILED]       [DONE] ←───────┘
///   └──────────────────────────────────────────────────────────┘
/// ```
///
/// Any non-terminal phase may fail. Terminal phases return to `Idle`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundPhase {
    /// No round in flight
    #[default]
    Idle,
    /// Fetching chain data
    Gathering,
    /// Assembling and scoring records
    Scoring,
    /// Ranking and capping
    Selecting,
    /// Fetching the nonce and submitting
    Submitting,
    /// Round finished successfully
    Done,
    /// Round aborted
    Failed,
}

impl RoundPhase {
    /// Whether `self → next` is a legal transition.
    pub fn can_transition_to(self, next: RoundPhase) -> bool {
        use RoundPhase::*;
        matches!(
            (self, next),
            (Idle, Gathering)
                | (Gathering, Scoring)
                | (Scoring, Selecting)
                | (Selecting, Submitting)
                | (Selecting, Done)
                | (Submitting, Done)
                | (Gathering | Scoring | Selecting | Submitting, Failed)
                | (Done | Failed, Idle)
        )
    }

    /// `Done` or `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, RoundPhase::Done | RoundPhase::Failed)
    }

    /// Lowercase name for logs.
    pub fn as_str(self) -> &'static str {
        match self {
            RoundPhase::Idle => "idle",
            RoundPhase::Gathering => "gathering",
            RoundPhase::Scoring => "scoring",
            RoundPhase::Selecting => "selecting",
            RoundPhase::Submitting => "submitting",
            RoundPhase::Done => "done",
            RoundPhase::Failed => "failed",
        }
    }
}

impl fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
