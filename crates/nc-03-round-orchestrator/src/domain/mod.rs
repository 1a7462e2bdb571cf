//! Domain layer for the Round Orchestrator
//!
//! - phase: round state machine
//! - trigger: what starts a round
//! - round: round identity, outcome and report
//! - era_guard: duplicate era suppression

mod era_guard;
mod phase;
mod round;
mod trigger;

pub use era_guard::*;
pub use phase::*;
pub use round::*;
pub use trigger::*;
