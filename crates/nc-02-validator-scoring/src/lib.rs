//! # NC-02 Validator Scoring
//!
//! Turns a round snapshot of raw chain data into a ranked, capped list of
//! nominees.
//!
//! **Subsystem ID:** 02
//! **Architecture:** Hexagonal (pure domain, no ports)
//!
//! ## Pipeline
//!
//! ```text
//! RoundSnapshot ──assemble──→ [ValidatorRecord] ──ScoreEngine──→ scored records
//!                                                                   │
//!                                      [NominationEntry] ←─Selector─┘
//! ```
//!
//! Everything in this crate is deterministic: the same snapshot and policy
//! always produce the same ranking, byte for byte.
//!
//! ## Score
//!
//! | Factor | Value |
//! |--------|-------|
//! | reputation `r` | 1 if identity with display name and not blocked, else 0 |
//! | commission | `commission_weight × (1 − commission)`, 0 above the commission cap |
//! | nomination `n` | nominated stake in whole tokens, score 0 when `n == 0` |
//! | era points | `nomination_weight × 1/n × era_points_weight × avg/avg_of_all` |
//! | slash `sr` | 0 if slashed within the window, else 1 |
//!
//! `score = round(r × (commission + era points) × sr)`
//!
//! ## Module Structure
//!
//! ```text
//! nc-02-validator-scoring/
//! ├── domain/          # Records, snapshot, assembly, window, scoring, selection, errors
//! ├── service.rs       # evaluate_snapshot: the whole pipeline in one call
//! └── config.rs        # ScoringPolicy, SelectionPolicy
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod domain;
pub mod service;

// Re-exports
pub use config::{
    ScoringPolicy, SelectionPolicy, TieBreak, DEFAULT_ERA_WINDOW, DEFAULT_MAX_COMMISSION_PERCENT,
    DEFAULT_MAX_VALIDATORS,
};
pub use domain::{
    assemble_records, era_points_ratio, score_validator, select_nominees, select_window,
    RoundSnapshot, ScoreEngine, ScoringError, Selector, ValidatorRecord,
};
pub use service::{evaluate_snapshot, Ranking};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
