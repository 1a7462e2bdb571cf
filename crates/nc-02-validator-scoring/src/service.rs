//! # Scoring Service
//!
//! Runs the full pipeline over one snapshot.

use serde::{Deserialize, Serialize};
use shared_types::{NominationCall, NominationEntry};

use crate::config::{ScoringPolicy, SelectionPolicy};
use crate::domain::{assemble_records, RoundSnapshot, ScoreEngine, ScoringError, Selector, ValidatorRecord};

/// Result of evaluating one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    /// Every assembled record, with its score.
    pub records: Vec<ValidatorRecord>,
    /// Selected nominees in rank order.
    pub selected: Vec<NominationEntry>,
}

impl Ranking {
    /// Records with a non-zero score.
    pub fn positive_count(&self) -> usize {
        self.records.iter().filter(|r| r.score_or_zero() > 0).count()
    }

    /// Nomination payload for this ranking.
    pub fn to_call(&self, snapshot: &RoundSnapshot) -> NominationCall {
        NominationCall {
            derivative_index: snapshot.derivative_index,
            entries: self.selected.clone(),
        }
    }
}

/// Assemble, score and select.
pub fn evaluate_snapshot(
    snapshot: &RoundSnapshot,
    scoring: ScoringPolicy,
    selection: SelectionPolicy,
) -> Result<Ranking, ScoringError> {
    let selector = Selector::new(selection)?;
    let engine = ScoreEngine::new(scoring);

    let mut records = assemble_records(snapshot)?;
    engine.score_all(&mut records);
    let selected = selector.select(&records);

    Ok(Ranking { records, selected })
}
