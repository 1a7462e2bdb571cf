//! Duplicate era suppression.

use shared_types::EraIndex;

/// Remembers the latest processed era.
///
/// Eras only move forward: marking an older era is a no-op.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EraGuard {
    last_processed: Option<EraIndex>,
}

impl EraGuard {
    /// Latest processed era.
    pub fn last_processed(&self) -> Option<EraIndex> {
        self.last_processed
    }

    /// `era` is at or before the latest processed era.
    pub fn is_processed(&self, era: EraIndex) -> bool {
        self.last_processed.is_some_and(|last| era <= last)
    }

    /// Record `era` as processed. Returns whether the guard moved.
    pub fn mark(&mut self, era: EraIndex) -> bool {
        if self.is_processed(era) {
            return false;
        }
        self.last_processed = Some(era);
        true
    }
}
