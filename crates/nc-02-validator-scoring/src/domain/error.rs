//! Error types for Validator Scoring

use shared_types::AccountId;

/// Scoring error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    /// A coefficient is negative, NaN or infinite.
    #[error("Invalid scoring coefficients: {0}")]
    InvalidCoefficients(String),

    /// `10^decimals` does not fit a balance.
    #[error("Invalid token decimals: {0}")]
    InvalidTokenDecimals(u8),

    /// The validator cap must be positive.
    #[error("Invalid max validators: {0}")]
    InvalidMaxValidators(u32),

    /// A stash has no validator account info in the snapshot.
    #[error("Missing account info for stash {0}")]
    MissingAccount(AccountId),
}

impl ScoringError {
    /// Whether the error stems from policy rather than chain data.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, ScoringError::MissingAccount(_))
    }
}
