//! Error types for the round orchestrator

use nc_01_chain_gateway::GatewayError;
use nc_02_validator_scoring::ScoringError;
use thiserror::Error;

use crate::domain::RoundPhase;

/// Result type alias for round operations
pub type Result<T> = std::result::Result<T, RoundError>;

/// Why a round failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoundError {
    /// Chain data could not be read or was inconsistent
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    /// Policy values are unusable
    #[error("Invalid configuration: {0}")]
    ConfigurationInvalid(String),

    /// The nomination did not reach the pool
    #[error("Submission failed: {0}")]
    SubmissionFailed(String),

    /// A chain connection is gone
    #[error("Connectivity lost: {0}")]
    ConnectivityLost(String),

    /// Nothing scored above zero
    #[error("No eligible validators among {scored} scored")]
    NoEligibleValidators {
        /// Records that were scored
        scored: usize,
    },
}

impl RoundError {
    /// Map a gateway error raised while in `phase`.
    pub fn from_gateway(err: GatewayError, phase: RoundPhase) -> Self {
        match (err, phase) {
            (GatewayError::Disconnected(endpoint), _) => RoundError::ConnectivityLost(endpoint),
            (
                GatewayError::Unavailable(msg)
                | GatewayError::Malformed(msg)
                | GatewayError::Rejected(msg),
                RoundPhase::Submitting,
            ) => RoundError::SubmissionFailed(msg),
            (GatewayError::Malformed(msg), _) => RoundError::DataUnavailable(format!("malformed: {msg}")),
            (GatewayError::Unavailable(msg) | GatewayError::Rejected(msg), _) => {
                RoundError::DataUnavailable(msg)
            }
        }
    }

    /// Only lost connectivity stops the orchestrator.
    pub fn is_fatal(&self) -> bool {
        matches!(self, RoundError::ConnectivityLost(_))
    }

    /// Metric label.
    pub fn kind(&self) -> &'static str {
        match self {
            RoundError::DataUnavailable(_) => "data_unavailable",
            RoundError::ConfigurationInvalid(_) => "configuration_invalid",
            RoundError::SubmissionFailed(_) => "submission_failed",
            RoundError::ConnectivityLost(_) => "connectivity_lost",
            RoundError::NoEligibleValidators { .. } => "no_eligible_validators",
        }
    }
}

impl From<ScoringError> for RoundError {
    fn from(err: ScoringError) -> Self {
        if err.is_configuration() {
            RoundError::ConfigurationInvalid(err.to_string())
        } else {
            RoundError::DataUnavailable(err.to_string())
        }
    }
}
