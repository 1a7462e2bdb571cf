//! Error types for the chain gateway

use thiserror::Error;

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors reported by gateway adapters
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Endpoint unreachable or the query failed remotely
    #[error("Chain data unavailable: {0}")]
    Unavailable(String),

    /// Response did not match the expected shape
    #[error("Malformed chain data: {0}")]
    Malformed(String),

    /// Connection to the endpoint is gone
    #[error("Disconnected from {0}")]
    Disconnected(String),

    /// Transaction refused by the pool
    #[error("Transaction rejected: {0}")]
    Rejected(String),
}

impl GatewayError {
    /// Lost connection; the process cannot make progress.
    pub fn is_disconnect(&self) -> bool {
        matches!(self, GatewayError::Disconnected(_))
    }

    /// A later attempt may succeed.
    pub fn is_recoverable(&self) -> bool {
        !self.is_disconnect()
    }
}
