//! Gateway configuration

use serde::{Deserialize, Serialize};

/// Default relay chain endpoint.
pub const DEFAULT_RELAY_WS: &str = "ws://127.0.0.1:9944";

/// Default para chain endpoint.
pub const DEFAULT_PARA_WS: &str = "ws://127.0.0.1:9948";

/// Endpoints of the two chains.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Relay chain WebSocket URL
    pub relay_ws: String,
    /// Para chain WebSocket URL
    pub para_ws: String,
    /// Upper bound on buffered era notifications per subscription
    pub subscription_buffer: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            relay_ws: DEFAULT_RELAY_WS.to_string(),
            para_ws: DEFAULT_PARA_WS.to_string(),
            subscription_buffer: 64,
        }
    }
}

impl GatewayConfig {
    /// Reject URLs that are not WebSocket endpoints.
    pub fn validate(&self) -> Result<(), String> {
        for (name, url) in [("relay_ws", &self.relay_ws), ("para_ws", &self.para_ws)] {
            if !(url.starts_with("ws://") || url.starts_with("wss://")) {
                return Err(format!("{name} must be a ws:// or wss:// URL, got {url}"));
            }
        }
        if self.subscription_buffer == 0 {
            return Err("subscription_buffer must be positive".to_string());
        }
        Ok(())
    }
}
