//! # Nominate Runtime Library
//!
//! Pieces of the `nominate-client` binary, exposed for testing. The entry
//! point is `main.rs`.
//!
//! ## Startup Sequence
//!
//! 1. Parse the command line (`NC_*` environment variables as fallback)
//! 2. Read the seed, from the prompt in interactive mode
//! 3. Load and validate the policy file
//! 4. Install logging and register metrics
//! 5. Connect to the relay and para chains
//! 6. Start the trigger sources and the round orchestrator
//!
//! ## Exit Codes
//!
//! | Code | Cause |
//! |------|-------|
//! | 0 | Ctrl+C |
//! | 1 | configuration error, connection failure or lost connectivity |

#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod metrics_server;
pub mod wiring;

pub use cli::{resolve_seed, Cli, TriggerMode};
pub use config::{ConfigError, FileConfig, RuntimeConfig};
pub use wiring::{run, run_with, Adapters};
