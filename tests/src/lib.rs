//! # Nominee Election Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/
//! │   ├── fixtures.rs        # Chain fixtures shared by the flows
//! │   └── integration/       # Cross-subsystem flows over the in-memory chain
//! │       ├── scoring.rs     # Gateway → scoring → selection
//! │       ├── rounds.rs      # Orchestrator rounds, era guard, single flight
//! │       └── runtime.rs     # Runtime wiring, triggers and shutdown paths
//! └── benches/
//!     └── scoring_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p nc-tests
//!
//! # By category
//! cargo test -p nc-tests integration::rounds::
//!
//! # Benchmarks
//! cargo bench -p nc-tests
//! ```

pub mod fixtures;
pub mod integration;
