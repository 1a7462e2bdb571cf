//! Domain layer for Validator Scoring
//!
//! - record: per-validator scoring input
//! - snapshot: raw round inputs as gathered from the chain
//! - assembly: snapshot → records
//! - window: era observation window
//! - scoring: the score formula
//! - selection: ranking and capping

mod assembly;
mod error;
mod record;
mod scoring;
mod selection;
mod snapshot;
mod window;

pub use assembly::*;
pub use error::*;
pub use record::*;
pub use scoring::*;
pub use selection::*;
pub use snapshot::*;
pub use window::*;
