//! # Shared Types Crate
//!
//! Chain primitives and nomination entities used by every subsystem of the
//! nominee election client.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Types that cross crate borders live here.
//! - **Opaque Addresses**: Account identifiers are carried as strings; no
//!   subsystem decodes or re-encodes them.
//! - **Exact Balances**: Stake amounts are `u128` base units end to end and
//!   travel as decimal strings on the wire.

pub mod entities;

pub use entities::*;
