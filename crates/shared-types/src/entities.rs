//! # Core Domain Entities
//!
//! Defines the chain-facing entities exchanged between the gateway, the
//! scoring engine and the round orchestrator.
//!
//! ## Clusters
//!
//! - **Chain primitives**: `AccountId`, `EraIndex`, `Balance`, `Perbill`, `Nonce`
//! - **Validator data**: `ValidatorIdentity`, `ValidatorAccount`, `Exposure`, `EraPoints`
//! - **Policy**: `ScoringCoefficients`
//! - **Output**: `NominationEntry`, `NominationCall`

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// CLUSTER A: CHAIN PRIMITIVES
// =============================================================================

/// Era index on the relay chain.
pub type EraIndex = u32;

/// Token amount in base units (plancks).
pub type Balance = u128;

/// Account transaction index.
pub type Nonce = u64;

/// Integer validator score.
pub type Score = u128;

/// Era reward points.
pub type RewardPoint = u32;

/// Index of the liquid-staking derivative account (pool) being nominated for.
pub type DerivativeIndex = u16;

/// Opaque chain address.
///
/// Addresses are never decoded by this client; equality and ordering are
/// plain string comparisons.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Wrap an address string.
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Borrow the address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for AccountId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Hash of a submitted transaction, as returned by the pool.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(pub String);

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fixed-point fraction in parts per billion.
///
/// Validator commission is declared on-chain with this accuracy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Perbill(u32);

impl Perbill {
    /// Parts representing 100%.
    pub const ACCURACY: u32 = 1_000_000_000;

    /// Build from raw parts, saturating at 100%.
    pub const fn from_parts(parts: u32) -> Self {
        if parts > Self::ACCURACY {
            Self(Self::ACCURACY)
        } else {
            Self(parts)
        }
    }

    /// Build from a percentage such as `7.5`. Non-finite input maps to zero.
    pub fn from_percent(percent: f64) -> Self {
        if !percent.is_finite() || percent <= 0.0 {
            return Self(0);
        }
        let parts = (percent / 100.0 * f64::from(Self::ACCURACY)).round();
        Self::from_parts(parts.min(f64::from(Self::ACCURACY)) as u32)
    }

    /// Raw parts.
    pub const fn deconstruct(self) -> u32 {
        self.0
    }

    /// Fraction in `[0, 1]`.
    pub fn as_fraction(self) -> f64 {
        f64::from(self.0) / f64::from(Self::ACCURACY)
    }
}

impl fmt::Display for Perbill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}%", self.as_fraction() * 100.0)
    }
}

// =============================================================================
// CLUSTER B: VALIDATOR DATA
// =============================================================================

/// On-chain identity registration of a validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorIdentity {
    /// Whether an identity is registered for the stash.
    pub has_identity: bool,
    /// Display name, if the identity carries one.
    #[serde(default)]
    pub display_name: Option<String>,
}

impl ValidatorIdentity {
    /// Identity with a display name.
    pub fn named(display_name: impl Into<String>) -> Self {
        Self {
            has_identity: true,
            display_name: Some(display_name.into()),
        }
    }

    /// Missing identity.
    pub fn none() -> Self {
        Self::default()
    }
}

/// Staking account information of a validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorAccount {
    /// Account the validator is known by in era points and slashes.
    pub account_id: AccountId,
    /// Controller (management) account.
    pub controller_id: AccountId,
    /// Declared commission.
    pub commission: Perbill,
    /// Whether the validator refuses new nominations.
    pub blocked: bool,
}

/// Stake backing a validator in the active era.
#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Exposure {
    /// Own stake plus nominated stake.
    #[serde_as(as = "DisplayFromStr")]
    pub total: Balance,
    /// Validator's own stake.
    #[serde_as(as = "DisplayFromStr")]
    pub own: Balance,
}

impl Exposure {
    /// Stake contributed by nominators, never negative.
    pub fn nominated(&self) -> Balance {
        self.total.saturating_sub(self.own)
    }
}

/// Reward points earned during one era.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EraPoints {
    /// Era the points belong to.
    pub era: EraIndex,
    /// Points earned by the whole validator set.
    pub total: RewardPoint,
    /// Points per validator account.
    #[serde(default)]
    pub validators: BTreeMap<AccountId, RewardPoint>,
}

/// Slashes applied during one era, by validator account.
pub type EraSlashes = BTreeMap<AccountId, Balance>;

// =============================================================================
// CLUSTER C: POLICY
// =============================================================================

/// Weights of the scoring formula.
///
/// Supplied fresh each round, never mutated by the scoring engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringCoefficients {
    /// Weight of `(1 - commission)`.
    pub commission_weight: f64,
    /// Weight of the inverse nomination term.
    pub nomination_weight: f64,
    /// Weight of the era points ratio.
    pub era_points_weight: f64,
}

impl Default for ScoringCoefficients {
    fn default() -> Self {
        Self {
            commission_weight: 100.0,
            nomination_weight: 1000.0,
            era_points_weight: 10.0,
        }
    }
}

impl ScoringCoefficients {
    /// All weights are finite and non-negative.
    pub fn is_valid(&self) -> bool {
        [
            self.commission_weight,
            self.nomination_weight,
            self.era_points_weight,
        ]
        .iter()
        .all(|w| w.is_finite() && *w >= 0.0)
    }
}

// =============================================================================
// CLUSTER D: OUTPUT
// =============================================================================

/// One selected validator, in rank order.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NominationEntry {
    /// Identity display name, if any.
    pub display_name: Option<String>,
    /// Validator account.
    pub account_id: AccountId,
    /// Nominated stake in base units.
    #[serde_as(as = "DisplayFromStr")]
    pub stake: Balance,
    /// Score the validator was ranked by.
    #[serde_as(as = "DisplayFromStr")]
    pub score: Score,
}

/// Payload of the nomination transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NominationCall {
    /// Liquid-staking pool the nomination applies to.
    pub derivative_index: Option<DerivativeIndex>,
    /// Ranked nominees. Order is significant.
    pub entries: Vec<NominationEntry>,
}

impl NominationCall {
    /// Nominee addresses in rank order.
    pub fn targets(&self) -> Vec<AccountId> {
        self.entries.iter().map(|e| e.account_id.clone()).collect()
    }

    /// Number of nominees.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// No nominees.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
