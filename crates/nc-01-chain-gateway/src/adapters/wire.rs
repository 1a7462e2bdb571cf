//! JSON shapes exchanged with the chain-client bridge.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use shared_types::{
    AccountId, Balance, NominationCall, Nonce, Perbill, ScoringCoefficients, ValidatorAccount,
    ValidatorIdentity,
};

/// `identity_hasIdentityMulti` item.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireIdentity {
    pub stash: AccountId,
    pub has_identity: bool,
    #[serde(default)]
    pub display: Option<String>,
}

impl WireIdentity {
    pub fn into_entry(self) -> (AccountId, ValidatorIdentity) {
        (
            self.stash,
            ValidatorIdentity {
                has_identity: self.has_identity,
                display_name: self.display,
            },
        )
    }
}

/// `staking_validatorAccounts` item.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireValidatorAccount {
    pub stash_id: AccountId,
    pub account_id: AccountId,
    pub controller_id: AccountId,
    pub validator_prefs: WireValidatorPrefs,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireValidatorPrefs {
    /// Parts per billion.
    pub commission: u32,
    #[serde(default)]
    pub blocked: bool,
}

impl WireValidatorAccount {
    pub fn into_entry(self) -> (AccountId, ValidatorAccount) {
        (
            self.stash_id,
            ValidatorAccount {
                account_id: self.account_id,
                controller_id: self.controller_id,
                commission: Perbill::from_parts(self.validator_prefs.commission),
                blocked: self.validator_prefs.blocked,
            },
        )
    }
}

/// `staking_eraSlashes` item.
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireSlash {
    pub validator: AccountId,
    #[serde_as(as = "DisplayFromStr")]
    pub amount: Balance,
}

/// `system_properties` result. Only the decimals are read.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireProperties {
    pub token_decimals: Option<WireDecimals>,
}

/// Chains report decimals either as a number or one per token.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum WireDecimals {
    Single(u8),
    PerToken(Vec<u8>),
}

impl WireDecimals {
    pub fn native(&self) -> Option<u8> {
        match self {
            WireDecimals::Single(d) => Some(*d),
            WireDecimals::PerToken(all) => all.first().copied(),
        }
    }
}

/// `nomineeElection_coefficients` result.
#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct WireCoefficients {
    pub crf: f64,
    pub nf: f64,
    pub epf: f64,
}

impl From<WireCoefficients> for ScoringCoefficients {
    fn from(value: WireCoefficients) -> Self {
        ScoringCoefficients {
            commission_weight: value.crf,
            nomination_weight: value.nf,
            era_points_weight: value.epf,
        }
    }
}

/// Signed submission envelope sent to `nomineeElection_submitNomination`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SignedNomination<'a> {
    pub signer: &'a AccountId,
    pub nonce: Nonce,
    pub call: &'a NominationCall,
    /// Hex signature over the JSON encoding of `(nonce, call)`.
    pub signature: String,
}

/// Bytes covered by the submission signature.
pub(crate) fn signing_payload(call: &NominationCall, nonce: Nonce) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(&(nonce, call))
}
