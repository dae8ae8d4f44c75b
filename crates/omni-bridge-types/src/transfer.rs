//! Transfer intents and the validated transfer contract.
//!
//! All records here are immutable value types. The validator builds a
//! [`ValidatedTransfer`] once per call; chain builders consume it but never
//! mutate it.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::address::OmniAddress;
use crate::chain::ChainKind;

/// A caller's cross-chain transfer intent.
///
/// `amount`, `fee`, and `native_fee` are denominated in the origin token's
/// decimals, not the bridged token's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferParams {
    /// The token being transferred, tagged with its current chain.
    pub token: OmniAddress,
    /// Transfer amount in origin-token decimals.
    pub amount: u128,
    /// Relayer fee in the transferred token, origin-token decimals.
    pub fee: u128,
    /// Destination-chain gas subsidy, origin-token decimals.
    pub native_fee: u128,
    pub sender: OmniAddress,
    pub recipient: OmniAddress,
    /// Optional message delivered to the recipient contract.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub options: TransferOptions,
}

/// Per-transfer overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferOptions {
    /// Cap on the gas fee a UTXO withdrawal may spend, in satoshis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_gas_fee: Option<u128>,
}

/// A token's precision on its current chain and on its home chain.
///
/// Asymmetric by design: a 24-decimal NEAR token may map to 18 decimals on
/// Ethereum, and normalization between the two must not lose precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDecimals {
    /// Precision on the chain the token currently lives on.
    pub decimals: u8,
    /// Precision on the token's home chain.
    pub origin_decimals: u8,
}

/// The chain-neutral output of the validator, consumed by every builder.
///
/// `normalized_amount` and `normalized_fee` are expressed in the destination
/// chain's decimal system and satisfy
/// `normalized_amount - normalized_fee >= 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedTransfer {
    pub params: TransferParams,
    pub source_chain: ChainKind,
    pub dest_chain: ChainKind,
    /// Amount in destination-chain decimals.
    pub normalized_amount: u128,
    /// Fee in destination-chain decimals.
    pub normalized_fee: u128,
    /// The settlement contract on the source chain the builder targets.
    pub contract_address: String,
    /// The token's representation on the destination chain.
    pub bridged_token: OmniAddress,
}

/// Identifier of a transfer across the whole bridge: the chain it started on
/// plus the origin contract's nonce.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    BorshSerialize,
    BorshDeserialize,
)]
pub struct TransferId {
    pub origin_chain: ChainKind,
    pub origin_nonce: u64,
}

impl Display for TransferId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.origin_chain, self.origin_nonce)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_id_display() {
        let id = TransferId {
            origin_chain: ChainKind::Arb,
            origin_nonce: 42,
        };
        assert_eq!(id.to_string(), "arb:42");
    }

    #[test]
    fn params_serde_round_trip() {
        let params = TransferParams {
            token: "near:wrap.testnet".parse().unwrap(),
            amount: 10u128.pow(24),
            fee: 0,
            native_fee: 0,
            sender: "near:alice.testnet".parse().unwrap(),
            recipient: "eth:0xA7C29dA7599817edA0f829E7B8d0FFE23D81c4d3"
                .parse()
                .unwrap(),
            message: None,
            options: TransferOptions::default(),
        };
        let json = serde_json::to_string(&params).unwrap();
        let back: TransferParams = serde_json::from_str(&json).unwrap();
        assert_eq!(back, params);
    }
}
