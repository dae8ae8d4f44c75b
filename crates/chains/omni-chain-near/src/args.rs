//! Argument shapes the locker contract accepts.
//!
//! JSON args follow NEAR convention: `u128` values travel as decimal
//! strings. Borsh args are wire contracts with the on-chain structs and
//! must round-trip byte-exact.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use omni_bridge_types::address::AccountId;
use omni_bridge_types::chain::ChainKind;
use omni_bridge_types::proof::{EvmProof, ProofKind};
use omni_bridge_types::transfer::TransferId;
use omni_bridge_types::OmniAddress;

/// Decimal-string (de)serialization for `u128` JSON fields.
pub mod dec_u128 {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The `msg` payload of an init-transfer `ft_transfer_call`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitTransferMessage {
    pub recipient: OmniAddress,
    #[serde(with = "dec_u128")]
    pub fee: u128,
    #[serde(with = "dec_u128")]
    pub native_token_fee: u128,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

/// JSON args of `ft_transfer_call` itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FtTransferCallArgs {
    pub receiver_id: AccountId,
    #[serde(with = "dec_u128")]
    pub amount: u128,
    pub msg: String,
}

/// JSON args of `log_metadata`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogMetadataArgs {
    pub token_id: AccountId,
}

/// JSON args of NEP-145 `storage_deposit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageDepositArgs {
    pub account_id: AccountId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_only: Option<bool>,
}

/// Relayer compensation attached to a sign request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferFee {
    #[serde(with = "dec_u128")]
    pub fee: u128,
    #[serde(with = "dec_u128")]
    pub native_fee: u128,
}

/// JSON args of `sign_transfer`, requesting an MPC signature for the
/// destination-chain leg.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignTransferArgs {
    pub transfer_id: TransferId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_recipient: Option<AccountId>,
    pub fee: TransferFee,
}

/// One storage registration the locker performs while finalizing.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct StorageDepositAction {
    pub token_id: AccountId,
    pub account_id: AccountId,
    pub storage_deposit_amount: Option<u128>,
}

/// Borsh prover args for a Wormhole-attested event.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct WormholeVerifyProofArgs {
    pub proof_kind: ProofKind,
    /// Hex-encoded signed VAA bytes.
    pub vaa: String,
}

/// Borsh prover args for an EVM receipt proof.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct EvmVerifyProofArgs {
    pub proof_kind: ProofKind,
    pub proof: EvmProof,
}

/// Borsh envelope of `fin_transfer`.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct FinTransferArgs {
    pub chain_kind: ChainKind,
    pub storage_deposit_actions: Vec<StorageDepositAction>,
    /// Borsh bytes of one of the `*VerifyProofArgs` variants.
    pub prover_args: Vec<u8>,
}

/// Borsh envelope of `bind_token`.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct BindTokenArgs {
    pub chain_kind: ChainKind,
    pub prover_args: Vec<u8>,
}

/// Borsh envelope of `deploy_token`.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct DeployTokenArgs {
    pub chain_kind: ChainKind,
    pub prover_args: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn init_transfer_message_uses_decimal_strings() {
        let msg = InitTransferMessage {
            recipient: "eth:0xA7C29dA7599817edA0f829E7B8d0FFE23D81c4d3"
                .parse()
                .unwrap(),
            fee: 10u128.pow(24),
            native_token_fee: 0,
            msg: None,
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["fee"], "1000000000000000000000000");
        assert_eq!(json["native_token_fee"], "0");
        assert_eq!(
            json["recipient"],
            "eth:0xA7C29dA7599817edA0f829E7B8d0FFE23D81c4d3"
        );
        assert!(json.get("msg").is_none());
    }

    #[test]
    fn fin_transfer_args_borsh_round_trip() {
        let prover_args = borsh::to_vec(&WormholeVerifyProofArgs {
            proof_kind: ProofKind::InitTransfer,
            vaa: "0102ab".to_string(),
        })
        .unwrap();
        let args = FinTransferArgs {
            chain_kind: ChainKind::Sol,
            storage_deposit_actions: vec![StorageDepositAction {
                token_id: AccountId::from_str("token.bridge.near").unwrap(),
                account_id: AccountId::from_str("alice.near").unwrap(),
                storage_deposit_amount: Some(1_250_000_000_000_000_000_000),
            }],
            prover_args,
        };
        let bytes = borsh::to_vec(&args).unwrap();
        let back = FinTransferArgs::try_from_slice(&bytes).unwrap();
        assert_eq!(back, args);
        // chain_kind discriminant leads the envelope
        assert_eq!(bytes[0], 2);
    }

    #[test]
    fn evm_verify_proof_args_round_trip() {
        let args = EvmVerifyProofArgs {
            proof_kind: ProofKind::DeployToken,
            proof: EvmProof {
                log_index: 1,
                log_entry_data: vec![0xaa],
                receipt_index: 2,
                receipt_data: vec![0xbb],
                header_data: vec![0xcc],
                proof: vec![vec![0xdd]],
            },
        };
        let bytes = borsh::to_vec(&args).unwrap();
        assert_eq!(EvmVerifyProofArgs::try_from_slice(&bytes).unwrap(), args);
    }
}
