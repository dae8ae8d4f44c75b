//! Proof blobs consumed by the NEAR bridge contract's provers.
//!
//! These records are opaque to callers: the schema is fixed by the consuming
//! contract, and the extractors emit them byte-exact. All of them Borsh
//! round-trip.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

use crate::errors::EncodingError;

/// A 32-byte hash in the byte order the bridge contracts expect.
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, Default, BorshSerialize, BorshDeserialize,
)]
pub struct H256(pub [u8; 32]);

impl H256 {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// The same hash with its byte order flipped.
    pub fn reversed(&self) -> H256 {
        let mut bytes = self.0;
        bytes.reverse();
        H256(bytes)
    }
}

impl Debug for H256 {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "H256(0x{})", hex::encode(self.0))
    }
}

impl Display for H256 {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl From<[u8; 32]> for H256 {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl FromStr for H256 {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.strip_prefix("0x").unwrap_or(s);
        let decoded = hex::decode(raw).map_err(|_| EncodingError::MalformedAddress(s.into()))?;
        let bytes: [u8; 32] = decoded
            .try_into()
            .map_err(|_| EncodingError::MalformedAddress(s.into()))?;
        Ok(Self(bytes))
    }
}

impl Serialize for H256 {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for H256 {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Discriminator telling the NEAR prover which event the proof attests.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    BorshSerialize,
    BorshDeserialize,
)]
pub enum ProofKind {
    InitTransfer,
    FinTransfer,
    DeployToken,
    LogMetadata,
}

/// A Merkle-Patricia inclusion proof for one EVM receipt log.
///
/// `receipt_data` follows the post-Berlin typed envelope rules and
/// `header_data` contains exactly the fields of the block's fork, so the
/// on-chain `receiptsRoot` check passes byte-for-byte.
#[derive(
    Debug, Clone, PartialEq, Eq, Default, BorshSerialize, BorshDeserialize,
)]
pub struct EvmProof {
    /// Index of the log of interest inside the receipt.
    pub log_index: u64,
    /// RLP-encoded log entry.
    pub log_entry_data: Vec<u8>,
    /// Index of the receipt within the block.
    pub receipt_index: u64,
    /// Typed-envelope-encoded receipt.
    pub receipt_data: Vec<u8>,
    /// RLP-encoded block header.
    pub header_data: Vec<u8>,
    /// Merkle-Patricia nodes from the receipts root to the receipt.
    pub proof: Vec<Vec<u8>>,
}

/// A SPV inclusion proof for a UTXO-chain transaction.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct UtxoProof {
    /// The raw transaction bytes.
    pub tx_bytes: Vec<u8>,
    /// Hash of the confirming block.
    pub tx_block_blockhash: H256,
    /// Position of the transaction in the block.
    pub tx_index: u64,
    /// Sibling hashes from the leaf to the Merkle root, in the byte order
    /// the receiving contract expects.
    pub merkle_proof: Vec<H256>,
}

/// A Wormhole-signed attestation, carried as hex-encoded VAA bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WormholeVaa(pub String);

impl WormholeVaa {
    pub fn new(bytes: &[u8]) -> Self {
        Self(hex::encode(bytes))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, EncodingError> {
        hex::decode(&self.0).map_err(|_| EncodingError::MalformedEvent("invalid VAA hex".into()))
    }
}

impl Display for WormholeVaa {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn h256_hex_round_trip() {
        let h: H256 = "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
            .parse()
            .unwrap();
        assert_eq!(
            h.to_string(),
            "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
        );
        assert_eq!(h.reversed().reversed(), h);
    }

    #[test]
    fn evm_proof_borsh_round_trip() {
        let proof = EvmProof {
            log_index: 3,
            log_entry_data: vec![1, 2, 3],
            receipt_index: 7,
            receipt_data: vec![4, 5],
            header_data: vec![6],
            proof: vec![vec![7, 8], vec![9]],
        };
        let bytes = borsh::to_vec(&proof).unwrap();
        let back = EvmProof::try_from_slice(&bytes).unwrap();
        assert_eq!(back, proof);
    }

    #[test]
    fn utxo_proof_borsh_round_trip() {
        let proof = UtxoProof {
            tx_bytes: vec![0xde, 0xad],
            tx_block_blockhash: H256([7; 32]),
            tx_index: 1,
            merkle_proof: vec![H256([1; 32]), H256([2; 32])],
        };
        let bytes = borsh::to_vec(&proof).unwrap();
        assert_eq!(UtxoProof::try_from_slice(&bytes).unwrap(), proof);
    }

    #[test]
    fn proof_kind_discriminants() {
        assert_eq!(borsh::to_vec(&ProofKind::InitTransfer).unwrap(), vec![0]);
        assert_eq!(borsh::to_vec(&ProofKind::LogMetadata).unwrap(), vec![3]);
    }
}
