//! JSON-RPC wire records for blocks, receipts, and logs.
//!
//! These records deserialize straight from `eth_getBlockByNumber` and
//! `eth_getTransactionReceipt` responses and feed the proof extractor.
//! Quantities arrive as `0x`-prefixed hex per the Ethereum JSON-RPC spec.

use alloy_primitives::{Address, B64, B256, Bloom, Bytes};
use serde::{Deserialize, Serialize};

/// Hex-quantity (de)serialization for `u64` fields.
pub mod quantity {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{value:x}"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let s = String::deserialize(deserializer)?;
        u64::from_str_radix(s.trim_start_matches("0x"), 16).map_err(serde::de::Error::custom)
    }
}

/// Hex-quantity (de)serialization for optional `u64` fields.
pub mod quantity_opt {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => serializer.serialize_str(&format!("0x{v:x}")),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<u64>, D::Error> {
        let s: Option<String> = Option::deserialize(deserializer)?;
        s.map(|s| {
            u64::from_str_radix(s.trim_start_matches("0x"), 16).map_err(serde::de::Error::custom)
        })
        .transpose()
    }
}

/// Hex-quantity (de)serialization for `u128` fields.
pub mod quantity_u128 {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{value:x}"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        let s = String::deserialize(deserializer)?;
        u128::from_str_radix(s.trim_start_matches("0x"), 16).map_err(serde::de::Error::custom)
    }
}

/// An execution-layer block header with the transaction hash list.
///
/// Optional fields mark fork boundaries: `base_fee_per_gas` (London),
/// `withdrawals_root` (Shapella), the blob fields and
/// `parent_beacon_block_root` (Dencun), `requests_hash` (Prague). The header
/// encoder emits exactly the fields present, in canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub hash: B256,
    pub parent_hash: B256,
    pub sha3_uncles: B256,
    pub miner: Address,
    pub state_root: B256,
    pub transactions_root: B256,
    pub receipts_root: B256,
    pub logs_bloom: Bloom,
    pub difficulty: alloy_primitives::U256,
    #[serde(with = "quantity")]
    pub number: u64,
    #[serde(with = "quantity")]
    pub gas_limit: u64,
    #[serde(with = "quantity")]
    pub gas_used: u64,
    #[serde(with = "quantity")]
    pub timestamp: u64,
    pub extra_data: Bytes,
    pub mix_hash: B256,
    pub nonce: B64,
    #[serde(default, with = "quantity_opt", skip_serializing_if = "Option::is_none")]
    pub base_fee_per_gas: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub withdrawals_root: Option<B256>,
    #[serde(default, with = "quantity_opt", skip_serializing_if = "Option::is_none")]
    pub blob_gas_used: Option<u64>,
    #[serde(default, with = "quantity_opt", skip_serializing_if = "Option::is_none")]
    pub excess_blob_gas: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_beacon_block_root: Option<B256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requests_hash: Option<B256>,
    /// Transaction hashes in block order.
    #[serde(default)]
    pub transactions: Vec<B256>,
}

/// One log entry of a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
}

/// A transaction receipt as returned by `eth_getTransactionReceipt`.
///
/// Post-Byzantium receipts carry `status`; archaic pre-Byzantium receipts
/// carry the intermediate state `root` instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: B256,
    #[serde(with = "quantity")]
    pub transaction_index: u64,
    /// EIP-2718 transaction type; 0 for legacy.
    #[serde(rename = "type", default, with = "quantity")]
    pub tx_type: u64,
    #[serde(default, with = "quantity_opt", skip_serializing_if = "Option::is_none")]
    pub status: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<B256>,
    #[serde(with = "quantity")]
    pub cumulative_gas_used: u64,
    pub logs_bloom: Bloom,
    pub logs: Vec<LogEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipt_deserializes_from_rpc_json() {
        let json = r#"{
            "transactionHash": "0xc4a6c5cde1d243b26b013f805f71f6de91536f66c993abfee746f373203b68cc",
            "transactionIndex": "0x12",
            "type": "0x2",
            "status": "0x1",
            "cumulativeGasUsed": "0x3be044",
            "logsBloom": "0x00000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000",
            "logs": [{
                "address": "0xdac17f958d2ee523a2206206994597c13d831ec7",
                "topics": ["0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"],
                "data": "0x00000000000000000000000000000000000000000000000000000000000f4240"
            }]
        }"#;
        let receipt: TransactionReceipt = serde_json::from_str(json).unwrap();
        assert_eq!(receipt.transaction_index, 0x12);
        assert_eq!(receipt.tx_type, 2);
        assert_eq!(receipt.status, Some(1));
        assert_eq!(receipt.logs.len(), 1);
    }

    #[test]
    fn block_fork_fields_default_to_none() {
        let json = r#"{
            "hash": "0x00000000000000000000000000000000000000000000000000000000000000aa",
            "parentHash": "0x00000000000000000000000000000000000000000000000000000000000000bb",
            "sha3Uncles": "0x1dcc4de8dec75d7aab85b567b6ccd41ad312451b948a7413f0a142fd40d49347",
            "miner": "0x0000000000000000000000000000000000000000",
            "stateRoot": "0x00000000000000000000000000000000000000000000000000000000000000cc",
            "transactionsRoot": "0x00000000000000000000000000000000000000000000000000000000000000dd",
            "receiptsRoot": "0x00000000000000000000000000000000000000000000000000000000000000ee",
            "logsBloom": "0x00000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000",
            "difficulty": "0x0",
            "number": "0xf4240",
            "gasLimit": "0x1c9c380",
            "gasUsed": "0x5208",
            "timestamp": "0x60a7c300",
            "extraData": "0x",
            "mixHash": "0x0000000000000000000000000000000000000000000000000000000000000000",
            "nonce": "0x0000000000000000",
            "transactions": []
        }"#;
        let block: Block = serde_json::from_str(json).unwrap();
        assert_eq!(block.number, 1_000_000);
        assert!(block.base_fee_per_gas.is_none());
        assert!(block.withdrawals_root.is_none());
        assert!(block.requests_hash.is_none());
    }
}
