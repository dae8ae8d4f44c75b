//! UTXO records and withdrawal plans.

use serde::{Deserialize, Serialize};

use omni_bridge_types::proof::H256;

/// Network selector for address validation and script encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UtxoNetwork {
    Mainnet,
    Testnet,
}

/// An unspent output of the connector's wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utxo {
    pub txid: H256,
    pub vout: u32,
    /// Value in satoshis (zatoshis on Zcash).
    pub value: u64,
}

impl Utxo {
    /// The `txid:vout` key the connector uses to identify inputs.
    pub fn key(&self) -> String {
        format!("{}:{}", hex::encode(self.txid.0), self.vout)
    }
}

/// One output of a planned withdrawal transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedOutput {
    /// Raw script bytes.
    pub script_pubkey: Vec<u8>,
    pub value: u64,
}

/// A planned withdrawal: inputs to spend, outputs to create, and the fee
/// implied by their difference.
///
/// `sum(inputs) == sum(outputs) + fee` always holds; the target output's
/// value equals the requested amount exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalPlan {
    pub inputs: Vec<Utxo>,
    pub outputs: Vec<PlannedOutput>,
    pub fee: u64,
}

impl WithdrawalPlan {
    pub fn input_total(&self) -> u64 {
        self.inputs.iter().map(|utxo| utxo.value).sum()
    }

    pub fn output_total(&self) -> u64 {
        self.outputs.iter().map(|output| output.value).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utxo_key_format() {
        let utxo = Utxo {
            txid: H256([0xab; 32]),
            vout: 3,
            value: 50_000,
        };
        assert!(utxo.key().ends_with(":3"));
        assert!(utxo.key().starts_with("abab"));
    }
}
