//! The `Withdraw` message carried by `ft_transfer_call`.
//!
//! A UTXO withdrawal starts on NEAR: the wrapped token is transferred to the
//! connector with a JSON message naming the target address and the planned
//! transaction shape. The connector rebuilds and MPC-signs the transaction
//! from exactly these inputs and outputs.

use serde::{Deserialize, Serialize};

use crate::types::WithdrawalPlan;

/// One planned output as the connector expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawOutput {
    /// Hex-encoded script bytes.
    pub script_pubkey: String,
    pub value: u64,
}

/// Body of the `Withdraw` variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawArgs {
    pub target_btc_address: String,
    /// Input keys as `txid:vout`.
    pub input: Vec<String>,
    pub output: Vec<WithdrawOutput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_gas_fee: Option<String>,
}

/// The connector's message enum. Serialized as externally-tagged JSON:
/// `{"Withdraw": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WithdrawMessage {
    Withdraw(WithdrawArgs),
}

impl WithdrawMessage {
    /// Wrap a plan into the connector message.
    pub fn from_plan(
        plan: &WithdrawalPlan,
        target_address: &str,
        max_gas_fee: Option<u128>,
    ) -> Self {
        WithdrawMessage::Withdraw(WithdrawArgs {
            target_btc_address: target_address.to_string(),
            input: plan.inputs.iter().map(|utxo| utxo.key()).collect(),
            output: plan
                .outputs
                .iter()
                .map(|output| WithdrawOutput {
                    script_pubkey: hex::encode(&output.script_pubkey),
                    value: output.value,
                })
                .collect(),
            max_gas_fee: max_gas_fee.map(|fee| fee.to_string()),
        })
    }

    /// The JSON string placed in `ft_transfer_call`'s `msg` field.
    pub fn to_msg_string(&self) -> String {
        serde_json::to_string(self).expect("message serializes infallibly")
    }
}
