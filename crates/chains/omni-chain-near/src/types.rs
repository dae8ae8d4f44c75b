//! Unsigned NEAR transactions and the locker's gas and deposit constants.

use serde::{Deserialize, Serialize};

use omni_bridge_types::address::AccountId;

/// One TGas in gas units.
pub const TGAS: u64 = 1_000_000_000_000;

/// One NEAR in yoctoNEAR.
pub const ONE_NEAR: u128 = 1_000_000_000_000_000_000_000_000;

/// The one-yocto deposit NEP-141 methods require as a confirmation nudge.
pub const ONE_YOCTO: u128 = 1;

/// Gas and deposit table for the locker's methods. The values are
/// load-bearing: the contract panics on underfunded calls.
pub const LOG_METADATA_GAS: u64 = 300 * TGAS;
pub const LOG_METADATA_DEPOSIT: u128 = 2 * ONE_NEAR / 10;
pub const DEPLOY_TOKEN_GAS: u64 = 120 * TGAS;
pub const BIND_TOKEN_GAS: u64 = 300 * TGAS;
pub const INIT_TRANSFER_GAS: u64 = 300 * TGAS;
pub const FIN_TRANSFER_GAS: u64 = 300 * TGAS;
pub const SIGN_TRANSFER_GAS: u64 = 300 * TGAS;
pub const STORAGE_DEPOSIT_GAS: u64 = 10 * TGAS;

/// An action inside an unsigned NEAR transaction.
///
/// Only the action kinds the bridge emits are modeled; args are already
/// serialized (JSON or Borsh, depending on the method).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NearAction {
    FunctionCall {
        method_name: String,
        args: Vec<u8>,
        gas: u64,
        deposit: u128,
    },
    Transfer {
        deposit: u128,
    },
}

/// A stateless unsigned NEAR transaction.
///
/// The consumer supplies nonce and recent block hash at signing time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NearUnsignedTransaction {
    pub signer_id: AccountId,
    pub receiver_id: AccountId,
    pub actions: Vec<NearAction>,
}

impl NearUnsignedTransaction {
    pub fn new(signer_id: AccountId, receiver_id: AccountId, actions: Vec<NearAction>) -> Self {
        Self {
            signer_id,
            receiver_id,
            actions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_match_the_contract_table() {
        assert_eq!(LOG_METADATA_GAS, 300_000_000_000_000);
        assert_eq!(LOG_METADATA_DEPOSIT, 200_000_000_000_000_000_000_000);
        assert_eq!(DEPLOY_TOKEN_GAS, 120_000_000_000_000);
        assert_eq!(ONE_YOCTO, 1);
    }
}
