//! Operation builders for the NEAR locker.
//!
//! Builders are deterministic given their inputs; the storage-deposit
//! preflight is the one stateful operation, reading balances through a
//! [`StorageBalanceSource`] seam. Two concurrent transfers from the same
//! account may both fund the gap; the contract accepts excess storage
//! deposit idempotently, so that is wasteful but self-healing.

use async_trait::async_trait;

use omni_bridge_types::address::AccountId;
use omni_bridge_types::errors::ValidationError;
use omni_bridge_types::transfer::ValidatedTransfer;
use omni_bridge_types::{BridgeSdkError, Result};

use crate::args::{
    BindTokenArgs, DeployTokenArgs, FinTransferArgs, FtTransferCallArgs, InitTransferMessage,
    LogMetadataArgs, SignTransferArgs, StorageDepositArgs,
};
use crate::types::{
    BIND_TOKEN_GAS, DEPLOY_TOKEN_GAS, FIN_TRANSFER_GAS, INIT_TRANSFER_GAS, LOG_METADATA_DEPOSIT,
    LOG_METADATA_GAS, NearAction, NearUnsignedTransaction, ONE_YOCTO, SIGN_TRANSFER_GAS,
    STORAGE_DEPOSIT_GAS,
};

/// A NEP-145 storage balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageBalance {
    pub total: u128,
    pub available: u128,
}

/// View-call seam for the storage-deposit preflight.
///
/// Implemented by the facade's NEAR RPC adapter; test doubles implement it
/// directly.
#[async_trait]
pub trait StorageBalanceSource {
    /// `storage_balance_of(account)` on `contract`.
    async fn storage_balance_of(
        &self,
        contract: &AccountId,
        account: &AccountId,
    ) -> Result<Option<StorageBalance>>;

    /// The locker's `required_balance_for_account` view.
    async fn required_balance_for_account(&self) -> Result<u128>;

    /// The locker's `required_balance_for_init_transfer` view.
    async fn required_balance_for_init_transfer(&self) -> Result<u128>;
}

/// Builder for the NEAR locker contract.
///
/// Stateless and shareable across concurrent requests.
#[derive(Debug, Clone)]
pub struct NearBridgeBuilder {
    locker: AccountId,
}

fn json_args<T: serde::Serialize>(value: &T) -> Vec<u8> {
    serde_json::to_vec(value).expect("arg structs serialize infallibly")
}

impl NearBridgeBuilder {
    pub fn new(locker: AccountId) -> Self {
        Self { locker }
    }

    pub fn locker(&self) -> &AccountId {
        &self.locker
    }

    fn locker_call(
        &self,
        signer_id: AccountId,
        method_name: &str,
        args: Vec<u8>,
        gas: u64,
        deposit: u128,
    ) -> NearUnsignedTransaction {
        NearUnsignedTransaction::new(
            signer_id,
            self.locker.clone(),
            vec![NearAction::FunctionCall {
                method_name: method_name.to_string(),
                args,
                gas,
                deposit,
            }],
        )
    }

    /// `log_metadata`: announce a NEP-141 token's metadata so its bridged
    /// representations can be deployed elsewhere.
    pub fn log_metadata(&self, signer_id: AccountId, token_id: AccountId) -> NearUnsignedTransaction {
        self.locker_call(
            signer_id,
            "log_metadata",
            json_args(&LogMetadataArgs { token_id }),
            LOG_METADATA_GAS,
            LOG_METADATA_DEPOSIT,
        )
    }

    /// `deploy_token`: deploy the NEAR representation of a foreign token.
    ///
    /// `deposit` comes from the locker's `required_balance_for_deploy_token`
    /// view; it changes with storage prices and is never hardcoded.
    pub fn deploy_token(
        &self,
        signer_id: AccountId,
        args: &DeployTokenArgs,
        deposit: u128,
    ) -> NearUnsignedTransaction {
        self.locker_call(
            signer_id,
            "deploy_token",
            borsh::to_vec(args).expect("borsh args serialize infallibly"),
            DEPLOY_TOKEN_GAS,
            deposit,
        )
    }

    /// `bind_token`: bind a foreign deployment to its NEAR token after the
    /// deploy proof lands. `deposit` comes from
    /// `required_balance_for_bind_token`.
    pub fn bind_token(
        &self,
        signer_id: AccountId,
        args: &BindTokenArgs,
        deposit: u128,
    ) -> NearUnsignedTransaction {
        self.locker_call(
            signer_id,
            "bind_token",
            borsh::to_vec(args).expect("borsh args serialize infallibly"),
            BIND_TOKEN_GAS,
            deposit,
        )
    }

    /// Plan an outbound transfer from NEAR.
    ///
    /// Returns one or two transactions: an optional `storage_deposit` to the
    /// locker funding the account's storage gap, then the
    /// `ft_transfer_call` on the token with the transfer message. The
    /// consumer signs and sends them in order.
    pub async fn init_transfer<S: StorageBalanceSource + Sync>(
        &self,
        signer_id: AccountId,
        transfer: &ValidatedTransfer,
        storage: &S,
    ) -> Result<Vec<NearUnsignedTransaction>> {
        let token = transfer
            .params
            .token
            .near_account()
            .ok_or_else(|| {
                BridgeSdkError::from(ValidationError::InvalidAddress(format!(
                    "token {} does not live on near",
                    transfer.params.token
                )))
            })?
            .clone();

        let mut transactions = Vec::with_capacity(2);
        let gap = self
            .storage_gap(&signer_id, transfer.params.native_fee, storage)
            .await?;
        if gap > 0 {
            tracing::debug!(account = %signer_id, gap, "Funding locker storage gap");
            transactions.push(self.locker_call(
                signer_id.clone(),
                "storage_deposit",
                json_args(&StorageDepositArgs {
                    account_id: signer_id.clone(),
                    registration_only: None,
                }),
                STORAGE_DEPOSIT_GAS,
                gap,
            ));
        }

        let message = InitTransferMessage {
            recipient: transfer.params.recipient.clone(),
            fee: transfer.params.fee,
            native_token_fee: transfer.params.native_fee,
            msg: transfer.params.message.clone(),
        };
        let args = FtTransferCallArgs {
            receiver_id: self.locker.clone(),
            amount: transfer.params.amount,
            msg: serde_json::to_string(&message).expect("message serializes infallibly"),
        };
        transactions.push(NearUnsignedTransaction::new(
            signer_id,
            token,
            vec![NearAction::FunctionCall {
                method_name: "ft_transfer_call".to_string(),
                args: json_args(&args),
                gas: INIT_TRANSFER_GAS,
                deposit: ONE_YOCTO,
            }],
        ));
        Ok(transactions)
    }

    /// The storage the signer still owes the locker before an init transfer:
    /// `required_account + required_init + native_fee - available`.
    async fn storage_gap<S: StorageBalanceSource + Sync>(
        &self,
        account: &AccountId,
        native_fee: u128,
        storage: &S,
    ) -> Result<u128> {
        let required_account = storage.required_balance_for_account().await?;
        let required_init = storage.required_balance_for_init_transfer().await?;
        let available = storage
            .storage_balance_of(&self.locker, account)
            .await?
            .map(|balance| balance.available)
            .unwrap_or(0);
        let needed = required_account + required_init + native_fee;
        Ok(needed.saturating_sub(available))
    }

    /// `fin_transfer`: land a proof on the locker, registering storage for
    /// the listed accounts along the way. `deposit` is the dynamic required
    /// balance plus the storage-deposit amounts carried in `args`.
    pub fn fin_transfer(
        &self,
        signer_id: AccountId,
        args: &FinTransferArgs,
        deposit: u128,
    ) -> NearUnsignedTransaction {
        self.locker_call(
            signer_id,
            "fin_transfer",
            borsh::to_vec(args).expect("borsh args serialize infallibly"),
            FIN_TRANSFER_GAS,
            deposit,
        )
    }

    /// `sign_transfer`: ask the MPC service for a signature over a pending
    /// transfer so it can be finalized on the destination chain.
    pub fn sign_transfer(
        &self,
        signer_id: AccountId,
        args: &SignTransferArgs,
    ) -> NearUnsignedTransaction {
        self.locker_call(
            signer_id,
            "sign_transfer",
            json_args(args),
            SIGN_TRANSFER_GAS,
            ONE_YOCTO,
        )
    }

    /// `ft_transfer_call` on an arbitrary NEP-141 token. UTXO withdrawals
    /// use this shape: the wrapped token is sent to the connector with the
    /// planned transaction as the message.
    pub fn ft_transfer_call(
        &self,
        signer_id: AccountId,
        token: AccountId,
        receiver_id: AccountId,
        amount: u128,
        msg: String,
    ) -> NearUnsignedTransaction {
        let args = FtTransferCallArgs {
            receiver_id,
            amount,
            msg,
        };
        NearUnsignedTransaction::new(
            signer_id,
            token,
            vec![NearAction::FunctionCall {
                method_name: "ft_transfer_call".to_string(),
                args: json_args(&args),
                gas: INIT_TRANSFER_GAS,
                deposit: ONE_YOCTO,
            }],
        )
    }

    /// `fin_transfer` on a UTXO connector: land a deposit with its SPV
    /// proof. The connector verifies inclusion against its light client and
    /// mints the wrapped token.
    pub fn fin_utxo_deposit(
        &self,
        signer_id: AccountId,
        connector: AccountId,
        proof: &omni_bridge_types::proof::UtxoProof,
    ) -> NearUnsignedTransaction {
        NearUnsignedTransaction::new(
            signer_id,
            connector,
            vec![NearAction::FunctionCall {
                method_name: "fin_transfer".to_string(),
                args: borsh::to_vec(proof).expect("borsh args serialize infallibly"),
                gas: FIN_TRANSFER_GAS,
                deposit: 0,
            }],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use omni_bridge_types::chain::ChainKind;
    use omni_bridge_types::transfer::{TransferOptions, TransferParams};
    use std::str::FromStr;

    struct FakeStorage {
        available: Option<u128>,
    }

    #[async_trait]
    impl StorageBalanceSource for FakeStorage {
        async fn storage_balance_of(
            &self,
            _contract: &AccountId,
            _account: &AccountId,
        ) -> Result<Option<StorageBalance>> {
            Ok(self.available.map(|available| StorageBalance {
                total: available,
                available,
            }))
        }

        async fn required_balance_for_account(&self) -> Result<u128> {
            Ok(2_000)
        }

        async fn required_balance_for_init_transfer(&self) -> Result<u128> {
            Ok(500)
        }
    }

    fn builder() -> NearBridgeBuilder {
        NearBridgeBuilder::new(AccountId::from_str("omni-locker.testnet").unwrap())
    }

    fn wnear_transfer() -> ValidatedTransfer {
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
        ValidatedTransfer {
            source_chain: ChainKind::Near,
            dest_chain: ChainKind::Eth,
            normalized_amount: 10u128.pow(18),
            normalized_fee: 0,
            contract_address: "omni-locker.testnet".to_string(),
            bridged_token: "eth:0x3Ea8ea4237344C9931214796d9417Af1A1180770"
                .parse()
                .unwrap(),
            params,
        }
    }

    #[tokio::test]
    async fn init_transfer_targets_the_token_with_locker_as_receiver() {
        let storage = FakeStorage {
            available: Some(10_000),
        };
        let txs = builder()
            .init_transfer(
                AccountId::from_str("alice.testnet").unwrap(),
                &wnear_transfer(),
                &storage,
            )
            .await
            .unwrap();
        assert_eq!(txs.len(), 1);
        let tx = &txs[0];
        assert_eq!(tx.receiver_id.as_str(), "wrap.testnet");
        let NearAction::FunctionCall {
            method_name,
            args,
            gas,
            deposit,
        } = &tx.actions[0]
        else {
            panic!("expected a function call");
        };
        assert_eq!(method_name, "ft_transfer_call");
        assert_eq!(*gas, 300_000_000_000_000);
        assert_eq!(*deposit, 1);
        let parsed: serde_json::Value = serde_json::from_slice(args).unwrap();
        assert_eq!(parsed["receiver_id"], "omni-locker.testnet");
        assert_eq!(parsed["amount"], "1000000000000000000000000");
        let msg: serde_json::Value =
            serde_json::from_str(parsed["msg"].as_str().unwrap()).unwrap();
        assert_eq!(
            msg["recipient"],
            "eth:0xA7C29dA7599817edA0f829E7B8d0FFE23D81c4d3"
        );
    }

    #[tokio::test]
    async fn unregistered_account_gets_storage_deposit_prepended() {
        let storage = FakeStorage { available: None };
        let txs = builder()
            .init_transfer(
                AccountId::from_str("alice.testnet").unwrap(),
                &wnear_transfer(),
                &storage,
            )
            .await
            .unwrap();
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].receiver_id.as_str(), "omni-locker.testnet");
        let NearAction::FunctionCall {
            method_name,
            deposit,
            ..
        } = &txs[0].actions[0]
        else {
            panic!("expected a function call");
        };
        assert_eq!(method_name, "storage_deposit");
        assert_eq!(*deposit, 2_500);
    }

    #[tokio::test]
    async fn sufficient_balance_is_a_noop() {
        let storage = FakeStorage {
            available: Some(2_500),
        };
        let txs = builder()
            .init_transfer(
                AccountId::from_str("alice.testnet").unwrap(),
                &wnear_transfer(),
                &storage,
            )
            .await
            .unwrap();
        assert_eq!(txs.len(), 1);
    }

    #[test]
    fn utxo_withdrawal_rides_ft_transfer_call() {
        let tx = builder().ft_transfer_call(
            AccountId::from_str("alice.near").unwrap(),
            AccountId::from_str("nbtc.bridge.near").unwrap(),
            AccountId::from_str("btc-connector.bridge.near").unwrap(),
            48_900,
            r#"{"Withdraw":{"target_btc_address":"bc1q..."}}"#.to_string(),
        );
        assert_eq!(tx.receiver_id.as_str(), "nbtc.bridge.near");
        let NearAction::FunctionCall { args, deposit, .. } = &tx.actions[0] else {
            panic!("expected a function call");
        };
        assert_eq!(*deposit, 1);
        let parsed: serde_json::Value = serde_json::from_slice(args).unwrap();
        assert_eq!(parsed["receiver_id"], "btc-connector.bridge.near");
        assert_eq!(parsed["amount"], "48900");
    }

    #[test]
    fn utxo_deposit_fin_transfer_is_borsh() {
        use borsh::BorshDeserialize;
        use omni_bridge_types::proof::{H256, UtxoProof};
        let proof = UtxoProof {
            tx_bytes: vec![0x01, 0x02],
            tx_block_blockhash: H256([9; 32]),
            tx_index: 4,
            merkle_proof: vec![H256([1; 32])],
        };
        let tx = builder().fin_utxo_deposit(
            AccountId::from_str("relayer.near").unwrap(),
            AccountId::from_str("btc-connector.bridge.near").unwrap(),
            &proof,
        );
        let NearAction::FunctionCall {
            method_name, args, ..
        } = &tx.actions[0]
        else {
            panic!("expected a function call");
        };
        assert_eq!(method_name, "fin_transfer");
        assert_eq!(
            UtxoProof::try_from_slice(args).unwrap(),
            proof
        );
    }

    #[test]
    fn sign_transfer_attaches_one_yocto() {
        let args = SignTransferArgs {
            transfer_id: omni_bridge_types::transfer::TransferId {
                origin_chain: ChainKind::Eth,
                origin_nonce: 7,
            },
            fee_recipient: Some(AccountId::from_str("relayer.near").unwrap()),
            fee: crate::args::TransferFee {
                fee: 100,
                native_fee: 0,
            },
        };
        let tx = builder().sign_transfer(AccountId::from_str("relayer.near").unwrap(), &args);
        let NearAction::FunctionCall { deposit, gas, .. } = &tx.actions[0] else {
            panic!("expected a function call");
        };
        assert_eq!(*deposit, 1);
        assert_eq!(*gas, 300_000_000_000_000);
    }
}
