//! Unsigned transaction builders for the EVM bridge factory.
//!
//! Every operation returns an [`EvmUnsignedTransaction`]: a plain record any
//! EVM signer can consume. Gas is never estimated here; callers either
//! estimate themselves or take the suggested per-chain limits verbatim.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;
use serde::{Deserialize, Serialize};

use omni_bridge_types::errors::ValidationError;
use omni_bridge_types::transfer::ValidatedTransfer;
use omni_bridge_types::{BridgeSdkError, ChainKind};

use crate::abi;

pub use crate::abi::{MetadataPayload, TransferMessagePayload};

/// An unsigned EVM transaction, directly consumable by any EVM signer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvmUnsignedTransaction {
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
    pub chain_id: u64,
    /// Suggested gas limit for callers that skip estimation.
    pub gas_limit: u64,
}

/// Builder for one EVM chain's bridge factory.
///
/// Stateless and shareable across concurrent requests.
#[derive(Debug, Clone)]
pub struct EvmBridgeBuilder {
    chain: ChainKind,
    chain_id: u64,
    factory: Address,
}

/// Suggested gas limits. Arbitrum's gas accounting includes L1 data costs,
/// so its limits run an order of magnitude above the other chains.
fn call_gas_limit(chain: ChainKind) -> u64 {
    match chain {
        ChainKind::Arb => 3_000_000,
        _ => 500_000,
    }
}

fn approval_gas_limit(chain: ChainKind) -> u64 {
    match chain {
        ChainKind::Arb => 600_000,
        _ => 100_000,
    }
}

impl EvmBridgeBuilder {
    /// Create a builder for `chain`'s factory at `factory`.
    ///
    /// Fails if `chain` is not an EVM chain.
    pub fn new(chain: ChainKind, factory: Address) -> Result<Self, BridgeSdkError> {
        let chain_id = chain
            .evm_chain_id()
            .ok_or_else(|| ValidationError::InvalidAddress(format!("{chain} is not an EVM chain")))?;
        Ok(Self {
            chain,
            chain_id,
            factory,
        })
    }

    pub fn chain(&self) -> ChainKind {
        self.chain
    }

    fn transaction(&self, to: Address, data: Vec<u8>, value: U256, gas_limit: u64) -> EvmUnsignedTransaction {
        EvmUnsignedTransaction {
            to,
            data: data.into(),
            value,
            chain_id: self.chain_id,
            gas_limit,
        }
    }

    /// Build the `initTransfer` call for a validated outbound transfer.
    ///
    /// When the token is the native asset (the zero address), `value` carries
    /// the transfer amount; for ERC-20 tokens `value` carries only the
    /// cross-chain gas subsidy and the amount rides inside the calldata.
    pub fn init_transfer(
        &self,
        transfer: &ValidatedTransfer,
    ) -> Result<EvmUnsignedTransaction, BridgeSdkError> {
        let token = transfer
            .params
            .token
            .evm_address()
            .filter(|_| transfer.params.token.chain_kind() == self.chain)
            .ok_or_else(|| {
                ValidationError::InvalidAddress(format!(
                    "token {} does not live on {}",
                    transfer.params.token, self.chain
                ))
            })?;
        let call = abi::initTransferCall {
            tokenAddress: token.0,
            amount: transfer.params.amount,
            fee: transfer.params.fee,
            nativeFee: transfer.params.native_fee,
            recipient: transfer.params.recipient.to_string(),
            message: transfer.params.message.clone().unwrap_or_default(),
        };
        let value = if token.0 == Address::ZERO {
            U256::from(transfer.params.amount)
        } else {
            U256::from(transfer.params.native_fee)
        };
        tracing::debug!(
            chain = %self.chain,
            token = %transfer.params.token,
            amount = transfer.params.amount,
            "Building initTransfer"
        );
        Ok(self.transaction(self.factory, call.abi_encode(), value, call_gas_limit(self.chain)))
    }

    /// Build an ERC-20 `approve` granting the factory `amount`.
    pub fn approval(&self, token: Address, amount: U256) -> EvmUnsignedTransaction {
        let call = abi::approveCall {
            spender: self.factory,
            amount,
        };
        self.transaction(token, call.abi_encode(), U256::ZERO, approval_gas_limit(self.chain))
    }

    /// Build an unlimited ERC-20 approval for the factory.
    pub fn max_approval(&self, token: Address) -> EvmUnsignedTransaction {
        self.approval(token, U256::MAX)
    }

    /// Build the `finTransfer` call finalizing an inbound transfer with an
    /// MPC signature over `payload`.
    pub fn finalization(
        &self,
        signature: Vec<u8>,
        payload: TransferMessagePayload,
        native_fee: u128,
    ) -> EvmUnsignedTransaction {
        let call = abi::finTransferCall {
            signature: signature.into(),
            payload,
        };
        self.transaction(
            self.factory,
            call.abi_encode(),
            U256::from(native_fee),
            call_gas_limit(self.chain),
        )
    }

    /// Build the `logMetadata` call announcing a token's metadata on-chain.
    pub fn log_metadata(&self, token: Address) -> EvmUnsignedTransaction {
        let call = abi::logMetadataCall {
            tokenAddress: token,
        };
        self.transaction(self.factory, call.abi_encode(), U256::ZERO, call_gas_limit(self.chain))
    }

    /// Build the `deployToken` call deploying the bridged representation of
    /// a foreign token, authorized by an MPC signature over `metadata`.
    pub fn deploy_token(
        &self,
        signature: Vec<u8>,
        metadata: MetadataPayload,
    ) -> EvmUnsignedTransaction {
        let call = abi::deployTokenCall {
            signature: signature.into(),
            metadata,
        };
        self.transaction(self.factory, call.abi_encode(), U256::ZERO, call_gas_limit(self.chain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_sol_types::SolCall;
    use omni_bridge_types::transfer::{TransferOptions, TransferParams};
    use std::str::FromStr;

    fn factory() -> Address {
        Address::from_str("0x252e87862A3A720287E7fd527cE6e8d0738427A2").unwrap()
    }

    fn validated(token: &str, amount: u128, native_fee: u128) -> ValidatedTransfer {
        let params = TransferParams {
            token: token.parse().unwrap(),
            amount,
            fee: 0,
            native_fee,
            sender: "eth:0xA7C29dA7599817edA0f829E7B8d0FFE23D81c4d3"
                .parse()
                .unwrap(),
            recipient: "near:alice.near".parse().unwrap(),
            message: None,
            options: TransferOptions::default(),
        };
        ValidatedTransfer {
            source_chain: ChainKind::Eth,
            dest_chain: ChainKind::Near,
            normalized_amount: amount,
            normalized_fee: 0,
            contract_address: factory().to_string(),
            bridged_token: "near:token.bridge.near".parse().unwrap(),
            params,
        }
    }

    #[test]
    fn erc20_transfer_puts_native_fee_in_value() {
        let builder = EvmBridgeBuilder::new(ChainKind::Eth, factory()).unwrap();
        let transfer = validated(
            "eth:0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913",
            1_000_000,
            50_000,
        );
        let tx = builder.init_transfer(&transfer).unwrap();
        assert_eq!(tx.to, factory());
        assert_eq!(tx.value, U256::from(50_000u64));
        assert_eq!(tx.chain_id, 1);
        assert_eq!(&tx.data[..4], abi::initTransferCall::SELECTOR);
        let decoded = abi::initTransferCall::abi_decode(&tx.data).unwrap();
        assert_eq!(decoded.amount, 1_000_000);
        assert_eq!(decoded.recipient, "near:alice.near");
    }

    #[test]
    fn native_transfer_puts_amount_in_value() {
        let builder = EvmBridgeBuilder::new(ChainKind::Eth, factory()).unwrap();
        let transfer = validated(
            "eth:0x0000000000000000000000000000000000000000",
            5_000_000_000_000_000_000,
            0,
        );
        let tx = builder.init_transfer(&transfer).unwrap();
        assert_eq!(tx.value, U256::from(5_000_000_000_000_000_000u128));
    }

    #[test]
    fn wrong_chain_token_rejected() {
        let builder = EvmBridgeBuilder::new(ChainKind::Base, factory()).unwrap();
        let transfer = validated("eth:0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913", 1, 0);
        assert!(builder.init_transfer(&transfer).is_err());
    }

    #[test]
    fn arbitrum_gas_runs_higher() {
        let eth = EvmBridgeBuilder::new(ChainKind::Eth, factory()).unwrap();
        let arb = EvmBridgeBuilder::new(ChainKind::Arb, factory()).unwrap();
        let token = Address::from_str("0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913").unwrap();
        assert!(arb.max_approval(token).gas_limit > eth.max_approval(token).gas_limit);
    }

    #[test]
    fn max_approval_is_unlimited() {
        let builder = EvmBridgeBuilder::new(ChainKind::Eth, factory()).unwrap();
        let token = Address::from_str("0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913").unwrap();
        let tx = builder.max_approval(token);
        let decoded = abi::approveCall::abi_decode(&tx.data).unwrap();
        assert_eq!(decoded.amount, U256::MAX);
        assert_eq!(decoded.spender, factory());
        assert_eq!(tx.to, token);
    }

    #[test]
    fn non_evm_chain_rejected() {
        assert!(EvmBridgeBuilder::new(ChainKind::Near, factory()).is_err());
    }
}
