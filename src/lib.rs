//! Client SDK for the Omni token bridge.
//!
//! The Omni bridge spans EVM chains (Ethereum, Arbitrum, Base, BNB,
//! Polygon), NEAR, Solana, and two UTXO chains (Bitcoin, Zcash). This crate
//! is the SDK's facade: it validates transfer intents, resolves the bridged
//! token registry on NEAR, quotes fees through the bridge API, and fetches
//! Wormhole attestations. The per-chain transaction builders and proof
//! extractors live in the `omni-chain-*` crates and are re-exported here.
//!
//! # What the SDK does and does not do
//!
//! The SDK emits inert data: unsigned transactions and proof blobs. It never
//! signs, never broadcasts, never polls for transaction confirmation, and
//! never holds keys. Signing and transport are the caller's concern.
//!
//! # Flow
//!
//! An outbound transfer starts with [`validator::validate_transfer`], which
//! checks the intent against the on-chain registry and produces a
//! chain-neutral `ValidatedTransfer`. That record feeds whichever chain
//! builder matches the source chain. Finalization on the destination chain
//! consumes a proof produced by the matching extractor (EVM receipt proof,
//! Wormhole VAA, or UTXO SPV path).
//!
//! # Modules
//!
//! - [`validator`] - Transfer validation against the NEAR registry
//! - [`networks`] - Static contract deployment tables per network
//! - [`config`] - Construction-time configuration with RPC overrides
//! - [`api`] - The bridge HTTP API client (status, fees, deposit addresses)
//! - [`near_view`] - NEAR JSON-RPC view-call adapter
//! - [`wormhole`] - Wormhole VAA polling state machine
//! - [`rpc`] - Retry and cancellation plumbing shared by the adapters

pub mod api;
pub mod config;
pub mod near_view;
pub mod networks;
pub mod rpc;
pub mod validator;
pub mod wormhole;

pub use omni_bridge_types::{
    BridgeSdkError, ChainKind, OmniAddress, Result,
    transfer::{TransferParams, ValidatedTransfer},
};

pub use omni_chain_evm::{EvmBridgeBuilder, extract_receipt_proof};
pub use omni_chain_near::{NearBridgeBuilder, StorageBalanceSource};
pub use omni_chain_solana::SolanaBridgeBuilder;
pub use omni_chain_utxo::{WithdrawalPlan, build_withdrawal_plan};
