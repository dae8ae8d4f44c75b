//! NEAR chain support for the Omni bridge SDK.
//!
//! The NEAR side of the bridge is its hub: the locker contract is the
//! canonical token registry, receives every finalization proof, and requests
//! MPC signatures for outbound legs. This crate emits library-agnostic
//! unsigned transactions (`signer_id`, `receiver_id`, action list); nonce and
//! recent-block-hash are the consumer's responsibility.
//!
//! # Modules
//!
//! - [`types`] - Action records and the gas/deposit constant table
//! - [`args`] - JSON and Borsh argument shapes the locker accepts
//! - [`builder`] - Operation builders and the storage-deposit preflight
//! - [`events`] - `EVENT_JSON:` extraction from receipt logs

pub mod args;
pub mod builder;
pub mod events;
pub mod types;

pub use builder::{NearBridgeBuilder, StorageBalanceSource};
pub use types::{NearAction, NearUnsignedTransaction};
