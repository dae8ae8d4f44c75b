//! Core types for the Omni bridge SDK.
//!
//! This crate provides the foundational types shared by every chain builder
//! in the Omni bridge SDK. It is chain-agnostic: the per-chain transaction
//! builders live in separate crates and consume the records defined here.
//!
//! # Overview
//!
//! A cross-chain transfer starts as a [`transfer::TransferParams`] intent.
//! The validator in the facade crate resolves the destination chain, fetches
//! the token's decimal pair, normalizes amounts, and produces a
//! [`transfer::ValidatedTransfer`] that any chain builder can turn into an
//! unsigned transaction. Finalization on the destination chain consumes one
//! of the proof blobs in [`proof`].
//!
//! # Modules
//!
//! - [`chain`] - The closed set of supported networks and their wire tags
//! - [`address`] - Chain-tagged [`address::OmniAddress`] parsing and validation
//! - [`decimals`] - Power-of-ten rescaling between asymmetric token precisions
//! - [`transfer`] - Transfer intents and the validated transfer contract
//! - [`proof`] - Opaque proof blobs consumed by the NEAR bridge contract
//! - [`errors`] - The SDK error taxonomy

pub mod address;
pub mod chain;
pub mod decimals;
pub mod errors;
pub mod proof;
pub mod transfer;

pub use address::OmniAddress;
pub use chain::ChainKind;
pub use errors::{BridgeSdkError, Result};
