//! EVM chain support for the Omni bridge SDK.
//!
//! This crate turns a validated transfer into the unsigned transactions the
//! EVM bridge factory expects, and extracts the Merkle-Patricia receipt
//! proofs the NEAR bridge contract's EVM prover verifies.
//!
//! # Modules
//!
//! - [`abi`] - The bridge factory ABI, declared with `sol!`
//! - [`builder`] - Unsigned transaction builders for the six bridge operations
//! - [`receipt`] - JSON-RPC wire records for blocks, receipts, and logs
//! - [`proof`] - Receipts-trie construction and proof extraction
//!
//! The builders are deterministic: identical inputs produce byte-identical
//! calldata. Nothing here signs or broadcasts.

pub mod abi;
pub mod builder;
pub mod proof;
pub mod receipt;

pub use builder::{EvmBridgeBuilder, EvmUnsignedTransaction};
pub use proof::extract_receipt_proof;
