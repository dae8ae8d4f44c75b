//! Solana chain support for the Omni bridge SDK.
//!
//! The bridge's Solana side is an Anchor locker program. This crate derives
//! its seeded addresses, encodes its instructions (eight-byte Anchor
//! discriminators followed by Borsh args), and resolves SPL token accounts.
//! Builders emit `[Instruction]` arrays; the caller supplies the fee payer
//! and a recent blockhash when assembling the transaction.
//!
//! # Modules
//!
//! - [`pda`] - The five seeded program addresses and ATA derivation
//! - [`mint`] - Mint account inspection: bridged-vs-native, token program
//! - [`instruction`] - Instruction builders for the locker program

pub mod instruction;
pub mod mint;
pub mod pda;

pub use instruction::SolanaBridgeBuilder;
pub use mint::{AccountData, MintAccountSource, MintInfo};
