//! The closed set of networks the bridge spans.
//!
//! Each chain carries a lowercase string tag used as the [`OmniAddress`]
//! prefix and a numeric discriminant used in Borsh serialization. Both must
//! match the NEAR bridge contract's view of the chain set exactly.
//!
//! [`OmniAddress`]: crate::address::OmniAddress

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::errors::EncodingError;

/// A network supported by the bridge.
///
/// The variant order fixes the Borsh discriminants (0..=8) and is part of
/// the wire contract with the on-chain enum. Do not reorder.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    BorshSerialize,
    BorshDeserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ChainKind {
    /// Ethereum mainnet (chain ID 1).
    Eth,
    /// NEAR protocol.
    Near,
    /// Solana.
    Sol,
    /// Arbitrum One (chain ID 42161).
    Arb,
    /// Base (chain ID 8453).
    Base,
    /// BNB Smart Chain (chain ID 56).
    Bnb,
    /// Polygon PoS (chain ID 137).
    Pol,
    /// Bitcoin.
    Btc,
    /// Zcash.
    Zcash,
}

impl ChainKind {
    /// Return all supported chains.
    pub fn variants() -> &'static [ChainKind] {
        &[
            ChainKind::Eth,
            ChainKind::Near,
            ChainKind::Sol,
            ChainKind::Arb,
            ChainKind::Base,
            ChainKind::Bnb,
            ChainKind::Pol,
            ChainKind::Btc,
            ChainKind::Zcash,
        ]
    }

    /// The lowercase tag used as an address prefix (`eth:`, `near:`, ...).
    pub fn prefix(&self) -> &'static str {
        match self {
            ChainKind::Eth => "eth",
            ChainKind::Near => "near",
            ChainKind::Sol => "sol",
            ChainKind::Arb => "arb",
            ChainKind::Base => "base",
            ChainKind::Bnb => "bnb",
            ChainKind::Pol => "pol",
            ChainKind::Btc => "btc",
            ChainKind::Zcash => "zec",
        }
    }

    /// Whether the chain settles through an EVM bridge factory contract.
    pub fn is_evm(&self) -> bool {
        matches!(
            self,
            ChainKind::Eth | ChainKind::Arb | ChainKind::Base | ChainKind::Bnb | ChainKind::Pol
        )
    }

    /// Whether the chain is UTXO-based and settles through a NEAR connector.
    pub fn is_utxo(&self) -> bool {
        matches!(self, ChainKind::Btc | ChainKind::Zcash)
    }

    /// The EVM chain ID for EVM chains, `None` otherwise.
    pub fn evm_chain_id(&self) -> Option<u64> {
        match self {
            ChainKind::Eth => Some(1),
            ChainKind::Arb => Some(42161),
            ChainKind::Base => Some(8453),
            ChainKind::Bnb => Some(56),
            ChainKind::Pol => Some(137),
            _ => None,
        }
    }
}

impl Display for ChainKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.prefix())
    }
}

impl FromStr for ChainKind {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChainKind::variants()
            .iter()
            .find(|kind| kind.prefix() == s)
            .copied()
            .ok_or_else(|| EncodingError::UnknownChainPrefix(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn borsh_discriminants_are_stable() {
        let encoded: Vec<u8> = ChainKind::variants()
            .iter()
            .map(|kind| borsh::to_vec(kind).unwrap()[0])
            .collect();
        assert_eq!(encoded, vec![0, 1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn prefix_round_trip() {
        for kind in ChainKind::variants() {
            assert_eq!(kind.prefix().parse::<ChainKind>().unwrap(), *kind);
        }
    }

    #[test]
    fn unknown_prefix_rejected() {
        assert!("dot".parse::<ChainKind>().is_err());
        assert!("ETH".parse::<ChainKind>().is_err());
    }

    #[test]
    fn evm_chain_ids() {
        assert_eq!(ChainKind::Eth.evm_chain_id(), Some(1));
        assert_eq!(ChainKind::Arb.evm_chain_id(), Some(42161));
        assert_eq!(ChainKind::Near.evm_chain_id(), None);
        assert!(ChainKind::Btc.is_utxo());
        assert!(!ChainKind::Sol.is_evm());
    }
}
