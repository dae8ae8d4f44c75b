//! Chain-tagged addresses.
//!
//! An [`OmniAddress`] is the canonical cross-chain identifier
//! `<chain-prefix>:<native-address>`. Parsing is strict: unknown prefixes are
//! rejected and the native portion is validated per chain (EIP-55 checksum
//! for EVM, NEAR account-id rules, base58 ed25519 keys for Solana, bech32 or
//! base58check envelopes for the UTXO chains).

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::io;
use std::str::FromStr;

use crate::chain::ChainKind;
use crate::errors::EncodingError;

/// A 20-byte EVM address that displays with EIP-55 checksum casing.
///
/// Mixed-case input must carry a valid checksum; all-lowercase and
/// all-uppercase hex is accepted as checksum-agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EvmAddress(pub alloy_primitives::Address);

impl EvmAddress {
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0.0
    }
}

impl FromStr for EvmAddress {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let address = alloy_primitives::Address::parse_checksummed(s, None)
            .or_else(|_| {
                // Checksum-agnostic casings are still valid addresses.
                let lowered = s.to_lowercase();
                if lowered == s || s.strip_prefix("0x").is_some_and(|h| h.to_uppercase() == *h) {
                    alloy_primitives::Address::from_str(&lowered)
                } else {
                    Err(alloy_primitives::hex::FromHexError::OddLength)
                }
            })
            .map_err(|_| EncodingError::MalformedAddress(s.to_string()))?;
        Ok(Self(address))
    }
}

impl Display for EvmAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.to_checksum(None))
    }
}

impl From<alloy_primitives::Address> for EvmAddress {
    fn from(address: alloy_primitives::Address) -> Self {
        Self(address)
    }
}

impl BorshSerialize for EvmAddress {
    fn serialize<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(self.0.as_slice())
    }
}

impl BorshDeserialize for EvmAddress {
    fn deserialize_reader<R: io::Read>(reader: &mut R) -> io::Result<Self> {
        let bytes = <[u8; 20]>::deserialize_reader(reader)?;
        Ok(Self(alloy_primitives::Address::from(bytes)))
    }
}

/// A NEAR account id (`alice.near`, `wrap.testnet`, 64-char implicit ids).
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, BorshSerialize, BorshDeserialize,
)]
pub struct AccountId(String);

impl AccountId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// NEP account-id rules: 2..=64 chars, dot-separated segments of lowercase
/// alphanumerics where `-` and `_` join characters but never lead or trail.
fn is_valid_account_id(s: &str) -> bool {
    if s.len() < 2 || s.len() > 64 {
        return false;
    }
    s.split('.').all(|segment| {
        !segment.is_empty()
            && segment.bytes().all(|b| matches!(b, b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_'))
            && !segment.starts_with(['-', '_'])
            && !segment.ends_with(['-', '_'])
    })
}

impl FromStr for AccountId {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if is_valid_account_id(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(EncodingError::MalformedAddress(s.to_string()))
        }
    }
}

impl Display for AccountId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for AccountId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A Solana address: a base58-encoded 32-byte ed25519 public key.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, BorshSerialize, BorshDeserialize,
)]
pub struct SolAddress(pub [u8; 32]);

impl FromStr for SolAddress {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decoded = bs58::decode(s)
            .into_vec()
            .map_err(|_| EncodingError::MalformedAddress(s.to_string()))?;
        let bytes: [u8; 32] = decoded
            .try_into()
            .map_err(|_| EncodingError::MalformedAddress(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl Display for SolAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&bs58::encode(&self.0).into_string())
    }
}

/// A Bitcoin address string, syntactically validated.
///
/// Bech32 addresses are checked for hrp and charset; base58 addresses for a
/// valid check envelope and a known version byte. Byte-exact script
/// validation happens in the UTXO builder where the network is known.
#[derive(Debug, Clone, PartialEq, Eq, Hash, BorshSerialize, BorshDeserialize)]
pub struct BtcAddress(String);

impl BtcAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

const BECH32_CHARSET: &str = "qpzry9x8gf2tvdw0s3jn54khce6mua7l";

fn is_bech32_like(s: &str, hrps: &[&str]) -> bool {
    let Some((hrp, data)) = s.rsplit_once('1') else {
        return false;
    };
    hrps.contains(&hrp) && data.len() >= 6 && data.chars().all(|c| BECH32_CHARSET.contains(c))
}

impl FromStr for BtcAddress {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if is_bech32_like(s, &["bc", "tb", "bcrt"]) {
            return Ok(Self(s.to_string()));
        }
        let decoded = bs58::decode(s)
            .with_check(None)
            .into_vec()
            .map_err(|_| EncodingError::MalformedAddress(s.to_string()))?;
        match decoded.first() {
            // P2PKH/P2SH on mainnet and testnet.
            Some(0x00 | 0x05 | 0x6f | 0xc4) if decoded.len() == 21 => Ok(Self(s.to_string())),
            _ => Err(EncodingError::MalformedAddress(s.to_string())),
        }
    }
}

impl Display for BtcAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A Zcash transparent address string (`t1`/`t3` mainnet, `tm`/`t2` testnet).
///
/// Shielded addresses are unsupported by the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, BorshSerialize, BorshDeserialize)]
pub struct ZecAddress(String);

/// Two-byte base58check version prefixes for transparent addresses.
const ZEC_VERSIONS: [[u8; 2]; 4] = [
    [0x1c, 0xb8], // t1, P2PKH mainnet
    [0x1c, 0xbd], // t3, P2SH mainnet
    [0x1d, 0x25], // tm, P2PKH testnet
    [0x1c, 0xba], // t2, P2SH testnet
];

impl ZecAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ZecAddress {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decoded = bs58::decode(s)
            .with_check(None)
            .into_vec()
            .map_err(|_| EncodingError::MalformedAddress(s.to_string()))?;
        if decoded.len() == 22 && ZEC_VERSIONS.contains(&[decoded[0], decoded[1]]) {
            Ok(Self(s.to_string()))
        } else {
            Err(EncodingError::MalformedAddress(s.to_string()))
        }
    }
}

impl Display for ZecAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The canonical cross-chain address `<chain-prefix>:<native-address>`.
///
/// The Borsh discriminants follow the [`ChainKind`] variant order.
///
/// # Example
///
/// ```
/// use omni_bridge_types::OmniAddress;
///
/// let addr: OmniAddress = "near:alice.near".parse().unwrap();
/// assert_eq!(addr.to_string(), "near:alice.near");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, BorshSerialize, BorshDeserialize)]
pub enum OmniAddress {
    Eth(EvmAddress),
    Near(AccountId),
    Sol(SolAddress),
    Arb(EvmAddress),
    Base(EvmAddress),
    Bnb(EvmAddress),
    Pol(EvmAddress),
    Btc(BtcAddress),
    Zcash(ZecAddress),
}

impl OmniAddress {
    /// Build an EVM-chain address for the given chain tag.
    ///
    /// Returns `None` if `chain` is not an EVM chain.
    pub fn new_evm(chain: ChainKind, address: EvmAddress) -> Option<Self> {
        match chain {
            ChainKind::Eth => Some(OmniAddress::Eth(address)),
            ChainKind::Arb => Some(OmniAddress::Arb(address)),
            ChainKind::Base => Some(OmniAddress::Base(address)),
            ChainKind::Bnb => Some(OmniAddress::Bnb(address)),
            ChainKind::Pol => Some(OmniAddress::Pol(address)),
            _ => None,
        }
    }

    /// The chain this address lives on.
    pub fn chain_kind(&self) -> ChainKind {
        match self {
            OmniAddress::Eth(_) => ChainKind::Eth,
            OmniAddress::Near(_) => ChainKind::Near,
            OmniAddress::Sol(_) => ChainKind::Sol,
            OmniAddress::Arb(_) => ChainKind::Arb,
            OmniAddress::Base(_) => ChainKind::Base,
            OmniAddress::Bnb(_) => ChainKind::Bnb,
            OmniAddress::Pol(_) => ChainKind::Pol,
            OmniAddress::Btc(_) => ChainKind::Btc,
            OmniAddress::Zcash(_) => ChainKind::Zcash,
        }
    }

    /// The native-address portion without the chain prefix.
    pub fn native(&self) -> String {
        match self {
            OmniAddress::Eth(a)
            | OmniAddress::Arb(a)
            | OmniAddress::Base(a)
            | OmniAddress::Bnb(a)
            | OmniAddress::Pol(a) => a.to_string(),
            OmniAddress::Near(a) => a.to_string(),
            OmniAddress::Sol(a) => a.to_string(),
            OmniAddress::Btc(a) => a.to_string(),
            OmniAddress::Zcash(a) => a.to_string(),
        }
    }

    /// The EVM address payload, if this is an EVM-chain address.
    pub fn evm_address(&self) -> Option<EvmAddress> {
        match self {
            OmniAddress::Eth(a)
            | OmniAddress::Arb(a)
            | OmniAddress::Base(a)
            | OmniAddress::Bnb(a)
            | OmniAddress::Pol(a) => Some(*a),
            _ => None,
        }
    }

    /// The NEAR account id payload, if this is a NEAR address.
    pub fn near_account(&self) -> Option<&AccountId> {
        match self {
            OmniAddress::Near(a) => Some(a),
            _ => None,
        }
    }
}

impl FromStr for OmniAddress {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix, native) = s
            .split_once(':')
            .ok_or_else(|| EncodingError::MalformedAddress(s.to_string()))?;
        let chain: ChainKind = prefix.parse()?;
        match chain {
            ChainKind::Eth => native.parse().map(OmniAddress::Eth),
            ChainKind::Near => native.parse().map(OmniAddress::Near),
            ChainKind::Sol => native.parse().map(OmniAddress::Sol),
            ChainKind::Arb => native.parse().map(OmniAddress::Arb),
            ChainKind::Base => native.parse().map(OmniAddress::Base),
            ChainKind::Bnb => native.parse().map(OmniAddress::Bnb),
            ChainKind::Pol => native.parse().map(OmniAddress::Pol),
            ChainKind::Btc => native.parse().map(OmniAddress::Btc),
            ChainKind::Zcash => native.parse().map(OmniAddress::Zcash),
        }
    }
}

impl Display for OmniAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.chain_kind().prefix(), self.native())
    }
}

impl Serialize for OmniAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for OmniAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
