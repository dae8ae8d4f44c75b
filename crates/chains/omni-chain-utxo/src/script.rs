//! Address-to-script encoding.
//!
//! Bitcoin addresses go through the `bitcoin` crate's parser, which covers
//! bech32 (P2WPKH, P2WSH, P2TR) and base58check (P2PKH, P2SH); addresses for
//! the wrong network are rejected rather than silently re-encoded. Zcash
//! supports transparent addresses only, with Zcash's two-byte version
//! prefixes.

use std::str::FromStr;

use omni_bridge_types::errors::EncodingError;

use crate::types::UtxoNetwork;

/// Encode a Bitcoin address into its output script.
pub fn btc_script_pubkey(address: &str, network: UtxoNetwork) -> Result<Vec<u8>, EncodingError> {
    let expected = match network {
        UtxoNetwork::Mainnet => bitcoin::Network::Bitcoin,
        UtxoNetwork::Testnet => bitcoin::Network::Testnet,
    };
    let parsed = bitcoin::Address::from_str(address)
        .map_err(|_| EncodingError::MalformedAddress(address.to_string()))?;
    let checked = parsed.require_network(expected).map_err(|_| {
        EncodingError::MalformedAddress(format!("{address} is not a {network:?} address"))
    })?;
    Ok(checked.script_pubkey().into_bytes())
}

/// Zcash transparent address version prefixes.
const ZEC_P2PKH_MAINNET: [u8; 2] = [0x1c, 0xb8];
const ZEC_P2SH_MAINNET: [u8; 2] = [0x1c, 0xbd];
const ZEC_P2PKH_TESTNET: [u8; 2] = [0x1d, 0x25];
const ZEC_P2SH_TESTNET: [u8; 2] = [0x1c, 0xba];

/// Encode a Zcash transparent address into its output script.
///
/// Shielded addresses are unsupported by the bridge and rejected here.
pub fn zec_script_pubkey(address: &str, network: UtxoNetwork) -> Result<Vec<u8>, EncodingError> {
    let decoded = bs58::decode(address)
        .with_check(None)
        .into_vec()
        .map_err(|_| EncodingError::MalformedAddress(address.to_string()))?;
    if decoded.len() != 22 {
        return Err(EncodingError::MalformedAddress(address.to_string()));
    }
    let version = [decoded[0], decoded[1]];
    let hash = &decoded[2..22];
    let (p2pkh, p2sh) = match network {
        UtxoNetwork::Mainnet => (ZEC_P2PKH_MAINNET, ZEC_P2SH_MAINNET),
        UtxoNetwork::Testnet => (ZEC_P2PKH_TESTNET, ZEC_P2SH_TESTNET),
    };
    if version == p2pkh {
        // OP_DUP OP_HASH160 <hash> OP_EQUALVERIFY OP_CHECKSIG
        let mut script = Vec::with_capacity(25);
        script.extend_from_slice(&[0x76, 0xa9, 0x14]);
        script.extend_from_slice(hash);
        script.extend_from_slice(&[0x88, 0xac]);
        Ok(script)
    } else if version == p2sh {
        // OP_HASH160 <hash> OP_EQUAL
        let mut script = Vec::with_capacity(23);
        script.extend_from_slice(&[0xa9, 0x14]);
        script.extend_from_slice(hash);
        script.push(0x87);
        Ok(script)
    } else {
        Err(EncodingError::MalformedAddress(format!(
            "{address} is not a {network:?} transparent address"
        )))
    }
}
