//! Seeded addresses of the locker program.
//!
//! The seed constants come from the program's IDL. Token seeds longer than
//! 32 bytes are replaced by their sha256, shorter ones are zero-padded to
//! 32; this mirrors the Anchor program's own derivation and must stay
//! byte-exact or every derived address diverges.

use sha2::{Digest, Sha256};
use solana_pubkey::Pubkey;

pub const CONFIG_SEED: &[u8] = b"config";
pub const AUTHORITY_SEED: &[u8] = b"authority";
pub const WRAPPED_MINT_SEED: &[u8] = b"wrapped_mint";
pub const VAULT_SEED: &[u8] = b"vault";
pub const SOL_VAULT_SEED: &[u8] = b"sol_vault";

/// `config` PDA: the program's global state.
pub fn config(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[CONFIG_SEED], program_id)
}

/// `authority` PDA: mint authority for bridged tokens and owner of vaults.
pub fn authority(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[AUTHORITY_SEED], program_id)
}

/// Seed bytes for a wrapped mint: sha256 of the token identifier when it
/// exceeds 32 bytes, zero-padded to 32 otherwise.
pub fn token_seed(token: &str) -> [u8; 32] {
    let bytes = token.as_bytes();
    if bytes.len() > 32 {
        let digest = Sha256::digest(bytes);
        let mut seed = [0u8; 32];
        seed.copy_from_slice(&digest);
        seed
    } else {
        let mut seed = [0u8; 32];
        seed[..bytes.len()].copy_from_slice(bytes);
        seed
    }
}

/// `wrapped_mint` PDA for a foreign token identified by its omni address.
pub fn wrapped_mint(program_id: &Pubkey, token: &str) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[WRAPPED_MINT_SEED, &token_seed(token)], program_id)
}

/// `vault` PDA holding locked native mints.
pub fn vault(program_id: &Pubkey, mint: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[VAULT_SEED, mint.as_ref()], program_id)
}

/// `sol_vault` PDA holding locked SOL.
pub fn sol_vault(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[SOL_VAULT_SEED], program_id)
}

/// The associated token account of `wallet` for `mint` under
/// `token_program`.
pub fn associated_token_account(
    wallet: &Pubkey,
    mint: &Pubkey,
    token_program: &Pubkey,
) -> Pubkey {
    spl_associated_token_account::get_associated_token_address_with_program_id(
        wallet,
        mint,
        token_program,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn program_id() -> Pubkey {
        Pubkey::from_str("dahPEoZGXfyV58JqqH85okdHmpN8U2q8owgPUXSCPxe").unwrap()
    }

    #[test]
    fn derivation_is_deterministic() {
        let (a, bump_a) = config(&program_id());
        let (b, bump_b) = config(&program_id());
        assert_eq!(a, b);
        assert_eq!(bump_a, bump_b);
        assert_ne!(config(&program_id()).0, authority(&program_id()).0);
    }

    #[test]
    fn short_token_seed_is_zero_padded() {
        let seed = token_seed("wrap.near");
        assert_eq!(&seed[..9], b"wrap.near");
        assert!(seed[9..].iter().all(|b| *b == 0));
    }

    #[test]
    fn long_token_seed_is_hashed() {
        let token = "eth:0xA7C29dA7599817edA0f829E7B8d0FFE23D81c4d3";
        assert!(token.len() > 32);
        let seed = token_seed(token);
        assert_eq!(seed, <[u8; 32]>::from(Sha256::digest(token.as_bytes())));
    }

    #[test]
    fn boundary_token_seed_is_not_hashed() {
        let token = "a".repeat(32);
        assert_eq!(token_seed(&token), <[u8; 32]>::try_from(token.as_bytes()).unwrap());
    }

    #[test]
    fn distinct_tokens_get_distinct_mints() {
        let a = wrapped_mint(&program_id(), "near:wrap.near").0;
        let b = wrapped_mint(&program_id(), "near:usdt.tether-token.near").0;
        assert_ne!(a, b);
    }

    #[test]
    fn ata_differs_by_token_program() {
        let wallet = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let classic = associated_token_account(&wallet, &mint, &spl_token::id());
        let modern = associated_token_account(&wallet, &mint, &spl_token_2022::id());
        assert_ne!(classic, modern);
    }
}
