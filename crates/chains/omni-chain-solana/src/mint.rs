//! Mint account inspection.
//!
//! Two facts about a mint steer instruction building: whether the locker's
//! authority PDA is its mint authority (a bridged mint with mint/burn
//! semantics, no vault) and which token program owns it (SPL Token vs
//! Token-2022).

use async_trait::async_trait;
use solana_pubkey::Pubkey;
use spl_token::solana_program::program_pack::Pack;

use omni_bridge_types::errors::{ContractError, RpcError};
use omni_bridge_types::Result;

/// A fetched account: owner program plus raw data.
#[derive(Debug, Clone)]
pub struct AccountData {
    pub owner: Pubkey,
    pub data: Vec<u8>,
}

/// RPC seam for reading accounts, implemented by the facade's Solana
/// adapter.
#[async_trait]
pub trait MintAccountSource {
    async fn get_account(&self, pubkey: &Pubkey) -> Result<Option<AccountData>>;
}

/// What instruction building needs to know about a mint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintInfo {
    pub decimals: u8,
    pub mint_authority: Option<Pubkey>,
    /// The owning token program (`spl_token::id()` or `spl_token_2022::id()`).
    pub token_program: Pubkey,
}

impl MintInfo {
    /// A mint is bridged when the locker's authority PDA can mint it.
    pub fn is_bridged(&self, authority: &Pubkey) -> bool {
        self.mint_authority.as_ref() == Some(authority)
    }
}

/// Fetch and unpack a mint, picking the token program by account owner.
pub async fn fetch_mint<S: MintAccountSource + Sync>(
    mint: &Pubkey,
    source: &S,
) -> Result<MintInfo> {
    let account = source
        .get_account(mint)
        .await?
        .ok_or_else(|| RpcError::Rpc {
            message: format!("mint {mint} does not exist"),
            attempts: 1,
        })?;
    if account.owner == spl_token::id() {
        let state = spl_token::state::Mint::unpack(&account.data)
            .map_err(|e| ContractError(format!("failed to unpack mint {mint}: {e}")))?;
        Ok(MintInfo {
            decimals: state.decimals,
            mint_authority: state.mint_authority.into(),
            token_program: spl_token::id(),
        })
    } else if account.owner == spl_token_2022::id() {
        let state = spl_token_2022::state::Mint::unpack(&account.data)
            .map_err(|e| ContractError(format!("failed to unpack mint {mint}: {e}")))?;
        Ok(MintInfo {
            decimals: state.decimals,
            mint_authority: state.mint_authority.into(),
            token_program: spl_token_2022::id(),
        })
    } else {
        Err(ContractError(format!("mint {mint} has unknown owner {}", account.owner)).into())
    }
}
