//! Transfer validation.
//!
//! `validate_transfer` is the single gate every outbound transfer passes
//! before a chain builder sees it. It resolves the destination chain from
//! the recipient, confirms the token is registered for that destination,
//! and normalizes amount and fee into the destination chain's decimal
//! system. Amount and fee are normalized independently and then subtracted;
//! normalizing their difference would lose precision the contract keeps,
//! and the two computations disagree exactly when it matters.
//!
//! Registry lookups are fetched fresh on every call. Registration can
//! happen at any moment, and a stale cache silently breaks transfers.

use async_trait::async_trait;

use omni_bridge_types::decimals::normalize;
use omni_bridge_types::errors::ValidationError;
use omni_bridge_types::transfer::{TokenDecimals, TransferParams, ValidatedTransfer};
use omni_bridge_types::{ChainKind, OmniAddress, Result};

use crate::networks::NetworkConfig;

/// The NEAR locker's registry views, fetched per validation.
///
/// Implemented by [`crate::near_view::NearViewClient`]; test doubles
/// implement it directly.
#[async_trait]
pub trait TokenRegistry {
    /// The bridged representation of `token` on `chain`, or `None` when the
    /// pair is not registered.
    async fn bridged_token(
        &self,
        token: &OmniAddress,
        chain: ChainKind,
    ) -> Result<Option<OmniAddress>>;

    /// The decimal pair for `token` toward `chain`.
    async fn token_decimals(
        &self,
        token: &OmniAddress,
        chain: ChainKind,
    ) -> Result<TokenDecimals>;
}

/// Validate a transfer intent and produce the chain-neutral record every
/// builder consumes.
pub async fn validate_transfer<R: TokenRegistry + Sync>(
    registry: &R,
    deployments: &NetworkConfig,
    params: TransferParams,
) -> Result<ValidatedTransfer> {
    let source_chain = params.token.chain_kind();
    let dest_chain = params.recipient.chain_kind();

    if source_chain == dest_chain {
        return Err(ValidationError::SameChain.into());
    }
    if params.sender.chain_kind() != source_chain {
        return Err(ValidationError::InvalidAddress(format!(
            "sender {} is not on the token's chain {}",
            params.sender, source_chain
        ))
        .into());
    }
    if params.amount == 0 {
        return Err(ValidationError::InvalidAmount.into());
    }
    if params.fee >= params.amount {
        return Err(ValidationError::FeeExceedsAmount {
            amount: params.amount,
            fee: params.fee,
        }
        .into());
    }

    let bridged_token = registry
        .bridged_token(&params.token, dest_chain)
        .await?
        .ok_or_else(|| ValidationError::TokenNotRegistered {
            token: params.token.to_string(),
            chain: dest_chain.to_string(),
        })?;

    let decimals = registry.token_decimals(&params.token, dest_chain).await?;
    let normalized_amount = normalize(
        params.amount,
        decimals.origin_decimals,
        decimals.decimals,
    )
    .ok_or(ValidationError::InvalidAmount)?;
    let normalized_fee = normalize(params.fee, decimals.origin_decimals, decimals.decimals)
        .ok_or(ValidationError::InvalidAmount)?;
    if normalized_amount.saturating_sub(normalized_fee) == 0 {
        return Err(ValidationError::DustAfterNormalization.into());
    }

    let contract_address = deployments
        .contract_address(source_chain)
        .ok_or_else(|| ValidationError::InvalidAddress(format!(
            "no bridge deployment for {source_chain}"
        )))?;

    tracing::debug!(
        token = %params.token,
        %source_chain,
        %dest_chain,
        normalized_amount,
        normalized_fee,
        "Validated transfer"
    );

    Ok(ValidatedTransfer {
        params,
        source_chain,
        dest_chain,
        normalized_amount,
        normalized_fee,
        contract_address,
        bridged_token,
    })
}
