//! NEAR JSON-RPC view-call adapter.
//!
//! The locker contract on NEAR is the bridge's canonical registry: bridged
//! token pairs, decimal mappings, storage requirements. This adapter speaks
//! the `query`/`call_function` JSON-RPC shape and backs the validator's
//! [`TokenRegistry`] seam and the NEAR builder's
//! [`StorageBalanceSource`] seam.
//!
//! Nothing here is cached. Registration can land at any moment and a stale
//! registry silently breaks transfers, so every lookup hits the chain.

use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use url::Url;

use omni_bridge_types::address::AccountId;
use omni_bridge_types::transfer::TokenDecimals;
use omni_bridge_types::{ChainKind, OmniAddress, Result};

use omni_chain_near::builder::{StorageBalance, StorageBalanceSource};

use crate::rpc::{AttemptError, with_retry};
use crate::validator::TokenRegistry;

/// View-call client against one NEAR RPC endpoint.
///
/// Holds no mutable state; clone freely or share across tasks.
#[derive(Debug, Clone)]
pub struct NearViewClient {
    http: reqwest::Client,
    rpc_url: Url,
    locker: AccountId,
    cancel: Option<CancellationToken>,
}

#[derive(Debug, Deserialize)]
struct CallFunctionResult {
    result: Vec<u8>,
}

/// NEP-145 balance as the contract returns it (yoctoNEAR as strings).
#[derive(Debug, Deserialize)]
struct StorageBalanceView {
    total: String,
    available: String,
}

impl NearViewClient {
    pub fn new(rpc_url: Url, locker: AccountId) -> Self {
        Self {
            http: reqwest::Client::new(),
            rpc_url,
            locker,
            cancel: None,
        }
    }

    /// Attach a cancellation token honored at every RPC suspension point.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Execute a view call and deserialize the returned JSON bytes.
    pub async fn view<T: DeserializeOwned>(
        &self,
        contract: &AccountId,
        method: &str,
        args: serde_json::Value,
    ) -> Result<T> {
        let args_base64 = base64::engine::general_purpose::STANDARD.encode(args.to_string());
        let body = json!({
            "jsonrpc": "2.0",
            "id": "omni-bridge-rs",
            "method": "query",
            "params": {
                "request_type": "call_function",
                "finality": "final",
                "account_id": contract.as_str(),
                "method_name": method,
                "args_base64": args_base64,
            },
        });
        let bytes = with_retry(method, self.cancel.as_ref(), || {
            let body = body.clone();
            async move {
                let response = self
                    .http
                    .post(self.rpc_url.clone())
                    .json(&body)
                    .send()
                    .await
                    .map_err(|e| {
                        if e.is_timeout() {
                            AttemptError::Timeout
                        } else {
                            AttemptError::Transient(e.to_string())
                        }
                    })?;
                if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    return Err(AttemptError::RateLimited("near rpc".to_string()));
                }
                let envelope: serde_json::Value = response
                    .json()
                    .await
                    .map_err(|e| AttemptError::Transient(e.to_string()))?;
                if let Some(error) = envelope.get("error") {
                    return Err(AttemptError::Transient(error.to_string()));
                }
                let result: CallFunctionResult =
                    serde_json::from_value(envelope["result"].clone())
                        .map_err(|e| AttemptError::Transient(e.to_string()))?;
                Ok(result.result)
            }
        })
        .await?;
        let value = serde_json::from_slice(&bytes).map_err(|e| {
            omni_bridge_types::errors::RpcError::Rpc {
                message: format!("{method} returned malformed JSON: {e}"),
                attempts: 1,
            }
        })?;
        Ok(value)
    }

    /// A locker view that returns a `U128` JSON string.
    async fn view_u128(&self, method: &str) -> Result<u128> {
        let value: String = self.view(&self.locker.clone(), method, json!({})).await?;
        value
            .parse()
            .map_err(|_| omni_bridge_types::errors::RpcError::Rpc {
                message: format!("{method} returned a non-numeric balance"),
                attempts: 1,
            }.into())
    }

    /// Dynamic deposit for `deploy_token`.
    pub async fn required_balance_for_deploy_token(&self) -> Result<u128> {
        self.view_u128("required_balance_for_deploy_token").await
    }

    /// Dynamic deposit for `bind_token`.
    pub async fn required_balance_for_bind_token(&self) -> Result<u128> {
        self.view_u128("required_balance_for_bind_token").await
    }

    /// Dynamic deposit for `fin_transfer`, before storage-deposit amounts.
    pub async fn required_balance_for_fin_transfer(&self) -> Result<u128> {
        self.view_u128("required_balance_for_fin_transfer").await
    }
}

#[async_trait]
impl TokenRegistry for NearViewClient {
    async fn bridged_token(
        &self,
        token: &OmniAddress,
        chain: ChainKind,
    ) -> Result<Option<OmniAddress>> {
        if chain == ChainKind::Near {
            // Foreign token -> its NEAR account id.
            let account: Option<AccountId> = self
                .view(
                    &self.locker.clone(),
                    "get_token_id",
                    json!({ "address": token }),
                )
                .await?;
            Ok(account.map(OmniAddress::Near))
        } else {
            // NEAR (or foreign) token -> its address on `chain`.
            let address: Option<OmniAddress> = self
                .view(
                    &self.locker.clone(),
                    "get_token_address",
                    json!({ "chain_kind": chain, "token": token }),
                )
                .await?;
            Ok(address)
        }
    }

    async fn token_decimals(
        &self,
        token: &OmniAddress,
        chain: ChainKind,
    ) -> Result<TokenDecimals> {
        self.view(
            &self.locker.clone(),
            "get_token_decimals",
            json!({ "address": token, "chain_kind": chain }),
        )
        .await
    }
}

#[async_trait]
impl StorageBalanceSource for NearViewClient {
    async fn storage_balance_of(
        &self,
        contract: &AccountId,
        account: &AccountId,
    ) -> Result<Option<StorageBalance>> {
        let balance: Option<StorageBalanceView> = self
            .view(
                contract,
                "storage_balance_of",
                json!({ "account_id": account }),
            )
            .await?;
        balance
            .map(|view| {
                let parse = |s: &String| {
                    s.parse::<u128>()
                        .map_err(|_| omni_bridge_types::errors::RpcError::Rpc {
                            message: "storage_balance_of returned a non-numeric balance".into(),
                            attempts: 1,
                        })
                };
                Ok::<StorageBalance, omni_bridge_types::errors::RpcError>(StorageBalance {
                    total: parse(&view.total)?,
                    available: parse(&view.available)?,
                })
            })
            .transpose()
            .map_err(Into::into)
    }

    async fn required_balance_for_account(&self) -> Result<u128> {
        self.view_u128("required_balance_for_account").await
    }

    async fn required_balance_for_init_transfer(&self) -> Result<u128> {
        self.view_u128("required_balance_for_init_transfer").await
    }
}
