//! The bridge HTTP API client.
//!
//! The bridge operator exposes an HTTPS JSON API for transfer status, fee
//! quotes, and UTXO deposit addresses. Responses are typed here; retries
//! follow the standard schedule in [`crate::rpc`].

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use url::Url;

use omni_bridge_types::errors::RpcError;
use omni_bridge_types::{OmniAddress, Result};

use crate::rpc::{AttemptError, with_retry};

/// One leg of a transfer's lifecycle as the API reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferPhase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
}

/// A transfer as tracked by the bridge API, phase by phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiTransfer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initialized: Option<TransferPhase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed: Option<TransferPhase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finalised: Option<TransferPhase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claimed: Option<TransferPhase>,
}

impl ApiTransfer {
    /// Whether the destination-chain leg has landed.
    pub fn is_finalised(&self) -> bool {
        self.finalised.is_some() || self.claimed.is_some()
    }
}

/// A relayer fee quote. Token fees are denominated in the transferred
/// token's origin decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferFeeQuote {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native_token_fee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transferred_token_fee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usd_fee: Option<f64>,
}

impl TransferFeeQuote {
    pub fn transferred_token_fee_u128(&self) -> Option<u128> {
        self.transferred_token_fee.as_ref()?.parse().ok()
    }

    pub fn native_token_fee_u128(&self) -> Option<u128> {
        self.native_token_fee.as_ref()?.parse().ok()
    }
}

/// A UTXO deposit target: the address to pay and the opaque args the NEAR
/// connector expects when the deposit is finalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositAddress {
    pub address: String,
    pub deposit_args: serde_json::Value,
}

/// Client for the bridge operator's API.
#[derive(Debug, Clone)]
pub struct BridgeApiClient {
    http: reqwest::Client,
    base: Url,
    cancel: Option<CancellationToken>,
}

impl BridgeApiClient {
    pub fn new(base: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            base,
            cancel: None,
        }
    }

    /// Attach a cancellation token honored at every request.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self
            .base
            .join(path)
            .map_err(|e| RpcError::Rpc {
                message: format!("invalid API path {path}: {e}"),
                attempts: 0,
            })?;
        let value = with_retry(path, self.cancel.as_ref(), || {
            let url = url.clone();
            async move {
                let response = self
                    .http
                    .get(url)
                    .query(query)
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
                    return Err(AttemptError::RateLimited("bridge api".to_string()));
                }
                if !response.status().is_success() {
                    return Err(AttemptError::Transient(format!(
                        "bridge api returned {}",
                        response.status()
                    )));
                }
                response
                    .json::<T>()
                    .await
                    .map_err(|e| AttemptError::Transient(e.to_string()))
            }
        })
        .await?;
        Ok(value)
    }

    /// All transfers initiated or finalized by `transaction_hash`.
    pub async fn transfers_by_transaction(&self, transaction_hash: &str) -> Result<Vec<ApiTransfer>> {
        self.get_json(
            "/api/v2/transfers/transfer",
            &[("transaction_hash", transaction_hash.to_string())],
        )
        .await
    }

    /// Quote the relayer fee for a transfer.
    pub async fn transfer_fee(
        &self,
        sender: &OmniAddress,
        recipient: &OmniAddress,
        token: &OmniAddress,
    ) -> Result<TransferFeeQuote> {
        self.get_json(
            "/api/v1/transfer-fee",
            &[
                ("sender", sender.to_string()),
                ("recipient", recipient.to_string()),
                ("token", token.to_string()),
            ],
        )
        .await
    }

    /// Page through a sender's transfers.
    pub async fn transfers_by_sender(
        &self,
        sender: &OmniAddress,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<ApiTransfer>> {
        self.get_json(
            "/api/v1/transfers",
            &[
                ("sender", sender.to_string()),
                ("offset", offset.to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }

    /// A deposit address for moving UTXO-chain funds into the bridge.
    ///
    /// `chain` is the UTXO chain tag (`btc` or `zec`); the returned
    /// `deposit_args` blob is handed to the NEAR connector verbatim when the
    /// deposit is finalized.
    pub async fn utxo_deposit_address(
        &self,
        chain: &str,
        recipient: &OmniAddress,
    ) -> Result<DepositAddress> {
        self.get_json(
            "/api/v1/deposit-address",
            &[
                ("chain", chain.to_string()),
                ("recipient", recipient.to_string()),
            ],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_phases_deserialize_sparsely() {
        let json = r#"{
            "id": "eth:17",
            "initialized": { "timestamp": 1719321600, "transaction_hash": "0xabc" },
            "signed": { "timestamp": 1719321700 }
        }"#;
        let transfer: ApiTransfer = serde_json::from_str(json).unwrap();
        assert!(!transfer.is_finalised());
        assert_eq!(
            transfer.initialized.unwrap().transaction_hash.as_deref(),
            Some("0xabc")
        );
    }

    #[test]
    fn finalised_counts_as_done() {
        let transfer: ApiTransfer =
            serde_json::from_str(r#"{ "finalised": { "timestamp": 1 } }"#).unwrap();
        assert!(transfer.is_finalised());
    }

    #[test]
    fn fee_quote_parses_decimal_strings() {
        let quote: TransferFeeQuote = serde_json::from_str(
            r#"{ "native_token_fee": "100000", "transferred_token_fee": "2500000000", "usd_fee": 0.23 }"#,
        )
        .unwrap();
        assert_eq!(quote.transferred_token_fee_u128(), Some(2_500_000_000));
        assert_eq!(quote.native_token_fee_u128(), Some(100_000));
    }

    #[test]
    fn deposit_address_keeps_args_opaque() {
        let deposit: DepositAddress = serde_json::from_str(
            r#"{ "address": "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4", "depositArgs": { "deposit_msg": { "recipient_id": "alice.near" } } }"#,
        )
        .unwrap();
        assert_eq!(deposit.deposit_args["deposit_msg"]["recipient_id"], "alice.near");
    }
}
