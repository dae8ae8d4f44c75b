//! Wormhole VAA retrieval.
//!
//! Solana-origin transfers are attested by Wormhole guardians. Guardian
//! signatures take time to accumulate, so retrieval is an explicit polling
//! state machine rather than a single request: `Polling` until the API
//! serves the signed VAA, then `Ready`, or `Timeout` after a single 120 s
//! window, or `Cancelled` when the caller's token fires. Timeouts surface
//! as [`ProofError::NotReady`], which callers may retry later.

use base64::Engine;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

use omni_bridge_types::errors::{ProofError, RpcError};
use omni_bridge_types::proof::WormholeVaa;
use omni_bridge_types::Result;

/// The single polling window; guardians nearly always sign well within it.
pub const VAA_FETCH_WINDOW: Duration = Duration::from_secs(120);

/// Delay between polls.
const POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Where one VAA retrieval currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaaFetchState {
    /// Still waiting for guardian signatures.
    Polling { attempts: u32 },
    /// The signed VAA arrived.
    Ready(WormholeVaa),
    /// The window elapsed without a signed VAA.
    Timeout,
    /// The caller cancelled the fetch.
    Cancelled,
}

/// Client against a wormholescan-compatible API.
#[derive(Debug, Clone)]
pub struct WormholeClient {
    http: reqwest::Client,
    base: Url,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignedVaaResponse {
    vaa_bytes: String,
}

impl WormholeClient {
    pub fn new(base: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            base,
        }
    }

    /// One poll of the signed-VAA endpoint. `Ok(None)` means the guardians
    /// have not signed yet.
    pub async fn try_fetch_signed_vaa(
        &self,
        chain_id: u16,
        emitter: &str,
        sequence: u64,
    ) -> Result<Option<WormholeVaa>> {
        let url = self
            .base
            .join(&format!("/v1/signed_vaa/{chain_id}/{emitter}/{sequence}"))
            .map_err(|e| RpcError::Rpc {
                message: format!("invalid wormhole URL: {e}"),
                attempts: 0,
            })?;
        let response = self.http.get(url).send().await.map_err(|e| RpcError::Rpc {
            message: e.to_string(),
            attempts: 1,
        })?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(RpcError::Rpc {
                message: format!("wormhole api returned {}", response.status()),
                attempts: 1,
            }
            .into());
        }
        let body: SignedVaaResponse = response.json().await.map_err(|e| RpcError::Rpc {
            message: e.to_string(),
            attempts: 1,
        })?;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&body.vaa_bytes)
            .map_err(|e| ProofError::FetchFailed(format!("VAA is not valid base64: {e}")))?;
        Ok(Some(WormholeVaa::new(&bytes)))
    }

    /// Drive the polling state machine to a terminal state.
    pub async fn poll_signed_vaa(
        &self,
        chain_id: u16,
        emitter: &str,
        sequence: u64,
        cancel: Option<&CancellationToken>,
    ) -> VaaFetchState {
        let deadline = tokio::time::Instant::now() + VAA_FETCH_WINDOW;
        let mut state = VaaFetchState::Polling { attempts: 0 };
        loop {
            let VaaFetchState::Polling { attempts } = state else {
                return state;
            };
            if tokio::time::Instant::now() >= deadline {
                return VaaFetchState::Timeout;
            }
            if let Some(token) = cancel {
                if token.is_cancelled() {
                    return VaaFetchState::Cancelled;
                }
            }
            match self.try_fetch_signed_vaa(chain_id, emitter, sequence).await {
                Ok(Some(vaa)) => return VaaFetchState::Ready(vaa),
                // Not signed yet, or a transient API hiccup: keep polling
                // until the window closes.
                Ok(None) | Err(_) => {
                    state = VaaFetchState::Polling {
                        attempts: attempts + 1,
                    };
                }
            }
            let sleep = tokio::time::sleep_until(deadline.min(
                tokio::time::Instant::now() + POLL_INTERVAL,
            ));
            match cancel {
                Some(token) => {
                    tokio::select! {
                        _ = token.cancelled() => return VaaFetchState::Cancelled,
                        _ = sleep => {}
                    }
                }
                None => sleep.await,
            }
        }
    }

    /// Fetch a signed VAA, mapping terminal states to the error taxonomy.
    pub async fn fetch_signed_vaa(
        &self,
        chain_id: u16,
        emitter: &str,
        sequence: u64,
        cancel: Option<&CancellationToken>,
    ) -> Result<WormholeVaa> {
        tracing::debug!(chain_id, emitter, sequence, "Fetching signed VAA");
        match self.poll_signed_vaa(chain_id, emitter, sequence, cancel).await {
            VaaFetchState::Ready(vaa) => Ok(vaa),
            VaaFetchState::Timeout => Err(ProofError::NotReady(format!(
                "VAA {chain_id}/{emitter}/{sequence} not signed within {}s",
                VAA_FETCH_WINDOW.as_secs()
            ))
            .into()),
            VaaFetchState::Cancelled => Err(RpcError::Cancelled.into()),
            VaaFetchState::Polling { .. } => unreachable!("poll_signed_vaa returns terminal states"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vaa_response_decodes_base64() {
        let body: SignedVaaResponse =
            serde_json::from_str(r#"{ "vaaBytes": "AQIDBA==" }"#).unwrap();
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&body.vaa_bytes)
            .unwrap();
        assert_eq!(bytes, vec![1, 2, 3, 4]);
        assert_eq!(WormholeVaa::new(&bytes).0, "01020304");
    }

    #[tokio::test]
    async fn cancelled_token_terminates_polling() {
        let client = WormholeClient::new(Url::parse("http://127.0.0.1:1/").unwrap());
        let token = CancellationToken::new();
        token.cancel();
        let state = client.poll_signed_vaa(1, "emitter", 7, Some(&token)).await;
        assert_eq!(state, VaaFetchState::Cancelled);
    }
}
