//! Retry and cancellation plumbing shared by the RPC adapters.
//!
//! Every RPC call is a suspension point: it retries up to three times with
//! a short backoff (immediate, 1 s, 2 s), honors the caller's cancellation
//! token between attempts, and surfaces exhaustion as a typed
//! [`RpcError`]. Rate limiting is not retried; the caller decides how to
//! pace itself.

use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use omni_bridge_types::errors::RpcError;

/// Outcome of one RPC attempt, before retry classification.
#[derive(Debug)]
pub enum AttemptError {
    /// The endpoint did not answer in time; retried.
    Timeout,
    /// The endpoint answered with an error; retried.
    Transient(String),
    /// The endpoint is rate limiting; surfaced immediately.
    RateLimited(String),
}

const MAX_ATTEMPTS: u32 = 3;
const BACKOFF: [Duration; 3] = [
    Duration::ZERO,
    Duration::from_secs(1),
    Duration::from_secs(2),
];

/// Run `operation` with the standard retry schedule.
///
/// `cancel`, when supplied, aborts between attempts and during backoff and
/// surfaces as [`RpcError::Cancelled`] rather than a timeout.
pub async fn with_retry<T, F, Fut>(
    label: &str,
    cancel: Option<&CancellationToken>,
    mut operation: F,
) -> Result<T, RpcError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AttemptError>>,
{
    let mut last_error = AttemptError::Timeout;
    for attempt in 0..MAX_ATTEMPTS {
        let delay = BACKOFF[attempt as usize];
        if !delay.is_zero() {
            match cancel {
                Some(token) => {
                    tokio::select! {
                        _ = token.cancelled() => return Err(RpcError::Cancelled),
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
                None => tokio::time::sleep(delay).await,
            }
        }
        if let Some(token) = cancel {
            if token.is_cancelled() {
                return Err(RpcError::Cancelled);
            }
        }
        let outcome = match cancel {
            Some(token) => {
                tokio::select! {
                    _ = token.cancelled() => return Err(RpcError::Cancelled),
                    outcome = operation() => outcome,
                }
            }
            None => operation().await,
        };
        match outcome {
            Ok(value) => return Ok(value),
            Err(AttemptError::RateLimited(message)) => {
                return Err(RpcError::RateLimited { message });
            }
            Err(error) => {
                tracing::debug!(label, attempt, error = ?error, "RPC attempt failed");
                last_error = error;
            }
        }
    }
    Err(match last_error {
        AttemptError::Timeout => RpcError::Timeout {
            attempts: MAX_ATTEMPTS,
        },
        AttemptError::Transient(message) => RpcError::Rpc {
            message,
            attempts: MAX_ATTEMPTS,
        },
        AttemptError::RateLimited(message) => RpcError::RateLimited { message },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn retries_until_success() {
        let calls = AtomicU32::new(0);
        let result = with_retry("test", None, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(AttemptError::Transient("boom".into()))
                } else {
                    Ok(42)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn exhaustion_carries_attempt_count() {
        let result: Result<(), _> = with_retry("test", None, || async {
            Err(AttemptError::Transient("down".into()))
        })
        .await;
        assert_eq!(
            result.unwrap_err(),
            RpcError::Rpc {
                message: "down".into(),
                attempts: 3
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limiting_is_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retry("test", None, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(AttemptError::RateLimited("429".into())) }
        })
        .await;
        assert!(matches!(result.unwrap_err(), RpcError::RateLimited { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_is_distinct_from_timeout() {
        let token = CancellationToken::new();
        token.cancel();
        let result: Result<(), _> = with_retry("test", Some(&token), || async {
            Err(AttemptError::Timeout)
        })
        .await;
        assert_eq!(result.unwrap_err(), RpcError::Cancelled);
    }
}
