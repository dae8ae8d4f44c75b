//! Error taxonomy for the SDK.
//!
//! Every fallible operation returns one of the typed enums below, wrapped in
//! the [`BridgeSdkError`] umbrella at the library boundary. Errors are
//! returned, never panicked across the boundary, and validation errors are
//! terminal: the SDK never auto-corrects caller input.

use thiserror::Error;

/// Result alias used across the SDK.
pub type Result<T> = std::result::Result<T, BridgeSdkError>;

/// A transfer intent that cannot land on the destination chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The transfer amount is zero.
    #[error("Transfer amount must be positive")]
    InvalidAmount,
    /// An address failed chain-specific validation.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    /// No bridged token is registered for the (token, destination) pair.
    #[error("Token {token} is not registered on {chain}")]
    TokenNotRegistered { token: String, chain: String },
    /// Source and destination chains are the same.
    #[error("Source and destination chain must differ")]
    SameChain,
    /// The relayer fee consumes the whole amount.
    #[error("Fee {fee} must be less than amount {amount}")]
    FeeExceedsAmount { amount: u128, fee: u128 },
    /// Nothing is left for the recipient after decimal normalization.
    #[error("Transfer amount rounds to dust after decimal normalization")]
    DustAfterNormalization,
    /// A UTXO withdrawal below the chain's minimum.
    #[error("Withdrawal of {amount} is below the minimum of {min}")]
    AmountBelowMinWithdraw { amount: u128, min: u128 },
    /// The available UTXO set cannot cover amount plus fee.
    #[error("Insufficient UTXOs: gathered {gathered} of {required} within {max_inputs} inputs")]
    InsufficientUtxos {
        required: u128,
        gathered: u128,
        max_inputs: usize,
    },
}

/// An RPC interaction that failed after internal retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RpcError {
    /// The endpoint did not answer within the deadline.
    #[error("RPC timed out after {attempts} attempts")]
    Timeout { attempts: u32 },
    /// The endpoint answered with an error.
    #[error("RPC failed after {attempts} attempts: {message}")]
    Rpc { message: String, attempts: u32 },
    /// The endpoint is rate limiting the caller.
    #[error("RPC rate limited: {message}")]
    RateLimited { message: String },
    /// The caller cancelled the operation at a suspension point.
    #[error("Operation cancelled")]
    Cancelled,
}

/// A proof that could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProofError {
    /// The proof inputs exist but are not final yet; retry later.
    #[error("Proof not ready: {0}")]
    NotReady(String),
    /// Fetching proof inputs failed.
    #[error("Proof fetch failed: {0}")]
    FetchFailed(String),
    /// The origin transaction receipt was not found.
    #[error("Receipt not found for transaction {0}")]
    ReceiptNotFound(String),
    /// No log with the expected topic exists in the receipt.
    #[error("Log not found: {0}")]
    LogNotFound(String),
}

/// Malformed on-wire data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// An address string that cannot be decoded for its chain.
    #[error("Malformed address: {0}")]
    MalformedAddress(String),
    /// An event log that does not match the expected shape.
    #[error("Malformed event: {0}")]
    MalformedEvent(String),
    /// An `OmniAddress` with a prefix outside the chain set.
    #[error("Unknown chain prefix: {0}")]
    UnknownChainPrefix(String),
}

/// Passthrough of an on-chain failure message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Contract error: {0}")]
pub struct ContractError(pub String);

/// Umbrella error returned at the library boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeSdkError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Rpc(#[from] RpcError),
    #[error(transparent)]
    Proof(#[from] ProofError),
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    #[error(transparent)]
    Contract(#[from] ContractError),
}
