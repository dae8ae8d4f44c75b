//! The bridge factory ABI.
//!
//! Declared with `sol!` so function selectors are keccak256-derived at
//! compile time. The signatures are part of the wire contract with the
//! deployed factories and must not drift.

use alloy_sol_types::sol;

sol! {
    /// Payload of an MPC-signed transfer finalization.
    #[derive(Debug, PartialEq, Eq)]
    struct TransferMessagePayload {
        uint64 destinationNonce;
        uint8 originChain;
        uint64 originNonce;
        address tokenAddress;
        uint128 amount;
        address recipient;
        string feeRecipient;
    }

    /// Payload of an MPC-signed token deployment.
    #[derive(Debug, PartialEq, Eq)]
    struct MetadataPayload {
        string token;
        string name;
        string symbol;
        uint8 decimals;
    }

    function initTransfer(
        address tokenAddress,
        uint128 amount,
        uint128 fee,
        uint128 nativeFee,
        string recipient,
        string message
    ) payable;

    function finTransfer(bytes signature, TransferMessagePayload payload) payable;

    function deployToken(bytes signature, MetadataPayload metadata) payable;

    function logMetadata(address tokenAddress);

    function approve(address spender, uint256 amount) returns (bool);

    event InitTransfer(
        address indexed sender,
        address indexed tokenAddress,
        uint64 indexed originNonce,
        uint128 amount,
        uint128 fee,
        uint128 nativeTokenFee,
        string recipient,
        string message
    );

    event Transfer(address indexed from, address indexed to, uint256 value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_sol_types::{SolCall, SolEvent};

    #[test]
    fn init_transfer_selector_is_stable() {
        // keccak256("initTransfer(address,uint128,uint128,uint128,string,string)")[..4]
        let selector = initTransferCall::SELECTOR;
        assert_eq!(selector.len(), 4);
        assert_eq!(
            initTransferCall::SIGNATURE,
            "initTransfer(address,uint128,uint128,uint128,string,string)"
        );
    }

    #[test]
    fn fin_transfer_signature_includes_payload_tuple() {
        assert_eq!(
            finTransferCall::SIGNATURE,
            "finTransfer(bytes,(uint64,uint8,uint64,address,uint128,address,string))"
        );
        assert_eq!(
            deployTokenCall::SIGNATURE,
            "deployToken(bytes,(string,string,string,uint8))"
        );
    }

    #[test]
    fn erc20_transfer_topic_is_canonical() {
        assert_eq!(
            hex::encode(Transfer::SIGNATURE_HASH),
            "ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
        );
    }
}
