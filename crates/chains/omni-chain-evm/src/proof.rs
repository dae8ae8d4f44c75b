//! Receipt inclusion proofs.
//!
//! The NEAR bridge contract's EVM prover verifies a Merkle-Patricia
//! inclusion proof against the block header's `receiptsRoot`. The extractor
//! rebuilds the receipts trie over every receipt in the block, keyed by
//! `rlp(receipt_index)`, with receipts encoded per the post-Berlin typed
//! envelope rules, and re-encodes the header with exactly the fields of its
//! fork. Any drift from the canonical encodings fails the on-chain check, so
//! the computed root is cross-checked against the header before a proof is
//! emitted.

use alloy_primitives::{B256, keccak256};
use cita_trie::{MemoryDB, PatriciaTrie, Trie};
use hasher::HasherKeccak;
use rlp::RlpStream;
use std::sync::Arc;

use omni_bridge_types::errors::ProofError;
use omni_bridge_types::proof::EvmProof;

use crate::receipt::{Block, LogEntry, TransactionReceipt};

/// Append an unsigned value as its minimal big-endian byte string, the RLP
/// integer encoding.
fn append_trimmed(stream: &mut RlpStream, bytes: &[u8]) {
    let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    stream.append(&bytes[first..].to_vec());
}

/// RLP-encode a block header with exactly the fields its fork carries.
pub fn encode_header(block: &Block) -> Vec<u8> {
    let optional = [
        block.base_fee_per_gas.is_some(),
        block.withdrawals_root.is_some(),
        block.blob_gas_used.is_some(),
        block.excess_blob_gas.is_some(),
        block.parent_beacon_block_root.is_some(),
        block.requests_hash.is_some(),
    ]
    .iter()
    .filter(|present| **present)
    .count();
    let mut stream = RlpStream::new_list(15 + optional);
    stream.append(&block.parent_hash.as_slice().to_vec());
    stream.append(&block.sha3_uncles.as_slice().to_vec());
    stream.append(&block.miner.as_slice().to_vec());
    stream.append(&block.state_root.as_slice().to_vec());
    stream.append(&block.transactions_root.as_slice().to_vec());
    stream.append(&block.receipts_root.as_slice().to_vec());
    stream.append(&block.logs_bloom.as_slice().to_vec());
    append_trimmed(&mut stream, &block.difficulty.to_be_bytes::<32>());
    stream.append(&block.number);
    stream.append(&block.gas_limit);
    stream.append(&block.gas_used);
    stream.append(&block.timestamp);
    stream.append(&block.extra_data.to_vec());
    stream.append(&block.mix_hash.as_slice().to_vec());
    // The nonce is a fixed 8-byte string, never trimmed.
    stream.append(&block.nonce.as_slice().to_vec());
    if let Some(base_fee) = block.base_fee_per_gas {
        stream.append(&base_fee);
    }
    if let Some(root) = &block.withdrawals_root {
        stream.append(&root.as_slice().to_vec());
    }
    if let Some(blob_gas_used) = block.blob_gas_used {
        stream.append(&blob_gas_used);
    }
    if let Some(excess_blob_gas) = block.excess_blob_gas {
        stream.append(&excess_blob_gas);
    }
    if let Some(root) = &block.parent_beacon_block_root {
        stream.append(&root.as_slice().to_vec());
    }
    if let Some(root) = &block.requests_hash {
        stream.append(&root.as_slice().to_vec());
    }
    stream.out().to_vec()
}

/// RLP-encode one log entry as `[address, topics, data]`.
pub fn encode_log(log: &LogEntry) -> Vec<u8> {
    let mut stream = RlpStream::new_list(3);
    append_log(&mut stream, log);
    stream.out().to_vec()
}

fn append_log(stream: &mut RlpStream, log: &LogEntry) {
    stream.append(&log.address.as_slice().to_vec());
    stream.begin_list(log.topics.len());
    for topic in &log.topics {
        stream.append(&topic.as_slice().to_vec());
    }
    stream.append(&log.data.to_vec());
}

/// Encode a receipt per EIP-2718: legacy receipts are pure RLP, typed
/// receipts are `type-byte || rlp(...)`.
pub fn encode_receipt(receipt: &TransactionReceipt) -> Vec<u8> {
    let mut stream = RlpStream::new_list(4);
    match (receipt.status, &receipt.root) {
        // Pre-Byzantium receipts carry the intermediate state root.
        (None, Some(root)) => {
            stream.append(&root.as_slice().to_vec());
        }
        (status, _) => {
            stream.append(&status.unwrap_or(1));
        }
    }
    stream.append(&receipt.cumulative_gas_used);
    stream.append(&receipt.logs_bloom.as_slice().to_vec());
    stream.begin_list(receipt.logs.len());
    for log in &receipt.logs {
        stream.begin_list(3);
        append_log(&mut stream, log);
    }
    let payload = stream.out().to_vec();
    if receipt.tx_type == 0 {
        payload
    } else {
        let mut enveloped = Vec::with_capacity(payload.len() + 1);
        enveloped.push(receipt.tx_type as u8);
        enveloped.extend_from_slice(&payload);
        enveloped
    }
}

fn receipts_trie(
    receipts: &[TransactionReceipt],
) -> Result<PatriciaTrie<MemoryDB, HasherKeccak>, ProofError> {
    let mut trie = PatriciaTrie::new(Arc::new(MemoryDB::new(true)), Arc::new(HasherKeccak::new()));
    for (index, receipt) in receipts.iter().enumerate() {
        trie.insert(rlp::encode(&(index as u64)).to_vec(), encode_receipt(receipt))
            .map_err(|e| ProofError::FetchFailed(format!("receipts trie: {e}")))?;
    }
    Ok(trie)
}

/// Compute the receipts root over all receipts of a block.
pub fn receipts_root(receipts: &[TransactionReceipt]) -> Result<B256, ProofError> {
    let mut trie = receipts_trie(receipts)?;
    let root = trie
        .root()
        .map_err(|e| ProofError::FetchFailed(format!("receipts trie root: {e}")))?;
    Ok(B256::from_slice(&root))
}

/// Extract the inclusion proof for the receipt of `tx_hash`, selecting the
/// first log whose `topic[0]` equals `topic`.
///
/// `receipts` must be every receipt of `block`, in block order. The computed
/// trie root is checked against the header's `receiptsRoot` before the proof
/// is emitted.
pub fn extract_receipt_proof(
    block: &Block,
    receipts: &[TransactionReceipt],
    tx_hash: B256,
    topic: B256,
) -> Result<EvmProof, ProofError> {
    let receipt = receipts
        .iter()
        .find(|r| r.transaction_hash == tx_hash)
        .ok_or_else(|| ProofError::ReceiptNotFound(tx_hash.to_string()))?;
    let receipt_index = receipt.transaction_index;

    let (log_index, log) = receipt
        .logs
        .iter()
        .enumerate()
        .find(|(_, log)| log.topics.first() == Some(&topic))
        .ok_or_else(|| {
            ProofError::LogNotFound(format!("no log with topic {topic} in {tx_hash}"))
        })?;

    let mut trie = receipts_trie(receipts)?;
    let computed_root = trie
        .root()
        .map_err(|e| ProofError::FetchFailed(format!("receipts trie root: {e}")))?;
    if computed_root != block.receipts_root.as_slice() {
        return Err(ProofError::FetchFailed(format!(
            "computed receipts root 0x{} does not match header {}",
            hex::encode(&computed_root),
            block.receipts_root,
        )));
    }

    let key = rlp::encode(&receipt_index).to_vec();
    let proof = trie
        .get_proof(&key)
        .map_err(|e| ProofError::FetchFailed(format!("receipts trie proof: {e}")))?;

    tracing::debug!(
        tx = %tx_hash,
        receipt_index,
        log_index,
        nodes = proof.len(),
        "Extracted receipt proof"
    );

    Ok(EvmProof {
        log_index: log_index as u64,
        log_entry_data: encode_log(log),
        receipt_index,
        receipt_data: encode_receipt(receipt),
        header_data: encode_header(block),
        proof,
    })
}
