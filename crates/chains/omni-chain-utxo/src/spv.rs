//! SPV inclusion proofs.
//!
//! The NEAR connectors verify deposits against an on-chain light client: a
//! block header plus the Merkle branch from the transaction to the header's
//! merkle root. The tree is the standard Bitcoin construction, double
//! sha256 with the last node duplicated on odd layers (Zcash builds its
//! transparent tree the same way).
//!
//! Transaction ids are passed in RPC display order (byte-reversed); hashing
//! happens in internal order. Emitted sibling byte order differs per chain:
//! the Bitcoin connector expects display order, the Zcash connector internal
//! order.

use bitcoin::hashes::{Hash, sha256d};

use omni_bridge_types::chain::ChainKind;
use omni_bridge_types::errors::ProofError;
use omni_bridge_types::proof::{H256, UtxoProof};

fn hash_pair(left: &H256, right: &H256) -> H256 {
    let mut concat = Vec::with_capacity(64);
    concat.extend_from_slice(&left.0);
    concat.extend_from_slice(&right.0);
    H256(sha256d::Hash::hash(&concat).to_byte_array())
}

/// Compute the sibling path and root over `leaves` (internal byte order).
pub fn merkle_path(leaves: &[H256], index: usize) -> Result<(Vec<H256>, H256), ProofError> {
    if index >= leaves.len() {
        return Err(ProofError::FetchFailed(format!(
            "tx index {index} out of range for {} transactions",
            leaves.len()
        )));
    }
    let mut layer = leaves.to_vec();
    let mut position = index;
    let mut siblings = Vec::new();
    while layer.len() > 1 {
        if layer.len() % 2 == 1 {
            layer.push(*layer.last().expect("layer is non-empty"));
        }
        siblings.push(layer[position ^ 1]);
        layer = layer
            .chunks(2)
            .map(|pair| hash_pair(&pair[0], &pair[1]))
            .collect();
        position /= 2;
    }
    Ok((siblings, layer[0]))
}

/// Fold a leaf back up the tree along `siblings`; used to verify a path.
pub fn fold_path(leaf: H256, index: usize, siblings: &[H256]) -> H256 {
    let mut acc = leaf;
    let mut position = index;
    for sibling in siblings {
        acc = if position % 2 == 0 {
            hash_pair(&acc, sibling)
        } else {
            hash_pair(sibling, &acc)
        };
        position /= 2;
    }
    acc
}

/// Build the SPV proof for the transaction at `tx_index`.
///
/// `txids` is the block's ordered transaction list in display order, as
/// returned by Bitcoin-family RPCs; `expected_root` is the header's merkle
/// root in display order. The computed root is checked before the proof is
/// emitted.
pub fn build_spv_proof(
    chain: ChainKind,
    tx_bytes: Vec<u8>,
    block_hash: H256,
    txids: &[H256],
    tx_index: usize,
    expected_root: H256,
) -> Result<UtxoProof, ProofError> {
    let leaves: Vec<H256> = txids.iter().map(H256::reversed).collect();
    let (siblings, root) = merkle_path(&leaves, tx_index)?;
    if root != expected_root.reversed() {
        return Err(ProofError::FetchFailed(format!(
            "computed merkle root {} does not match header {expected_root}",
            root.reversed(),
        )));
    }
    let merkle_proof = match chain {
        ChainKind::Btc => siblings.iter().map(H256::reversed).collect(),
        ChainKind::Zcash => siblings,
        other => {
            return Err(ProofError::FetchFailed(format!(
                "{other} is not a UTXO chain"
            )));
        }
    };
    Ok(UtxoProof {
        tx_bytes,
        tx_block_blockhash: block_hash,
        tx_index: tx_index as u64,
        merkle_proof,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(tag: u8) -> H256 {
        H256([tag; 32])
    }

    #[test]
    fn single_tx_block_has_empty_path() {
        let (siblings, root) = merkle_path(&[leaf(1)], 0).unwrap();
        assert!(siblings.is_empty());
        assert_eq!(root, leaf(1));
    }

    #[test]
    fn two_leaves_root_is_pair_hash() {
        let (siblings, root) = merkle_path(&[leaf(1), leaf(2)], 0).unwrap();
        assert_eq!(siblings, vec![leaf(2)]);
        assert_eq!(root, hash_pair(&leaf(1), &leaf(2)));
    }

    #[test]
    fn odd_layer_duplicates_last_leaf() {
        let (_, root) = merkle_path(&[leaf(1), leaf(2), leaf(3)], 2).unwrap();
        let left = hash_pair(&leaf(1), &leaf(2));
        let right = hash_pair(&leaf(3), &leaf(3));
        assert_eq!(root, hash_pair(&left, &right));
    }

    #[test]
    fn every_position_folds_to_the_root() {
        let leaves: Vec<H256> = (0..7).map(leaf).collect();
        let (_, root) = merkle_path(&leaves, 0).unwrap();
        for (index, entry) in leaves.iter().enumerate() {
            let (siblings, same_root) = merkle_path(&leaves, index).unwrap();
            assert_eq!(same_root, root);
            assert_eq!(fold_path(*entry, index, &siblings), root);
        }
    }

    #[test]
    fn out_of_range_index_rejected() {
        assert!(merkle_path(&[leaf(1)], 1).is_err());
    }

    #[test]
    fn bitcoin_proof_siblings_are_display_order() {
        let txids = vec![leaf(1), leaf(2)];
        let leaves: Vec<H256> = txids.iter().map(H256::reversed).collect();
        let (internal_siblings, root) = merkle_path(&leaves, 0).unwrap();
        let proof = build_spv_proof(
            ChainKind::Btc,
            vec![0xde, 0xad],
            leaf(9),
            &txids,
            0,
            root.reversed(),
        )
        .unwrap();
        assert_eq!(proof.merkle_proof[0], internal_siblings[0].reversed());

        let zec = build_spv_proof(
            ChainKind::Zcash,
            vec![0xde, 0xad],
            leaf(9),
            &txids,
            0,
            root.reversed(),
        )
        .unwrap();
        assert_eq!(zec.merkle_proof[0], internal_siblings[0]);
    }

    #[test]
    fn root_mismatch_is_fatal() {
        let txids = vec![leaf(1), leaf(2)];
        let err = build_spv_proof(ChainKind::Btc, vec![], leaf(9), &txids, 0, leaf(8))
            .unwrap_err();
        assert!(matches!(err, ProofError::FetchFailed(_)));
    }
}
