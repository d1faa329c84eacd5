//! Proof verification and the per-entry proof artifact.

use serde::{Deserialize, Serialize};

use crate::crypto::{hash_pair, Hash};
use crate::entry::Entry;

/// Fold `proof` into `leaf` with sorted-pair hashing and return the
/// resulting root candidate.
pub fn process_proof(leaf: &Hash, proof: &[Hash]) -> Hash {
    proof
        .iter()
        .fold(*leaf, |computed, sibling| hash_pair(&computed, sibling))
}

/// `true` iff `proof` takes `leaf` to `root`.
///
/// A `false` here is an answer, not a failure: the claim simply does not
/// belong to this commitment.
///
/// # Example
///
/// ```
/// use vesting_merkle::crypto::keccak256;
/// use vesting_merkle::merkle::{verify, MerkleTree};
///
/// let leaves: Vec<_> = (0u8..5).map(|i| keccak256(&[i])).collect();
/// let tree = MerkleTree::build(leaves.clone()).unwrap();
/// let proof = tree.proof(3).unwrap();
///
/// assert!(verify(&tree.root(), &leaves[3], &proof));
/// assert!(!verify(&tree.root(), &leaves[2], &proof));
/// ```
pub fn verify(root: &Hash, leaf: &Hash, proof: &[Hash]) -> bool {
    process_proof(leaf, proof) == *root
}

/// Everything a claimant needs: their entry, its leaf index, and the
/// sibling path. Serializes to the JSON shape handed to claim front ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryProof {
    /// Position of the entry in the committed sequence.
    pub leaf_index: usize,
    /// The committed allocation.
    pub entry: Entry,
    /// `keccak256(keccak256(abi.encode(entry)))`.
    #[serde(with = "crate::codec::hash")]
    pub leaf: Hash,
    /// Sibling hashes, leaf to root.
    #[serde(with = "crate::codec::hash_vec")]
    pub proof: Vec<Hash>,
}

impl EntryProof {
    /// Check this proof against `root`, recomputing the leaf from the entry
    /// rather than trusting the stored `leaf` field.
    pub fn verify(&self, root: &Hash) -> bool {
        verify(root, &self.entry.leaf_hash(), &self.proof)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keccak256;
    use crate::merkle::MerkleTree;

    fn sample_tree(n: u8) -> (MerkleTree, Vec<Hash>) {
        let leaves: Vec<Hash> = (0..n).map(|i| keccak256(&[i])).collect();
        (MerkleTree::build(leaves.clone()).unwrap(), leaves)
    }

    #[test]
    fn test_empty_proof_means_leaf_is_root() {
        let leaf = keccak256(b"solo");
        assert!(verify(&leaf, &leaf, &[]));
        assert!(!verify(&keccak256(b"other"), &leaf, &[]));
    }

    #[test]
    fn test_flipped_proof_byte_fails() {
        let (tree, leaves) = sample_tree(8);
        let proof = tree.proof(5).unwrap();
        for level in 0..proof.len() {
            for byte in [0, 17, 31] {
                let mut tampered = proof.clone();
                tampered[level][byte] ^= 0x80;
                assert!(!verify(&tree.root(), &leaves[5], &tampered));
            }
        }
    }

    #[test]
    fn test_substituted_leaf_fails() {
        let (tree, leaves) = sample_tree(8);
        let proof = tree.proof(5).unwrap();
        for (i, leaf) in leaves.iter().enumerate().filter(|(i, _)| *i != 5) {
            assert!(!verify(&tree.root(), leaf, &proof), "leaf {i}");
        }
    }

    #[test]
    fn test_sibling_order_in_proof_does_not_need_flags() {
        // Same proof verifies regardless of whether the leaf sat left or right.
        let (tree, leaves) = sample_tree(2);
        assert!(verify(&tree.root(), &leaves[0], &[leaves[1]]));
        assert!(verify(&tree.root(), &leaves[1], &[leaves[0]]));
    }

    #[test]
    fn test_truncated_proof_fails() {
        let (tree, leaves) = sample_tree(8);
        let proof = tree.proof(0).unwrap();
        assert!(!verify(&tree.root(), &leaves[0], &proof[..proof.len() - 1]));
    }

    #[test]
    fn test_process_proof_matches_root() {
        let (tree, leaves) = sample_tree(7);
        let proof = tree.proof(6).unwrap();
        assert_eq!(process_proof(&leaves[6], &proof), tree.root());
    }
}
