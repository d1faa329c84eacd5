//! Tree assembly and index-addressed proofs.

use tracing::debug;

use crate::crypto::{hash_pair, Hash};
use crate::error::TreeError;

/// An immutable Merkle tree, stored layer by layer.
///
/// `layers[0]` holds the leaves in input order; the last layer holds only
/// the root. Every layer is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree {
    layers: Vec<Vec<Hash>>,
}

impl MerkleTree {
    /// Build the tree bottom-up from leaf hashes.
    ///
    /// A single leaf is its own root. Zero leaves is an error.
    pub fn build(leaves: Vec<Hash>) -> Result<Self, TreeError> {
        if leaves.is_empty() {
            return Err(TreeError::EmptyTree);
        }

        let leaf_count = leaves.len();
        let mut layers = vec![leaves];
        while layers[layers.len() - 1].len() > 1 {
            let parent = next_layer(&layers[layers.len() - 1]);
            layers.push(parent);
        }

        let tree = Self { layers };
        debug!(
            leaves = leaf_count,
            depth = tree.depth(),
            root = %crate::codec::encode_prefixed(&tree.root()),
            "merkle tree built"
        );
        Ok(tree)
    }

    /// Adopt precomputed layers (e.g. from a dump) after checking every
    /// internal node.
    pub fn from_layers(layers: Vec<Vec<Hash>>) -> Result<Self, TreeError> {
        if layers.first().map_or(true, Vec::is_empty) {
            return Err(TreeError::EmptyTree);
        }
        let tree = Self { layers };
        tree.validate()?;
        Ok(tree)
    }

    /// The root hash.
    pub fn root(&self) -> Hash {
        // Construction guarantees a final layer of exactly one node.
        self.layers[self.layers.len() - 1][0]
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.layers[0].len()
    }

    /// Number of layers above the leaves. Zero for a single-leaf tree.
    pub fn depth(&self) -> usize {
        self.layers.len() - 1
    }

    /// The leaf hashes, in input order.
    pub fn leaves(&self) -> &[Hash] {
        &self.layers[0]
    }

    /// Leaf hash at `index`.
    pub fn leaf(&self, index: usize) -> Result<Hash, TreeError> {
        self.check_index(index)?;
        Ok(self.layers[0][index])
    }

    /// All layers, leaves first.
    pub fn layers(&self) -> &[Vec<Hash>] {
        &self.layers
    }

    /// Sibling hashes from leaf `index` up to (not including) the root.
    ///
    /// Walking up, the sibling of position `i` is `i ^ 1`. A node promoted
    /// as the odd tail of its layer has no sibling there and contributes
    /// nothing, so some proofs are shorter than the tree depth.
    pub fn proof(&self, index: usize) -> Result<Vec<Hash>, TreeError> {
        self.check_index(index)?;

        let mut proof = Vec::with_capacity(self.depth());
        let mut position = index;
        for layer in &self.layers[..self.depth()] {
            if let Some(sibling) = layer.get(position ^ 1) {
                proof.push(*sibling);
            }
            position /= 2;
        }
        Ok(proof)
    }

    /// Recompute every internal node and compare with what is stored.
    pub fn validate(&self) -> Result<(), TreeError> {
        for (layer_index, pair) in self.layers.windows(2).enumerate() {
            let expected = next_layer(&pair[0]);
            if expected.len() != pair[1].len() {
                return Err(TreeError::CorruptNode {
                    layer: layer_index + 1,
                    position: expected.len().min(pair[1].len()),
                });
            }
            if let Some(position) = expected.iter().zip(&pair[1]).position(|(a, b)| a != b) {
                return Err(TreeError::CorruptNode {
                    layer: layer_index + 1,
                    position,
                });
            }
        }

        let top = &self.layers[self.layers.len() - 1];
        if top.len() != 1 {
            return Err(TreeError::CorruptNode {
                layer: self.depth(),
                position: 1,
            });
        }

        // A repeated root layer hashes to itself, so count layers too.
        let expected = layer_count(self.leaf_count());
        if self.layers.len() != expected {
            return Err(TreeError::LayerCountMismatch {
                leaf_count: self.leaf_count(),
                expected,
                actual: self.layers.len(),
            });
        }
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<(), TreeError> {
        if index >= self.leaf_count() {
            return Err(TreeError::IndexOutOfRange {
                index,
                leaf_count: self.leaf_count(),
            });
        }
        Ok(())
    }
}

/// Layers in a tree over `leaf_count` leaves, counting the leaf layer and
/// the root.
fn layer_count(leaf_count: usize) -> usize {
    let mut width = leaf_count;
    let mut count = 1;
    while width > 1 {
        width = (width + 1) / 2;
        count += 1;
    }
    count
}

/// Pair adjacent nodes; an odd tail is promoted as-is.
fn next_layer(layer: &[Hash]) -> Vec<Hash> {
    layer
        .chunks(2)
        .map(|chunk| match chunk {
            [left, right] => hash_pair(left, right),
            [single] => *single,
            _ => unreachable!("chunks(2) yields one or two nodes"),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keccak256;
    use crate::merkle::verify;

    fn leaves(n: u8) -> Vec<Hash> {
        (0..n).map(|i| keccak256(&[i])).collect()
    }

    #[test]
    fn test_empty_tree_is_rejected() {
        assert_eq!(MerkleTree::build(vec![]), Err(TreeError::EmptyTree));
    }

    #[test]
    fn test_single_leaf_is_root() {
        let leaf = keccak256(b"only child");
        let tree = MerkleTree::build(vec![leaf]).unwrap();
        assert_eq!(tree.root(), leaf);
        assert_eq!(tree.depth(), 0);
        assert!(tree.proof(0).unwrap().is_empty());
    }

    #[test]
    fn test_two_leaves() {
        let l = leaves(2);
        let tree = MerkleTree::build(l.clone()).unwrap();
        assert_eq!(tree.root(), hash_pair(&l[0], &l[1]));
        assert_eq!(tree.proof(0).unwrap(), vec![l[1]]);
        assert_eq!(tree.proof(1).unwrap(), vec![l[0]]);
    }

    #[test]
    fn test_odd_leaf_is_promoted_not_duplicated() {
        let l = leaves(3);
        let tree = MerkleTree::build(l.clone()).unwrap();

        let h01 = hash_pair(&l[0], &l[1]);
        assert_eq!(tree.layers()[1], vec![h01, l[2]]);
        assert_eq!(tree.root(), hash_pair(&h01, &l[2]));
        assert_ne!(tree.root(), hash_pair(&h01, &hash_pair(&l[2], &l[2])));
    }

    #[test]
    fn test_promoted_leaf_has_shorter_proof() {
        let l = leaves(3);
        let tree = MerkleTree::build(l.clone()).unwrap();
        assert_eq!(tree.proof(0).unwrap().len(), 2);
        assert_eq!(tree.proof(2).unwrap(), vec![hash_pair(&l[0], &l[1])]);
    }

    #[test]
    fn test_five_leaves_layer_shapes() {
        let tree = MerkleTree::build(leaves(5)).unwrap();
        let shapes: Vec<usize> = tree.layers().iter().map(Vec::len).collect();
        assert_eq!(shapes, vec![5, 3, 2, 1]);
        // Leaf 4 is promoted twice, then paired at the top.
        assert_eq!(tree.proof(4).unwrap().len(), 1);
    }

    #[test]
    fn test_every_proof_verifies() {
        for n in 1..=17u8 {
            let tree = MerkleTree::build(leaves(n)).unwrap();
            for i in 0..n as usize {
                let proof = tree.proof(i).unwrap();
                assert!(
                    verify(&tree.root(), &tree.leaf(i).unwrap(), &proof),
                    "leaf {i} of {n}"
                );
            }
        }
    }

    #[test]
    fn test_proof_length_bound() {
        for n in 1..=40u8 {
            let tree = MerkleTree::build(leaves(n)).unwrap();
            let bound = (n as f64).log2().ceil() as usize;
            for i in 0..n as usize {
                assert!(tree.proof(i).unwrap().len() <= bound);
            }
        }
        // Powers of two give every leaf a full-length proof.
        let tree = MerkleTree::build(leaves(16)).unwrap();
        assert!((0..16).all(|i| tree.proof(i).unwrap().len() == 4));
    }

    #[test]
    fn test_index_out_of_range() {
        let tree = MerkleTree::build(leaves(3)).unwrap();
        assert_eq!(
            tree.proof(3),
            Err(TreeError::IndexOutOfRange {
                index: 3,
                leaf_count: 3
            })
        );
        // The tree is still usable afterwards.
        assert!(tree.proof(2).is_ok());
    }

    #[test]
    fn test_build_is_deterministic() {
        let a = MerkleTree::build(leaves(9)).unwrap();
        let b = MerkleTree::build(leaves(9)).unwrap();
        assert_eq!(a.root(), b.root());
    }

    #[test]
    fn test_leaf_order_matters() {
        let mut l = leaves(4);
        let a = MerkleTree::build(l.clone()).unwrap();
        l.swap(0, 2);
        let b = MerkleTree::build(l).unwrap();
        assert_ne!(a.root(), b.root());
    }

    #[test]
    fn test_from_layers_round_trip() {
        let tree = MerkleTree::build(leaves(6)).unwrap();
        let copy = MerkleTree::from_layers(tree.layers().to_vec()).unwrap();
        assert_eq!(copy, tree);
    }

    #[test]
    fn test_from_layers_detects_corruption() {
        let tree = MerkleTree::build(leaves(6)).unwrap();
        let mut layers = tree.layers().to_vec();
        layers[1][2][0] ^= 0x01;
        assert_eq!(
            MerkleTree::from_layers(layers),
            Err(TreeError::CorruptNode {
                layer: 1,
                position: 2
            })
        );
    }

    #[test]
    fn test_from_layers_detects_truncation() {
        let tree = MerkleTree::build(leaves(6)).unwrap();
        let mut layers = tree.layers().to_vec();
        layers.pop();
        assert!(matches!(
            MerkleTree::from_layers(layers),
            Err(TreeError::CorruptNode { .. })
        ));
        assert_eq!(MerkleTree::from_layers(vec![]), Err(TreeError::EmptyTree));
    }

    #[test]
    fn test_from_layers_rejects_repeated_root_layer() {
        let tree = MerkleTree::build(leaves(3)).unwrap();
        let mut layers = tree.layers().to_vec();
        let top = layers[layers.len() - 1].clone();
        layers.push(top);
        assert_eq!(
            MerkleTree::from_layers(layers),
            Err(TreeError::LayerCountMismatch {
                leaf_count: 3,
                expected: 3,
                actual: 4
            })
        );

        // A lone leaf stored with a copy of itself as a parent layer.
        let leaf = keccak256(b"only child");
        assert!(matches!(
            MerkleTree::from_layers(vec![vec![leaf], vec![leaf]]),
            Err(TreeError::LayerCountMismatch { expected: 1, .. })
        ));
    }

    #[test]
    fn test_layer_count() {
        let counts: Vec<usize> = (1..=9).map(layer_count).collect();
        assert_eq!(counts, vec![1, 2, 3, 3, 4, 4, 4, 4, 5]);
        for n in 1..=17u8 {
            let tree = MerkleTree::build(leaves(n)).unwrap();
            assert_eq!(tree.layers().len(), layer_count(n as usize));
        }
    }
}
