//! # Vesting Tree
//!
//! [`VestingTree`] glues the normalizer and the Merkle engine together: it
//! keeps the validated entries next to the tree built from their leaves,
//! so a caller can go from "address" to "index" to "proof" without
//! juggling two structures that could drift apart.
//!
//! ## Artifacts
//!
//! - [`TreeSummary`]: root and leaf count, the part that goes on-chain.
//! - [`EntryProof`]: one claimant's entry, index, leaf, and siblings.
//! - [`TreeDump`]: the whole tree plus entries, for archiving and for
//!   reloading without re-reading the snapshot. Loading re-derives every
//!   leaf and refuses a dump whose root does not match.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::address::Address;
use crate::codec::encode_prefixed;
use crate::config::{NormalizerConfig, LEAF_ENCODING, TREE_DUMP_FORMAT};
use crate::crypto::Hash;
use crate::entry::Entry;
use crate::error::{Result, TreeError};
use crate::merkle::{verify, EntryProof, MerkleTree};
use crate::normalize::{normalize, total_value};

// ---------------------------------------------------------------------------
// TreeSummary
// ---------------------------------------------------------------------------

/// The published commitment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSummary {
    /// Merkle root.
    #[serde(with = "crate::codec::hash")]
    pub root: Hash,
    /// Number of committed entries.
    pub leaf_count: usize,
}

// ---------------------------------------------------------------------------
// VestingTree
// ---------------------------------------------------------------------------

/// Validated entries and the Merkle tree over their leaves.
#[derive(Debug, Clone)]
pub struct VestingTree {
    entries: Vec<Entry>,
    tree: MerkleTree,
    /// Entries are in strictly ascending address order.
    sorted: bool,
}

impl VestingTree {
    /// Normalize a raw snapshot and build its tree in one go.
    pub fn from_snapshot<I, K, V>(raw_entries: I, config: &NormalizerConfig) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let entries = normalize(raw_entries, config)?;
        Self::from_entries(entries)
    }

    /// Build over an already-ordered entry sequence. The caller owns the
    /// order; index `i` of `entries` becomes leaf `i`.
    pub fn from_entries(entries: Vec<Entry>) -> Result<Self> {
        let leaves = entries.iter().map(Entry::leaf_hash).collect();
        let tree = MerkleTree::build(leaves)?;
        let sorted = entries
            .windows(2)
            .all(|w| w[0].address() < w[1].address());

        info!(
            root = %encode_prefixed(&tree.root()),
            leaves = entries.len(),
            total = %total_value(&entries),
            "vesting tree built"
        );
        Ok(Self {
            entries,
            tree,
            sorted,
        })
    }

    /// Merkle root.
    pub fn root(&self) -> Hash {
        self.tree.root()
    }

    /// Number of committed entries.
    pub fn leaf_count(&self) -> usize {
        self.entries.len()
    }

    /// Root and leaf count.
    pub fn summary(&self) -> TreeSummary {
        TreeSummary {
            root: self.root(),
            leaf_count: self.leaf_count(),
        }
    }

    /// Entries in leaf order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// The underlying tree.
    pub fn tree(&self) -> &MerkleTree {
        &self.tree
    }

    /// Entry at leaf `index`.
    pub fn entry(&self, index: usize) -> Result<&Entry> {
        self.entries.get(index).ok_or_else(|| {
            TreeError::IndexOutOfRange {
                index,
                leaf_count: self.leaf_count(),
            }
            .into()
        })
    }

    /// Leaf hash at `index`.
    pub fn leaf_hash(&self, index: usize) -> Result<Hash> {
        Ok(self.tree.leaf(index)?)
    }

    /// Leaf index of `address`, if it is committed.
    ///
    /// Binary search when the entries are in canonical order (always true
    /// for normalized input), linear scan otherwise.
    pub fn index_of(&self, address: &Address) -> Option<usize> {
        if self.sorted {
            self.entries
                .binary_search_by(|e| e.address().cmp(address))
                .ok()
        } else {
            self.entries.iter().position(|e| e.address() == address)
        }
    }

    /// Full proof artifact for leaf `index`.
    pub fn proof(&self, index: usize) -> Result<EntryProof> {
        let proof = self.tree.proof(index)?;
        let entry = self.entry(index)?.clone();
        debug!(index, siblings = proof.len(), "proof generated");
        Ok(EntryProof {
            leaf_index: index,
            leaf: self.tree.leaf(index)?,
            entry,
            proof,
        })
    }

    /// Proof for `address`, if it is committed.
    pub fn proof_for(&self, address: &Address) -> Option<EntryProof> {
        self.index_of(address).and_then(|i| self.proof(i).ok())
    }

    /// Check an `(entry, proof)` claim against this tree's root.
    pub fn verify_entry(&self, entry: &Entry, proof: &[Hash]) -> bool {
        verify(&self.root(), &entry.leaf_hash(), proof)
    }

    /// Serializable snapshot of the whole tree.
    pub fn dump(&self) -> TreeDump {
        TreeDump {
            format: TREE_DUMP_FORMAT.to_string(),
            leaf_encoding: LEAF_ENCODING.iter().map(|s| s.to_string()).collect(),
            root: self.root(),
            tree: self.tree.layers().to_vec(),
            values: self
                .entries
                .iter()
                .enumerate()
                .map(|(index, entry)| DumpedValue {
                    index,
                    address: *entry.address(),
                    value: entry.value().clone(),
                })
                .collect(),
        }
    }

    /// Rebuild from a dump, rejecting anything we would not have produced.
    ///
    /// Leaves are recomputed from the dumped entries, so a tampered value
    /// shows up as a root mismatch even if the stored layers were edited
    /// to match.
    pub fn load(dump: TreeDump) -> Result<Self> {
        if dump.format != TREE_DUMP_FORMAT {
            return Err(TreeError::UnsupportedFormat(format!("format {:?}", dump.format)).into());
        }
        if dump.leaf_encoding != LEAF_ENCODING {
            return Err(TreeError::UnsupportedFormat(format!(
                "leaf encoding {:?}",
                dump.leaf_encoding
            ))
            .into());
        }
        if let Some((position, value)) = dump
            .values
            .iter()
            .enumerate()
            .find(|(position, value)| *position != value.index)
        {
            return Err(TreeError::UnsupportedFormat(format!(
                "value {} stored at position {position}",
                value.index
            ))
            .into());
        }

        let entries = dump
            .values
            .into_iter()
            .map(|v| Entry::new(v.address, v.value))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let rebuilt = Self::from_entries(entries)?;
        if rebuilt.root() != dump.root {
            return Err(TreeError::RootMismatch {
                stored: encode_prefixed(&dump.root),
                recomputed: encode_prefixed(&rebuilt.root()),
            }
            .into());
        }
        if dump.tree.len() != rebuilt.tree.layers().len() {
            return Err(TreeError::LayerCountMismatch {
                leaf_count: rebuilt.leaf_count(),
                expected: rebuilt.tree.layers().len(),
                actual: dump.tree.len(),
            }
            .into());
        }
        // Root matches but a stored node may not: report the first one.
        for (layer, (ours, stored)) in rebuilt.tree.layers().iter().zip(&dump.tree).enumerate() {
            let differs = ours.iter().zip(stored).position(|(a, b)| a != b);
            let position = match differs {
                Some(position) => position,
                None if ours.len() != stored.len() => ours.len().min(stored.len()),
                None => continue,
            };
            return Err(TreeError::CorruptNode { layer, position }.into());
        }
        Ok(rebuilt)
    }
}

// ---------------------------------------------------------------------------
// TreeDump
// ---------------------------------------------------------------------------

/// On-disk form of a [`VestingTree`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeDump {
    /// Always [`TREE_DUMP_FORMAT`].
    pub format: String,
    /// Always [`LEAF_ENCODING`].
    pub leaf_encoding: Vec<String>,
    /// Merkle root.
    #[serde(with = "crate::codec::hash")]
    pub root: Hash,
    /// Every layer, leaves first.
    #[serde(with = "crate::codec::hash_layers")]
    pub tree: Vec<Vec<Hash>>,
    /// Entries with their leaf indices.
    pub values: Vec<DumpedValue>,
}

/// One dumped entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DumpedValue {
    /// Leaf index.
    pub index: usize,
    /// Claimant.
    pub address: Address,
    /// Allocated amount, as a decimal string.
    #[serde(with = "crate::codec::decimal")]
    pub value: BigUint,
}
