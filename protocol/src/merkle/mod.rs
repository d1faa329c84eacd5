//! # Merkle Engine
//!
//! A binary Merkle tree over leaf hashes, with the two rules that make
//! independent implementations agree bit-for-bit:
//!
//! 1. **Sorted pairs.** A parent is `keccak256(min(a, b) || max(a, b))`.
//!    Proofs carry no left/right flags.
//! 2. **Odd promotion.** When a layer has an odd node count, the last node
//!    moves up unchanged. It is never paired with itself.
//!
//! ```text
//! layer 2:            R
//!                   /   \
//! layer 1:       H01     L2      <- L2 promoted, not hashed
//!               /   \     |
//! layer 0:    L0     L1   L2
//! ```
//!
//! ## Lifecycle
//!
//! A [`MerkleTree`] is built once and then only queried. There is no
//! insert or remove: a changed entry set means a new tree.
//!
//! ## Verification
//!
//! [`verify`] needs nothing but the root, one leaf hash, and its proof. It
//! is the same fold an on-chain verifier runs, and it never consults a
//! built tree.

pub mod proof;
pub mod tree;

pub use proof::{process_proof, verify, EntryProof};
pub use tree::MerkleTree;
