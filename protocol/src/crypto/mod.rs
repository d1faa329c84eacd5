//! # Hashing Primitives
//!
//! Everything that touches Keccak-256 goes through here. Leaves and
//! internal nodes must use byte-identical hashing to whatever verifies our
//! proofs on-chain (OpenZeppelin's `MerkleProof`), so there is exactly one
//! hash function and exactly one pair-combination rule.

pub mod hash;

pub use hash::{double_keccak256, hash_pair, keccak256, keccak256_multi, Hash};
