// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Vesting Merkle: Core Library
//!
//! A deterministic commitment to a token allocation snapshot. Feed it a
//! map of `address -> amount`, get back a 32-byte Merkle root that a
//! Solidity contract can store, and per-address proofs that the contract
//! can check with nothing more than `keccak256` and a loop.
//!
//! The rules are the ones OpenZeppelin's `MerkleProof` expects: leaves are
//! `keccak256(keccak256(abi.encode(address, uint256)))` and parents hash
//! their two children in sorted order, so proofs carry no direction bits.
//!
//! ## Modules
//!
//! - **config**: hash parameters, leaf encoding, and normalizer settings.
//! - **crypto**: Keccak-256 and sorted-pair hashing. Nothing clever.
//! - **address**: 20-byte account addresses, canonical and EIP-55 forms.
//! - **entry**: one `(address, value)` allocation and its leaf hash.
//! - **normalize**: raw snapshot in, sorted validated entries out.
//! - **merkle**: tree construction, proofs, verification.
//! - **vesting**: entries and tree bundled, plus dump and reload.
//! - **codec**: hex and decimal text forms, including serde helpers.
//! - **error**: one error enum per failure family.
//!
//! ## Ground Rules
//!
//! 1. Same input set, same root. Input order never leaks into the output.
//! 2. Anything malformed is rejected before a single hash is computed.
//! 3. Every structure is immutable once built.
//!
//! ```
//! use vesting_merkle::{NormalizerConfig, VestingTree};
//!
//! let snapshot = [
//!     ("0x1111111111111111111111111111111111111111", "10"),
//!     ("0x2222222222222222222222222222222222222222", "20"),
//! ];
//! let tree = VestingTree::from_snapshot(snapshot, &NormalizerConfig::default()).unwrap();
//! let proof = tree.proof(1).unwrap();
//!
//! assert!(proof.verify(&tree.root()));
//! ```

pub mod address;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod entry;
pub mod error;
pub mod merkle;
pub mod normalize;
pub mod vesting;

pub use address::Address;
pub use config::NormalizerConfig;
pub use crypto::Hash;
pub use entry::Entry;
pub use error::{Error, NormalizeError, ParseError, Result, TreeError, ValidationError};
pub use merkle::{verify, EntryProof, MerkleTree};
pub use normalize::normalize;
pub use vesting::{DumpedValue, TreeDump, TreeSummary, VestingTree};
