//! # Vesting Merkle Contracts
//!
//! Solidity source generation for on-chain allocations. The Merkle root
//! covers large claim sets; the `Vestings` library covers the short list of
//! investors and team members whose amounts are baked into the deployment
//! itself.
//!
//! - **Vestings**: renders `Vestings.sol` from an ordered
//!   `account -> amount` list, with checksummed address literals and an
//!   on-chain sum guard.
//!
//! ## Design Principles
//!
//! 1. Generated source is a pure function of its input: same list, same
//!    bytes, so diffs in review show only real allocation changes.
//! 2. Anything `solc` would reject, or that would revert at deploy time,
//!    is rejected here first.

pub mod vestings;

pub use vestings::{generate, parse_amounts, render, CodegenError, VestingAmount, VestingsTemplate};
