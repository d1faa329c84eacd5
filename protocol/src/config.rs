//! # Commitment Configuration & Constants
//!
//! Every magic number of the commitment scheme lives here. The hash width,
//! the leaf encoding schema, and the token precision are all part of the
//! external contract with on-chain verifiers: change one of them and every
//! published root and proof stops verifying.
//!
//! [`NormalizerConfig`] carries the per-run knobs (expected total, value
//! scaling) so that the two historical invocation modes (with and without
//! the supply check) share a single code path.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Hashing & Encoding
// ---------------------------------------------------------------------------

/// The hash function behind leaves and internal nodes. Keccak-256, the
/// EVM's native word hash, so `MerkleProof.verify` on-chain agrees with us.
pub const HASH_FUNCTION: &str = "keccak256";

/// Hash output length in bytes.
pub const HASH_OUTPUT_LENGTH: usize = 32;

/// Account identifier length in bytes (an EVM address).
pub const ADDRESS_LENGTH: usize = 20;

/// Width of one ABI word. Both leaf fields are padded to this.
pub const ABI_WORD_LENGTH: usize = 32;

/// Size of the encoded leaf payload: `abi.encode(address, uint256)`.
pub const LEAF_PAYLOAD_LENGTH: usize = 2 * ABI_WORD_LENGTH;

/// Solidity types of the leaf fields, in order. Recorded in every tree dump
/// so a consumer can refuse a tree built with a different schema.
pub const LEAF_ENCODING: [&str; 2] = ["address", "uint256"];

/// Format tag written into tree dumps.
pub const TREE_DUMP_FORMAT: &str = "standard-v1";

// ---------------------------------------------------------------------------
// Token Parameters
// ---------------------------------------------------------------------------

/// Decimals of the vested token. Snapshot shares are whole tokens and get
/// scaled by `10^18` into the atomic unit before encoding.
pub const DEFAULT_VALUE_DECIMALS: u32 = 18;

/// Total number of whole tokens allocated by the vesting snapshot.
pub const VESTING_SUPPLY_TOKENS: u64 = 6_000_000;

/// `VESTING_SUPPLY_TOKENS` expressed in atomic units (`6_000_000 * 10^18`).
pub fn vesting_supply() -> BigUint {
    scale_factor(DEFAULT_VALUE_DECIMALS) * BigUint::from(VESTING_SUPPLY_TOKENS)
}

/// Returns `10^decimals`.
pub fn scale_factor(decimals: u32) -> BigUint {
    BigUint::from(10u32).pow(decimals)
}

// ---------------------------------------------------------------------------
// NormalizerConfig
// ---------------------------------------------------------------------------

/// Per-run settings for the entry normalizer.
///
/// `expected_total` is compared against the sum of *scaled* values. Leave it
/// as `None` to skip the supply check entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Required sum of all scaled values, if any.
    #[serde(default, with = "crate::codec::decimal_opt")]
    pub expected_total: Option<BigUint>,
    /// Each raw value is multiplied by `10^value_decimals`.
    #[serde(default = "default_value_decimals")]
    pub value_decimals: u32,
}

fn default_value_decimals() -> u32 {
    DEFAULT_VALUE_DECIMALS
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            expected_total: None,
            value_decimals: DEFAULT_VALUE_DECIMALS,
        }
    }
}

impl NormalizerConfig {
    /// Configuration for the vesting snapshot: 18 decimals and the full
    /// 6M-token supply enforced.
    pub fn vesting_snapshot() -> Self {
        Self {
            expected_total: Some(vesting_supply()),
            value_decimals: DEFAULT_VALUE_DECIMALS,
        }
    }

    /// Values are taken as-is (already in atomic units), no total check.
    pub fn raw() -> Self {
        Self {
            expected_total: None,
            value_decimals: 0,
        }
    }

    /// Enforce `total` as the expected sum of scaled values.
    pub fn with_expected_total(mut self, total: BigUint) -> Self {
        self.expected_total = Some(total);
        self
    }

    /// Drop the total check.
    pub fn without_expected_total(mut self) -> Self {
        self.expected_total = None;
        self
    }

    /// Set the scaling exponent.
    pub fn with_value_decimals(mut self, decimals: u32) -> Self {
        self.value_decimals = decimals;
        self
    }

    /// The multiplier applied to every raw value.
    pub fn scale(&self) -> BigUint {
        scale_factor(self.value_decimals)
    }
}
