//! Error types for the commitment pipeline.
//!
//! Each stage has its own enum: [`ParseError`] for malformed input,
//! [`ValidationError`] for well-formed input that breaks a set-level rule,
//! and [`TreeError`] for Merkle engine failures. [`Error`] wraps all three
//! for callers that drive the whole pipeline.
//!
//! None of these are retryable. The computation is pure, so the same input
//! produces the same error until the input is fixed.

use num_bigint::BigUint;
use thiserror::Error;

/// Malformed key or value in the raw entry set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The key is not a 20-byte hex address.
    #[error("invalid address {input:?}: {reason}")]
    InvalidAddress {
        /// The raw key as supplied.
        input: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The value is not an unsigned integer literal.
    #[error("invalid value {value:?} for {address}")]
    InvalidValue {
        /// The key the value belongs to.
        address: String,
        /// The raw value as supplied.
        value: String,
    },

    /// The value carries a minus sign.
    #[error("negative value {value:?} for {address}")]
    NegativeValue {
        /// The key the value belongs to.
        address: String,
        /// The raw value as supplied.
        value: String,
    },

    /// The scaled value does not fit in a `uint256`.
    #[error("value for {address} exceeds uint256 after scaling: {value}")]
    ValueOutOfRange {
        /// The key the value belongs to.
        address: String,
        /// The scaled value.
        value: BigUint,
    },

    /// A hash literal is not 32 bytes of hex.
    #[error("invalid hash {input:?}: {reason}")]
    InvalidHash {
        /// The literal as supplied.
        input: String,
        /// What was wrong with it.
        reason: String,
    },
}

/// Well-formed input that violates a rule over the whole entry set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Two raw keys map to the same canonical address.
    #[error("duplicate address {0}")]
    DuplicateAddress(String),

    /// The scaled values do not add up to the configured total.
    #[error("total value mismatch: expected {expected}, got {actual}")]
    TotalMismatch {
        /// The configured expected total.
        expected: BigUint,
        /// The sum actually computed.
        actual: BigUint,
    },
}

/// Failures of the Merkle engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// A tree needs at least one leaf.
    #[error("cannot build a merkle tree with zero leaves")]
    EmptyTree,

    /// The requested leaf does not exist. The tree itself is unaffected.
    #[error("leaf index {index} out of range for tree with {leaf_count} leaves")]
    IndexOutOfRange {
        /// The index asked for.
        index: usize,
        /// Number of leaves in the tree.
        leaf_count: usize,
    },

    /// A stored tree does not hash to the root it claims.
    #[error("root mismatch: stored {stored}, recomputed {recomputed}")]
    RootMismatch {
        /// Root recorded in the dump.
        stored: String,
        /// Root recomputed from the dumped entries.
        recomputed: String,
    },

    /// An internal node does not equal the hash of its children.
    #[error("corrupt node at layer {layer}, position {position}")]
    CorruptNode {
        /// Layer of the bad node (0 is the leaf layer).
        layer: usize,
        /// Position within the layer.
        position: usize,
    },

    /// A stored tree has more or fewer layers than its leaf count implies.
    #[error("tree with {leaf_count} leaves needs {expected} layers, found {actual}")]
    LayerCountMismatch {
        /// Number of leaves in the stored tree.
        leaf_count: usize,
        /// Layers a tree of that size has, root included.
        expected: usize,
        /// Layers actually stored.
        actual: usize,
    },

    /// A stored tree uses an encoding or format we do not produce.
    #[error("unsupported tree format: {0}")]
    UnsupportedFormat(String),
}

/// Normalizer failure: either a single entry is malformed or the set as a
/// whole is invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// See [`ParseError`].
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// See [`ValidationError`].
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Any failure of the commitment pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// See [`ParseError`].
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// See [`ValidationError`].
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// See [`TreeError`].
    #[error(transparent)]
    Tree(#[from] TreeError),
}

impl From<NormalizeError> for Error {
    fn from(err: NormalizeError) -> Self {
        match err {
            NormalizeError::Parse(e) => Error::Parse(e),
            NormalizeError::Validation(e) => Error::Validation(e),
        }
    }
}

/// Convenience alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_mismatch_message_carries_both_totals() {
        let err = ValidationError::TotalMismatch {
            expected: BigUint::from(40u32),
            actual: BigUint::from(30u32),
        };
        assert_eq!(
            err.to_string(),
            "total value mismatch: expected 40, got 30"
        );
    }

    #[test]
    fn test_normalize_error_flattens_into_error() {
        let err: Error = NormalizeError::from(ValidationError::DuplicateAddress(
            "0xabc".to_string(),
        ))
        .into();
        assert!(matches!(err, Error::Validation(ValidationError::DuplicateAddress(_))));
    }

    #[test]
    fn test_index_out_of_range_message() {
        let err = TreeError::IndexOutOfRange {
            index: 3,
            leaf_count: 3,
        };
        assert!(err.to_string().contains("3 leaves"));
    }
}
