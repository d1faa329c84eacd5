//! # Hashing Utilities
//!
//! Keccak-256 helpers used by the leaf encoder and the Merkle engine.
//!
//! - **keccak256**: the EVM word hash. Not SHA3-256: Ethereum froze the
//!   pre-standard padding, and the two disagree on every input.
//!
//! - **double_keccak256**: `keccak256(keccak256(data))`, the leaf hash.
//!   A leaf preimage is 64 bytes, exactly the size of an internal-node
//!   preimage. Hashing twice means nobody can present an internal node as
//!   a leaf (the classic second-preimage trick on Merkle trees).
//!
//! - **hash_pair**: `keccak256(min(a, b) || max(a, b))`. Ordering the
//!   children by byte value rather than position means a proof does not
//!   need left/right flags, which is what OpenZeppelin's `MerkleProof`
//!   expects.

use sha3::{Digest, Keccak256};

use crate::config::HASH_OUTPUT_LENGTH;

/// A 32-byte Keccak-256 digest. Ordering (`<`, `min`, `max`) on the array
/// is byte-lexicographic, which is the order [`hash_pair`] relies on.
pub type Hash = [u8; HASH_OUTPUT_LENGTH];

/// Compute the Keccak-256 hash of the input data.
///
/// # Example
///
/// ```
/// use vesting_merkle::crypto::keccak256;
///
/// let hash = keccak256(b"");
/// assert_eq!(
///     hex::encode(hash),
///     "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
/// );
/// ```
pub fn keccak256(data: &[u8]) -> Hash {
    Keccak256::digest(data).into()
}

/// Hash multiple byte slices together without concatenation overhead.
///
/// Equivalent to `keccak256(parts.concat())`, minus the temporary buffer.
pub fn keccak256_multi(parts: &[&[u8]]) -> Hash {
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// `keccak256(keccak256(data))`.
pub fn double_keccak256(data: &[u8]) -> Hash {
    keccak256(&keccak256(data))
}

/// Combine two child hashes into their parent, smaller hash first.
///
/// Commutative by construction: `hash_pair(a, b) == hash_pair(b, a)`.
pub fn hash_pair(a: &Hash, b: &Hash) -> Hash {
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    keccak256_multi(&[low.as_slice(), high.as_slice()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak256_known_vectors() {
        // Keccak-256 of the empty string. If this ever prints
        // a7ffc6f8..., somebody swapped in SHA3-256.
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
        assert_eq!(
            hex::encode(keccak256(b"abc")),
            "4e03657aea45a94fc7d47ba826c8d667c0d1e6e33a64a036ec44f58fa12d6c45"
        );
    }

    #[test]
    fn test_keccak256_multi_matches_concatenation() {
        let multi = keccak256_multi(&[b"hello".as_slice(), b" world".as_slice()]);
        let single = keccak256(b"hello world");
        assert_eq!(multi, single);
    }

    #[test]
    fn test_double_keccak256() {
        let once = keccak256(b"leaf");
        assert_eq!(double_keccak256(b"leaf"), keccak256(&once));
        assert_ne!(double_keccak256(b"leaf"), once);
    }

    #[test]
    fn test_hash_pair_sorts_children() {
        let low = [0x11u8; 32];
        let high = [0x22u8; 32];
        let expected = "3e92e0db88d6afea9edc4eedf62fffa4d92bcdfc310dccbe943747fe8302e871";

        assert_eq!(hex::encode(hash_pair(&low, &high)), expected);
        assert_eq!(hex::encode(hash_pair(&high, &low)), expected);
    }

    #[test]
    fn test_hash_pair_equal_children() {
        let h = [0x42u8; 32];
        assert_eq!(hash_pair(&h, &h), keccak256_multi(&[h.as_slice(), h.as_slice()]));
    }

    #[test]
    fn test_hash_pair_orders_by_bytes_not_position() {
        // First byte decides; the tail is irrelevant.
        let mut a = [0xffu8; 32];
        a[0] = 0x00;
        let mut b = [0x00u8; 32];
        b[0] = 0x01;
        assert_eq!(hash_pair(&a, &b), keccak256_multi(&[a.as_slice(), b.as_slice()]));
        assert_eq!(hash_pair(&b, &a), keccak256_multi(&[a.as_slice(), b.as_slice()]));
    }
}
