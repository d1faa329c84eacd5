//! # Commitment Entries
//!
//! An [`Entry`] is one `(address, value)` allocation. Its leaf payload is
//! the Solidity `abi.encode(address, uint256)` layout:
//!
//! ```text
//! [ 12 zero bytes | 20-byte address ][ 32-byte big-endian value ]
//!   word 0                             word 1
//! ```
//!
//! and its leaf hash is `keccak256(keccak256(payload))`. A contract checks a
//! claim with exactly this expression, so the layout is frozen.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::config::{ABI_WORD_LENGTH, LEAF_PAYLOAD_LENGTH};
use crate::crypto::{double_keccak256, Hash};
use crate::error::ParseError;

/// Width of a `uint256`, in bits.
const UINT256_BITS: u64 = 256;

/// One allocation in the committed set. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "EntryRepr")]
pub struct Entry {
    address: Address,
    #[serde(with = "crate::codec::decimal")]
    value: BigUint,
}

/// Unchecked wire form; deserialization goes through [`Entry::new`].
#[derive(Deserialize)]
struct EntryRepr {
    address: Address,
    #[serde(with = "crate::codec::decimal")]
    value: BigUint,
}

impl TryFrom<EntryRepr> for Entry {
    type Error = ParseError;

    fn try_from(repr: EntryRepr) -> Result<Self, Self::Error> {
        Entry::new(repr.address, repr.value)
    }
}

impl Entry {
    /// Creates an entry, rejecting values that do not fit in a `uint256`.
    pub fn new(address: Address, value: BigUint) -> Result<Self, ParseError> {
        if value.bits() > UINT256_BITS {
            return Err(ParseError::ValueOutOfRange {
                address: address.to_canonical(),
                value,
            });
        }
        Ok(Self { address, value })
    }

    /// The account this allocation belongs to.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// The allocated amount, in atomic units.
    pub fn value(&self) -> &BigUint {
        &self.value
    }

    /// `abi.encode(address, uint256)`.
    pub fn encode(&self) -> [u8; LEAF_PAYLOAD_LENGTH] {
        let mut payload = [0u8; LEAF_PAYLOAD_LENGTH];
        payload[..ABI_WORD_LENGTH].copy_from_slice(&self.address.to_abi_word());

        // Right-align the big-endian value in the second word. `new` already
        // guaranteed it is at most 32 bytes long.
        let value_bytes = self.value.to_bytes_be();
        let start = LEAF_PAYLOAD_LENGTH - value_bytes.len();
        payload[start..].copy_from_slice(&value_bytes);
        payload
    }

    /// `keccak256(keccak256(abi.encode(address, value)))`.
    pub fn leaf_hash(&self) -> Hash {
        double_keccak256(&self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    #[test]
    fn test_encode_layout() {
        let entry = Entry::new(addr(0x11), BigUint::from(0x0102u32)).unwrap();
        let payload = entry.encode();

        assert_eq!(payload[..12], [0u8; 12]);
        assert_eq!(payload[12..32], [0x11u8; 20]);
        assert_eq!(payload[32..62], [0u8; 30]);
        assert_eq!(payload[62..], [0x01u8, 0x02]);
    }

    #[test]
    fn test_encode_zero_value() {
        let entry = Entry::new(addr(0x11), BigUint::from(0u32)).unwrap();
        assert_eq!(entry.encode()[32..], [0u8; 32]);
    }

    #[test]
    fn test_encode_max_uint256() {
        let max = (BigUint::from(1u32) << 256u32) - 1u32;
        let entry = Entry::new(addr(0x11), max).unwrap();
        assert_eq!(entry.encode()[32..], [0xffu8; 32]);
    }

    #[test]
    fn test_rejects_values_above_uint256() {
        let too_big = BigUint::from(1u32) << 256u32;
        let err = Entry::new(addr(0x11), too_big).unwrap_err();
        assert!(matches!(err, ParseError::ValueOutOfRange { .. }));
    }

    #[test]
    fn test_leaf_hash_known_vector() {
        // abi.encode(0x1111..11, 10e18), hashed twice.
        let value = BigUint::from(10u64) * BigUint::from(10u64).pow(18);
        let entry = Entry::new(addr(0x11), value).unwrap();
        assert_eq!(
            hex::encode(entry.leaf_hash()),
            "7b2be508a579685aca7aa37e4595b5fe7fdc4420b5eb46b2d998963c88625feb"
        );
    }

    #[test]
    fn test_leaf_hash_depends_on_both_fields() {
        let base = Entry::new(addr(0x11), BigUint::from(5u32)).unwrap();
        let other_value = Entry::new(addr(0x11), BigUint::from(6u32)).unwrap();
        let other_addr = Entry::new(addr(0x12), BigUint::from(5u32)).unwrap();
        assert_ne!(base.leaf_hash(), other_value.leaf_hash());
        assert_ne!(base.leaf_hash(), other_addr.leaf_hash());
    }

    #[test]
    fn test_serde_shape() {
        let entry = Entry::new(addr(0xab), BigUint::from(10u32).pow(21)).unwrap();
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["address"], format!("0x{}", "ab".repeat(20)));
        assert_eq!(json["value"], "1000000000000000000000");

        let back: Entry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_deserialize_rejects_oversized_value() {
        let json = serde_json::json!({
            "address": format!("0x{}", "ab".repeat(20)),
            "value": format!("0x1{}", "0".repeat(64)),
        });
        assert!(serde_json::from_value::<Entry>(json).is_err());
    }
}
