//! # Account Addresses
//!
//! The canonical key of a commitment entry is a 20-byte EVM address.
//! Snapshots arrive with whatever casing the exporter felt like (lowercase,
//! EIP-55 checksummed, occasionally shouting in uppercase), so parsing is
//! case-insensitive and every address is re-rendered in one canonical form:
//! `0x` + 40 lowercase hex digits.
//!
//! The canonical string is also the sort key. Leaf indices are assigned in
//! that order, so two implementations only agree on proofs if they agree on
//! this exact textual form.
//!
//! Mixed-case checksums are parsed but not enforced: the snapshot has been
//! validated upstream and a checksum typo should not change which account
//! gets the allocation. [`Address::to_checksum`] renders EIP-55 for source
//! generation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::{ABI_WORD_LENGTH, ADDRESS_LENGTH};
use crate::crypto::keccak256;
use crate::error::ParseError;

/// A 20-byte account identifier.
///
/// `Ord` compares the raw bytes, which coincides with ordering the
/// canonical lowercase strings.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    /// Creates an address from raw bytes.
    pub fn from_bytes(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Returns the raw 20 bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// Parse an address from hex, with or without `0x`, in any case.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let invalid = |reason: String| ParseError::InvalidAddress {
            input: input.to_string(),
            reason,
        };

        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if digits.len() != 2 * ADDRESS_LENGTH {
            return Err(invalid(format!(
                "expected {} hex chars, got {}",
                2 * ADDRESS_LENGTH,
                digits.len()
            )));
        }

        let mut bytes = [0u8; ADDRESS_LENGTH];
        hex::decode_to_slice(digits, &mut bytes).map_err(|e| invalid(e.to_string()))?;
        Ok(Self(bytes))
    }

    /// Canonical form: `0x` + 40 lowercase hex digits.
    pub fn to_canonical(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// EIP-55 mixed-case checksum form.
    ///
    /// A hex letter is uppercased when the matching nibble of
    /// `keccak256(lowercase_hex)` is 8 or more.
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let digest = keccak256(lower.as_bytes());

        let mut out = String::with_capacity(2 + lower.len());
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let byte = digest[i / 2];
            let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }

    /// The address as one ABI word: 12 zero bytes, then the address.
    pub fn to_abi_word(&self) -> [u8; ABI_WORD_LENGTH] {
        let mut word = [0u8; ABI_WORD_LENGTH];
        word[ABI_WORD_LENGTH - ADDRESS_LENGTH..].copy_from_slice(&self.0);
        word
    }
}

impl FromStr for Address {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_canonical())
    }
}

impl Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_canonical())
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            Address::parse(&s).map_err(serde::de::Error::custom)
        } else {
            let bytes = <Vec<u8>>::deserialize(deserializer)?;
            let arr: [u8; ADDRESS_LENGTH] = bytes.as_slice().try_into().map_err(|_| {
                serde::de::Error::custom(format!(
                    "expected {}-byte address, got {}",
                    ADDRESS_LENGTH,
                    bytes.len()
                ))
            })?;
            Ok(Address(arr))
        }
    }
}
