//! Text codecs shared by the normalizer, the tree dump, and the CLI.
//!
//! Hashes travel as `0x`-prefixed lowercase hex (what ethers, viem, and
//! Foundry print). Token values travel as decimal strings, because JSON
//! numbers silently lose precision past 2^53 in most consumers.
//!
//! The `serde` helper modules below are meant for `#[serde(with = "...")]`.

use num_bigint::BigUint;
use num_traits::Num;

use crate::crypto::Hash;
use crate::error::ParseError;

/// Why an unsigned integer literal was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UintLiteralError {
    /// Leading minus sign.
    Negative,
    /// Not decimal digits or `0x` hex digits.
    Malformed,
}

/// Parse an unsigned integer literal: decimal digits, or `0x`-prefixed hex.
///
/// Surrounding whitespace is ignored. `_` separators are not accepted.
pub fn parse_uint(input: &str) -> Result<BigUint, UintLiteralError> {
    let s = input.trim();
    if s.starts_with('-') {
        return Err(UintLiteralError::Negative);
    }
    let s = s.strip_prefix('+').unwrap_or(s);

    let (digits, radix) = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex_digits) => (hex_digits, 16),
        None => (s, 10),
    };
    // `from_str_radix` accepts `_` separators; a snapshot value never should.
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(UintLiteralError::Malformed);
    }

    BigUint::from_str_radix(digits, radix).map_err(|_| UintLiteralError::Malformed)
}

/// `0x` + lowercase hex.
pub fn encode_prefixed(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Parse a 32-byte hash from hex, with or without `0x`.
pub fn decode_hash(input: &str) -> Result<Hash, ParseError> {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let mut out = [0u8; 32];
    hex::decode_to_slice(digits, &mut out).map_err(|e| ParseError::InvalidHash {
        input: input.to_string(),
        reason: e.to_string(),
    })?;
    Ok(out)
}

// ---------------------------------------------------------------------------
// Serde helpers
// ---------------------------------------------------------------------------

/// A single [`Hash`] as a `0x` hex string.
pub mod hash {
    use super::{decode_hash, encode_prefixed};
    use crate::crypto::Hash;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(hash: &Hash, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&encode_prefixed(hash))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Hash, D::Error> {
        let s = String::deserialize(deserializer)?;
        decode_hash(&s).map_err(serde::de::Error::custom)
    }
}

/// A `Vec<Hash>` as an array of `0x` hex strings.
pub mod hash_vec {
    use super::{decode_hash, encode_prefixed};
    use crate::crypto::Hash;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(hashes: &[Hash], serializer: S) -> Result<S::Ok, S::Error> {
        let encoded: Vec<String> = hashes.iter().map(|h| encode_prefixed(h)).collect();
        encoded.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Hash>, D::Error> {
        let strings = Vec::<String>::deserialize(deserializer)?;
        strings
            .iter()
            .map(|s| decode_hash(s).map_err(serde::de::Error::custom))
            .collect()
    }
}

/// Tree layers (`Vec<Vec<Hash>>`) as nested arrays of hex strings.
pub mod hash_layers {
    use super::{decode_hash, encode_prefixed};
    use crate::crypto::Hash;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(layers: &[Vec<Hash>], serializer: S) -> Result<S::Ok, S::Error> {
        let encoded: Vec<Vec<String>> = layers
            .iter()
            .map(|layer| layer.iter().map(|h| encode_prefixed(h)).collect())
            .collect();
        encoded.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Vec<Hash>>, D::Error> {
        let strings = Vec::<Vec<String>>::deserialize(deserializer)?;
        strings
            .iter()
            .map(|layer| {
                layer
                    .iter()
                    .map(|s| decode_hash(s).map_err(serde::de::Error::custom))
                    .collect()
            })
            .collect()
    }
}

/// A [`BigUint`] as a decimal string. Deserialization also takes plain JSON
/// integers and `0x` hex strings.
pub mod decimal {
    use super::{parse_uint, UintLiteralError};
    use num_bigint::BigUint;
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_str_radix(10))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        deserializer.deserialize_any(UintVisitor)
    }

    pub(super) struct UintVisitor;

    impl<'de> Visitor<'de> for UintVisitor {
        type Value = BigUint;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an unsigned integer or integer string")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<BigUint, E> {
            Ok(BigUint::from(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<BigUint, E> {
            u64::try_from(v)
                .map(BigUint::from)
                .map_err(|_| E::custom(format!("negative value {v}")))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<BigUint, E> {
            parse_uint(v).map_err(|e| match e {
                UintLiteralError::Negative => E::custom(format!("negative value {v:?}")),
                UintLiteralError::Malformed => E::custom(format!("invalid integer {v:?}")),
            })
        }
    }
}

/// `Option<BigUint>` counterpart of [`decimal`]; `null` maps to `None`.
pub mod decimal_opt {
    use super::decimal::UintVisitor;
    use num_bigint::BigUint;
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(
        value: &Option<BigUint>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => serializer.serialize_some(&v.to_str_radix(10)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<BigUint>, D::Error> {
        deserializer.deserialize_option(OptVisitor)
    }

    struct OptVisitor;

    impl<'de> Visitor<'de> for OptVisitor {
        type Value = Option<BigUint>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("null or an unsigned integer")
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
            d.deserialize_any(UintVisitor).map(Some)
        }
    }
}
