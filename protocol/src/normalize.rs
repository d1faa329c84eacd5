//! # Entry Normalizer
//!
//! Turns a raw `key -> value` snapshot into the ordered [`Entry`] sequence
//! the Merkle engine commits to.
//!
//! ```text
//! raw pairs ──parse──► (Address, BigUint) ──sort──► dedup check
//!                                                     │
//!            Vec<Entry> ◄──total check◄──sum◄──scale──┘
//! ```
//!
//! The output order is the leaf order, and a leaf's position is the index
//! claimants use to fetch their proof. Input order never matters: the
//! same set of pairs always normalizes to the same sequence.
//!
//! Nothing is hashed here. A bad snapshot is rejected before any tree work
//! starts.

use num_bigint::BigUint;
use tracing::{debug, warn};

use crate::address::Address;
use crate::codec::{parse_uint, UintLiteralError};
use crate::config::NormalizerConfig;
use crate::entry::Entry;
use crate::error::{NormalizeError, ParseError, ValidationError};

/// Normalize a raw snapshot into the canonical, validated entry sequence.
///
/// Keys are addresses in any casing, with or without `0x`. Values are
/// unsigned integer literals (decimal, or `0x` hex) in whole units; each
/// is multiplied by `10^config.value_decimals`. When
/// `config.expected_total` is set, the scaled values must add up to it
/// exactly.
///
/// # Example
///
/// ```
/// use num_bigint::BigUint;
/// use vesting_merkle::config::NormalizerConfig;
/// use vesting_merkle::normalize::normalize;
///
/// let raw = [
///     ("0x2222222222222222222222222222222222222222", "20"),
///     ("0x1111111111111111111111111111111111111111", "10"),
/// ];
/// let config = NormalizerConfig::raw().with_expected_total(BigUint::from(30u32));
/// let entries = normalize(raw, &config).unwrap();
///
/// assert_eq!(
///     entries[0].address().to_canonical(),
///     "0x1111111111111111111111111111111111111111"
/// );
/// ```
pub fn normalize<I, K, V>(
    raw_entries: I,
    config: &NormalizerConfig,
) -> Result<Vec<Entry>, NormalizeError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut parsed = raw_entries
        .into_iter()
        .map(|(key, value)| parse_pair(key.as_ref(), value.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    sort_by_canonical_key(&mut parsed);
    reject_duplicates(&parsed)?;

    let scale = config.scale();
    let entries = parsed
        .into_iter()
        .map(|(address, value)| Entry::new(address, value * &scale))
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(expected) = &config.expected_total {
        check_total(&entries, expected)?;
    }

    debug!(
        entries = entries.len(),
        decimals = config.value_decimals,
        total_checked = config.expected_total.is_some(),
        "snapshot normalized"
    );
    Ok(entries)
}

/// Sum of all entry values. Unbounded, so it cannot overflow.
pub fn total_value(entries: &[Entry]) -> BigUint {
    entries.iter().map(Entry::value).sum()
}

/// Fail with [`ValidationError::TotalMismatch`] unless the entries add up
/// to `expected`.
pub fn check_total(entries: &[Entry], expected: &BigUint) -> Result<(), ValidationError> {
    let actual = total_value(entries);
    if &actual != expected {
        warn!(%expected, %actual, "snapshot total does not match expected total");
        return Err(ValidationError::TotalMismatch {
            expected: expected.clone(),
            actual,
        });
    }
    Ok(())
}

fn parse_pair(key: &str, value: &str) -> Result<(Address, BigUint), ParseError> {
    let address = Address::parse(key)?;
    let value = parse_uint(value).map_err(|e| match e {
        UintLiteralError::Negative => ParseError::NegativeValue {
            address: key.to_string(),
            value: value.to_string(),
        },
        UintLiteralError::Malformed => ParseError::InvalidValue {
            address: key.to_string(),
            value: value.to_string(),
        },
    })?;
    Ok((address, value))
}

/// Case-insensitive lexicographic order of the canonical strings. The
/// canonical form is already lowercase, so a plain string compare does it.
fn sort_by_canonical_key(pairs: &mut [(Address, BigUint)]) {
    pairs.sort_by_cached_key(|(address, _)| address.to_canonical());
}

/// Expects `pairs` sorted, so duplicates are adjacent.
fn reject_duplicates(pairs: &[(Address, BigUint)]) -> Result<(), ValidationError> {
    match pairs.windows(2).find(|w| w[0].0 == w[1].0) {
        Some(w) => {
            warn!(address = %w[0].0, "duplicate address in snapshot");
            Err(ValidationError::DuplicateAddress(w[0].0.to_canonical()))
        }
        None => Ok(()),
    }
}
