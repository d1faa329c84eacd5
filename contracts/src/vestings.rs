//! # Vestings Library Generator
//!
//! Renders the Solidity `Vestings` library: a pure function that returns
//! the hard-coded allocation array, plus a guard that reverts deployment
//! scripts whose amounts do not add up to the configured vesting total.
//!
//! This is the non-Merkle path. Small investor sets are cheaper to bake
//! straight into bytecode than to claim with proofs, so the same kind of
//! snapshot can feed either this generator or the Merkle tree.
//!
//! ## Rendering Rules
//!
//! - Entries keep their input order. Array index `i` is input pair `i`.
//! - Accounts are written in EIP-55 checksum form, which `solc` demands
//!   for address literals.
//! - Amounts are written exactly as given. No decimal scaling happens here.

use std::collections::HashSet;
use std::fmt::Write;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use vesting_merkle::codec::{parse_uint, UintLiteralError};
use vesting_merkle::{Address, Entry, ParseError};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur while generating the library source.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// An account or amount could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The same account appears twice.
    #[error("duplicate account {0}")]
    DuplicateAccount(String),

    /// Nothing to render.
    #[error("no vesting amounts supplied")]
    Empty,

    /// The amounts would make the generated `validateAmounts` revert.
    #[error("vesting amounts sum to {actual}, expected {expected}")]
    TotalMismatch {
        /// Total the template was configured with.
        expected: BigUint,
        /// Sum of the supplied amounts.
        actual: BigUint,
    },

    /// A template name is not a valid Solidity identifier path.
    #[error("invalid Solidity identifier {0:?}")]
    InvalidIdentifier(String),

    /// Writing into the output buffer failed.
    #[error("formatting failed")]
    Format(#[from] std::fmt::Error),
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One row of the generated `IVesting.VestingAmount[]` array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VestingAmount {
    /// Beneficiary.
    pub account: Address,
    /// Amount, in whatever unit the snapshot uses.
    pub amount: BigUint,
}

impl From<Entry> for VestingAmount {
    fn from(entry: Entry) -> Self {
        Self {
            account: *entry.address(),
            amount: entry.value().clone(),
        }
    }
}

/// Names and paths spliced into the generated source.
///
/// The defaults reproduce the layout of a Foundry project with
/// `src/interfaces/IVesting.sol` and `src/libraries/Config.sol`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VestingsTemplate {
    /// SPDX license identifier.
    pub license: String,
    /// Version requirement for `pragma solidity`.
    pub pragma: String,
    /// Name of the generated library.
    pub library_name: String,
    /// Import path of the `IVesting` interface.
    pub interface_import: String,
    /// Import path of the `Config` library.
    pub config_import: String,
    /// Constant the sum is checked against on-chain.
    pub total_constant: String,
    /// When set, the sum is also checked here, before any Solidity is
    /// written. Catches a bad snapshot without a compile-and-run cycle.
    #[serde(default, with = "vesting_merkle::codec::decimal_opt")]
    pub expected_total: Option<BigUint>,
}

impl Default for VestingsTemplate {
    fn default() -> Self {
        Self {
            license: "GPL-3.0".into(),
            pragma: "^0.8.13".into(),
            library_name: "Vestings".into(),
            interface_import: "../interfaces/IVesting.sol".into(),
            config_import: "../libraries/Config.sol".into(),
            total_constant: "Config.VESTING_AMOUNT".into(),
            expected_total: None,
        }
    }
}

impl VestingsTemplate {
    /// Check the amounts against `total` before rendering.
    pub fn with_expected_total(mut self, total: BigUint) -> Self {
        self.expected_total = Some(total);
        self
    }

    /// Rename the generated library.
    pub fn with_library_name(mut self, name: impl Into<String>) -> Self {
        self.library_name = name.into();
        self
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse raw `address -> amount` pairs, keeping their order.
///
/// Unlike the Merkle normalizer this does not sort and does not scale:
/// the output order is the array order in the generated library.
pub fn parse_amounts<I, K, V>(raw: I) -> Result<Vec<VestingAmount>, CodegenError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut amounts = Vec::new();

    for (key, value) in raw {
        let (key, value) = (key.as_ref(), value.as_ref());
        let account = Address::parse(key)?;
        let amount = parse_uint(value).map_err(|e| match e {
            UintLiteralError::Negative => ParseError::NegativeValue {
                address: key.to_string(),
                value: value.to_string(),
            },
            UintLiteralError::Malformed => ParseError::InvalidValue {
                address: key.to_string(),
                value: value.to_string(),
            },
        })?;
        // Entry::new enforces the uint256 bound.
        let entry = Entry::new(account, amount)?;

        if !seen.insert(account) {
            warn!(%account, "duplicate account in vestings input");
            return Err(CodegenError::DuplicateAccount(account.to_checksum()));
        }
        amounts.push(entry.into());
    }

    Ok(amounts)
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render the library source for `amounts`.
pub fn render(amounts: &[VestingAmount], template: &VestingsTemplate) -> Result<String, CodegenError> {
    if amounts.is_empty() {
        return Err(CodegenError::Empty);
    }
    check_identifier(&template.library_name)?;
    check_identifier(&template.total_constant)?;

    let total: BigUint = amounts.iter().map(|a| &a.amount).sum();
    if let Some(expected) = &template.expected_total {
        if &total != expected {
            return Err(CodegenError::TotalMismatch {
                expected: expected.clone(),
                actual: total,
            });
        }
    }

    let mut out = String::new();
    writeln!(out, "// SPDX-License-Identifier: {}", template.license)?;
    writeln!(out, "pragma solidity {};", template.pragma)?;
    writeln!(out)?;
    writeln!(out, "import {{IVesting}} from \"{}\";", template.interface_import)?;
    writeln!(out, "import {{Config}} from \"{}\";", template.config_import)?;
    writeln!(out)?;
    writeln!(out, "library {} {{", template.library_name)?;
    writeln!(out, "    error InvalidAmounts(uint256 expected, uint256 actual);")?;
    writeln!(out)?;
    writeln!(out, "    function vestings()")?;
    writeln!(out, "        internal")?;
    writeln!(out, "        pure")?;
    writeln!(out, "        returns (IVesting.VestingAmount[] memory)")?;
    writeln!(out, "    {{")?;
    writeln!(out, "        IVesting.VestingAmount[]")?;
    writeln!(
        out,
        "            memory vestings_ = new IVesting.VestingAmount[]({});",
        amounts.len()
    )?;
    for (i, row) in amounts.iter().enumerate() {
        writeln!(out)?;
        writeln!(out, "        vestings_[{i}] = IVesting.VestingAmount({{")?;
        writeln!(out, "            account: {},", row.account.to_checksum())?;
        writeln!(out, "            amount: {}", row.amount)?;
        write!(out, "        }});")?;
    }
    writeln!(out)?;
    writeln!(out)?;
    writeln!(out, "        // Validating amounts")?;
    writeln!(out, "        validateAmounts(vestings_);")?;
    writeln!(out)?;
    writeln!(out, "        return vestings_;")?;
    writeln!(out, "    }}")?;
    writeln!(out)?;
    writeln!(out, "    function validateAmounts(")?;
    writeln!(out, "        IVesting.VestingAmount[] memory vestings_")?;
    writeln!(out, "    ) internal pure {{")?;
    writeln!(out, "        uint256 totalAmount_;")?;
    writeln!(out, "        for (uint256 i_; i_ < vestings_.length; i_++) {{")?;
    writeln!(out, "            totalAmount_ += vestings_[i_].amount;")?;
    writeln!(out, "        }}")?;
    writeln!(out)?;
    writeln!(out, "        if (totalAmount_ != {})", template.total_constant)?;
    writeln!(
        out,
        "            revert InvalidAmounts({}, totalAmount_);",
        template.total_constant
    )?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;

    info!(
        library = %template.library_name,
        rows = amounts.len(),
        total = %total,
        "vestings library rendered"
    );
    debug!(bytes = out.len(), "vestings source size");
    Ok(out)
}

/// Parse and render in one step.
pub fn generate<I, K, V>(raw: I, template: &VestingsTemplate) -> Result<String, CodegenError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    render(&parse_amounts(raw)?, template)
}

/// `Name` or `Lib.CONSTANT`: dot-separated Solidity identifiers.
fn check_identifier(path: &str) -> Result<(), CodegenError> {
    let valid_segment = |s: &str| {
        let mut chars = s.chars();
        matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
    };
    if path.split('.').all(valid_segment) {
        Ok(())
    } else {
        Err(CodegenError::InvalidIdentifier(path.to_string()))
    }
}
