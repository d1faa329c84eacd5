//! Subcommand implementations.
//!
//! Each `run_*` function reads its inputs, calls into the library, and
//! writes one result. Nothing here computes a hash itself.

use anyhow::{bail, Context, Result};
use num_bigint::BigUint;
use serde::Serialize;

use vesting_merkle::codec::{decode_hash, encode_prefixed, parse_uint};
use vesting_merkle::config::{scale_factor, VESTING_SUPPLY_TOKENS};
use vesting_merkle::{Address, EntryProof, NormalizerConfig, TreeDump, VestingTree};
use vesting_merkle_contracts::{generate, VestingsTemplate};

use crate::cli::{DumpArgs, ProofArgs, RootArgs, SnapshotArgs, VerifyArgs, VestingsArgs};
use crate::snapshot;

/// Result of `verify`, printed as JSON.
#[derive(Debug, Serialize)]
pub struct VerifyReport {
    pub valid: bool,
    pub root: String,
    pub leaf_index: usize,
    pub address: String,
}

/// `root`: summary of the committed snapshot.
pub fn run_root(args: &RootArgs) -> Result<()> {
    let tree = build_tree(&args.snapshot)?;
    snapshot::write_json(&tree.summary(), args.out.as_deref())
}

/// `proof`: one entry's proof artifact.
pub fn run_proof(args: &ProofArgs) -> Result<()> {
    let tree = build_tree(&args.snapshot)?;
    let index = match (args.index, &args.address) {
        (Some(index), _) => index,
        (None, Some(address)) => {
            let address = Address::parse(address)?;
            tree.index_of(&address)
                .with_context(|| format!("{address} is not in the snapshot"))?
        }
        (None, None) => bail!("either --index or --address is required"),
    };

    let proof = tree.proof(index)?;
    tracing::info!(
        index,
        address = %proof.entry.address(),
        siblings = proof.proof.len(),
        "proof issued"
    );
    snapshot::write_json(&proof, args.out.as_deref())
}

/// `verify`: check a proof file. An invalid proof is reported and turned
/// into a non-zero exit.
pub fn run_verify(args: &VerifyArgs) -> Result<VerifyReport> {
    let proof: EntryProof = snapshot::read_json(&args.proof)?;

    let root = match (&args.root, &args.dump) {
        (Some(root), _) => decode_hash(root)?,
        (None, Some(path)) => {
            let dump: TreeDump = snapshot::read_json(path)?;
            VestingTree::load(dump)
                .with_context(|| format!("{} is not a valid tree dump", path.display()))?
                .root()
        }
        (None, None) => bail!("either --root or --dump is required"),
    };

    let report = VerifyReport {
        valid: proof.verify(&root),
        root: encode_prefixed(&root),
        leaf_index: proof.leaf_index,
        address: proof.entry.address().to_checksum(),
    };
    snapshot::write_json(&report, None)?;
    Ok(report)
}

/// `dump`: the whole tree as JSON.
pub fn run_dump(args: &DumpArgs) -> Result<()> {
    let tree = build_tree(&args.snapshot)?;
    snapshot::write_json(&tree.dump(), args.out.as_deref())
}

/// `vestings`: render `Vestings.sol`.
pub fn run_vestings(args: &VestingsArgs) -> Result<()> {
    let pairs = snapshot::read_vestings(&args.input)?;

    let mut template = VestingsTemplate {
        library_name: args.library_name.clone(),
        interface_import: args.interface_import.clone(),
        config_import: args.config_import.clone(),
        total_constant: args.total_constant.clone(),
        ..VestingsTemplate::default()
    };
    if let Some(total) = &args.expected_total {
        template = template.with_expected_total(parse_total(total)?);
    }

    let source = generate(pairs, &template)
        .with_context(|| format!("cannot generate vestings from {}", args.input.display()))?;
    snapshot::write_text(&source, args.out.as_deref())
}

/// Translate snapshot flags into a [`NormalizerConfig`].
pub fn normalizer_config(args: &SnapshotArgs) -> Result<NormalizerConfig> {
    let config = NormalizerConfig::raw().with_value_decimals(args.decimals);
    let config = if args.vesting_supply {
        // Whole tokens, scaled the same way as every snapshot amount.
        let total = BigUint::from(VESTING_SUPPLY_TOKENS) * scale_factor(args.decimals);
        config.with_expected_total(total)
    } else if let Some(total) = &args.expected_total {
        config.with_expected_total(parse_total(total)?)
    } else {
        config
    };
    Ok(config)
}

fn build_tree(args: &SnapshotArgs) -> Result<VestingTree> {
    let pairs = snapshot::read_snapshot(&args.snapshot)?;
    let config = normalizer_config(args)?;
    VestingTree::from_snapshot(pairs, &config)
        .with_context(|| format!("cannot commit to {}", args.snapshot.display()))
}

fn parse_total(text: &str) -> Result<BigUint> {
    parse_uint(text).map_err(|_| anyhow::anyhow!("invalid total {text:?}"))
}
