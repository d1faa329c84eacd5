//! # CLI Interface
//!
//! Defines the command-line argument structure for `vesting-merkle` using
//! `clap` derive. Subcommands: `root`, `proof`, `verify`, `dump`,
//! `vestings`, and `version`.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Deterministic Merkle commitments for vesting and airdrop allowlists.
///
/// Reads an allocation snapshot, commits to it with a keccak256 Merkle
/// root that OpenZeppelin's `MerkleProof` can check, and hands out
/// per-address proofs. Results go to stdout as JSON; logs go to stderr.
#[derive(Parser, Debug)]
#[command(
    name = "vesting-merkle",
    about = "Merkle commitments for vesting allocations",
    version,
    propagate_version = true
)]
pub struct VestingMerkleCli {
    /// Log format: `pretty` or `json`.
    #[arg(long, global = true, env = "VESTING_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,

    /// Default log filter when `RUST_LOG` is unset.
    #[arg(
        long,
        global = true,
        env = "VESTING_LOG_LEVEL",
        default_value = "vesting_merkle=info,vesting_merkle_cli=info,vesting_merkle_contracts=info"
    )]
    pub log_level: String,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the Merkle root and leaf count of a snapshot.
    Root(RootArgs),
    /// Print the proof for one entry, by index or by address.
    Proof(ProofArgs),
    /// Check a proof file against a root.
    Verify(VerifyArgs),
    /// Write the full tree, entries included, as JSON.
    Dump(DumpArgs),
    /// Generate the Solidity `Vestings` library from a vestings list.
    Vestings(VestingsArgs),
    /// Print version information and exit.
    Version,
}

/// Where the snapshot lives and how to normalize it.
#[derive(Args, Debug, Clone)]
pub struct SnapshotArgs {
    /// Snapshot JSON: `{ "<address>": { "total_share": <amount> } }`.
    #[arg(long, short = 's', env = "VESTING_SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Decimal places every amount is scaled by.
    #[arg(long, env = "VESTING_DECIMALS", default_value_t = 18)]
    pub decimals: u32,

    /// Required sum of the scaled amounts, in atomic units.
    #[arg(long, env = "VESTING_EXPECTED_TOTAL", conflicts_with = "vesting_supply")]
    pub expected_total: Option<String>,

    /// Require the 6,000,000-token vesting supply (scaled by `--decimals`).
    #[arg(long)]
    pub vesting_supply: bool,
}

/// Arguments for the `root` subcommand.
#[derive(Args, Debug)]
pub struct RootArgs {
    #[command(flatten)]
    pub snapshot: SnapshotArgs,

    /// Write the summary here instead of stdout.
    #[arg(long, short = 'o')]
    pub out: Option<PathBuf>,
}

/// Arguments for the `proof` subcommand.
#[derive(Args, Debug)]
#[command(group(
    clap::ArgGroup::new("target").required(true).args(["index", "address"])
))]
pub struct ProofArgs {
    #[command(flatten)]
    pub snapshot: SnapshotArgs,

    /// Leaf index of the entry.
    #[arg(long, short = 'i')]
    pub index: Option<usize>,

    /// Address of the entry, any casing.
    #[arg(long, short = 'a')]
    pub address: Option<String>,

    /// Write the proof here instead of stdout.
    #[arg(long, short = 'o')]
    pub out: Option<PathBuf>,
}

/// Arguments for the `verify` subcommand.
#[derive(Args, Debug)]
#[command(group(
    clap::ArgGroup::new("commitment").required(true).args(["root", "dump"])
))]
pub struct VerifyArgs {
    /// Proof JSON as written by `proof`.
    #[arg(long, short = 'p')]
    pub proof: PathBuf,

    /// Expected root, `0x`-prefixed hex.
    #[arg(long, short = 'r', env = "VESTING_ROOT")]
    pub root: Option<String>,

    /// Take the root from a tree dump instead.
    #[arg(long)]
    pub dump: Option<PathBuf>,
}

/// Arguments for the `dump` subcommand.
#[derive(Args, Debug)]
pub struct DumpArgs {
    #[command(flatten)]
    pub snapshot: SnapshotArgs,

    /// Write the dump here instead of stdout.
    #[arg(long, short = 'o')]
    pub out: Option<PathBuf>,
}

/// Arguments for the `vestings` subcommand.
#[derive(Args, Debug)]
pub struct VestingsArgs {
    /// Vestings JSON: `{ "<address>": <amount> }`, in array order.
    #[arg(long, short = 'i', env = "VESTING_VESTINGS")]
    pub input: PathBuf,

    /// Write the Solidity source here instead of stdout.
    #[arg(long, short = 'o')]
    pub out: Option<PathBuf>,

    /// Name of the generated library.
    #[arg(long, default_value = "Vestings")]
    pub library_name: String,

    /// Import path of `IVesting`.
    #[arg(long, default_value = "../interfaces/IVesting.sol")]
    pub interface_import: String,

    /// Import path of `Config`.
    #[arg(long, default_value = "../libraries/Config.sol")]
    pub config_import: String,

    /// Constant the generated guard compares the sum against.
    #[arg(long, default_value = "Config.VESTING_AMOUNT")]
    pub total_constant: String,

    /// Also require this sum before generating anything.
    #[arg(long)]
    pub expected_total: Option<String>,
}
