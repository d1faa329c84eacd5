// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Vesting Merkle CLI
//!
//! Entry point for the `vesting-merkle` binary. Parses CLI arguments,
//! initializes logging, and dispatches to one subcommand:
//!
//! - `root`     : commit to a snapshot and print the root
//! - `proof`    : print one entry's proof
//! - `verify`   : check a proof against a root or a tree dump
//! - `dump`     : write the whole tree as JSON
//! - `vestings` : generate the Solidity `Vestings` library
//! - `version`  : print build version information

mod cli;
mod commands;
mod logging;
mod snapshot;

use anyhow::{bail, Result};
use clap::Parser;

use cli::{Commands, VestingMerkleCli};
use logging::LogFormat;

fn main() -> Result<()> {
    let cli = VestingMerkleCli::parse();

    if let Commands::Version = cli.command {
        print_version();
        return Ok(());
    }

    logging::init_logging(&cli.log_level, LogFormat::from_str_lossy(&cli.log_format));

    match &cli.command {
        Commands::Root(args) => commands::run_root(args),
        Commands::Proof(args) => commands::run_proof(args),
        Commands::Verify(args) => {
            let report = commands::run_verify(args)?;
            if !report.valid {
                bail!("proof for leaf {} does not match {}", report.leaf_index, report.root);
            }
            Ok(())
        }
        Commands::Dump(args) => commands::run_dump(args),
        Commands::Vestings(args) => commands::run_vestings(args),
        Commands::Version => Ok(()),
    }
}

/// Prints version information to stdout.
fn print_version() {
    println!("vesting-merkle {}", env!("CARGO_PKG_VERSION"));
    println!(
        "leaf encoding  {}",
        vesting_merkle::config::LEAF_ENCODING.join(",")
    );
    println!("hash           {}", vesting_merkle::config::HASH_FUNCTION);
    println!("dump format    {}", vesting_merkle::config::TREE_DUMP_FORMAT);
}
