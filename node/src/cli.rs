//! # CLI Interface
//!
//! Defines the command-line argument structure for `trove-node` using
//! `clap` derive. Supports three subcommands: `demo`, `keygen`, and
//! `version`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// TROVE marketplace node.
///
/// Runs a local data-exchange marketplace: nodes trade payloads for
/// tokens, settled through a proof-of-work ledger against an in-process
/// chain gateway.
#[derive(Parser, Debug)]
#[command(
    name = "trove-node",
    about = "TROVE data marketplace node",
    version,
    propagate_version = true
)]
pub struct TroveNodeCli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the TROVE node binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the local four-node marketplace demo.
    Demo(DemoArgs),
    /// Generate a fresh Ed25519 keypair and print its address.
    Keygen(KeygenArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `demo` subcommand.
#[derive(Parser, Debug)]
pub struct DemoArgs {
    /// Proof-of-work difficulty (leading zero hex characters).
    #[arg(long, env = "TROVE_DIFFICULTY", default_value_t = 2)]
    pub difficulty: usize,

    /// Payload the demo user stores on the first node.
    #[arg(long, default_value = "hello from the trove demo")]
    pub payload: String,

    /// Log output format: "pretty" or "json".
    #[arg(long, env = "TROVE_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,
}

/// Arguments for the `keygen` subcommand.
#[derive(Parser, Debug)]
pub struct KeygenArgs {
    /// Write the hex-encoded secret key to this file instead of stdout.
    #[arg(long, short = 'o')]
    pub out: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        // Ensures the derive macros produce a valid CLI definition.
        TroveNodeCli::command().debug_assert();
    }
}
