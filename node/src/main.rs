// Copyright (c) 2026 Trove Labs. MIT License.
// See LICENSE for details.

//! # TROVE Marketplace Node
//!
//! Entry point for the `trove-node` binary. Parses CLI arguments,
//! initializes logging, and runs one of three subcommands:
//!
//! - `demo`    — wire up a local four-node marketplace and trade through it
//! - `keygen`  — generate an Ed25519 keypair
//! - `version` — print build version information

mod cli;
mod logging;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use trove_protocol::crypto::keys::TroveKeypair;
use trove_protocol::crypto::signatures::{authorize_request, authorize_store};
use trove_protocol::gateway::{ChainGateway, DataNetwork, InMemoryNetwork, LocalGateway};
use trove_protocol::ledger::{Ledger, MineControl};
use trove_protocol::market::{MarketEnv, MarketNode, Registry};

use cli::{Commands, TroveNodeCli};
use logging::LogFormat;

/// Starting gateway funding per demo node, in grains. Enough for every
/// settlement the demo issues, with room to rerun it interactively.
const DEMO_FUNDING: u64 = 1_000_000;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = TroveNodeCli::parse();

    match cli.command {
        Commands::Demo(args) => run_demo(args).await,
        Commands::Keygen(args) => keygen(args),
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Runs the local marketplace demo: four nodes of varying resilience, a
/// user who stores a payload on the first node, a mined settlement
/// block, a retrieval of the payload, and finally the user's removal
/// from the whitelist.
async fn run_demo(args: cli::DemoArgs) -> Result<()> {
    logging::init_logging(
        "trove_node=info,trove_protocol=info",
        LogFormat::from_str_lossy(&args.log_format),
    );

    tracing::info!(difficulty = args.difficulty, "starting marketplace demo");

    // --- Shared collaborators ---
    let gateway = Arc::new(LocalGateway::new());
    let network = Arc::new(InMemoryNetwork::new());
    let env = MarketEnv {
        ledger: Arc::new(Ledger::with_difficulty(args.difficulty)),
        gateway: Arc::clone(&gateway) as Arc<dyn ChainGateway>,
        network: Arc::clone(&network) as Arc<dyn DataNetwork>,
    };

    // --- Four nodes of varying resilience ---
    let registry = Registry::new();
    let mut nodes = Vec::new();
    for resilience in [0.8, 0.7, 0.9, 0.6] {
        let node = Arc::new(MarketNode::new(
            TroveKeypair::generate(),
            resilience,
            env.clone(),
        ));
        gateway.fund(node.address(), DEMO_FUNDING);
        registry.register(Arc::clone(&node));
        tracing::info!(address = node.address(), resilience, "node registered");
        nodes.push(node);
    }
    let seller = Arc::clone(&nodes[0]);

    // --- A user joins the marketplace ---
    let user = TroveKeypair::generate();
    seller
        .add_user_to_whitelist(seller.address(), &user.address())
        .context("whitelisting the demo user")?;
    println!("user {} whitelisted on {}", user.address(), seller.address());

    // --- Store a payload ---
    let payload = args.payload.as_bytes();
    let signature = authorize_store(&user, payload, seller.address());
    let (record, tx) = seller
        .store_data(payload, &user.public_key(), &signature)
        .await
        .context("storing the demo payload")?;
    println!(
        "stored {} bytes (record {}, fee {} grains, tx {})",
        record.size, record.id, tx.fee, tx.id
    );

    // --- Mine the settlement ---
    let miner = seller.address().to_string();
    let ledger = Arc::clone(&env.ledger);
    let mining_registry = registry.clone();
    let block = tokio::task::spawn_blocking(move || {
        ledger.mine_pending(&miner, &mining_registry, &MineControl::unbounded())
    })
    .await
    .context("mining task panicked")?
    .context("mining the pending pool")?;
    println!(
        "mined block {} (nonce {}, {} txs, hash {})",
        block.height,
        block.nonce,
        block.tx_count(),
        block.hash
    );

    // --- Request the payload back ---
    let key = format!("records/{}", record.id);
    network.publish(&key, seller.open_record(&record).context("opening record")?);

    let signature = authorize_request(&user, seller.address());
    let served = seller
        .request_data(&key, record.size, &user.public_key(), &signature)
        .await
        .context("requesting the demo payload")?;
    println!(
        "retrieved {} bytes: {:?}",
        served.len(),
        String::from_utf8_lossy(&served)
    );

    // --- Marketplace state ---
    println!("\nmarketplace after one full trade:");
    for node in &nodes {
        println!(
            "  {}  resilience {:.1}  reputation {:.3}  balance {} grains",
            node.address(),
            node.get_resilience_score(),
            node.get_reputation_score(),
            node.token_balance()
        );
    }
    println!(
        "ledger height {} with {} pending transactions",
        env.ledger.height(),
        env.ledger.pending_len()
    );

    // --- The user leaves ---
    seller
        .remove_user_from_whitelist(seller.address(), &user.address())
        .context("removing the demo user")?;
    let signature = authorize_store(&user, payload, seller.address());
    match seller
        .store_data(payload, &user.public_key(), &signature)
        .await
    {
        Err(e) => println!("\nafter removal, store is refused: {}", e),
        Ok(_) => anyhow::bail!("store unexpectedly succeeded after whitelist removal"),
    }

    tracing::info!("demo finished");
    Ok(())
}

/// Generates a keypair, printing the address and public key, and either
/// printing the secret or writing it to a file with restricted
/// permissions.
fn keygen(args: cli::KeygenArgs) -> Result<()> {
    let keypair = TroveKeypair::generate();
    let secret_hex = hex::encode(keypair.secret_key_bytes());

    println!("address    {}", keypair.address());
    println!("public key {}", keypair.public_key().to_hex());

    match args.out {
        Some(path) => {
            std::fs::write(&path, &secret_hex)
                .with_context(|| format!("failed to write secret key to {}", path.display()))?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))?;
            }
            println!("secret key written to {}", path.display());
        }
        None => println!("secret key {}", secret_hex),
    }
    Ok(())
}

/// Prints version information to stdout.
fn print_version() {
    println!("trove-node {}", env!("CARGO_PKG_VERSION"));
    println!("protocol   {}", trove_protocol::config::PROTOCOL_VERSION);
}
