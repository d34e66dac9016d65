use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use subnet_scripts::cli::Cli;
use subnet_scripts::client::HttpNode;
use subnet_scripts::commands::{execute, ScriptContext};
use subnet_scripts::types::NetworkTarget;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout carries only the result line
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let timeout = Duration::from_secs(cli.timeout_secs);
    let l1 = HttpNode::new(NetworkTarget::testnet(&cli.l1_url, cli.l1_chain_id), timeout)
        .context("building L1 client")?;
    let l2 = HttpNode::new(NetworkTarget::testnet(&cli.subnet_url, cli.subnet_chain_id), timeout)
        .context("building subnet client")?;

    let ctx = ScriptContext {
        l1: &l1,
        l2: &l2,
        subnet_contract: cli.subnet_contract.parse().context("parsing --subnet-contract")?,
        fee: cli.fee,
        dry_run: cli.dry_run,
    };

    let line = execute(&ctx, &cli.cmd).await?;
    println!("{line}");
    Ok(())
}
