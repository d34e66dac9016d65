use anyhow::{Context, Result};
use clap::Args;

use super::{Layer, ScriptContext};
use crate::address::StacksAddress;

#[derive(Args, Debug, Clone)]
pub struct NonceArgs {
    /// Account to look up
    pub address: String,

    #[arg(long, value_enum, default_value_t = Layer::L1)]
    pub layer: Layer,
}

/// Prints the next nonce the node will accept from the account.
pub async fn next_nonce(ctx: &ScriptContext<'_>, args: &NonceArgs) -> Result<String> {
    let address: StacksAddress = args.address.parse()?;
    let node = ctx.node(args.layer);
    let nonce = node
        .account_nonce(&address)
        .await
        .with_context(|| format!("fetching nonce of {address} from {}", node.network().url))?;
    Ok(nonce.to_string())
}
