use anyhow::{Context, Result};
use clap::Args;

use crate::decoder::build_decoded;

#[derive(Args, Debug, Clone)]
pub struct DecodeArgs {
    /// Signed transaction, hex (0x prefix optional)
    pub raw_tx: String,
}

pub fn run(args: &DecodeArgs) -> Result<String> {
    let decoded = build_decoded(&args.raw_tx).context("decoding transaction")?;
    Ok(serde_json::to_string_pretty(&decoded)?)
}
