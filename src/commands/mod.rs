pub mod account;
pub mod decode;
pub mod ft;
pub mod keygen;
pub mod nft;
pub mod stx;

use anyhow::{Context, Result};
use clap::ValueEnum;

use crate::cli::Command;
use crate::client::StacksNode;
use crate::encoding::{ClarityName, ClarityValue, ContractIdentifier};
use crate::key::StacksPrivateKey;
use crate::process::{broadcast_transaction, call_read_only_function, display_result, make_contract_call};
use crate::types::{AnchorMode, ContractCallRequest, PostConditionMode, ReadOnlyCallRequest};
use crate::util::bytes_to_0x;

/// Which chain a script talks to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Layer {
    /// The layer-1 chain hosting the subnet contract
    L1,
    /// The subnet itself
    L2,
}

/// Shared options every script runs with.
pub struct ScriptContext<'a> {
    pub l1: &'a dyn StacksNode,
    pub l2: &'a dyn StacksNode,
    /// The subnet contract on layer 1.
    pub subnet_contract: ContractIdentifier,
    pub fee: u64,
    /// Print the signed transaction instead of broadcasting it.
    pub dry_run: bool,
}

impl<'a> ScriptContext<'a> {
    pub fn node(&self, layer: Layer) -> &'a dyn StacksNode {
        match layer {
            Layer::L1 => self.l1,
            Layer::L2 => self.l2,
        }
    }
}

pub(crate) fn contract_call(
    contract: ContractIdentifier,
    function: &str,
    function_args: Vec<ClarityValue>,
    fee: u64,
    nonce: Option<u64>,
    post_condition_mode: PostConditionMode,
) -> crate::error::Result<ContractCallRequest> {
    Ok(ContractCallRequest {
        contract,
        function_name: ClarityName::new(function)?,
        function_args,
        fee,
        nonce: nonce.into(),
        anchor_mode: AnchorMode::Any,
        post_condition_mode,
    })
}

pub(crate) fn read_only_call(
    contract: ContractIdentifier,
    function: &str,
    function_args: Vec<ClarityValue>,
    sender: &str,
) -> crate::error::Result<ReadOnlyCallRequest> {
    Ok(ReadOnlyCallRequest {
        contract,
        function_name: ClarityName::new(function)?,
        function_args,
        sender: sender.parse()?,
    })
}

/// Sign `req` with `sender_key` and broadcast it (or render it, on a dry run). Returns the line to print.
pub async fn submit(
    ctx: &ScriptContext<'_>,
    layer: Layer,
    sender_key: &str,
    req: &ContractCallRequest,
) -> Result<String> {
    let node = ctx.node(layer);
    let key = StacksPrivateKey::from_hex(sender_key).context("parsing sender key")?;
    let tx = make_contract_call(node, req, &key)
        .await
        .with_context(|| format!("building {} call on {}", req.function_name, req.contract))?;

    if ctx.dry_run {
        return Ok(bytes_to_0x(&tx.serialize()?));
    }

    let txid = broadcast_transaction(node, &tx)
        .await
        .with_context(|| format!("broadcasting to {}", node.network().url))?;
    Ok(txid.to_string())
}

/// Run one subcommand and return the single line it prints.
pub async fn execute(ctx: &ScriptContext<'_>, cmd: &Command) -> Result<String> {
    match cmd {
        Command::RegisterNft(args) => nft::register(ctx, args).await,
        Command::DepositNft(args) => nft::deposit(ctx, args).await,
        Command::WithdrawNftL2(args) => nft::withdraw_l2(ctx, args).await,
        Command::Verify(args) => nft::verify(ctx, args).await,
        Command::RegisterFt(args) => ft::register(ctx, args).await,
        Command::DepositFt(args) => ft::deposit(ctx, args).await,
        Command::WithdrawFtL2(args) => ft::withdraw_l2(ctx, args).await,
        Command::FtBalance(args) => ft::balance(ctx, args).await,
        Command::DepositStx(args) => stx::deposit(ctx, args).await,
        Command::WithdrawStxL2(args) => stx::withdraw_l2(ctx, args).await,
        Command::Nonce(args) => account::next_nonce(ctx, args).await,
        Command::Keygen(args) => keygen::run(args),
        Command::Decode(args) => decode::run(args),
    }
}

pub async fn query(ctx: &ScriptContext<'_>, layer: Layer, call: &ReadOnlyCallRequest) -> Result<String> {
    let node = ctx.node(layer);
    let value = call_read_only_function(node, call)
        .await
        .with_context(|| format!("calling {} on {}", call.function_name, call.contract))?;
    Ok(display_result(&value))
}
