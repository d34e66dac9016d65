//! Fungible-token counterparts of the NFT scripts.

use anyhow::Result;
use clap::Args;

use super::{contract_call, query, read_only_call, submit, Layer, ScriptContext};
use crate::cli::parse_nonce_arg;
use crate::defaults::Defaults;
use crate::encoding::{contract_principal_cv, none_cv, standard_principal_cv, uint_cv, ContractIdentifier};
use crate::types::{ContractCallRequest, PostConditionMode, ReadOnlyCallRequest};

#[derive(Args, Debug, Clone)]
pub struct RegisterFtArgs {
    /// Key of the subnet miner allowed to register assets
    #[arg(long, env = "AUTH_SUBNET_MINER_KEY", hide_env_values = true)]
    pub sender_key: String,

    /// Deployer of both token contracts
    #[arg(long, env = "USER_ADDR")]
    pub user_addr: String,

    #[arg(long, default_value = Defaults::FT_CONTRACT_L1)]
    pub ft_contract: String,

    /// Subnet-side contract deposits are minted on
    #[arg(long, default_value = Defaults::FT_CONTRACT_L2)]
    pub l2_ft_contract: String,

    #[arg(value_parser = parse_nonce_arg)]
    pub nonce: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct DepositFtArgs {
    #[arg(long, env = "USER_KEY", hide_env_values = true)]
    pub sender_key: String,

    #[arg(long, env = "USER_ADDR")]
    pub user_addr: String,

    #[arg(long, default_value = Defaults::FT_CONTRACT_L1)]
    pub ft_contract: String,

    #[arg(long, default_value_t = Defaults::AMOUNT)]
    pub amount: u128,

    #[arg(value_parser = parse_nonce_arg)]
    pub nonce: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct WithdrawFtL2Args {
    #[arg(long, env = "ALT_USER_KEY", hide_env_values = true)]
    pub sender_key: String,

    #[arg(long, env = "USER_ADDR")]
    pub contract_addr: String,

    #[arg(long, env = "ALT_USER_ADDR")]
    pub recipient: String,

    #[arg(long, default_value = Defaults::FT_CONTRACT_L2)]
    pub ft_contract: String,

    #[arg(long, default_value_t = Defaults::AMOUNT)]
    pub amount: u128,

    #[arg(value_parser = parse_nonce_arg)]
    pub nonce: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct FtBalanceArgs {
    #[arg(long, env = "ALT_USER_ADDR")]
    pub sender: String,

    #[arg(long, env = "USER_ADDR")]
    pub contract_addr: String,

    /// Account whose balance is read (defaults to the caller)
    #[arg(long)]
    pub owner: Option<String>,

    #[arg(long, default_value = Defaults::FT_CONTRACT_L2)]
    pub ft_contract: String,

    #[arg(long, value_enum, default_value_t = Layer::L2)]
    pub layer: Layer,
}

pub fn register_request(ctx: &ScriptContext<'_>, args: &RegisterFtArgs) -> Result<ContractCallRequest> {
    Ok(contract_call(
        ctx.subnet_contract.clone(),
        "register-new-ft-contract",
        vec![
            contract_principal_cv(&args.user_addr, &args.ft_contract)?,
            contract_principal_cv(&args.user_addr, &args.l2_ft_contract)?,
        ],
        ctx.fee,
        args.nonce,
        PostConditionMode::Deny,
    )?)
}

pub fn deposit_request(ctx: &ScriptContext<'_>, args: &DepositFtArgs) -> Result<ContractCallRequest> {
    Ok(contract_call(
        ctx.subnet_contract.clone(),
        "deposit-ft-asset",
        vec![
            contract_principal_cv(&args.user_addr, &args.ft_contract)?,
            uint_cv(args.amount),
            standard_principal_cv(&args.user_addr)?,
            // no memo
            none_cv(),
        ],
        ctx.fee,
        args.nonce,
        PostConditionMode::Allow,
    )?)
}

pub fn withdraw_l2_request(ctx: &ScriptContext<'_>, args: &WithdrawFtL2Args) -> Result<ContractCallRequest> {
    Ok(contract_call(
        Defaults::L2_SUBNET_CONTRACT.parse()?,
        "ft-withdraw?",
        vec![
            contract_principal_cv(&args.contract_addr, &args.ft_contract)?,
            uint_cv(args.amount),
            standard_principal_cv(&args.recipient)?,
        ],
        ctx.fee,
        args.nonce,
        PostConditionMode::Allow,
    )?)
}

pub fn balance_request(args: &FtBalanceArgs) -> Result<ReadOnlyCallRequest> {
    let owner = args.owner.as_deref().unwrap_or(&args.sender);
    Ok(read_only_call(
        ContractIdentifier::parse_parts(&args.contract_addr, &args.ft_contract)?,
        "get-balance",
        vec![standard_principal_cv(owner)?],
        &args.sender,
    )?)
}

pub async fn register(ctx: &ScriptContext<'_>, args: &RegisterFtArgs) -> Result<String> {
    let req = register_request(ctx, args)?;
    submit(ctx, Layer::L1, &args.sender_key, &req).await
}

pub async fn deposit(ctx: &ScriptContext<'_>, args: &DepositFtArgs) -> Result<String> {
    let req = deposit_request(ctx, args)?;
    submit(ctx, Layer::L1, &args.sender_key, &req).await
}

pub async fn withdraw_l2(ctx: &ScriptContext<'_>, args: &WithdrawFtL2Args) -> Result<String> {
    let req = withdraw_l2_request(ctx, args)?;
    submit(ctx, Layer::L2, &args.sender_key, &req).await
}

pub async fn balance(ctx: &ScriptContext<'_>, args: &FtBalanceArgs) -> Result<String> {
    let call = balance_request(args)?;
    query(ctx, args.layer, &call).await
}
